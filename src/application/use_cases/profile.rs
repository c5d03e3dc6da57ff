use crate::domain::error::Result;
use crate::domain::identity::UserIdentity;
use crate::domain::profile::{ProfileInput, StudentProfile};
use crate::infrastructure::db::sqlite::SqliteRepository;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct ProfileUseCase {
    repository: Arc<SqliteRepository>,
}

impl ProfileUseCase {
    pub fn new(repository: Arc<SqliteRepository>) -> Self {
        Self { repository }
    }

    /// `None` means the user still has to complete profile setup.
    pub async fn get(&self, user_id: &str) -> Result<Option<StudentProfile>> {
        self.repository.get_profile(user_id).await
    }

    pub async fn save(&self, user: &UserIdentity, input: ProfileInput) -> Result<StudentProfile> {
        let input = input.trimmed();
        input.validate()?;

        let existing = self.repository.get_profile(&user.user_id).await?;
        let mut profile =
            StudentProfile::new(user.user_id.clone(), user.name.clone(), user.email.clone(), input);
        if let Some(created_at) = existing.and_then(|p| p.created_at) {
            profile.created_at = Some(created_at);
        }

        self.repository.save_profile(&profile).await?;
        info!(user_id = %user.user_id, "Saved student profile");
        Ok(profile)
    }
}
