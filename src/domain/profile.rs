use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub university: String,
    pub course: String,
    pub semester: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfileInput {
    #[validate(length(min = 1, max = 120))]
    pub university: String,
    #[validate(length(min = 1, max = 120))]
    pub course: String,
    #[validate(length(min = 1, max = 120))]
    pub semester: String,
}

impl ProfileInput {
    pub fn trimmed(self) -> Self {
        Self {
            university: self.university.trim().to_string(),
            course: self.course.trim().to_string(),
            semester: self.semester.trim().to_string(),
        }
    }
}

impl StudentProfile {
    pub fn new(
        user_id: String,
        name: Option<String>,
        email: Option<String>,
        input: ProfileInput,
    ) -> Self {
        Self {
            user_id,
            name,
            email,
            university: input.university,
            course: input.course,
            semester: input.semester,
            created_at: Some(chrono::Utc::now()),
        }
    }
}
