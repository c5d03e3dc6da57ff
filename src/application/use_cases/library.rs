use crate::domain::error::{AppError, Result};
use crate::domain::resource::Resource;
use crate::infrastructure::db::sqlite::SqliteRepository;
use crate::infrastructure::storage::FileStore;
use std::sync::Arc;
use tracing::{info, warn};

pub struct LibraryUseCase {
    repository: Arc<SqliteRepository>,
    store: Arc<FileStore>,
}

impl LibraryUseCase {
    pub fn new(repository: Arc<SqliteRepository>, store: Arc<FileStore>) -> Self {
        Self { repository, store }
    }

    /// The user's resources, newest first, optionally narrowed by a search query.
    pub async fn list(&self, user_id: &str, query: Option<&str>) -> Result<Vec<Resource>> {
        let resources = self.repository.list_resources(user_id).await?;
        Ok(match query {
            Some(query) => filter_resources(&resources, query),
            None => resources,
        })
    }

    pub async fn get(&self, user_id: &str, id: &str) -> Result<Resource> {
        match self.repository.get_resource(id).await? {
            Some(resource) if resource.user_id == user_id => Ok(resource),
            _ => Err(AppError::NotFound(format!("Resource {} not found", id))),
        }
    }

    pub async fn delete(&self, user_id: &str, id: &str) -> Result<()> {
        let resource = self.get(user_id, id).await?;

        if !self.repository.delete_resource(id).await? {
            return Err(AppError::NotFound(format!("Resource {} not found", id)));
        }
        // The record is gone; a leftover file is only logged.
        if let Err(e) = self.store.delete(&resource.storage_path).await {
            warn!(resource_id = %id, path = %resource.storage_path, error = %e, "Failed to remove stored file");
        }

        info!(resource_id = %id, user_id = %user_id, "Deleted resource");
        Ok(())
    }

    /// The stored PDF behind a resource the user owns.
    pub async fn read_file(&self, user_id: &str, id: &str) -> Result<(Resource, Vec<u8>)> {
        let resource = self.get(user_id, id).await?;
        let bytes = self.store.read(&resource.storage_path).await?;
        Ok((resource, bytes))
    }
}

/// Case-insensitive match on title, subject label and topics.
///
/// Works on a snapshot so callers can re-filter without another query. A blank
/// query keeps everything.
pub fn filter_resources(resources: &[Resource], query: &str) -> Vec<Resource> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return resources.to_vec();
    }

    resources
        .iter()
        .filter(|resource| {
            resource.title.to_lowercase().contains(&needle)
                || resource.subject.label().to_lowercase().contains(&needle)
                || resource
                    .topics
                    .iter()
                    .any(|topic| topic.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::{AnalysisResult, Subject};
    use crate::domain::resource::NewResource;
    use crate::infrastructure::db::sqlite::test_support::temp_repository;

    fn resource(user_id: &str, title: &str, subject: Subject, topics: &[&str]) -> Resource {
        NewResource {
            title: title.to_string(),
            file_name: format!("{}.pdf", title),
            storage_path: format!("resources/{}/1_{}.pdf", user_id, title),
            content_sha256: "00".repeat(32),
            size_bytes: 10,
            user_id: user_id.to_string(),
            user_name: None,
            analysis: AnalysisResult {
                subject,
                topics: topics.iter().map(|t| t.to_string()).collect(),
                ..AnalysisResult::default()
            },
        }
        .into_resource()
    }

    #[test]
    fn test_filter_matches_title_subject_and_topics() {
        let resources = vec![
            resource("u1", "Organic Notes", Subject::Chemistry, &["Alkanes"]),
            resource("u1", "Week 3", Subject::ComputerScience, &["Recursion"]),
            resource("u1", "Mechanics", Subject::Physics, &["Torque"]),
        ];

        let titles = |query: &str| -> Vec<String> {
            filter_resources(&resources, query)
                .into_iter()
                .map(|r| r.title)
                .collect()
        };

        assert_eq!(titles("organic"), vec!["Organic Notes"]);
        assert_eq!(titles("COMPUTER science"), vec!["Week 3"]);
        assert_eq!(titles("torq"), vec!["Mechanics"]);
        assert!(titles("biology").is_empty());
        assert_eq!(titles("  ").len(), 3);
    }

    async fn library() -> (LibraryUseCase, Arc<SqliteRepository>, Arc<FileStore>) {
        let repository = Arc::new(temp_repository().await);
        let root = std::env::temp_dir().join(format!("studymate-lib-{}", uuid::Uuid::new_v4()));
        let store = Arc::new(FileStore::init(root).await.unwrap());
        (
            LibraryUseCase::new(repository.clone(), store.clone()),
            repository,
            store,
        )
    }

    #[tokio::test]
    async fn test_get_hides_other_users_resources() {
        let (library, repository, _store) = library().await;
        let owned = resource("owner", "Thermo", Subject::Physics, &[]);
        repository.insert_resource(&owned).await.unwrap();

        assert_eq!(library.get("owner", &owned.id).await.unwrap().title, "Thermo");
        let err = library.get("intruder", &owned.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(library.list("intruder", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_file_and_record() {
        let (library, repository, store) = library().await;
        let stored = store.save("u1", "algebra.pdf", b"%PDF").await.unwrap();
        let mut record = resource("u1", "Algebra", Subject::Maths, &["Matrices"]);
        record.storage_path = stored.relative_path.clone();
        repository.insert_resource(&record).await.unwrap();

        assert_eq!(library.list("u1", Some("matrices")).await.unwrap().len(), 1);

        library.delete("u1", &record.id).await.unwrap();
        assert!(library.list("u1", None).await.unwrap().is_empty());
        assert!(store.read(&stored.relative_path).await.is_err());

        let _ = std::fs::remove_dir_all(store.root());
    }

    #[tokio::test]
    async fn test_delete_drops_record_even_when_file_cannot_be_removed() {
        let (library, repository, store) = library().await;
        let mut record = resource("u1", "Broken", Subject::Other, &[]);
        record.storage_path = "../outside.pdf".to_string();
        repository.insert_resource(&record).await.unwrap();

        library.delete("u1", &record.id).await.unwrap();
        assert!(repository.get_resource(&record.id).await.unwrap().is_none());

        let _ = std::fs::remove_dir_all(store.root());
    }

    #[tokio::test]
    async fn test_read_file_is_owner_checked() {
        let (library, repository, store) = library().await;
        let stored = store.save("u1", "optics.pdf", b"%PDF-1.4 optics").await.unwrap();
        let mut record = resource("u1", "Optics", Subject::Physics, &[]);
        record.storage_path = stored.relative_path;
        repository.insert_resource(&record).await.unwrap();

        let (found, bytes) = library.read_file("u1", &record.id).await.unwrap();
        assert_eq!(found.id, record.id);
        assert_eq!(bytes, b"%PDF-1.4 optics");

        let err = library.read_file("u2", &record.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let _ = std::fs::remove_dir_all(store.root());
    }
}
