use crate::domain::analysis::{AnalysisResult, Question, Subject};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// An uploaded study document together with its AI-generated metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub file_name: String,
    /// Path relative to the storage root, `resources/{user_id}/{stamp}_{file_name}`.
    pub storage_path: String,
    pub content_sha256: String,
    pub size_bytes: i64,
    pub user_id: String,
    pub user_name: Option<String>,
    pub subject: Subject,
    pub topics: Vec<String>,
    pub summary: Vec<String>,
    pub questions: Vec<Question>,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

/// Caller-supplied naming, checked before any work is done on the upload.
#[derive(Debug, Clone, Validate)]
pub struct ResourceLabel {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
}

#[derive(Debug, Clone, Validate)]
pub struct NewResource {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    pub storage_path: String,
    pub content_sha256: String,
    pub size_bytes: i64,
    pub user_id: String,
    pub user_name: Option<String>,
    pub analysis: AnalysisResult,
}

impl NewResource {
    pub fn into_resource(self) -> Resource {
        Resource {
            id: uuid::Uuid::new_v4().to_string(),
            title: self.title,
            file_name: self.file_name,
            storage_path: self.storage_path,
            content_sha256: self.content_sha256,
            size_bytes: self.size_bytes,
            user_id: self.user_id,
            user_name: self.user_name,
            subject: self.analysis.subject,
            topics: self.analysis.topics,
            summary: self.analysis.summary,
            questions: self.analysis.questions,
            uploaded_at: chrono::Utc::now(),
        }
    }
}
