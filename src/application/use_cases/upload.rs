use crate::application::use_cases::analysis::{AnalysisFailure, AnalyzeUseCase};
use crate::application::use_cases::prompts::StudyContext;
use crate::application::use_cases::sampler;
use crate::domain::error::{AppError, Result};
use crate::domain::identity::UserIdentity;
use crate::domain::llm_config::LLMConfig;
use crate::domain::profile::StudentProfile;
use crate::domain::resource::{NewResource, Resource, ResourceLabel};
use crate::infrastructure::db::sqlite::SqliteRepository;
use crate::infrastructure::pdf::PdfLoader;
use crate::infrastructure::storage::FileStore;
use crate::shared::activity_log::{add_log, SharedLogs};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const LOG_SOURCE: &str = "Upload";

#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Falls back to the file name when blank.
    pub title: Option<String>,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub resource: Resource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<AnalysisFailure>,
}

pub struct UploadUseCase {
    loader: PdfLoader,
    analyzer: Arc<AnalyzeUseCase>,
    store: Arc<FileStore>,
    repository: Arc<SqliteRepository>,
    llm_config: LLMConfig,
    logs: SharedLogs,
    max_upload_bytes: usize,
}

impl UploadUseCase {
    pub fn new(
        analyzer: Arc<AnalyzeUseCase>,
        store: Arc<FileStore>,
        repository: Arc<SqliteRepository>,
        llm_config: LLMConfig,
        logs: SharedLogs,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            loader: PdfLoader::new(),
            analyzer,
            store,
            repository,
            llm_config,
            logs,
            max_upload_bytes,
        }
    }

    /// Analyzes a PDF, stores it and records the resource.
    ///
    /// A failed AI call does not abort the upload: the resource is saved with
    /// default metadata and the failure is returned as a warning.
    pub async fn upload(
        &self,
        user: &UserIdentity,
        profile: Option<&StudentProfile>,
        request: UploadRequest,
    ) -> Result<UploadOutcome> {
        self.check_request(&request)?;

        let title = request
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(&request.file_name)
            .to_string();
        ResourceLabel {
            title: title.clone(),
            file_name: request.file_name.clone(),
        }
        .validate()?;

        add_log(&self.logs, "INFO", LOG_SOURCE, "Analyzing PDF with AI...");
        let pages = self.loader.load_pages(&request.bytes).map_err(|e| {
            add_log(&self.logs, "ERROR", LOG_SOURCE, &e.to_string());
            e
        })?;
        let excerpt = sampler::sample(&pages);
        info!(
            user_id = %user.user_id,
            pages = pages.len(),
            excerpt_chars = excerpt.len_chars(),
            readable = excerpt.is_readable(),
            "Sampled document"
        );

        let context = StudyContext::from_profile(profile);
        let outcome = self
            .analyzer
            .analyze_or_default(&self.llm_config, &excerpt, &context)
            .await;
        if let Some(failure) = &outcome.failure {
            add_log(&self.logs, "WARN", LOG_SOURCE, failure.message());
        }

        add_log(&self.logs, "INFO", LOG_SOURCE, "Uploading to storage...");
        let stored = self
            .store
            .save(&user.user_id, &request.file_name, &request.bytes)
            .await?;

        let new_resource = NewResource {
            title,
            file_name: request.file_name,
            storage_path: stored.relative_path.clone(),
            content_sha256: stored.sha256,
            size_bytes: stored.size_bytes,
            user_id: user.user_id.clone(),
            user_name: user.name.clone(),
            analysis: outcome.result,
        };

        let resource = match self.persist(new_resource).await {
            Ok(resource) => resource,
            Err(e) => {
                if let Err(cleanup) = self.store.delete(&stored.relative_path).await {
                    warn!(path = %stored.relative_path, error = %cleanup, "Failed to remove orphaned file");
                }
                add_log(&self.logs, "ERROR", LOG_SOURCE, &format!("Upload failed: {}", e));
                return Err(e);
            }
        };

        add_log(&self.logs, "INFO", LOG_SOURCE, "Upload successful!");
        info!(resource_id = %resource.id, subject = %resource.subject, "Stored resource");

        Ok(UploadOutcome {
            resource,
            warning: outcome.failure,
        })
    }

    fn check_request(&self, request: &UploadRequest) -> Result<()> {
        let content_type = request
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        if !content_type.eq_ignore_ascii_case(PDF_CONTENT_TYPE) {
            return Err(AppError::ValidationError(
                "Only PDF files are allowed".to_string(),
            ));
        }
        if request.bytes.is_empty() {
            return Err(AppError::ValidationError("The file is empty".to_string()));
        }
        if request.bytes.len() > self.max_upload_bytes {
            return Err(AppError::ValidationError(format!(
                "File exceeds the {} byte upload limit",
                self.max_upload_bytes
            )));
        }
        Ok(())
    }

    async fn persist(&self, new_resource: NewResource) -> Result<Resource> {
        new_resource.validate()?;
        let resource = new_resource.into_resource();
        self.repository.insert_resource(&resource).await?;
        Ok(resource)
    }
}
