use crate::application::{AnalyzeUseCase, LibraryUseCase, ProfileUseCase, UploadUseCase};
use crate::domain::llm_config::LLMConfig;
use crate::shared::activity_log::SharedLogs;
use std::sync::Arc;

/// Everything the request handlers need, built once at startup.
pub struct AppState {
    pub analyze_use_case: Arc<AnalyzeUseCase>,
    pub upload_use_case: UploadUseCase,
    pub library_use_case: LibraryUseCase,
    pub profile_use_case: ProfileUseCase,
    pub llm_config: LLMConfig,
    pub logs: SharedLogs,
}
