use std::sync::Arc;

use tracing::{error, info};

use crate::application::{AnalyzeUseCase, LibraryUseCase, ProfileUseCase, UploadUseCase};
use crate::domain::error::Result;
use crate::infrastructure::config::{AppConfig, ConfigService};
use crate::infrastructure::db::sqlite::SqliteRepository;
use crate::infrastructure::llm_clients::{GeminiClient, LLMClient};
use crate::infrastructure::storage::FileStore;
use crate::interfaces::state::AppState;
use crate::shared::activity_log::{add_log, SharedLogs};

/// Opens the database and file store and wires the use cases together.
pub async fn setup(config: &AppConfig, logs: SharedLogs) -> Result<Arc<AppState>> {
    let repository = SqliteRepository::init(&config.database_url)
        .await
        .map_err(|err| {
            error!(error = %err, database_url = %config.database_url, "Failed to open database");
            err
        })?;
    let repository = Arc::new(repository);

    let store = FileStore::init(&config.storage_root).await.map_err(|err| {
        error!(
            error = %err,
            storage_root = %config.storage_root.display(),
            "Failed to prepare storage"
        );
        err
    })?;
    let store = Arc::new(store);

    let mut llm_config = config.llm.clone();
    ConfigService::new().resolve_api_key(&mut llm_config);
    if !llm_config.has_api_key() {
        add_log(
            &logs,
            "WARN",
            "Bootstrap",
            "Gemini API key missing; uploads will be saved with default metadata",
        );
    }

    let llm_client: Arc<dyn LLMClient + Send + Sync> =
        Arc::new(GeminiClient::new(llm_config.timeout_secs));
    let analyze_use_case = Arc::new(AnalyzeUseCase::new(llm_client));

    let state = AppState {
        upload_use_case: UploadUseCase::new(
            analyze_use_case.clone(),
            store.clone(),
            repository.clone(),
            llm_config.clone(),
            logs.clone(),
            config.server.max_upload_bytes,
        ),
        library_use_case: LibraryUseCase::new(repository.clone(), store),
        profile_use_case: ProfileUseCase::new(repository),
        analyze_use_case,
        llm_config,
        logs: logs.clone(),
    };

    info!(
        database_url = %config.database_url,
        storage_root = %config.storage_root.display(),
        model = %state.llm_config.model,
        "Application state ready"
    );
    add_log(&logs, "INFO", "Bootstrap", "StudyMate backend ready");

    Ok(Arc::new(state))
}
