use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::security::keyring::KeyringManager;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

pub const CONFIG_FILE: &str = "studymate.toml";
pub const ENV_PREFIX: &str = "STUDYMATE_";
pub const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";
const KEYRING_SERVICE: &str = "studymate";
const GEMINI_KEYRING_KEY: &str = "gemini";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted PDF upload.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database_url: String,
    pub storage_root: PathBuf,
    pub llm: LLMConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database_url: "sqlite://studymate.db".to_string(),
            storage_root: PathBuf::from("storage"),
            llm: LLMConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults, then `studymate.toml`, then `STUDYMATE_*` environment variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            debug!(error = %e, "No .env file loaded");
        }
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        figment
            .extract()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))
    }
}

/// Resolves the Gemini API key and manages its keyring copy.
pub struct ConfigService {
    keyring: KeyringManager,
}

impl ConfigService {
    pub fn new() -> Self {
        Self {
            keyring: KeyringManager::new(KEYRING_SERVICE),
        }
    }

    pub fn save_api_key(&self, key: &str) -> Result<()> {
        self.keyring.set_secret(GEMINI_KEYRING_KEY, key)
    }

    pub fn delete_api_key(&self) -> Result<()> {
        self.keyring.delete_secret(GEMINI_KEYRING_KEY)
    }

    /// Config value first, then `GEMINI_API_KEY`, then the OS keyring.
    pub fn resolve_api_key(&self, config: &mut LLMConfig) {
        if config.has_api_key() {
            return;
        }
        if let Some(key) = std::env::var(GEMINI_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
        {
            config.api_key = Some(key);
            return;
        }
        match self.keyring.get_secret(GEMINI_KEYRING_KEY) {
            Ok(Some(key)) => config.api_key = Some(key),
            Ok(None) => warn!("No Gemini API key configured; analysis will fall back to defaults"),
            Err(e) => warn!(error = %e, "Could not read Gemini API key from keyring"),
        }
    }
}
