use std::io::{self, BufRead};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::infrastructure::bootstrap;
use crate::infrastructure::config::{AppConfig, ConfigService};
use crate::interfaces::http::start_server;
use crate::shared::activity_log::new_shared_logs;

/// Entry point for the `studymate` binary.
///
/// With no arguments the HTTP API is started. `set-api-key` stores a Gemini
/// key read from stdin in the OS keyring and `clear-api-key` removes it.
pub async fn run() -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match std::env::args().nth(1).as_deref() {
        Some("set-api-key") => return set_api_key(),
        Some("clear-api-key") => {
            return ConfigService::new().delete_api_key().map_err(io::Error::other);
        }
        Some(other) => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Unknown command: {}", other),
            ));
        }
        None => {}
    }

    let config = AppConfig::load().map_err(|err| {
        error!(error = %err, "Failed to load configuration");
        io::Error::other(err)
    })?;

    let logs = new_shared_logs();
    let state = bootstrap::setup(&config, logs).await.map_err(|err| {
        error!(error = %err, "Startup failed");
        io::Error::other(err)
    })?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        "Starting HTTP API"
    );
    start_server(state, &config.server)?.await
}

fn set_api_key() -> io::Result<()> {
    let mut key = String::new();
    io::stdin().lock().read_line(&mut key)?;
    let key = key.trim();
    if key.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Expected the API key on stdin",
        ));
    }
    ConfigService::new()
        .save_api_key(key)
        .map_err(io::Error::other)?;
    info!("Stored Gemini API key in the OS keyring");
    Ok(())
}
