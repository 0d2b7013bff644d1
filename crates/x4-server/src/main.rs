//! Hub server binary for the X4 game state hub.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `x4-hub.yaml` plus `X4_HUB_*` overrides
//! 2. Initialize structured logging (tracing)
//! 3. Create the state manager and application state
//! 4. Serve until `Ctrl-C`

use std::path::Path;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;
use x4_server::config::CONFIG_FILE;
use x4_server::{AppState, ConfigError, HubConfig, ServerError, start_server};
use x4_state::StateManager;

/// Top-level error for the hub server binary.
#[derive(Debug, thiserror::Error)]
enum LaunchError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: ServerError,
    },
}

#[tokio::main]
async fn main() -> Result<(), LaunchError> {
    // 1. Load configuration. Logging is not up yet; the level comes from here.
    let config_path = Path::new(CONFIG_FILE);
    let config = HubConfig::load(config_path)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("x4-server starting");
    if config_path.exists() {
        info!(path = CONFIG_FILE, "Configuration loaded");
    } else {
        info!("Config file not found, using defaults");
    }
    info!(
        host = config.server.host,
        port = config.server.port,
        cors = config.server.cors,
        request_logging = config.server.request_logging,
        connection_timeout_ms = config.connection.timeout_ms,
        "Configuration resolved"
    );

    // 3. Create the state manager.
    let state = Arc::new(AppState::new(
        StateManager::new(),
        config.connection.timeout(),
    ));
    info!("State manager initialized");

    // 4. Serve.
    start_server(&config.server, state).await?;

    info!("x4-server exiting");
    Ok(())
}
