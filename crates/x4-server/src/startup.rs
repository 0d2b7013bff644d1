//! Background startup helper.
//!
//! Provides [`spawn_server`] which binds eagerly and then serves the hub
//! API on a background Tokio task. Used by embedders and by tests that
//! need a live server on an ephemeral port.
//!
//! # Usage
//!
//! ```rust,ignore
//! use x4_server::config::ServerConfig;
//! use x4_server::startup::spawn_server;
//! use x4_server::state::AppState;
//! use std::sync::Arc;
//!
//! let config = ServerConfig { host: "127.0.0.1".into(), port: 0, ..ServerConfig::default() };
//! let running = spawn_server(&config, Arc::new(AppState::default())).await?;
//! println!("listening on {}", running.addr);
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::server::{ServerError, bind, serve};
use crate::state::AppState;

/// Errors that can occur when spawning the hub server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),

    /// The bound listener did not report its address.
    #[error("local address unavailable: {0}")]
    LocalAddr(#[from] std::io::Error),
}

/// A server running on a background task.
#[derive(Debug)]
pub struct RunningServer {
    /// The address actually bound (resolves port 0).
    pub addr: SocketAddr,
    /// The serving task. Abort it to stop the server.
    pub handle: JoinHandle<()>,
}

/// Bind per `config` and serve on a background task.
///
/// The server runs until the task is aborted or the runtime shuts down.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address cannot be bound. The
/// bind happens before the task is spawned, so the error is reported
/// here rather than lost in the background.
pub async fn spawn_server(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<RunningServer, StartupError> {
    let listener = bind(config).await?;
    let addr = listener.local_addr()?;

    let config = config.clone();
    let handle = tokio::spawn(async move {
        if let Err(e) = serve(listener, &config, state, std::future::pending()).await {
            tracing::error!(error = %e, "Hub server exited with error");
        }
    });

    tracing::info!(%addr, "Hub server spawned on background task");

    Ok(RunningServer { addr, handle })
}
