//! Ingestion and query API server for the X4 game state hub.
//!
//! This crate wraps an [`x4_state::StateManager`] in an Axum HTTP server
//! that exposes:
//!
//! - **Ingestion endpoints** (`POST /api/v1/...`) where the game extension
//!   pushes snapshots, validated before they reach the store
//! - **Query endpoints** (`GET /api/v1/...`) for downstream tools
//! - **Command endpoints** for enqueueing commands, the extension's
//!   poll-and-clear pickup, and result reporting
//! - **`WebSocket` endpoint** (`/ws/events`) streaming every state event
//!   via [`tokio::sync::broadcast`]
//! - **`/health` and `/status`** probes
//!
//! # Architecture
//!
//! The state manager lives behind one `tokio::sync::RwLock`. Queries take
//! the read lock; ingestion and the pending-command poll take the write
//! lock, so every store operation stays atomic with respect to the others.

pub mod config;
pub mod error;
pub mod handlers;
pub mod ingest;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use config::{ConfigError, HubConfig, ServerConfig};
pub use error::HubError;
pub use router::{build_router, build_router_with};
pub use server::{ServerError, start_server};
pub use startup::{RunningServer, StartupError, spawn_server};
pub use state::AppState;
