//! Typed HTTP client for the X4 game state hub.
//!
//! Downstream tools use [`X4ApiClient`] instead of hand-building requests:
//! every query route has a method returning the `x4_types` snapshot it
//! serves, and the command helpers wrap typed parameters into a
//! [`Command`](x4_types::Command) with a fresh id.
//!
//! ```rust,ignore
//! use x4_client::{EntityFilter, X4ApiClient};
//!
//! let client = X4ApiClient::new("http://localhost:8080");
//! if client.is_game_connected().await {
//!     let owned = client.stations(&EntityFilter::player_owned()).await?;
//! }
//! ```

pub mod client;
pub mod error;
pub mod responses;

pub use client::{DEFAULT_TIMEOUT, EntityFilter, X4ApiClient, new_command};
pub use error::ClientError;
pub use responses::{GameStatus, Health, ServerStatus, Status};
