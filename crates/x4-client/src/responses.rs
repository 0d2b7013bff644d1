//! Response bodies of the hub's probe and command endpoints.
//!
//! Entity queries decode straight into the `x4_types` snapshots; these
//! are the few shapes that only exist on the wire.

use std::collections::BTreeMap;

use serde::Deserialize;
use x4_types::{CommandId, GameTime};

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Health {
    /// Always `ok` when the hub is up.
    pub status: String,
    /// Hub time in milliseconds since the epoch.
    pub timestamp: i64,
    /// Whether the game sent a full snapshot recently.
    pub connected: bool,
}

/// Body of `GET /status`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Status {
    /// Hub process info.
    pub server: ServerStatus,
    /// Game feed info.
    pub game: GameStatus,
    /// Entry count per collection, keyed by collection name.
    pub data: BTreeMap<String, u64>,
}

/// Server section of [`Status`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerStatus {
    /// Hub version.
    pub version: String,
    /// Seconds since the hub started.
    pub uptime: f64,
}

/// Game section of [`Status`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatus {
    /// Whether the game sent a full snapshot recently.
    pub connected: bool,
    /// Milliseconds since the epoch of the last full snapshot, 0 if none.
    pub last_update: i64,
    /// Game time of the last snapshot.
    #[serde(default)]
    pub game_time: Option<GameTime>,
    /// Pause flag of the last snapshot.
    #[serde(default)]
    pub is_paused: Option<bool>,
    /// Game version of the last snapshot.
    #[serde(default)]
    pub game_version: Option<String>,
}

/// Body of `POST /api/v1/commands`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Submitted {
    pub command_id: CommandId,
}

/// Error body the hub sends with 4xx/5xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}
