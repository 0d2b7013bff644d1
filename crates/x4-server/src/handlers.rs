//! Query endpoint handlers.
//!
//! All handlers take the read lock on the state manager, except the
//! pending-command poll which clears the queue and therefore takes the
//! write lock.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness plus game connectivity |
//! | `GET` | `/status` | Server, game, and collection summary |
//! | `GET` | `/api/v1/game/state` | Last full snapshot |
//! | `GET` | `/api/v1/player` | Player info |
//! | `GET` | `/api/v1/player/inventory` | Player inventory |
//! | `GET` | `/api/v1/factions` | All factions |
//! | `GET` | `/api/v1/factions/:id` | One faction |
//! | `GET` | `/api/v1/factions/relations` | Faction relations |
//! | `GET` | `/api/v1/sectors` | All sectors |
//! | `GET` | `/api/v1/sectors/:id` | One sector |
//! | `GET` | `/api/v1/stations` | Stations (`?sector=`, `?playerOwned=true`) |
//! | `GET` | `/api/v1/stations/:id` | One station |
//! | `GET` | `/api/v1/ships` | Ships (`?sector=`, `?playerOwned=true`) |
//! | `GET` | `/api/v1/ships/:id` | One ship |
//! | `GET` | `/api/v1/wares` | All wares |
//! | `GET` | `/api/v1/wares/:id` | One ware |
//! | `GET` | `/api/v1/trade/offers` | Trade offers (`?ware=`) |
//! | `GET` | `/api/v1/trade/orders` | All trade orders |
//! | `GET` | `/api/v1/trade/orders/:id` | One trade order |
//! | `GET` | `/api/v1/missions/offers` | Mission offers |
//! | `GET` | `/api/v1/missions/active` | Active missions |
//! | `GET` | `/api/v1/logbook` | Logbook, newest first (`?limit=`) |
//! | `GET` | `/api/v1/commands/pending` | Pending commands; clears them |
//! | `GET` | `/api/v1/commands/results` | Command results (`?limit=`) |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use x4_state::StoreCounts;

use crate::error::HubError;
use crate::state::AppState;

/// Response of a successful query.
type Queried = Result<Json<Value>, HubError>;

fn to_json<T: Serialize + ?Sized>(value: &T) -> Queried {
    Ok(Json(serde_json::to_value(value)?))
}

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for the station and ship listings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityFilterQuery {
    /// Keep only entities in this sector.
    pub sector: Option<String>,
    /// Keep only player-owned entities when exactly `true`.
    pub player_owned: Option<String>,
}

impl EntityFilterQuery {
    fn sector(&self) -> Option<&str> {
        self.sector.as_deref().filter(|s| !s.is_empty())
    }

    fn player_owned_only(&self) -> bool {
        self.player_owned.as_deref() == Some("true")
    }
}

/// Query parameters for `GET /api/v1/trade/offers`.
#[derive(Debug, Default, Deserialize)]
pub struct TradeOffersQuery {
    /// Keep only offers for this ware.
    pub ware: Option<String>,
}

/// Query parameters for the logbook and command result listings.
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    /// Maximum number of items, newest first.
    pub limit: Option<String>,
}

impl LimitQuery {
    /// The effective limit. Missing, zero, negative, or non-numeric
    /// values mean no limit; trailing garbage after leading digits is
    /// ignored.
    ///
    /// A negative value does not drop entries from the oldest end the
    /// way a signed slice bound would; it returns the full list.
    pub fn limit(&self) -> Option<usize> {
        self.limit.as_deref().and_then(parse_limit)
    }
}

fn parse_limit(raw: &str) -> Option<usize> {
    let trimmed = raw.trim_start();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let digits = trimmed.get(..digits_end)?;
    match digits.parse::<usize>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}

// ---------------------------------------------------------------------------
// Health and status
// ---------------------------------------------------------------------------

/// Response body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `ok`.
    pub status: &'static str,
    /// Server time in milliseconds since the epoch.
    pub timestamp: i64,
    /// Whether the game sent a full snapshot recently.
    pub connected: bool,
}

/// Liveness probe.
///
/// # Route
///
/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let connected = state.manager.read().await.is_connected(state.connection_timeout);
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().timestamp_millis(),
        connected,
    })
}

/// Response body of `GET /status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Server process info.
    pub server: ServerStatus,
    /// Game feed info.
    pub game: GameStatus,
    /// Per-collection sizes.
    pub data: StoreCounts,
}

/// Server section of [`StatusResponse`].
#[derive(Debug, Serialize)]
pub struct ServerStatus {
    /// Crate version.
    pub version: &'static str,
    /// Seconds since the server state was created.
    pub uptime: f64,
}

/// Game section of [`StatusResponse`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatus {
    /// Whether the game sent a full snapshot recently.
    pub connected: bool,
    /// Milliseconds since the epoch of the last full snapshot, 0 if none.
    pub last_update: i64,
    /// Game time of the last snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_time: Option<f64>,
    /// Pause flag of the last snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_paused: Option<bool>,
    /// Game version of the last snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_version: Option<String>,
}

/// Server, game, and collection summary.
///
/// # Route
///
/// `GET /status`
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let manager = state.manager.read().await;
    let summary = manager.summary(state.connection_timeout);
    let game_state = manager.game_state();

    Json(StatusResponse {
        server: ServerStatus {
            version: env!("CARGO_PKG_VERSION"),
            uptime: state.started_at.elapsed().as_secs_f64(),
        },
        game: GameStatus {
            connected: summary.connected,
            last_update: summary.last_update,
            game_time: game_state.map(|g| g.game_time),
            is_paused: game_state.map(|g| g.is_paused),
            game_version: game_state.and_then(|g| g.game_version.clone()),
        },
        data: summary.counts,
    })
}

// ---------------------------------------------------------------------------
// Game state and player
// ---------------------------------------------------------------------------

/// The last full snapshot.
///
/// # Route
///
/// `GET /api/v1/game/state`
pub async fn get_game_state(State(state): State<Arc<AppState>>) -> Queried {
    let manager = state.manager.read().await;
    let game_state = manager
        .game_state()
        .ok_or_else(|| HubError::not_found("No game state available"))?;
    to_json(game_state)
}

/// Player info.
///
/// # Route
///
/// `GET /api/v1/player`
pub async fn get_player(State(state): State<Arc<AppState>>) -> Queried {
    let manager = state.manager.read().await;
    let player = manager
        .player()
        .ok_or_else(|| HubError::not_found("No player data available"))?;
    to_json(player)
}

/// Player inventory.
///
/// # Route
///
/// `GET /api/v1/player/inventory`
pub async fn get_inventory(State(state): State<Arc<AppState>>) -> Queried {
    let manager = state.manager.read().await;
    let inventory = manager
        .inventory()
        .ok_or_else(|| HubError::not_found("No inventory data available"))?;
    to_json(inventory)
}

// ---------------------------------------------------------------------------
// Universe
// ---------------------------------------------------------------------------

/// All factions.
///
/// # Route
///
/// `GET /api/v1/factions`
pub async fn list_factions(State(state): State<Arc<AppState>>) -> Queried {
    to_json(&state.manager.read().await.all_factions())
}

/// One faction.
///
/// # Route
///
/// `GET /api/v1/factions/:id`
pub async fn get_faction(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Queried {
    let manager = state.manager.read().await;
    let faction = manager
        .faction(&id)
        .ok_or_else(|| HubError::not_found("Faction not found"))?;
    to_json(faction)
}

/// Faction relations.
///
/// # Route
///
/// `GET /api/v1/factions/relations`
pub async fn list_faction_relations(State(state): State<Arc<AppState>>) -> Queried {
    to_json(state.manager.read().await.faction_relations())
}

/// All sectors.
///
/// # Route
///
/// `GET /api/v1/sectors`
pub async fn list_sectors(State(state): State<Arc<AppState>>) -> Queried {
    to_json(&state.manager.read().await.all_sectors())
}

/// One sector.
///
/// # Route
///
/// `GET /api/v1/sectors/:id`
pub async fn get_sector(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Queried {
    let manager = state.manager.read().await;
    let sector = manager
        .sector(&id)
        .ok_or_else(|| HubError::not_found("Sector not found"))?;
    to_json(sector)
}

/// Stations, optionally filtered by sector and ownership.
///
/// # Route
///
/// `GET /api/v1/stations`
pub async fn list_stations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EntityFilterQuery>,
) -> Queried {
    let manager = state.manager.read().await;
    let mut stations = match query.sector() {
        Some(sector) => manager.stations_in_sector(sector),
        None => manager.all_stations(),
    };
    if query.player_owned_only() {
        stations.retain(|s| s.is_player_owned);
    }
    to_json(&stations)
}

/// One station.
///
/// # Route
///
/// `GET /api/v1/stations/:id`
pub async fn get_station(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Queried {
    let manager = state.manager.read().await;
    let station = manager
        .station(&id)
        .ok_or_else(|| HubError::not_found("Station not found"))?;
    to_json(station)
}

/// Ships, optionally filtered by sector and ownership.
///
/// # Route
///
/// `GET /api/v1/ships`
pub async fn list_ships(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EntityFilterQuery>,
) -> Queried {
    let manager = state.manager.read().await;
    let mut ships = match query.sector() {
        Some(sector) => manager.ships_in_sector(sector),
        None => manager.all_ships(),
    };
    if query.player_owned_only() {
        ships.retain(|s| s.is_player_owned);
    }
    to_json(&ships)
}

/// One ship.
///
/// # Route
///
/// `GET /api/v1/ships/:id`
pub async fn get_ship(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Queried {
    let manager = state.manager.read().await;
    let ship = manager
        .ship(&id)
        .ok_or_else(|| HubError::not_found("Ship not found"))?;
    to_json(ship)
}

// ---------------------------------------------------------------------------
// Trade
// ---------------------------------------------------------------------------

/// All wares.
///
/// # Route
///
/// `GET /api/v1/wares`
pub async fn list_wares(State(state): State<Arc<AppState>>) -> Queried {
    to_json(&state.manager.read().await.all_wares())
}

/// One ware.
///
/// # Route
///
/// `GET /api/v1/wares/:id`
pub async fn get_ware(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Queried {
    let manager = state.manager.read().await;
    let ware = manager
        .ware(&id)
        .ok_or_else(|| HubError::not_found("Ware not found"))?;
    to_json(ware)
}

/// Trade offers, optionally for one ware.
///
/// # Route
///
/// `GET /api/v1/trade/offers`
pub async fn list_trade_offers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TradeOffersQuery>,
) -> Queried {
    let manager = state.manager.read().await;
    match query.ware.as_deref().filter(|w| !w.is_empty()) {
        Some(ware) => to_json(&manager.trade_offers_for_ware(ware)),
        None => to_json(manager.trade_offers()),
    }
}

/// All trade orders.
///
/// # Route
///
/// `GET /api/v1/trade/orders`
pub async fn list_trade_orders(State(state): State<Arc<AppState>>) -> Queried {
    to_json(&state.manager.read().await.all_trade_orders())
}

/// One trade order.
///
/// # Route
///
/// `GET /api/v1/trade/orders/:id`
pub async fn get_trade_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Queried {
    let manager = state.manager.read().await;
    let order = manager
        .trade_order(&id)
        .ok_or_else(|| HubError::not_found("Trade order not found"))?;
    to_json(order)
}

// ---------------------------------------------------------------------------
// Missions and logbook
// ---------------------------------------------------------------------------

/// Mission offers.
///
/// # Route
///
/// `GET /api/v1/missions/offers`
pub async fn list_mission_offers(State(state): State<Arc<AppState>>) -> Queried {
    to_json(state.manager.read().await.mission_offers())
}

/// Active missions.
///
/// # Route
///
/// `GET /api/v1/missions/active`
pub async fn list_active_missions(State(state): State<Arc<AppState>>) -> Queried {
    to_json(state.manager.read().await.active_missions())
}

/// Logbook entries, newest first.
///
/// # Route
///
/// `GET /api/v1/logbook`
pub async fn list_logbook(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Queried {
    to_json(&state.manager.read().await.logbook(query.limit()))
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Hand every pending command to the poller and clear the queue.
///
/// Delivery is at-most-once: a command is gone once this response is
/// built, whether or not the poller receives it.
///
/// # Route
///
/// `GET /api/v1/commands/pending`
pub async fn poll_pending_commands(State(state): State<Arc<AppState>>) -> Queried {
    let commands = state.manager.write().await.take_pending_commands();
    if !commands.is_empty() {
        debug!(count = commands.len(), "pending commands handed out");
    }
    to_json(&commands)
}

/// Command results, newest first.
///
/// # Route
///
/// `GET /api/v1/commands/results`
pub async fn list_command_results(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Queried {
    to_json(&state.manager.read().await.command_results(query.limit()))
}
