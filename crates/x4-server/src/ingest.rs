//! Ingestion endpoints: the game extension pushes snapshots here.
//!
//! Every body goes through three gates before it reaches the store:
//!
//! 1. JSON syntax. Failure is [`HubError::MalformedBody`].
//! 2. Shape, via serde into the typed entity. Failure is
//!    [`HubError::InvalidPayload`] with the serde message as details.
//! 3. Field rules, via [`Validate`]. Failure is
//!    [`HubError::InvalidPayload`] with per-field errors (per index for
//!    array bodies).
//!
//! # Endpoints
//!
//! | Method | Path | Body | Store call |
//! |--------|------|------|------------|
//! | `POST` | `/api/v1/game/state` | object | `update_game_state` |
//! | `POST` | `/api/v1/player` | object | `update_player` |
//! | `POST` | `/api/v1/player/inventory` | object | `update_inventory` |
//! | `POST` | `/api/v1/factions` | array | `update_factions` |
//! | `POST` | `/api/v1/factions/relations` | array | `update_faction_relations` |
//! | `POST` | `/api/v1/sectors` | array | `update_sectors` |
//! | `POST` | `/api/v1/stations` | array | `update_stations` |
//! | `POST` | `/api/v1/ships` | array | `update_ships` |
//! | `POST` | `/api/v1/wares` | array | `update_wares` |
//! | `POST` | `/api/v1/trade/offers` | array | `update_trade_offers` |
//! | `POST` | `/api/v1/trade/orders` | array | `update_trade_orders` |
//! | `POST` | `/api/v1/missions/offers` | array | `update_mission_offers` |
//! | `POST` | `/api/v1/missions/active` | array | `update_active_missions` |
//! | `POST` | `/api/v1/logbook` | array | `update_logbook` |
//! | `POST` | `/api/v1/logbook/entry` | object | `add_logbook_entry` |
//! | `POST` | `/api/v1/commands/result` | object | `add_command_result` |
//! | `POST` | `/api/v1/commands` | object | `add_command` |

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};
use x4_state::StateManager;
use x4_types::{
    Command, CommandResult, Faction, FactionRelation, GameState, LogbookEntry, Mission, PlayerInfo,
    PlayerInventory, Sector, Ship, Station, TradeOffer, TradeOrder, Validate, ValidationErrors,
    Ware,
};

use crate::error::HubError;
use crate::state::AppState;

/// Response of a successful ingestion.
type Ingested = Result<Json<Value>, HubError>;

// ---------------------------------------------------------------------------
// Payload parsing
// ---------------------------------------------------------------------------

fn invalid(label: &str, details: Value) -> HubError {
    warn!(payload = label, %details, "rejected payload");
    HubError::InvalidPayload {
        message: format!("Invalid {label} data"),
        details,
    }
}

fn validation_details(errors: &ValidationErrors) -> Value {
    serde_json::to_value(errors).unwrap_or_else(|_| Value::String(errors.to_string()))
}

fn parse_value(body: &[u8]) -> Result<Value, HubError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "request body is not JSON");
        HubError::MalformedBody
    })
}

/// Parse and validate a single-object body.
///
/// # Errors
///
/// See the module docs for the three failure gates.
pub fn parse_one<T>(body: &[u8], label: &str) -> Result<T, HubError>
where
    T: DeserializeOwned + Validate,
{
    let value = parse_value(body)?;
    let item: T = serde_json::from_value(value)
        .map_err(|e| invalid(label, json!([{ "message": e.to_string() }])))?;
    item.validate()
        .map_err(|errors| invalid(label, json!([{ "errors": validation_details(&errors) }])))?;
    Ok(item)
}

/// Parse and validate an array body. Every element is validated and all
/// failing indices are reported together.
///
/// # Errors
///
/// See the module docs for the three failure gates.
pub fn parse_many<T>(body: &[u8], label: &str) -> Result<Vec<T>, HubError>
where
    T: DeserializeOwned + Validate,
{
    let value = parse_value(body)?;
    let items: Vec<T> = serde_json::from_value(value)
        .map_err(|e| invalid(label, json!([{ "message": e.to_string() }])))?;

    let failures: Vec<Value> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            item.validate().err().map(|errors| {
                json!({ "index": index, "errors": validation_details(&errors) })
            })
        })
        .collect();
    if !failures.is_empty() {
        return Err(invalid(label, Value::Array(failures)));
    }

    Ok(items)
}

fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}

async fn ingest_one<T, F>(state: &AppState, body: &[u8], label: &str, apply: F) -> Ingested
where
    T: DeserializeOwned + Validate,
    F: FnOnce(&mut StateManager, T),
{
    let item = parse_one::<T>(body, label)?;
    apply(&mut *state.manager.write().await, item);
    debug!(payload = label, "ingested");
    Ok(success())
}

async fn ingest_many<T, F>(state: &AppState, body: &[u8], label: &str, apply: F) -> Ingested
where
    T: DeserializeOwned + Validate,
    F: FnOnce(&mut StateManager, Vec<T>),
{
    let items = parse_many::<T>(body, label)?;
    let count = items.len();
    apply(&mut *state.manager.write().await, items);
    debug!(payload = label, count, "ingested");
    Ok(success())
}

// ---------------------------------------------------------------------------
// Game state and player
// ---------------------------------------------------------------------------

/// Receive a full game state snapshot. Refreshes connectivity.
///
/// # Route
///
/// `POST /api/v1/game/state`
pub async fn post_game_state(State(state): State<Arc<AppState>>, body: Bytes) -> Ingested {
    ingest_one::<GameState, _>(&state, &body, "game state", StateManager::update_game_state).await
}

/// Receive player info.
///
/// # Route
///
/// `POST /api/v1/player`
pub async fn post_player(State(state): State<Arc<AppState>>, body: Bytes) -> Ingested {
    ingest_one::<PlayerInfo, _>(&state, &body, "player", StateManager::update_player).await
}

/// Receive the player inventory.
///
/// # Route
///
/// `POST /api/v1/player/inventory`
pub async fn post_inventory(State(state): State<Arc<AppState>>, body: Bytes) -> Ingested {
    ingest_one::<PlayerInventory, _>(&state, &body, "inventory", StateManager::update_inventory)
        .await
}

// ---------------------------------------------------------------------------
// Universe
// ---------------------------------------------------------------------------

/// Receive a faction batch (merged by id).
///
/// # Route
///
/// `POST /api/v1/factions`
pub async fn post_factions(State(state): State<Arc<AppState>>, body: Bytes) -> Ingested {
    ingest_many::<Faction, _>(&state, &body, "factions", StateManager::update_factions).await
}

/// Receive the faction relations list (replaces the stored list).
///
/// # Route
///
/// `POST /api/v1/factions/relations`
pub async fn post_faction_relations(State(state): State<Arc<AppState>>, body: Bytes) -> Ingested {
    ingest_many::<FactionRelation, _>(
        &state,
        &body,
        "relations",
        StateManager::update_faction_relations,
    )
    .await
}

/// Receive a sector batch (merged by id).
///
/// # Route
///
/// `POST /api/v1/sectors`
pub async fn post_sectors(State(state): State<Arc<AppState>>, body: Bytes) -> Ingested {
    ingest_many::<Sector, _>(&state, &body, "sectors", StateManager::update_sectors).await
}

/// Receive a station batch (merged by id).
///
/// # Route
///
/// `POST /api/v1/stations`
pub async fn post_stations(State(state): State<Arc<AppState>>, body: Bytes) -> Ingested {
    ingest_many::<Station, _>(&state, &body, "stations", StateManager::update_stations).await
}

/// Receive a ship batch (merged by id).
///
/// # Route
///
/// `POST /api/v1/ships`
pub async fn post_ships(State(state): State<Arc<AppState>>, body: Bytes) -> Ingested {
    ingest_many::<Ship, _>(&state, &body, "ships", StateManager::update_ships).await
}

// ---------------------------------------------------------------------------
// Trade
// ---------------------------------------------------------------------------

/// Receive a ware batch (merged by id).
///
/// # Route
///
/// `POST /api/v1/wares`
pub async fn post_wares(State(state): State<Arc<AppState>>, body: Bytes) -> Ingested {
    ingest_many::<Ware, _>(&state, &body, "wares", StateManager::update_wares).await
}

/// Receive the market snapshot (replaces the stored list).
///
/// # Route
///
/// `POST /api/v1/trade/offers`
pub async fn post_trade_offers(State(state): State<Arc<AppState>>, body: Bytes) -> Ingested {
    ingest_many::<TradeOffer, _>(&state, &body, "trade offers", StateManager::update_trade_offers)
        .await
}

/// Receive a trade order batch (merged by id).
///
/// # Route
///
/// `POST /api/v1/trade/orders`
pub async fn post_trade_orders(State(state): State<Arc<AppState>>, body: Bytes) -> Ingested {
    ingest_many::<TradeOrder, _>(&state, &body, "trade orders", StateManager::update_trade_orders)
        .await
}

// ---------------------------------------------------------------------------
// Missions and logbook
// ---------------------------------------------------------------------------

/// Receive the mission offers (replaces the stored list).
///
/// # Route
///
/// `POST /api/v1/missions/offers`
pub async fn post_mission_offers(State(state): State<Arc<AppState>>, body: Bytes) -> Ingested {
    ingest_many::<Mission, _>(
        &state,
        &body,
        "mission offers",
        StateManager::update_mission_offers,
    )
    .await
}

/// Receive the active missions (replaces the stored list).
///
/// # Route
///
/// `POST /api/v1/missions/active`
pub async fn post_active_missions(State(state): State<Arc<AppState>>, body: Bytes) -> Ingested {
    ingest_many::<Mission, _>(
        &state,
        &body,
        "active missions",
        StateManager::update_active_missions,
    )
    .await
}

/// Receive the whole logbook (replaces it, uncapped).
///
/// # Route
///
/// `POST /api/v1/logbook`
pub async fn post_logbook(State(state): State<Arc<AppState>>, body: Bytes) -> Ingested {
    ingest_many::<LogbookEntry, _>(&state, &body, "logbook", StateManager::update_logbook).await
}

/// Receive one new logbook entry (prepended, capped).
///
/// # Route
///
/// `POST /api/v1/logbook/entry`
pub async fn post_logbook_entry(State(state): State<Arc<AppState>>, body: Bytes) -> Ingested {
    ingest_one::<LogbookEntry, _>(
        &state,
        &body,
        "logbook entry",
        StateManager::add_logbook_entry,
    )
    .await
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Receive the outcome of a command from the game extension.
///
/// # Route
///
/// `POST /api/v1/commands/result`
pub async fn post_command_result(State(state): State<Arc<AppState>>, body: Bytes) -> Ingested {
    ingest_one::<CommandResult, _>(
        &state,
        &body,
        "command result",
        StateManager::add_command_result,
    )
    .await
}

/// Enqueue a command for the game extension. Echoes the command id.
///
/// # Route
///
/// `POST /api/v1/commands`
pub async fn post_command(State(state): State<Arc<AppState>>, body: Bytes) -> Ingested {
    let command = parse_one::<Command>(&body, "command")?;
    let command_id = command.id.clone();
    state.manager.write().await.add_command(command);
    debug!(%command_id, "command enqueued");
    Ok(Json(json!({ "success": true, "commandId": command_id })))
}
