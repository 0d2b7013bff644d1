//! Integration tests for the hub API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use x4_server::router::build_router;
use x4_server::state::AppState;
use x4_state::{StateEvent, Topic};

fn make_test_state() -> Arc<AppState> {
    Arc::new(AppState::default())
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, Value) {
    let response = build_router(Arc::clone(state)).oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn get(state: &Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    send(state, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_raw(state: &Arc<AppState>, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();
    send(state, request).await
}

async fn post(state: &Arc<AppState>, uri: &str, body: &Value) -> (StatusCode, Value) {
    post_raw(state, uri, &body.to_string()).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn player() -> Value {
    json!({
        "id": "player",
        "name": "Captain",
        "money": 250_000,
        "gameTime": 7200,
        "currentSector": { "id": "sec1", "name": "Argon Prime" },
        "faction": { "id": "player", "name": "Player" }
    })
}

fn game_state() -> Value {
    json!({
        "timestamp": 1_700_000_000_000_u64,
        "gameTime": 7200,
        "player": player(),
        "isPaused": false,
        "gameVersion": "7.10"
    })
}

fn station(id: &str, sector: &str, player_owned: bool, hull: f64) -> Value {
    json!({
        "id": id,
        "name": format!("Station {id}"),
        "owner": { "id": "argon", "name": "Argon Federation" },
        "type": "factory",
        "sector": { "id": sector, "name": sector },
        "position": { "x": 0, "y": 0, "z": 0 },
        "hull": hull,
        "isPlayerOwned": player_owned
    })
}

fn trade_offer(station: &str, ware: &str) -> Value {
    json!({
        "station": { "id": station, "name": station },
        "ware": { "id": ware, "name": ware },
        "type": "sell",
        "price": 120.5,
        "amount": 400,
        "volume": 4000
    })
}

fn logbook_entry(n: u32) -> Value {
    json!({
        "id": format!("log{n}"),
        "time": n,
        "category": "general",
        "title": format!("Entry {n}"),
        "text": "Something happened",
        "importance": "low",
        "isRead": false
    })
}

fn command(id: &str) -> Value {
    json!({
        "id": id,
        "type": "cancel_trade_order",
        "params": { "orderId": "order1" },
        "timestamp": 1_700_000_000_000_u64
    })
}

// ---------------------------------------------------------------------------
// Health and status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health_reports_disconnected_on_start() {
    let state = make_test_state();
    let (status, json) = get(&state, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["connected"], false);
    assert!(json["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_status_shape() {
    let state = make_test_state();
    let (status, json) = get(&state, "/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["server"]["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["server"]["uptime"].as_f64().unwrap() >= 0.0);
    assert_eq!(json["game"]["connected"], false);
    assert_eq!(json["game"]["lastUpdate"], 0);
    assert!(json["game"].get("gameTime").is_none());
    assert_eq!(json["data"]["stations"], 0);
    assert_eq!(json["data"]["pendingCommands"], 0);
}

// ---------------------------------------------------------------------------
// Game state
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_game_state_round_trip() {
    let state = make_test_state();

    let (status, _) = get(&state, "/api/v1/game/state").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = post(&state, "/api/v1/game/state", &game_state()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "success": true }));

    let (status, json) = get(&state, "/api/v1/game/state").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["gameVersion"], "7.10");

    // A full snapshot also sets the player and the heartbeat.
    let (status, json) = get(&state, "/api/v1/player").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Captain");

    let (_, json) = get(&state, "/health").await;
    assert_eq!(json["connected"], true);

    let (_, json) = get(&state, "/status").await;
    assert_eq!(json["game"]["gameVersion"], "7.10");
    assert_eq!(json["game"]["isPaused"], false);
}

#[tokio::test]
async fn test_player_update_does_not_connect() {
    let state = make_test_state();
    let (status, _) = post(&state, "/api/v1/player", &player()).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = get(&state, "/health").await;
    assert_eq!(json["connected"], false);
}

#[tokio::test]
async fn test_missing_singletons_return_404() {
    let state = make_test_state();

    let (status, json) = get(&state, "/api/v1/game/state").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({ "error": "No game state available" }));

    let (_, json) = get(&state, "/api/v1/player").await;
    assert_eq!(json["error"], "No player data available");

    let (_, json) = get(&state, "/api/v1/player/inventory").await;
    assert_eq!(json["error"], "No inventory data available");
}

// ---------------------------------------------------------------------------
// Error responses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_malformed_body_returns_400() {
    let state = make_test_state();
    let (status, json) = post_raw(&state, "/api/v1/stations", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "Failed to parse request body" }));
}

#[tokio::test]
async fn test_wrong_shape_returns_details() {
    let state = make_test_state();
    let (status, json) = post(&state, "/api/v1/stations", &json!({ "id": "s1" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid stations data");
    assert!(json["details"].is_array());
}

#[tokio::test]
async fn test_validation_failure_is_not_stored() {
    let state = make_test_state();
    let body = json!([
        station("s1", "sec1", true, 100.0),
        station("s2", "sec1", true, 150.0),
    ]);
    let (status, json) = post(&state, "/api/v1/stations", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid stations data");
    assert_eq!(json["details"][0]["index"], 1);

    let (_, json) = get(&state, "/api/v1/stations").await;
    assert_eq!(json, json!([]));
}

// ---------------------------------------------------------------------------
// Universe
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_station_filters() {
    let state = make_test_state();
    let body = json!([
        station("s1", "sec1", true, 100.0),
        station("s2", "sec2", false, 90.0),
        station("s3", "sec1", false, 80.0),
    ]);
    let (status, _) = post(&state, "/api/v1/stations", &body).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = get(&state, "/api/v1/stations").await;
    assert_eq!(json.as_array().unwrap().len(), 3);

    let (_, json) = get(&state, "/api/v1/stations?sector=sec1").await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let (_, json) = get(&state, "/api/v1/stations?playerOwned=true").await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["id"], "s1");

    let (_, json) = get(&state, "/api/v1/stations?sector=sec2&playerOwned=true").await;
    assert_eq!(json, json!([]));

    let (_, json) = get(&state, "/api/v1/stations?playerOwned=false").await;
    assert_eq!(json.as_array().unwrap().len(), 3);

    let (status, json) = get(&state, "/api/v1/stations/s2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["sector"]["id"], "sec2");

    let (status, json) = get(&state, "/api/v1/stations/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Station not found");
}

#[tokio::test]
async fn test_faction_batches_merge() {
    let state = make_test_state();
    let faction = |id: &str| json!({ "id": id, "name": id, "fullName": id, "race": "argon" });

    post(&state, "/api/v1/factions", &json!([faction("argon"), faction("teladi")])).await;
    post(&state, "/api/v1/factions", &json!([faction("paranid")])).await;

    let (_, json) = get(&state, "/api/v1/factions").await;
    assert_eq!(json.as_array().unwrap().len(), 3);

    let (status, json) = get(&state, "/api/v1/factions/teladi").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["fullName"], "teladi");

    let (status, json) = get(&state, "/api/v1/factions/boron").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Faction not found");
}

#[tokio::test]
async fn test_faction_relations_route_is_not_an_id() {
    let state = make_test_state();
    let relations = json!([{
        "faction": { "id": "xenon", "name": "Xenon" },
        "relation": -1.0,
        "relationLevel": "enemy",
        "hasMilitaryLicense": false,
        "hasCapitalLicense": false
    }]);
    let (status, _) = post(&state, "/api/v1/factions/relations", &relations).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = get(&state, "/api/v1/factions/relations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["relationLevel"], "enemy");
}

#[tokio::test]
async fn test_trade_offers_filter_by_ware() {
    let state = make_test_state();
    let offers = json!([
        trade_offer("s1", "energycells"),
        trade_offer("s2", "silicon"),
        trade_offer("s3", "energycells"),
    ]);
    post(&state, "/api/v1/trade/offers", &offers).await;

    let (_, json) = get(&state, "/api/v1/trade/offers").await;
    assert_eq!(json.as_array().unwrap().len(), 3);

    let (_, json) = get(&state, "/api/v1/trade/offers?ware=energycells").await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    // Offers are a snapshot: a new post replaces the old list.
    post(&state, "/api/v1/trade/offers", &json!([trade_offer("s9", "ore")])).await;
    let (_, json) = get(&state, "/api/v1/trade/offers").await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_whole_float_quantities_are_ingested() {
    let state = make_test_state();
    let mut offer = trade_offer("s1", "energycells");
    offer["amount"] = json!(400.0);
    let (status, json) = post(&state, "/api/v1/trade/offers", &json!([offer])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "success": true }));

    let (_, json) = get(&state, "/api/v1/trade/offers").await;
    assert_eq!(json[0]["amount"], 400);

    offer["amount"] = json!(2.5);
    let (status, json) = post(&state, "/api/v1/trade/offers", &json!([offer])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid trade offers data");
}

// ---------------------------------------------------------------------------
// Logbook
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_logbook_limit() {
    let state = make_test_state();
    let entries: Vec<Value> = (1..=5).rev().map(logbook_entry).collect();
    post(&state, "/api/v1/logbook", &Value::Array(entries)).await;

    let (_, json) = get(&state, "/api/v1/logbook").await;
    assert_eq!(json.as_array().unwrap().len(), 5);

    let (_, json) = get(&state, "/api/v1/logbook?limit=2").await;
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["id"], "log5");

    for raw in ["0", "-1", "abc"] {
        let (status, json) = get(&state, &format!("/api/v1/logbook?limit={raw}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 5, "limit={raw}");
    }
}

#[tokio::test]
async fn test_logbook_entry_is_prepended() {
    let state = make_test_state();
    post(&state, "/api/v1/logbook", &json!([logbook_entry(1)])).await;
    let (status, _) = post(&state, "/api/v1/logbook/entry", &logbook_entry(2)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = get(&state, "/api/v1/logbook").await;
    assert_eq!(json[0]["id"], "log2");
    assert_eq!(json[1]["id"], "log1");
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_command_lifecycle() {
    let state = make_test_state();

    let (status, json) = post(&state, "/api/v1/commands", &command("cmd1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "success": true, "commandId": "cmd1" }));

    // The poll hands the command out once and clears the queue.
    let (_, json) = get(&state, "/api/v1/commands/pending").await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["type"], "cancel_trade_order");

    let (_, json) = get(&state, "/api/v1/commands/pending").await;
    assert_eq!(json, json!([]));

    let result = json!({
        "commandId": "cmd1",
        "success": true,
        "timestamp": 1_700_000_001_000_u64
    });
    let (status, _) = post(&state, "/api/v1/commands/result", &result).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = get(&state, "/api/v1/commands/results").await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["commandId"], "cmd1");
}

#[tokio::test]
async fn test_result_resolves_pending_command() {
    let state = make_test_state();
    post(&state, "/api/v1/commands", &command("cmd1")).await;
    post(&state, "/api/v1/commands", &command("cmd2")).await;

    let result = json!({
        "commandId": "cmd1",
        "success": false,
        "error": "station not found",
        "timestamp": 1_700_000_001_000_u64
    });
    post(&state, "/api/v1/commands/result", &result).await;

    let (_, json) = get(&state, "/api/v1/commands/pending").await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["id"], "cmd2");
}

#[tokio::test]
async fn test_invalid_command_is_rejected() {
    let state = make_test_state();
    let bad = json!({ "id": "cmd1", "type": "self_destruct", "params": {}, "timestamp": 1 });
    let (status, json) = post(&state, "/api/v1/commands", &bad).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid command data");

    let (_, json) = get(&state, "/status").await;
    assert_eq!(json["data"]["pendingCommands"], 0);
}

// ---------------------------------------------------------------------------
// Event broadcast
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_mutations_reach_broadcast() {
    let state = make_test_state();
    let mut rx = state.subscribe();

    post(&state, "/api/v1/commands", &command("cmd1")).await;

    let event = rx.recv().await.unwrap();
    assert_eq!(event.topic(), Topic::CommandAdded);
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["topic"], "commandAdded");
    assert_eq!(json["payload"]["id"], "cmd1");
}

#[tokio::test]
async fn test_reset_is_broadcast() {
    let state = make_test_state();
    let mut rx = state.subscribe();

    state.manager.write().await.reset();

    assert_eq!(rx.recv().await.unwrap(), StateEvent::Reset);
}
