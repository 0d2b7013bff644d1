//! Axum router construction for the hub API.
//!
//! Assembles the health, ingestion, query, and `WebSocket` routes into a
//! single [`Router`]. CORS and request tracing are layered on according
//! to [`ServerConfig`].

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handlers;
use crate::ingest;
use crate::state::AppState;
use crate::ws;

/// Build the router with default middleware (CORS and request tracing on).
pub fn build_router(state: Arc<AppState>) -> Router {
    build_router_with(state, &ServerConfig::default())
}

/// Build the complete router, enabling middleware per `config`.
///
/// GET and POST on the same path are the query and ingestion side of the
/// same collection.
pub fn build_router_with(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let mut router = Router::new()
        // Health
        .route("/health", get(handlers::health))
        .route("/status", get(handlers::status))
        // WebSocket
        .route("/ws/events", get(ws::ws_events))
        // Game state and player
        .route("/api/v1/game/state", get(handlers::get_game_state).post(ingest::post_game_state))
        .route("/api/v1/player", get(handlers::get_player).post(ingest::post_player))
        .route(
            "/api/v1/player/inventory",
            get(handlers::get_inventory).post(ingest::post_inventory),
        )
        // Universe
        .route("/api/v1/factions", get(handlers::list_factions).post(ingest::post_factions))
        .route(
            "/api/v1/factions/relations",
            get(handlers::list_faction_relations).post(ingest::post_faction_relations),
        )
        .route("/api/v1/factions/{id}", get(handlers::get_faction))
        .route("/api/v1/sectors", get(handlers::list_sectors).post(ingest::post_sectors))
        .route("/api/v1/sectors/{id}", get(handlers::get_sector))
        .route("/api/v1/stations", get(handlers::list_stations).post(ingest::post_stations))
        .route("/api/v1/stations/{id}", get(handlers::get_station))
        .route("/api/v1/ships", get(handlers::list_ships).post(ingest::post_ships))
        .route("/api/v1/ships/{id}", get(handlers::get_ship))
        // Trade
        .route("/api/v1/wares", get(handlers::list_wares).post(ingest::post_wares))
        .route("/api/v1/wares/{id}", get(handlers::get_ware))
        .route(
            "/api/v1/trade/offers",
            get(handlers::list_trade_offers).post(ingest::post_trade_offers),
        )
        .route(
            "/api/v1/trade/orders",
            get(handlers::list_trade_orders).post(ingest::post_trade_orders),
        )
        .route("/api/v1/trade/orders/{id}", get(handlers::get_trade_order))
        // Missions and logbook
        .route(
            "/api/v1/missions/offers",
            get(handlers::list_mission_offers).post(ingest::post_mission_offers),
        )
        .route(
            "/api/v1/missions/active",
            get(handlers::list_active_missions).post(ingest::post_active_missions),
        )
        .route("/api/v1/logbook", get(handlers::list_logbook).post(ingest::post_logbook))
        .route("/api/v1/logbook/entry", post(ingest::post_logbook_entry))
        // Commands
        .route("/api/v1/commands", post(ingest::post_command))
        .route("/api/v1/commands/pending", get(handlers::poll_pending_commands))
        .route("/api/v1/commands/result", post(ingest::post_command_result))
        .route("/api/v1/commands/results", get(handlers::list_command_results));

    if config.cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router = router.layer(cors);
    }
    if config.request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}
