//! The [`X4ApiClient`] and its command helpers.
//!
//! Every query method maps one GET route of the hub. Non-success responses
//! become [`ClientError::Status`] carrying the hub's error message, so a
//! missing station surfaces as a 404 with `Station not found`.

use std::time::Duration;

use chrono::Utc;
use reqwest::{RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;
use x4_types::{
    AssignShipParams, CancelTradeOrderParams, Command, CommandId, CommandResult, CommandType,
    CreateTradeOrderParams, EntityId, Faction, FactionRelation, GameState, JsonObject, LogbookEntry,
    Mission, ModifyTradeOrderParams, PlayerInfo, PlayerInventory, RealTime, Sector,
    SetTradeRuleParams, Ship, Station, TradeOffer, TradeOrder, Ware,
};

use crate::error::ClientError;
use crate::responses::{ErrorBody, Health, Status, Submitted};

/// Per-request timeout used unless overridden with
/// [`X4ApiClient::with_timeout`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Optional filters for the station and ship listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityFilter {
    /// Only entities in this sector.
    pub sector: Option<EntityId>,
    /// Only player-owned (`true`) entities. `false` applies no filter.
    pub player_owned: Option<bool>,
}

impl EntityFilter {
    /// Filter on player-owned entities.
    pub const fn player_owned() -> Self {
        Self {
            sector: None,
            player_owned: Some(true),
        }
    }

    /// Filter on one sector.
    pub const fn in_sector(sector: EntityId) -> Self {
        Self {
            sector: Some(sector),
            player_owned: None,
        }
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(sector) = &self.sector {
            pairs.push(("sector", sector.to_string()));
        }
        if let Some(owned) = self.player_owned {
            pairs.push(("playerOwned", owned.to_string()));
        }
        pairs
    }
}

/// Typed HTTP client for the hub API.
#[derive(Debug, Clone)]
pub struct X4ApiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl X4ApiClient {
    /// Create a client for the hub at `base_url` (e.g.
    /// `http://localhost:8080`). A trailing slash is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Replace the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The per-request timeout.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    // -----------------------------------------------------------------------
    // Request plumbing
    // -----------------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `{base}{collection}/{id}` with `id` percent-encoded as one segment.
    fn item_url(&self, collection: &str, id: &str) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.url(collection))
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.clone()))?
            .push(id);
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.timeout(self.timeout).send().await?;
        decode(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.fetch(self.client.get(self.url(path))).await
    }

    async fn get_item<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<T, ClientError> {
        let url = self.item_url(collection, id)?;
        self.fetch(self.client.get(url)).await
    }

    async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        self.fetch(self.client.get(self.url(path)).query(query)).await
    }

    async fn get_limited<T: DeserializeOwned>(
        &self,
        path: &str,
        limit: Option<usize>,
    ) -> Result<T, ClientError> {
        let query: Vec<(&str, String)> = limit
            .filter(|n| *n > 0)
            .map(|n| ("limit", n.to_string()))
            .into_iter()
            .collect();
        self.get_query(path, &query).await
    }

    // -----------------------------------------------------------------------
    // Health and status
    // -----------------------------------------------------------------------

    /// `GET /health`.
    pub async fn health(&self) -> Result<Health, ClientError> {
        self.get("/health").await
    }

    /// `GET /status`.
    pub async fn status(&self) -> Result<Status, ClientError> {
        self.get("/status").await
    }

    /// Whether the hub is reachable and has heard from the game recently.
    /// Any failure counts as disconnected.
    pub async fn is_game_connected(&self) -> bool {
        match self.health().await {
            Ok(health) => health.connected,
            Err(e) => {
                debug!(error = %e, "health check failed");
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Game state and player
    // -----------------------------------------------------------------------

    /// The last full game snapshot.
    pub async fn game_state(&self) -> Result<GameState, ClientError> {
        self.get("/api/v1/game/state").await
    }

    /// Player info.
    pub async fn player(&self) -> Result<PlayerInfo, ClientError> {
        self.get("/api/v1/player").await
    }

    /// Player inventory.
    pub async fn player_inventory(&self) -> Result<PlayerInventory, ClientError> {
        self.get("/api/v1/player/inventory").await
    }

    // -----------------------------------------------------------------------
    // Universe
    // -----------------------------------------------------------------------

    /// All known factions.
    pub async fn factions(&self) -> Result<Vec<Faction>, ClientError> {
        self.get("/api/v1/factions").await
    }

    /// One faction by id.
    pub async fn faction(&self, id: &str) -> Result<Faction, ClientError> {
        self.get_item("/api/v1/factions", id).await
    }

    /// The player's relations with every faction.
    pub async fn faction_relations(&self) -> Result<Vec<FactionRelation>, ClientError> {
        self.get("/api/v1/factions/relations").await
    }

    /// All known sectors.
    pub async fn sectors(&self) -> Result<Vec<Sector>, ClientError> {
        self.get("/api/v1/sectors").await
    }

    /// One sector by id.
    pub async fn sector(&self, id: &str) -> Result<Sector, ClientError> {
        self.get_item("/api/v1/sectors", id).await
    }

    /// Stations matching `filter`.
    pub async fn stations(&self, filter: &EntityFilter) -> Result<Vec<Station>, ClientError> {
        self.get_query("/api/v1/stations", &filter.query()).await
    }

    /// One station by id.
    pub async fn station(&self, id: &str) -> Result<Station, ClientError> {
        self.get_item("/api/v1/stations", id).await
    }

    /// Stations the player owns.
    pub async fn player_stations(&self) -> Result<Vec<Station>, ClientError> {
        self.stations(&EntityFilter::player_owned()).await
    }

    /// Ships matching `filter`.
    pub async fn ships(&self, filter: &EntityFilter) -> Result<Vec<Ship>, ClientError> {
        self.get_query("/api/v1/ships", &filter.query()).await
    }

    /// One ship by id.
    pub async fn ship(&self, id: &str) -> Result<Ship, ClientError> {
        self.get_item("/api/v1/ships", id).await
    }

    /// Ships the player owns.
    pub async fn player_ships(&self) -> Result<Vec<Ship>, ClientError> {
        self.ships(&EntityFilter::player_owned()).await
    }

    // -----------------------------------------------------------------------
    // Trade
    // -----------------------------------------------------------------------

    /// All known wares.
    pub async fn wares(&self) -> Result<Vec<Ware>, ClientError> {
        self.get("/api/v1/wares").await
    }

    /// One ware by id.
    pub async fn ware(&self, id: &str) -> Result<Ware, ClientError> {
        self.get_item("/api/v1/wares", id).await
    }

    /// The market snapshot, optionally only offers for `ware`.
    pub async fn trade_offers(&self, ware: Option<&str>) -> Result<Vec<TradeOffer>, ClientError> {
        let query: Vec<(&str, String)> = ware
            .filter(|w| !w.is_empty())
            .map(|w| ("ware", w.to_owned()))
            .into_iter()
            .collect();
        self.get_query("/api/v1/trade/offers", &query).await
    }

    /// The player's trade orders.
    pub async fn trade_orders(&self) -> Result<Vec<TradeOrder>, ClientError> {
        self.get("/api/v1/trade/orders").await
    }

    /// One trade order by id.
    pub async fn trade_order(&self, id: &str) -> Result<TradeOrder, ClientError> {
        self.get_item("/api/v1/trade/orders", id).await
    }

    // -----------------------------------------------------------------------
    // Missions and logbook
    // -----------------------------------------------------------------------

    /// Missions on offer.
    pub async fn mission_offers(&self) -> Result<Vec<Mission>, ClientError> {
        self.get("/api/v1/missions/offers").await
    }

    /// Missions the player has accepted.
    pub async fn active_missions(&self) -> Result<Vec<Mission>, ClientError> {
        self.get("/api/v1/missions/active").await
    }

    /// Logbook entries, newest first, at most `limit` when given.
    pub async fn logbook(&self, limit: Option<usize>) -> Result<Vec<LogbookEntry>, ClientError> {
        self.get_limited("/api/v1/logbook", limit).await
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Enqueue `command` for the game extension and return the id the hub
    /// echoed back.
    pub async fn submit_command(&self, command: &Command) -> Result<CommandId, ClientError> {
        let request = self.client.post(self.url("/api/v1/commands")).json(command);
        let submitted: Submitted = self.fetch(request).await?;
        debug!(command_id = %submitted.command_id, kind = ?command.kind, "command submitted");
        Ok(submitted.command_id)
    }

    /// Recent command results, newest first, at most `limit` when given.
    pub async fn command_results(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<CommandResult>, ClientError> {
        self.get_limited("/api/v1/commands/results", limit).await
    }

    /// Create a trade order on a station.
    pub async fn create_trade_order(
        &self,
        params: &CreateTradeOrderParams,
    ) -> Result<CommandId, ClientError> {
        self.submit_typed(CommandType::CreateTradeOrder, params).await
    }

    /// Change price, amount, or active flag of a trade order.
    pub async fn modify_trade_order(
        &self,
        params: &ModifyTradeOrderParams,
    ) -> Result<CommandId, ClientError> {
        self.submit_typed(CommandType::ModifyTradeOrder, params).await
    }

    /// Cancel a trade order.
    pub async fn cancel_trade_order(&self, order_id: &EntityId) -> Result<CommandId, ClientError> {
        let params = CancelTradeOrderParams {
            order_id: order_id.clone(),
        };
        self.submit_typed(CommandType::CancelTradeOrder, &params).await
    }

    /// Assign a ship to a commanding station or ship.
    pub async fn assign_ship(&self, params: &AssignShipParams) -> Result<CommandId, ClientError> {
        self.submit_typed(CommandType::AssignShip, params).await
    }

    /// Set a station's trade rule for one ware.
    pub async fn set_trade_rule(
        &self,
        params: &SetTradeRuleParams,
    ) -> Result<CommandId, ClientError> {
        self.submit_typed(CommandType::SetTradeRule, params).await
    }

    async fn submit_typed<P: Serialize + Sync>(
        &self,
        kind: CommandType,
        params: &P,
    ) -> Result<CommandId, ClientError> {
        let command = new_command(kind, to_params(params)?);
        self.submit_command(&command).await
    }
}

/// Build a command with a fresh UUID v4 id stamped with the current time.
pub fn new_command(kind: CommandType, params: JsonObject) -> Command {
    Command {
        id: CommandId::from(Uuid::new_v4().to_string()),
        kind,
        params,
        timestamp: now_ms(),
    }
}

#[allow(clippy::cast_precision_loss)]
fn now_ms() -> RealTime {
    Utc::now().timestamp_millis() as RealTime
}

fn to_params<P: Serialize>(params: &P) -> Result<JsonObject, ClientError> {
    Ok(serde_json::from_value(serde_json::to_value(params)?)?)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let code = status.as_u16();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| {
            format!(
                "HTTP {code}: {}",
                status.canonical_reason().unwrap_or("Unknown")
            )
        });
    debug!(status = code, %message, "hub returned an error");
    Err(ClientError::Status {
        status: code,
        message,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]

    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = X4ApiClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);

        let client = X4ApiClient::new("http://localhost:8080").with_timeout(Duration::from_secs(1));
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn item_ids_are_percent_encoded() {
        let client = X4ApiClient::new("http://localhost:8080");
        let url = client.item_url("/api/v1/stations", "a b/c").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v1/stations/a%20b%2Fc");
    }

    #[test]
    fn filter_builds_query_pairs() {
        assert!(EntityFilter::default().query().is_empty());

        let filter = EntityFilter {
            sector: Some(EntityId::new("sec1").unwrap()),
            player_owned: Some(true),
        };
        assert_eq!(
            filter.query(),
            vec![("sector", "sec1".to_owned()), ("playerOwned", "true".to_owned())]
        );
    }

    #[test]
    fn new_command_gets_unique_id_and_timestamp() {
        let a = new_command(CommandType::Custom, JsonObject::new());
        let b = new_command(CommandType::Custom, JsonObject::new());
        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(a.id.as_str()).is_ok());
        assert!(a.timestamp > 0.0);
    }

    #[test]
    fn params_become_a_json_object() {
        let params = CancelTradeOrderParams {
            order_id: EntityId::new("order1").unwrap(),
        };
        let object = to_params(&params).unwrap();
        assert_eq!(object["orderId"], "order1");
    }

    #[test]
    fn not_found_is_detected() {
        let err = ClientError::Status {
            status: 404,
            message: "Station not found".to_owned(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Station not found");
        assert_eq!(ClientError::Timeout.status(), None);
    }
}
