//! Entity snapshots pushed by the game extension.
//!
//! Every struct is an immutable value: the hub replaces stored snapshots
//! wholesale and never edits one in place. Field names follow the
//! extension's camelCase JSON. Numeric constraints are expressed as
//! [`validator`] rules and checked by the ingestion boundary before a
//! value reaches the store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::enums::{
    LogbookCategory, LogbookImportance, MissionDifficulty, MissionType, SecurityLevel, ShipClass,
    ShipOrderType, StationType, TradeType, TransportType, WareCategory,
};
use crate::ids::{EntityId, WareId};
use crate::quantity;

/// In-game time in seconds since the start of the game.
pub type GameTime = f64;

/// Wall-clock time as a Unix timestamp in milliseconds.
pub type RealTime = f64;

/// Amount of in-game currency.
pub type Credits = f64;

/// Count of items. Non-negative integers only.
pub type Quantity = u64;

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

/// Lightweight pointer to a faction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionReference {
    /// Faction identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
}

/// Lightweight pointer to a sector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorReference {
    /// Sector identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
}

/// Lightweight pointer to a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationReference {
    /// Station identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
}

/// Lightweight pointer to a ship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipReference {
    /// Ship identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
}

/// Lightweight pointer to a ware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WareReference {
    /// Ware identifier.
    pub id: WareId,
    /// Display name.
    pub name: String,
}

/// Lightweight pointer to a zone inside a sector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneReference {
    /// Zone identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Sector containing the zone.
    pub sector: SectorReference,
}

/// Which kind of object a [`CommanderReference`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommanderKind {
    /// The commander is a station.
    Station,
    /// The commander is another ship.
    Ship,
}

/// The station or ship a subordinate ship reports to.
///
/// Station and ship references share the same `{id, name}` shape on the
/// wire, so the kind is only known when the extension sends `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommanderReference {
    /// Commander identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Station or ship, when the extension reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CommanderKind>,
}

/// A point in sector space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position3D {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// The player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    /// Player identifier.
    pub id: EntityId,
    /// Player name.
    pub name: String,
    /// Current credits.
    pub money: Credits,
    /// Game time at which this snapshot was taken.
    #[validate(range(min = 0.0))]
    pub game_time: GameTime,
    /// Sector the player is in.
    pub current_sector: SectorReference,
    /// Ship the player is piloting, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_ship: Option<ShipReference>,
    /// The player's faction.
    pub faction: FactionReference,
}

/// One line of the player's personal inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Ware held.
    pub ware: WareReference,
    /// Quantity held.
    #[serde(deserialize_with = "quantity::deserialize")]
    pub amount: Quantity,
    /// Average purchase price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_price: Option<Credits>,
}

/// The player's personal inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInventory {
    /// Inventory lines.
    #[validate(nested)]
    pub items: Vec<InventoryItem>,
    /// Total value of all items.
    pub total_value: Credits,
}

// ---------------------------------------------------------------------------
// Factions
// ---------------------------------------------------------------------------

/// A faction of the game universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Faction {
    /// Faction identifier.
    pub id: EntityId,
    /// Short name.
    pub name: String,
    /// Full name.
    pub full_name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Primary race.
    pub race: String,
    /// Faction colour as a hex string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// The player's standing with one faction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FactionRelation {
    /// The faction.
    pub faction: FactionReference,
    /// Relation value, typically -30 to +30.
    pub relation: f64,
    /// Relation level name (e.g. "Friendly").
    pub relation_level: String,
    /// Whether the player holds a military license.
    pub has_military_license: bool,
    /// Whether the player holds a capital ship license.
    pub has_capital_license: bool,
    /// Most recent change in relation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_change: Option<f64>,
}

// ---------------------------------------------------------------------------
// Sectors
// ---------------------------------------------------------------------------

/// A sector of the galaxy map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    /// Sector identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Owning faction, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<FactionReference>,
    /// Position on the galaxy map.
    pub position: Position3D,
    /// Sectors reachable through gates or highways.
    pub connections: Vec<SectorReference>,
    /// Stations located here.
    pub stations: Vec<StationReference>,
    /// Security rating.
    pub security_level: SecurityLevel,
}

// ---------------------------------------------------------------------------
// Stations
// ---------------------------------------------------------------------------

/// One module of a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct StationModule {
    /// Module identifier.
    pub id: EntityId,
    /// Module type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Display name.
    pub name: String,
    /// Whether the module is operational.
    pub operational: bool,
}

/// Production state of one ware at a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductionInfo {
    /// Ware produced.
    pub ware: WareReference,
    /// Units produced per hour.
    pub rate: f64,
    /// Current cycle progress.
    #[validate(range(min = 0.0, max = 1.0))]
    pub progress: f64,
    /// Whether production is running.
    pub active: bool,
}

/// Stock of one ware in station storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StockLevel {
    /// Ware stored.
    pub ware: WareReference,
    /// Quantity stored.
    #[serde(deserialize_with = "quantity::deserialize")]
    pub amount: Quantity,
    /// Storage capacity for the ware.
    #[serde(deserialize_with = "quantity::deserialize")]
    pub capacity: Quantity,
    /// Fill percentage.
    #[validate(range(min = 0.0, max = 100.0))]
    pub percentage: f64,
}

/// Storage capacity and stock of a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StorageInfo {
    /// Capacity per storage type.
    #[serde(deserialize_with = "quantity::map")]
    pub capacity: BTreeMap<String, Quantity>,
    /// Stock levels per ware.
    #[validate(nested)]
    pub stock: Vec<StockLevel>,
}

/// A station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Station identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Owning faction.
    pub owner: FactionReference,
    /// Station role.
    #[serde(rename = "type")]
    pub kind: StationType,
    /// Sector the station is in.
    pub sector: SectorReference,
    /// Zone the station is in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<ZoneReference>,
    /// Position within the sector.
    pub position: Position3D,
    /// Hull percentage.
    #[validate(range(min = 0.0, max = 100.0))]
    pub hull: f64,
    /// Whether the player owns the station.
    pub is_player_owned: bool,
    /// Station modules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<StationModule>>,
    /// Production lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub production: Option<Vec<ProductionInfo>>,
    /// Storage state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub storage: Option<StorageInfo>,
}

// ---------------------------------------------------------------------------
// Wares and trade
// ---------------------------------------------------------------------------

/// A tradeable ware type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Ware {
    /// Ware identifier.
    pub id: WareId,
    /// Display name.
    pub name: String,
    /// Economic category.
    pub category: WareCategory,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Volume per unit.
    #[validate(range(exclusive_min = 0.0))]
    pub volume: f64,
    /// Base price.
    pub base_price: Credits,
    /// Minimum price.
    pub min_price: Credits,
    /// Maximum price.
    pub max_price: Credits,
    /// Whether the ware is illegal somewhere.
    pub is_illegal: bool,
    /// Required cargo hold type.
    pub transport_type: TransportType,
}

/// A market offer seen at a station. Offers have no identity of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TradeOffer {
    /// Station making the offer.
    pub station: StationReference,
    /// Ware offered.
    pub ware: WareReference,
    /// Whether the station buys or sells.
    #[serde(rename = "type")]
    pub kind: TradeType,
    /// Price per unit.
    pub price: Credits,
    /// Quantity available.
    #[serde(deserialize_with = "quantity::deserialize")]
    pub amount: Quantity,
    /// Volume available.
    pub volume: f64,
}

/// A standing trade order owned by the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TradeOrder {
    /// Order identifier.
    pub id: EntityId,
    /// Station holding the order.
    pub station: StationReference,
    /// Ware traded.
    pub ware: WareReference,
    /// Buy or sell.
    #[serde(rename = "type")]
    pub kind: TradeType,
    /// Target price.
    pub price: Credits,
    /// Target quantity.
    #[serde(deserialize_with = "quantity::deserialize")]
    pub amount: Quantity,
    /// Restrict trading to the owner's faction.
    pub restrict_to_faction: bool,
    /// Whether the order is active.
    pub active: bool,
}

// ---------------------------------------------------------------------------
// Ships
// ---------------------------------------------------------------------------

/// The pilot of a ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PilotInfo {
    /// Pilot name.
    pub name: String,
    /// Piloting skill.
    #[validate(range(min = 0.0, max = 15.0))]
    pub skill: f64,
    /// Morale.
    #[validate(range(min = 0.0, max = 100.0))]
    pub morale: f64,
}

/// The order a ship is currently executing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ShipOrder {
    /// Order kind.
    #[serde(rename = "type")]
    pub kind: ShipOrderType,
    /// Target object, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<EntityId>,
    /// Extension-defined order parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Map<String, serde_json::Value>>,
}

/// One ware in a cargo hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CargoItem {
    /// Ware carried.
    pub ware: WareReference,
    /// Quantity carried.
    #[serde(deserialize_with = "quantity::deserialize")]
    pub amount: Quantity,
    /// Volume used.
    pub volume: f64,
}

/// A ship's cargo hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CargoHold {
    /// Capacity in cubic metres.
    #[validate(range(exclusive_min = 0.0))]
    pub capacity: f64,
    /// Used volume in cubic metres.
    #[validate(range(min = 0.0))]
    pub used: f64,
    /// Contents.
    #[validate(nested)]
    pub items: Vec<CargoItem>,
}

/// A ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    /// Ship identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Size class.
    #[serde(rename = "class")]
    pub ship_class: ShipClass,
    /// Blueprint macro name.
    #[serde(rename = "macro")]
    pub ship_macro: String,
    /// Owning faction.
    pub owner: FactionReference,
    /// Whether the player owns the ship.
    pub is_player_owned: bool,
    /// Pilot, if crewed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub pilot: Option<PilotInfo>,
    /// Hull percentage.
    #[validate(range(min = 0.0, max = 100.0))]
    pub hull: f64,
    /// Shield percentage.
    #[validate(range(min = 0.0, max = 100.0))]
    pub shield: f64,
    /// Sector the ship is in.
    pub sector: SectorReference,
    /// Position within the sector.
    pub position: Position3D,
    /// Current order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_order: Option<ShipOrder>,
    /// Cargo hold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub cargo: Option<CargoHold>,
    /// Station or ship this ship is subordinate to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commander: Option<CommanderReference>,
}

// ---------------------------------------------------------------------------
// Missions
// ---------------------------------------------------------------------------

/// One objective of a mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MissionObjective {
    /// Objective identifier.
    pub id: String,
    /// Objective text.
    pub text: String,
    /// Whether the objective is done.
    pub completed: bool,
    /// Progress towards the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    /// Target amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
}

/// A mission, either offered or accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    /// Mission identifier.
    pub id: EntityId,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Offering faction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction: Option<FactionReference>,
    /// Mission kind.
    #[serde(rename = "type")]
    pub kind: MissionType,
    /// Difficulty rating.
    pub difficulty: MissionDifficulty,
    /// Reward in credits.
    pub reward: Credits,
    /// Time limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub time_limit: Option<GameTime>,
    /// Time remaining.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub time_remaining: Option<GameTime>,
    /// Objectives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objectives: Option<Vec<MissionObjective>>,
    /// Whether the mission has been accepted.
    pub is_active: bool,
    /// Mission location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SectorReference>,
}

// ---------------------------------------------------------------------------
// Logbook
// ---------------------------------------------------------------------------

/// One entry of the player's logbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LogbookEntry {
    /// Entry identifier.
    pub id: EntityId,
    /// Game time of the entry.
    #[validate(range(min = 0.0))]
    pub time: GameTime,
    /// Logbook tab.
    pub category: LogbookCategory,
    /// Title.
    pub title: String,
    /// Body text.
    pub text: String,
    /// Related faction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction: Option<FactionReference>,
    /// Importance.
    pub importance: LogbookImportance,
    /// Whether the player has read it.
    pub is_read: bool,
}

// ---------------------------------------------------------------------------
// Game state
// ---------------------------------------------------------------------------

/// Full snapshot of the running game. Its arrival is the heartbeat the
/// hub uses to decide whether the game is connected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// When the extension produced the snapshot.
    #[validate(range(exclusive_min = 0.0))]
    pub timestamp: RealTime,
    /// Game time.
    #[validate(range(min = 0.0))]
    pub game_time: GameTime,
    /// Embedded player snapshot.
    #[validate(nested)]
    pub player: PlayerInfo,
    /// Whether the game is paused.
    pub is_paused: bool,
    /// Game version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_version: Option<String>,
}
