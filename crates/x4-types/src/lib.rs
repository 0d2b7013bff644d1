//! Shared type definitions for the X4 game state hub.
//!
//! This crate is the single source of truth for the entity snapshots the
//! game extension pushes, the commands consumers send back, and the
//! validation rules the ingestion boundary enforces. The store never sees
//! untyped JSON: every payload is turned into one of these types first.
//!
//! # Modules
//!
//! - [`ids`] -- String identifier newtypes
//! - [`enums`] -- Closed enumerations (station types, ship classes, ...)
//! - [`structs`] -- Entity snapshots (game state, stations, ships, ...)
//! - [`commands`] -- Commands, command results, and typed parameters

pub mod commands;
pub mod enums;
pub mod ids;
mod quantity;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use commands::{
    AssignShipParams, CancelTradeOrderParams, Command, CommandResult, CreateTradeOrderParams,
    JsonObject, ModifyTradeOrderParams, SetTradeRuleParams,
};
pub use enums::{
    AssignmentRole, CommandType, LogbookCategory, LogbookImportance, MissionDifficulty, MissionType,
    SecurityLevel, ShipClass, ShipOrderType, StationType, TradeType, TransportType, WareCategory,
};
pub use ids::{CommandId, EntityId, IdError, WareId};
pub use structs::{
    CargoHold, CargoItem, CommanderKind, CommanderReference, Credits, Faction, FactionReference,
    FactionRelation, GameState, GameTime, InventoryItem, LogbookEntry, Mission, MissionObjective,
    PilotInfo, PlayerInfo, PlayerInventory, Position3D, ProductionInfo, Quantity, RealTime, Sector,
    SectorReference, Ship, ShipOrder, ShipReference, Station, StationModule, StationReference,
    StockLevel, StorageInfo, TradeOffer, TradeOrder, Ware, WareReference, ZoneReference,
};
pub use validator::{Validate, ValidationErrors};
