//! Enumeration types for X4 game data.
//!
//! Every enum is closed: an unknown wire value is a shape error at the
//! ingestion boundary, not a catch-all variant. Wire names are the
//! lowercase (or `snake_case`) strings the game extension sends.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sectors
// ---------------------------------------------------------------------------

/// Security rating of a sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    /// Lawless or contested space.
    Low,
    /// Patrolled, occasional incidents.
    Medium,
    /// Core faction space.
    High,
}

// ---------------------------------------------------------------------------
// Stations
// ---------------------------------------------------------------------------

/// Functional role of a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationType {
    /// Trading station.
    Trading,
    /// Production complex.
    Factory,
    /// Builds small and medium ships.
    Shipyard,
    /// Builds large and extra-large ships.
    Wharf,
    /// Defence platform.
    Defence,
    /// Player headquarters.
    Headquarters,
    /// Anything else.
    Other,
}

// ---------------------------------------------------------------------------
// Wares and trade
// ---------------------------------------------------------------------------

/// Economic category of a ware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WareCategory {
    /// Raw mined or gathered resources.
    Resources,
    /// Intermediate products.
    Intermediate,
    /// Refined products.
    Refined,
    /// High-tech components.
    Hightech,
    /// Food.
    Food,
    /// Medical supplies.
    Medical,
    /// Weapon components.
    Weapons,
    /// Shield components.
    Shields,
    /// Engine components.
    Engines,
    /// Turret components.
    Turrets,
    /// Drones.
    Drones,
    /// Ship software.
    Software,
    /// Personal inventory items.
    Inventory,
    /// Anything else.
    Other,
}

/// Cargo hold type a ware requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    /// Bulk solid storage.
    Solid,
    /// Liquid or gas storage.
    Liquid,
    /// Container storage.
    Container,
}

/// Direction of a trade offer or order, from the station's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    /// The station buys.
    Buy,
    /// The station sells.
    Sell,
}

// ---------------------------------------------------------------------------
// Ships
// ---------------------------------------------------------------------------

/// Size class of a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipClass {
    /// Extra-small (drones, pods).
    ShipXs,
    /// Small (fighters, scouts).
    ShipS,
    /// Medium (corvettes, frigates, medium traders).
    ShipM,
    /// Large (destroyers, freighters).
    ShipL,
    /// Extra-large (carriers, builders).
    ShipXl,
    /// Station-class object reported through the ship feed.
    Station,
}

/// Kind of order a ship is executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipOrderType {
    /// Trade run.
    Trade,
    /// Mining.
    Mine,
    /// Patrol an area.
    Patrol,
    /// Escort another object.
    Escort,
    /// Attack a target.
    Attack,
    /// Explore.
    Explore,
    /// Resupply.
    Resupply,
    /// Hold position.
    Wait,
    /// Fly to a position or object.
    Flyto,
    /// Dock at a station.
    Dock,
    /// Anything else.
    Other,
}

// ---------------------------------------------------------------------------
// Missions
// ---------------------------------------------------------------------------

/// Kind of mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionType {
    /// Deliver goods.
    Delivery,
    /// Trade.
    Trade,
    /// Mining.
    Mining,
    /// Combat.
    Combat,
    /// Exploration.
    Exploration,
    /// Rescue.
    Rescue,
    /// Assassination.
    Assassination,
    /// Sabotage.
    Sabotage,
    /// Construction.
    Build,
    /// Guild mission.
    Guild,
    /// Story mission.
    Plot,
    /// Anything else.
    Other,
}

/// Difficulty rating of a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionDifficulty {
    /// Trivial.
    Trivial,
    /// Easy.
    Easy,
    /// Medium.
    Medium,
    /// Hard.
    Hard,
    /// Very hard.
    VeryHard,
}

// ---------------------------------------------------------------------------
// Logbook
// ---------------------------------------------------------------------------

/// Logbook tab an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogbookCategory {
    /// General.
    General,
    /// Missions.
    Missions,
    /// Alerts.
    Alerts,
    /// Tips.
    Tips,
    /// Upkeep.
    Upkeep,
    /// News.
    News,
    /// Anything else.
    Other,
}

/// Importance of a logbook entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogbookImportance {
    /// Low.
    Low,
    /// Medium.
    Medium,
    /// High.
    High,
    /// Critical.
    Critical,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Kind of command a consumer can enqueue for the game extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    /// Create a trade order on a station.
    CreateTradeOrder,
    /// Modify an existing trade order.
    ModifyTradeOrder,
    /// Cancel a trade order.
    CancelTradeOrder,
    /// Assign a ship to a commander.
    AssignShip,
    /// Set a station trade rule.
    SetTradeRule,
    /// Transfer credits.
    TransferCredits,
    /// Extension-defined command.
    Custom,
}

/// Role given to a ship assigned to a commander.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentRole {
    /// Trade for the commander.
    Trader,
    /// Mine for the commander.
    Miner,
    /// Defend the commander.
    Defender,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn wire_names_match_extension() {
        assert_eq!(serde_json::to_string(&ShipClass::ShipXl).unwrap(), "\"ship_xl\"");
        assert_eq!(
            serde_json::to_string(&MissionDifficulty::VeryHard).unwrap(),
            "\"very_hard\""
        );
        assert_eq!(
            serde_json::to_string(&CommandType::CreateTradeOrder).unwrap(),
            "\"create_trade_order\""
        );
        assert_eq!(serde_json::to_string(&ShipOrderType::Flyto).unwrap(), "\"flyto\"");
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!(serde_json::from_str::<StationType>("\"spaceport\"").is_err());
        assert!(serde_json::from_str::<TradeType>("\"BUY\"").is_err());
    }
}
