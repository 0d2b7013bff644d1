//! Commands flowing from consumers to the game extension, and the results
//! the extension reports back.
//!
//! A [`Command`] is enqueued by a consumer, picked up by the extension's
//! poll, and eventually answered by a [`CommandResult`] carrying the same
//! identifier. The typed parameter structs are what the client helpers
//! serialize into [`Command::params`].

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::enums::{AssignmentRole, CommandType, TradeType};
use crate::ids::{CommandId, EntityId, WareId};
use crate::quantity;
use crate::structs::{Credits, Quantity, RealTime};

/// Free-form JSON object used for command parameters and result data.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// A command waiting to be executed by the game extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Command {
    /// Identifier chosen by the submitter, echoed back in the result.
    pub id: CommandId,
    /// Command kind.
    #[serde(rename = "type")]
    pub kind: CommandType,
    /// Command parameters, interpreted by the extension per kind.
    pub params: JsonObject,
    /// When the command was submitted.
    #[validate(range(exclusive_min = 0.0))]
    pub timestamp: RealTime,
}

/// Outcome of a command reported by the game extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    /// Identifier of the command this result answers.
    pub command_id: CommandId,
    /// Whether the command succeeded.
    pub success: bool,
    /// Error message on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Result payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonObject>,
    /// When the command was executed.
    #[validate(range(exclusive_min = 0.0))]
    pub timestamp: RealTime,
}

// ---------------------------------------------------------------------------
// Typed parameters
// ---------------------------------------------------------------------------

/// Parameters of a [`CommandType::CreateTradeOrder`] command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTradeOrderParams {
    /// Station to place the order on.
    pub station_id: EntityId,
    /// Ware to trade.
    pub ware_id: WareId,
    /// Buy or sell.
    #[serde(rename = "type")]
    pub kind: TradeType,
    /// Price per unit.
    pub price: Credits,
    /// Quantity.
    #[serde(deserialize_with = "quantity::deserialize")]
    pub amount: Quantity,
    /// Restrict trading to the owner's faction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrict_to_faction: Option<bool>,
}

/// Parameters of a [`CommandType::ModifyTradeOrder`] command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyTradeOrderParams {
    /// Order to modify.
    pub order_id: EntityId,
    /// New price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Credits>,
    /// New quantity.
    #[serde(
        default,
        deserialize_with = "quantity::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Quantity>,
    /// Activate or deactivate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Parameters of a [`CommandType::CancelTradeOrder`] command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelTradeOrderParams {
    /// Order to cancel.
    pub order_id: EntityId,
}

/// Parameters of a [`CommandType::AssignShip`] command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignShipParams {
    /// Ship to assign.
    pub ship_id: EntityId,
    /// Station or ship to assign it to.
    pub commander_id: EntityId,
    /// Role under the commander.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<AssignmentRole>,
}

/// Parameters of a [`CommandType::SetTradeRule`] command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTradeRuleParams {
    /// Station the rule applies to.
    pub station_id: EntityId,
    /// Ware the rule applies to.
    pub ware_id: WareId,
    /// Minimum stock to keep.
    #[serde(
        default,
        deserialize_with = "quantity::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_stock: Option<Quantity>,
    /// Maximum stock to hold.
    #[serde(
        default,
        deserialize_with = "quantity::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_stock: Option<Quantity>,
    /// Buy price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy_price: Option<Credits>,
    /// Sell price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sell_price: Option<Credits>,
}
