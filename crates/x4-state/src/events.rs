//! Synchronous in-process publish/subscribe for store mutations.
//!
//! Every mutation of the [`StateManager`](crate::StateManager) publishes
//! exactly one [`StateEvent`] on the [`Topic`] named after the mutation.
//! Listeners run synchronously on the mutating thread, after the store
//! has been updated.
//!
//! # Contract
//!
//! - Listener order within a topic is unspecified.
//! - A listener that returns `Err` or panics is logged and skipped; the
//!   remaining listeners still run and the mutation is unaffected.
//! - Unsubscribing is idempotent and only ever removes one listener.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::error;
use x4_types::{
    Command, CommandResult, Faction, FactionRelation, GameState, LogbookEntry, Mission, PlayerInfo,
    PlayerInventory, Sector, Ship, Station, TradeOffer, TradeOrder, Ware,
};

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

/// Name of a mutation channel. One per update method, plus `reset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Topic {
    /// Full game state snapshot.
    GameState,
    /// Player info.
    Player,
    /// Player inventory.
    Inventory,
    /// One faction.
    Faction,
    /// Faction batch.
    Factions,
    /// Faction relations list.
    FactionRelations,
    /// One sector.
    Sector,
    /// Sector batch.
    Sectors,
    /// One station.
    Station,
    /// Station batch.
    Stations,
    /// One ship.
    Ship,
    /// Ship batch.
    Ships,
    /// One ware.
    Ware,
    /// Ware batch.
    Wares,
    /// Trade offers list.
    TradeOffers,
    /// One trade order.
    TradeOrder,
    /// Trade order batch.
    TradeOrders,
    /// Mission offers list.
    MissionOffers,
    /// Active missions list.
    ActiveMissions,
    /// One appended logbook entry.
    Logbook,
    /// Full logbook replacement.
    LogbookFull,
    /// A command was enqueued.
    CommandAdded,
    /// A command result was recorded.
    CommandResult,
    /// The store was reset.
    Reset,
}

impl Topic {
    /// Every topic, in declaration order.
    pub const ALL: [Self; 24] = [
        Self::GameState,
        Self::Player,
        Self::Inventory,
        Self::Faction,
        Self::Factions,
        Self::FactionRelations,
        Self::Sector,
        Self::Sectors,
        Self::Station,
        Self::Stations,
        Self::Ship,
        Self::Ships,
        Self::Ware,
        Self::Wares,
        Self::TradeOffers,
        Self::TradeOrder,
        Self::TradeOrders,
        Self::MissionOffers,
        Self::ActiveMissions,
        Self::Logbook,
        Self::LogbookFull,
        Self::CommandAdded,
        Self::CommandResult,
        Self::Reset,
    ];

    /// Wire name of the topic.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GameState => "gameState",
            Self::Player => "player",
            Self::Inventory => "inventory",
            Self::Faction => "faction",
            Self::Factions => "factions",
            Self::FactionRelations => "factionRelations",
            Self::Sector => "sector",
            Self::Sectors => "sectors",
            Self::Station => "station",
            Self::Stations => "stations",
            Self::Ship => "ship",
            Self::Ships => "ships",
            Self::Ware => "ware",
            Self::Wares => "wares",
            Self::TradeOffers => "tradeOffers",
            Self::TradeOrder => "tradeOrder",
            Self::TradeOrders => "tradeOrders",
            Self::MissionOffers => "missionOffers",
            Self::ActiveMissions => "activeMissions",
            Self::Logbook => "logbook",
            Self::LogbookFull => "logbookFull",
            Self::CommandAdded => "commandAdded",
            Self::CommandResult => "commandResult",
            Self::Reset => "reset",
        }
    }
}

impl core::fmt::Display for Topic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A published mutation and the value(s) it stored.
///
/// Serialized as `{"topic": ..., "payload": ...}`; `reset` has no payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "topic", content = "payload", rename_all = "camelCase")]
pub enum StateEvent {
    /// See [`Topic::GameState`].
    GameState(Box<GameState>),
    /// See [`Topic::Player`].
    Player(Box<PlayerInfo>),
    /// See [`Topic::Inventory`].
    Inventory(Box<PlayerInventory>),
    /// See [`Topic::Faction`].
    Faction(Box<Faction>),
    /// See [`Topic::Factions`].
    Factions(Vec<Faction>),
    /// See [`Topic::FactionRelations`].
    FactionRelations(Vec<FactionRelation>),
    /// See [`Topic::Sector`].
    Sector(Box<Sector>),
    /// See [`Topic::Sectors`].
    Sectors(Vec<Sector>),
    /// See [`Topic::Station`].
    Station(Box<Station>),
    /// See [`Topic::Stations`].
    Stations(Vec<Station>),
    /// See [`Topic::Ship`].
    Ship(Box<Ship>),
    /// See [`Topic::Ships`].
    Ships(Vec<Ship>),
    /// See [`Topic::Ware`].
    Ware(Box<Ware>),
    /// See [`Topic::Wares`].
    Wares(Vec<Ware>),
    /// See [`Topic::TradeOffers`].
    TradeOffers(Vec<TradeOffer>),
    /// See [`Topic::TradeOrder`].
    TradeOrder(Box<TradeOrder>),
    /// See [`Topic::TradeOrders`].
    TradeOrders(Vec<TradeOrder>),
    /// See [`Topic::MissionOffers`].
    MissionOffers(Vec<Mission>),
    /// See [`Topic::ActiveMissions`].
    ActiveMissions(Vec<Mission>),
    /// See [`Topic::Logbook`].
    Logbook(Box<LogbookEntry>),
    /// See [`Topic::LogbookFull`].
    LogbookFull(Vec<LogbookEntry>),
    /// See [`Topic::CommandAdded`].
    CommandAdded(Box<Command>),
    /// See [`Topic::CommandResult`].
    CommandResult(Box<CommandResult>),
    /// See [`Topic::Reset`].
    Reset,
}

impl StateEvent {
    /// The topic this event is published on.
    pub const fn topic(&self) -> Topic {
        match self {
            Self::GameState(_) => Topic::GameState,
            Self::Player(_) => Topic::Player,
            Self::Inventory(_) => Topic::Inventory,
            Self::Faction(_) => Topic::Faction,
            Self::Factions(_) => Topic::Factions,
            Self::FactionRelations(_) => Topic::FactionRelations,
            Self::Sector(_) => Topic::Sector,
            Self::Sectors(_) => Topic::Sectors,
            Self::Station(_) => Topic::Station,
            Self::Stations(_) => Topic::Stations,
            Self::Ship(_) => Topic::Ship,
            Self::Ships(_) => Topic::Ships,
            Self::Ware(_) => Topic::Ware,
            Self::Wares(_) => Topic::Wares,
            Self::TradeOffers(_) => Topic::TradeOffers,
            Self::TradeOrder(_) => Topic::TradeOrder,
            Self::TradeOrders(_) => Topic::TradeOrders,
            Self::MissionOffers(_) => Topic::MissionOffers,
            Self::ActiveMissions(_) => Topic::ActiveMissions,
            Self::Logbook(_) => Topic::Logbook,
            Self::LogbookFull(_) => Topic::LogbookFull,
            Self::CommandAdded(_) => Topic::CommandAdded,
            Self::CommandResult(_) => Topic::CommandResult,
            Self::Reset => Topic::Reset,
        }
    }
}

// ---------------------------------------------------------------------------
// Bus
// ---------------------------------------------------------------------------

/// A subscribed callback. Returning `Err` reports a failure to the bus.
pub type Listener = Arc<dyn Fn(&StateEvent) -> anyhow::Result<()> + Send + Sync>;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    topic: Topic,
    seq: u64,
}

impl SubscriptionId {
    /// The topic the subscription listens on.
    pub const fn topic(self) -> Topic {
        self.topic
    }
}

/// Outcome of one [`EventBus::publish`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Listeners that returned `Ok`.
    pub delivered: usize,
    /// Listeners that returned `Err` or panicked.
    pub failed: usize,
}

/// Topic-keyed listener registry.
#[derive(Default)]
pub struct EventBus {
    listeners: HashMap<Topic, HashMap<u64, Listener>>,
    next_seq: u64,
}

impl core::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let counts: HashMap<Topic, usize> = self
            .listeners
            .iter()
            .map(|(topic, map)| (*topic, map.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("listeners", &counts)
            .finish_non_exhaustive()
    }
}

impl EventBus {
    /// Create a bus with no subscriptions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `topic`.
    pub fn subscribe<F>(&mut self, topic: Topic, listener: F) -> SubscriptionId
    where
        F: Fn(&StateEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.subscribe_shared(topic, Arc::new(listener))
    }

    /// Register an already shared listener for `topic`.
    pub fn subscribe_shared(&mut self, topic: Topic, listener: Listener) -> SubscriptionId {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.listeners.entry(topic).or_default().insert(seq, listener);
        SubscriptionId { topic, seq }
    }

    /// Register one listener on every topic.
    pub fn subscribe_all(&mut self, listener: &Listener) -> Vec<SubscriptionId> {
        Topic::ALL
            .iter()
            .map(|topic| self.subscribe_shared(*topic, Arc::clone(listener)))
            .collect()
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let Some(map) = self.listeners.get_mut(&id.topic) else {
            return false;
        };
        let removed = map.remove(&id.seq).is_some();
        if map.is_empty() {
            self.listeners.remove(&id.topic);
        }
        removed
    }

    /// Number of listeners registered on `topic`.
    pub fn listener_count(&self, topic: Topic) -> usize {
        self.listeners.get(&topic).map_or(0, HashMap::len)
    }

    /// Whether any listener is registered on `topic`.
    pub fn has_listeners(&self, topic: Topic) -> bool {
        self.listener_count(topic) > 0
    }

    /// Invoke every listener registered on the event's topic.
    pub fn publish(&self, event: &StateEvent) -> PublishReport {
        let topic = event.topic();
        let mut report = PublishReport::default();
        let Some(map) = self.listeners.get(&topic) else {
            return report;
        };

        for listener in map.values() {
            match catch_unwind(AssertUnwindSafe(|| listener(event))) {
                Ok(Ok(())) => report.delivered = report.delivered.saturating_add(1),
                Ok(Err(e)) => {
                    error!(topic = topic.as_str(), error = %e, "event listener failed");
                    report.failed = report.failed.saturating_add(1);
                }
                Err(payload) => {
                    let message = payload
                        .downcast_ref::<&str>()
                        .map(|s| (*s).to_owned())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "non-string panic payload".to_owned());
                    error!(topic = topic.as_str(), panic = %message, "event listener panicked");
                    report.failed = report.failed.saturating_add(1);
                }
            }
        }

        report
    }

    /// Build and publish an event only when `topic` has listeners.
    pub fn publish_with<F>(&self, topic: Topic, make: F) -> PublishReport
    where
        F: FnOnce() -> StateEvent,
    {
        if !self.has_listeners(topic) {
            return PublishReport::default();
        }
        self.publish(&make())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counter(bus: &mut EventBus, topic: Topic) -> (Arc<AtomicUsize>, SubscriptionId) {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let id = bus.subscribe(topic, move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        (hits, id)
    }

    #[test]
    fn topic_wire_names_match_serde() {
        for topic in Topic::ALL {
            let json = serde_json::to_value(topic).unwrap();
            assert_eq!(json, topic.as_str());
        }
    }

    #[test]
    fn reset_event_has_no_payload() {
        let json = serde_json::to_value(StateEvent::Reset).unwrap();
        assert_eq!(json, serde_json::json!({ "topic": "reset" }));
    }

    #[test]
    fn publish_reaches_only_matching_topic() {
        let mut bus = EventBus::new();
        let (reset_hits, _) = counter(&mut bus, Topic::Reset);
        let (ships_hits, _) = counter(&mut bus, Topic::Ships);

        let report = bus.publish(&StateEvent::Reset);
        assert_eq!(report, PublishReport { delivered: 1, failed: 0 });
        assert_eq!(reset_hits.load(Ordering::SeqCst), 1);
        assert_eq!(ships_hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failing_listener_does_not_stop_others() {
        let mut bus = EventBus::new();
        bus.subscribe(Topic::Reset, |_| Err(anyhow::anyhow!("boom")));
        bus.subscribe(Topic::Reset, |_| -> anyhow::Result<()> {
            std::panic::panic_any("listener panicked")
        });
        let (hits, _) = counter(&mut bus, Topic::Reset);

        let report = bus.publish(&StateEvent::Reset);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_is_idempotent_and_independent() {
        let mut bus = EventBus::new();
        let (first, first_id) = counter(&mut bus, Topic::Reset);
        let (second, _) = counter(&mut bus, Topic::Reset);

        assert!(bus.unsubscribe(first_id));
        assert!(!bus.unsubscribe(first_id));
        assert_eq!(bus.listener_count(Topic::Reset), 1);

        bus.publish(&StateEvent::Reset);
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn publish_with_skips_construction_without_listeners() {
        let bus = EventBus::new();
        let built = AtomicUsize::new(0);
        bus.publish_with(Topic::Reset, || {
            built.fetch_add(1, Ordering::SeqCst);
            StateEvent::Reset
        });
        assert_eq!(built.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn subscribe_all_covers_every_topic() {
        let mut bus = EventBus::new();
        let listener: Listener = Arc::new(|_| Ok(()));
        let ids = bus.subscribe_all(&listener);
        assert_eq!(ids.len(), Topic::ALL.len());
        for topic in Topic::ALL {
            assert!(bus.has_listeners(topic));
        }
    }
}
