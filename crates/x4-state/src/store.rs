//! The in-memory entity store.
//!
//! One [`KeyedMap`] per entity type with a natural identifier, plain
//! vectors for wholesale-replaced lists, and two [`BoundedHistory`]
//! instances for the logbook and command results. The store has no
//! behavior beyond storage; topics and connectivity live in
//! [`StateManager`](crate::StateManager).

use std::borrow::Borrow;
use std::collections::BTreeMap;

use serde::Serialize;
use x4_types::{
    Command, CommandId, CommandResult, EntityId, Faction, FactionRelation, GameState, LogbookEntry,
    Mission, PlayerInfo, PlayerInventory, Sector, Ship, Station, TradeOffer, TradeOrder, Ware,
    WareId,
};

use crate::bounded::BoundedHistory;

/// Maximum number of logbook entries kept by single-entry appends.
pub const LOGBOOK_CAP: usize = 1000;

/// Maximum number of command results kept.
pub const COMMAND_RESULTS_CAP: usize = 100;

// ---------------------------------------------------------------------------
// Keyed maps
// ---------------------------------------------------------------------------

/// An entity with a natural identifier.
pub trait Keyed {
    /// Identifier type; must be borrowable as `str` for lookups.
    type Key: Ord + Clone + Borrow<str>;

    /// The entity's identifier.
    fn key(&self) -> &Self::Key;
}

macro_rules! impl_keyed {
    ($key:ty => $($entity:ty),+ $(,)?) => {
        $(
            impl Keyed for $entity {
                type Key = $key;

                fn key(&self) -> &Self::Key {
                    &self.id
                }
            }
        )+
    };
}

impl_keyed!(EntityId => Faction, Sector, Station, Ship, TradeOrder);
impl_keyed!(WareId => Ware);
impl_keyed!(CommandId => Command);

/// Identifier to latest snapshot. Later upserts replace earlier ones.
#[derive(Debug, Clone)]
pub struct KeyedMap<T: Keyed> {
    entries: BTreeMap<T::Key, T>,
}

impl<T: Keyed> Default for KeyedMap<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: Keyed> KeyedMap<T> {
    /// Insert or replace one entity.
    pub fn upsert_one(&mut self, entity: T) {
        self.entries.insert(entity.key().clone(), entity);
    }

    /// Insert or replace each entity. Absent identifiers are kept.
    pub fn upsert_many<I>(&mut self, entities: I)
    where
        I: IntoIterator<Item = T>,
    {
        for entity in entities {
            self.upsert_one(entity);
        }
    }

    /// Look up by identifier.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.get(id)
    }

    /// Remove by identifier, returning the removed entity.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        self.entries.remove(id)
    }

    /// All stored entities, ordered by identifier.
    pub fn all(&self) -> Vec<&T> {
        self.entries.values().collect()
    }

    /// Iterate stored entities.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Remove and return every entity.
    pub fn drain(&mut self) -> Vec<T> {
        core::mem::take(&mut self.entries).into_values().collect()
    }

    /// Number of stored entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entity.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Latest known value of every tracked entity type.
#[derive(Debug, Clone)]
pub struct EntityStore {
    /// Last full snapshot.
    pub game_state: Option<GameState>,
    /// Player info, also refreshed by a full snapshot.
    pub player: Option<PlayerInfo>,
    /// Player inventory.
    pub inventory: Option<PlayerInventory>,
    /// Factions by id.
    pub factions: KeyedMap<Faction>,
    /// Relations of the player faction, replaced wholesale.
    pub faction_relations: Vec<FactionRelation>,
    /// Sectors by id.
    pub sectors: KeyedMap<Sector>,
    /// Stations by id.
    pub stations: KeyedMap<Station>,
    /// Ships by id.
    pub ships: KeyedMap<Ship>,
    /// Wares by ware id.
    pub wares: KeyedMap<Ware>,
    /// Market snapshot, replaced wholesale.
    pub trade_offers: Vec<TradeOffer>,
    /// Player trade orders by id.
    pub trade_orders: KeyedMap<TradeOrder>,
    /// Available missions, replaced wholesale.
    pub mission_offers: Vec<Mission>,
    /// Accepted missions, replaced wholesale.
    pub active_missions: Vec<Mission>,
    /// Logbook, newest first.
    pub logbook: BoundedHistory<LogbookEntry>,
    /// Commands awaiting pickup.
    pub pending_commands: KeyedMap<Command>,
    /// Reported command outcomes, newest first.
    pub command_results: BoundedHistory<CommandResult>,
    /// Milliseconds since the epoch of the last full snapshot, 0 if none.
    pub last_update_ms: i64,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self {
            game_state: None,
            player: None,
            inventory: None,
            factions: KeyedMap::default(),
            faction_relations: Vec::new(),
            sectors: KeyedMap::default(),
            stations: KeyedMap::default(),
            ships: KeyedMap::default(),
            wares: KeyedMap::default(),
            trade_offers: Vec::new(),
            trade_orders: KeyedMap::default(),
            mission_offers: Vec::new(),
            active_missions: Vec::new(),
            logbook: BoundedHistory::new(LOGBOOK_CAP),
            pending_commands: KeyedMap::default(),
            command_results: BoundedHistory::new(COMMAND_RESULTS_CAP),
            last_update_ms: 0,
        }
    }
}

impl EntityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cardinality of every tracked collection.
    pub fn counts(&self) -> StoreCounts {
        StoreCounts {
            factions: self.factions.len(),
            faction_relations: self.faction_relations.len(),
            sectors: self.sectors.len(),
            stations: self.stations.len(),
            ships: self.ships.len(),
            wares: self.wares.len(),
            trade_offers: self.trade_offers.len(),
            trade_orders: self.trade_orders.len(),
            mission_offers: self.mission_offers.len(),
            active_missions: self.active_missions.len(),
            logbook_entries: self.logbook.len(),
            pending_commands: self.pending_commands.len(),
            command_results: self.command_results.len(),
        }
    }
}

/// Per-collection sizes reported by the summary and `/status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCounts {
    /// Stored factions.
    pub factions: usize,
    /// Stored faction relations.
    pub faction_relations: usize,
    /// Stored sectors.
    pub sectors: usize,
    /// Stored stations.
    pub stations: usize,
    /// Stored ships.
    pub ships: usize,
    /// Stored wares.
    pub wares: usize,
    /// Stored trade offers.
    pub trade_offers: usize,
    /// Stored trade orders.
    pub trade_orders: usize,
    /// Stored mission offers.
    pub mission_offers: usize,
    /// Stored active missions.
    pub active_missions: usize,
    /// Stored logbook entries.
    pub logbook_entries: usize,
    /// Commands awaiting pickup.
    pub pending_commands: usize,
    /// Stored command results.
    pub command_results: usize,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn faction(id: &str, name: &str) -> Faction {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "fullName": name,
            "race": "argon"
        }))
        .unwrap()
    }

    #[test]
    fn upsert_replaces_by_identifier() {
        let mut map = KeyedMap::default();
        map.upsert_one(faction("argon", "Argon"));
        map.upsert_one(faction("argon", "Argon Federation"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("argon").unwrap().name, "Argon Federation");
    }

    #[test]
    fn upsert_many_merges() {
        let mut map = KeyedMap::default();
        map.upsert_one(faction("teladi", "Teladi"));
        map.upsert_many(vec![faction("argon", "Argon"), faction("paranid", "Paranid")]);
        assert_eq!(map.len(), 3);
        assert!(map.get("teladi").is_some());
        assert!(map.get("boron").is_none());
    }

    #[test]
    fn drain_empties_map() {
        let mut map = KeyedMap::default();
        map.upsert_many(vec![faction("argon", "Argon"), faction("paranid", "Paranid")]);
        let drained = map.drain();
        assert_eq!(drained.len(), 2);
        assert!(map.is_empty());
    }

    #[test]
    fn new_store_is_empty() {
        let store = EntityStore::new();
        assert_eq!(store.counts(), StoreCounts::default());
        assert_eq!(store.last_update_ms, 0);
        assert_eq!(store.logbook.cap(), LOGBOOK_CAP);
        assert_eq!(store.command_results.cap(), COMMAND_RESULTS_CAP);
    }
}
