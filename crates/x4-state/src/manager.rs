//! The state manager: entity store, event bus, and derived state behind one
//! facade.
//!
//! Every `update_*` method replaces stored values and then publishes one
//! event carrying the new value(s). Reads are pure. No operation returns an
//! error: absent values come back as `None` or an empty sequence, and
//! anomalies such as a result for an unknown command are absorbed.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;
use x4_types::{
    Command, CommandResult, Faction, FactionRelation, GameState, LogbookEntry, Mission, PlayerInfo,
    PlayerInventory, Sector, Ship, Station, TradeOffer, TradeOrder, Ware,
};

use crate::clock::{Clock, SystemClock};
use crate::events::{EventBus, Listener, StateEvent, SubscriptionId, Topic};
use crate::store::{EntityStore, StoreCounts};

/// How long after the last full snapshot the game still counts as connected.
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Lightweight status probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    /// Whether a full snapshot arrived within the timeout.
    pub connected: bool,
    /// Milliseconds since the epoch of the last full snapshot, 0 if none.
    pub last_update: i64,
    /// Per-collection sizes.
    pub counts: StoreCounts,
}

/// Owns the store and the event bus.
#[derive(Debug)]
pub struct StateManager {
    store: EntityStore,
    bus: EventBus,
    clock: Arc<dyn Clock>,
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StateManager {
    /// Create an empty manager on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty manager reading time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: EntityStore::new(),
            bus: EventBus::new(),
            clock,
        }
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    /// Register a listener on `topic`. It survives [`reset`](Self::reset).
    pub fn subscribe<F>(&mut self, topic: Topic, listener: F) -> SubscriptionId
    where
        F: Fn(&StateEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.bus.subscribe(topic, listener)
    }

    /// Register one listener on every topic.
    pub fn subscribe_all(&mut self, listener: &Listener) -> Vec<SubscriptionId> {
        self.bus.subscribe_all(listener)
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Publish on `topic` when it has listeners. Each failure is already
    /// logged by the bus; this adds one summary line per event.
    fn emit(&self, topic: Topic, make: impl FnOnce() -> StateEvent) {
        let report = self.bus.publish_with(topic, make);
        if report.failed > 0 {
            debug!(
                topic = topic.as_str(),
                delivered = report.delivered,
                failed = report.failed,
                "event published with listener failures"
            );
        }
    }

    // -----------------------------------------------------------------------
    // Game state and connectivity
    // -----------------------------------------------------------------------

    /// Store a full snapshot. Also replaces the player and refreshes the
    /// connectivity timestamp; no other update does.
    pub fn update_game_state(&mut self, state: GameState) {
        self.store.player = Some(state.player.clone());
        self.store.game_state = Some(state.clone());
        self.store.last_update_ms = self.clock.now_ms();
        self.emit(Topic::GameState, || StateEvent::GameState(Box::new(state)));
    }

    /// The last full snapshot.
    pub const fn game_state(&self) -> Option<&GameState> {
        self.store.game_state.as_ref()
    }

    /// Milliseconds since the epoch of the last full snapshot, 0 if none.
    pub const fn last_update(&self) -> i64 {
        self.store.last_update_ms
    }

    /// Whether a full snapshot arrived less than `timeout` ago.
    pub fn is_connected(&self, timeout: Duration) -> bool {
        let timeout_ms = i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX);
        self.clock
            .now_ms()
            .saturating_sub(self.store.last_update_ms)
            < timeout_ms
    }

    /// Connectivity plus the size of every collection.
    pub fn summary(&self, timeout: Duration) -> StoreSummary {
        StoreSummary {
            connected: self.is_connected(timeout),
            last_update: self.store.last_update_ms,
            counts: self.store.counts(),
        }
    }

    /// Discard every stored value and zero the connectivity timestamp.
    /// Subscriptions are kept.
    pub fn reset(&mut self) {
        self.store = EntityStore::new();
        debug!("state store reset");
        self.emit(Topic::Reset, || StateEvent::Reset);
    }

    // -----------------------------------------------------------------------
    // Player
    // -----------------------------------------------------------------------

    /// Replace the player info.
    pub fn update_player(&mut self, player: PlayerInfo) {
        self.store.player = Some(player.clone());
        self.emit(Topic::Player, || StateEvent::Player(Box::new(player)));
    }

    /// The player info.
    pub const fn player(&self) -> Option<&PlayerInfo> {
        self.store.player.as_ref()
    }

    /// Replace the player inventory.
    pub fn update_inventory(&mut self, inventory: PlayerInventory) {
        self.store.inventory = Some(inventory.clone());
        self.emit(Topic::Inventory, || StateEvent::Inventory(Box::new(inventory)));
    }

    /// The player inventory.
    pub const fn inventory(&self) -> Option<&PlayerInventory> {
        self.store.inventory.as_ref()
    }

    // -----------------------------------------------------------------------
    // Factions
    // -----------------------------------------------------------------------

    /// Insert or replace one faction.
    pub fn update_faction(&mut self, faction: Faction) {
        self.store.factions.upsert_one(faction.clone());
        self.emit(Topic::Faction, || StateEvent::Faction(Box::new(faction)));
    }

    /// Insert or replace each faction, keeping the others.
    pub fn update_factions(&mut self, factions: Vec<Faction>) {
        self.store.factions.upsert_many(factions.iter().cloned());
        self.emit(Topic::Factions, || StateEvent::Factions(factions));
    }

    /// One faction by id.
    pub fn faction(&self, id: &str) -> Option<&Faction> {
        self.store.factions.get(id)
    }

    /// Every faction.
    pub fn all_factions(&self) -> Vec<&Faction> {
        self.store.factions.all()
    }

    /// Replace the faction relations list.
    pub fn update_faction_relations(&mut self, relations: Vec<FactionRelation>) {
        self.store.faction_relations.clone_from(&relations);
        self.emit(Topic::FactionRelations, || StateEvent::FactionRelations(relations));
    }

    /// The faction relations list.
    pub fn faction_relations(&self) -> &[FactionRelation] {
        &self.store.faction_relations
    }

    // -----------------------------------------------------------------------
    // Sectors
    // -----------------------------------------------------------------------

    /// Insert or replace one sector.
    pub fn update_sector(&mut self, sector: Sector) {
        self.store.sectors.upsert_one(sector.clone());
        self.emit(Topic::Sector, || StateEvent::Sector(Box::new(sector)));
    }

    /// Insert or replace each sector, keeping the others.
    pub fn update_sectors(&mut self, sectors: Vec<Sector>) {
        self.store.sectors.upsert_many(sectors.iter().cloned());
        self.emit(Topic::Sectors, || StateEvent::Sectors(sectors));
    }

    /// One sector by id.
    pub fn sector(&self, id: &str) -> Option<&Sector> {
        self.store.sectors.get(id)
    }

    /// Every sector.
    pub fn all_sectors(&self) -> Vec<&Sector> {
        self.store.sectors.all()
    }

    // -----------------------------------------------------------------------
    // Stations
    // -----------------------------------------------------------------------

    /// Insert or replace one station.
    pub fn update_station(&mut self, station: Station) {
        self.store.stations.upsert_one(station.clone());
        self.emit(Topic::Station, || StateEvent::Station(Box::new(station)));
    }

    /// Insert or replace each station, keeping the others.
    pub fn update_stations(&mut self, stations: Vec<Station>) {
        self.store.stations.upsert_many(stations.iter().cloned());
        self.emit(Topic::Stations, || StateEvent::Stations(stations));
    }

    /// One station by id.
    pub fn station(&self, id: &str) -> Option<&Station> {
        self.store.stations.get(id)
    }

    /// Every station.
    pub fn all_stations(&self) -> Vec<&Station> {
        self.store.stations.all()
    }

    /// Stations owned by the player.
    pub fn player_stations(&self) -> Vec<&Station> {
        self.store
            .stations
            .values()
            .filter(|s| s.is_player_owned)
            .collect()
    }

    /// Stations located in `sector_id`.
    pub fn stations_in_sector(&self, sector_id: &str) -> Vec<&Station> {
        self.store
            .stations
            .values()
            .filter(|s| s.sector.id.as_str() == sector_id)
            .collect()
    }

    // -----------------------------------------------------------------------
    // Ships
    // -----------------------------------------------------------------------

    /// Insert or replace one ship.
    pub fn update_ship(&mut self, ship: Ship) {
        self.store.ships.upsert_one(ship.clone());
        self.emit(Topic::Ship, || StateEvent::Ship(Box::new(ship)));
    }

    /// Insert or replace each ship, keeping the others.
    pub fn update_ships(&mut self, ships: Vec<Ship>) {
        self.store.ships.upsert_many(ships.iter().cloned());
        self.emit(Topic::Ships, || StateEvent::Ships(ships));
    }

    /// One ship by id.
    pub fn ship(&self, id: &str) -> Option<&Ship> {
        self.store.ships.get(id)
    }

    /// Every ship.
    pub fn all_ships(&self) -> Vec<&Ship> {
        self.store.ships.all()
    }

    /// Ships owned by the player.
    pub fn player_ships(&self) -> Vec<&Ship> {
        self.store
            .ships
            .values()
            .filter(|s| s.is_player_owned)
            .collect()
    }

    /// Ships located in `sector_id`.
    pub fn ships_in_sector(&self, sector_id: &str) -> Vec<&Ship> {
        self.store
            .ships
            .values()
            .filter(|s| s.sector.id.as_str() == sector_id)
            .collect()
    }

    // -----------------------------------------------------------------------
    // Trade
    // -----------------------------------------------------------------------

    /// Insert or replace one ware.
    pub fn update_ware(&mut self, ware: Ware) {
        self.store.wares.upsert_one(ware.clone());
        self.emit(Topic::Ware, || StateEvent::Ware(Box::new(ware)));
    }

    /// Insert or replace each ware, keeping the others.
    pub fn update_wares(&mut self, wares: Vec<Ware>) {
        self.store.wares.upsert_many(wares.iter().cloned());
        self.emit(Topic::Wares, || StateEvent::Wares(wares));
    }

    /// One ware by id.
    pub fn ware(&self, id: &str) -> Option<&Ware> {
        self.store.wares.get(id)
    }

    /// Every ware.
    pub fn all_wares(&self) -> Vec<&Ware> {
        self.store.wares.all()
    }

    /// Replace the market snapshot.
    pub fn update_trade_offers(&mut self, offers: Vec<TradeOffer>) {
        self.store.trade_offers.clone_from(&offers);
        self.emit(Topic::TradeOffers, || StateEvent::TradeOffers(offers));
    }

    /// The market snapshot.
    pub fn trade_offers(&self) -> &[TradeOffer] {
        &self.store.trade_offers
    }

    /// Offers for one ware.
    pub fn trade_offers_for_ware(&self, ware_id: &str) -> Vec<&TradeOffer> {
        self.store
            .trade_offers
            .iter()
            .filter(|o| o.ware.id.as_str() == ware_id)
            .collect()
    }

    /// Insert or replace one trade order.
    pub fn update_trade_order(&mut self, order: TradeOrder) {
        self.store.trade_orders.upsert_one(order.clone());
        self.emit(Topic::TradeOrder, || StateEvent::TradeOrder(Box::new(order)));
    }

    /// Insert or replace each trade order, keeping the others.
    pub fn update_trade_orders(&mut self, orders: Vec<TradeOrder>) {
        self.store.trade_orders.upsert_many(orders.iter().cloned());
        self.emit(Topic::TradeOrders, || StateEvent::TradeOrders(orders));
    }

    /// One trade order by id.
    pub fn trade_order(&self, id: &str) -> Option<&TradeOrder> {
        self.store.trade_orders.get(id)
    }

    /// Every trade order.
    pub fn all_trade_orders(&self) -> Vec<&TradeOrder> {
        self.store.trade_orders.all()
    }

    // -----------------------------------------------------------------------
    // Missions
    // -----------------------------------------------------------------------

    /// Replace the mission offers.
    pub fn update_mission_offers(&mut self, missions: Vec<Mission>) {
        self.store.mission_offers.clone_from(&missions);
        self.emit(Topic::MissionOffers, || StateEvent::MissionOffers(missions));
    }

    /// The mission offers.
    pub fn mission_offers(&self) -> &[Mission] {
        &self.store.mission_offers
    }

    /// Replace the active missions.
    pub fn update_active_missions(&mut self, missions: Vec<Mission>) {
        self.store.active_missions.clone_from(&missions);
        self.emit(Topic::ActiveMissions, || StateEvent::ActiveMissions(missions));
    }

    /// The active missions.
    pub fn active_missions(&self) -> &[Mission] {
        &self.store.active_missions
    }

    // -----------------------------------------------------------------------
    // Logbook
    // -----------------------------------------------------------------------

    /// Prepend one entry, evicting the oldest past the cap.
    pub fn add_logbook_entry(&mut self, entry: LogbookEntry) {
        self.store.logbook.push_front(entry.clone());
        self.emit(Topic::Logbook, || StateEvent::Logbook(Box::new(entry)));
    }

    /// Replace the whole logbook. The cap is not applied.
    pub fn update_logbook(&mut self, entries: Vec<LogbookEntry>) {
        self.store.logbook.replace_all(entries.clone());
        self.emit(Topic::LogbookFull, || StateEvent::LogbookFull(entries));
    }

    /// The newest `limit` entries, or all of them.
    pub fn logbook(&self, limit: Option<usize>) -> Vec<&LogbookEntry> {
        self.store.logbook.slice(limit)
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Enqueue a command, replacing any pending one with the same id.
    pub fn add_command(&mut self, command: Command) {
        self.store.pending_commands.upsert_one(command.clone());
        self.emit(Topic::CommandAdded, || StateEvent::CommandAdded(Box::new(command)));
    }

    /// Commands awaiting pickup.
    pub fn pending_commands(&self) -> Vec<&Command> {
        self.store.pending_commands.all()
    }

    /// Drop every pending command.
    pub fn clear_pending_commands(&mut self) {
        self.store.pending_commands.clear();
    }

    /// Remove and return every pending command in one step.
    ///
    /// Delivery is at-most-once: the commands are gone from the hub as
    /// soon as this returns.
    pub fn take_pending_commands(&mut self) -> Vec<Command> {
        self.store.pending_commands.drain()
    }

    /// Record a result and drop the matching pending command, if any.
    pub fn add_command_result(&mut self, result: CommandResult) {
        if self
            .store
            .pending_commands
            .remove(result.command_id.as_str())
            .is_none()
        {
            debug!(command_id = %result.command_id, "result for command not pending");
        }
        self.store.command_results.push_front(result.clone());
        self.emit(Topic::CommandResult, || StateEvent::CommandResult(Box::new(result)));
    }

    /// The newest `limit` results, or all of them.
    pub fn command_results(&self, limit: Option<usize>) -> Vec<&CommandResult> {
        self.store.command_results.slice(limit)
    }
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::indexing_slicing,
        clippy::arithmetic_side_effects
    )]

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    use serde_json::json;
    use x4_types::CommandId;

    use super::*;
    use crate::store::LOGBOOK_CAP;

    const T0: i64 = 1_700_000_000_000;

    #[derive(Debug)]
    struct ManualClock(AtomicI64);

    impl ManualClock {
        fn advance(&self, ms: i64) {
            self.0.fetch_add(ms, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn manager() -> (StateManager, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock(AtomicI64::new(T0)));
        let manager = StateManager::with_clock(Arc::clone(&clock) as Arc<dyn Clock>);
        (manager, clock)
    }

    fn player() -> PlayerInfo {
        serde_json::from_value(json!({
            "id": "player",
            "name": "Captain",
            "money": 100_000,
            "gameTime": 3600,
            "currentSector": { "id": "sec1", "name": "Argon Prime" },
            "faction": { "id": "player", "name": "Player" }
        }))
        .unwrap()
    }

    fn game_state() -> GameState {
        serde_json::from_value(json!({
            "timestamp": T0,
            "gameTime": 3600,
            "player": serde_json::to_value(player()).unwrap(),
            "isPaused": false
        }))
        .unwrap()
    }

    fn faction(id: &str) -> Faction {
        serde_json::from_value(json!({
            "id": id,
            "name": id,
            "fullName": id,
            "race": "argon"
        }))
        .unwrap()
    }

    fn station(id: &str, sector: &str, player_owned: bool) -> Station {
        serde_json::from_value(json!({
            "id": id,
            "name": id,
            "owner": { "id": "argon", "name": "Argon" },
            "type": "factory",
            "sector": { "id": sector, "name": sector },
            "position": { "x": 0, "y": 0, "z": 0 },
            "hull": 100,
            "isPlayerOwned": player_owned
        }))
        .unwrap()
    }

    fn ship(id: &str, sector: &str, player_owned: bool) -> Ship {
        serde_json::from_value(json!({
            "id": id,
            "name": id,
            "class": "ship_m",
            "macro": "ship_arg_m_trans_01_a_macro",
            "owner": { "id": "argon", "name": "Argon" },
            "isPlayerOwned": player_owned,
            "hull": 80,
            "shield": 50,
            "sector": { "id": sector, "name": sector },
            "position": { "x": 0, "y": 0, "z": 0 }
        }))
        .unwrap()
    }

    fn logbook_entry(n: usize) -> LogbookEntry {
        serde_json::from_value(json!({
            "id": format!("log{n}"),
            "time": n,
            "category": "general",
            "title": "Entry",
            "text": "Something happened",
            "importance": "low",
            "isRead": false
        }))
        .unwrap()
    }

    fn command(id: &str) -> Command {
        serde_json::from_value(json!({
            "id": id,
            "type": "cancel_trade_order",
            "params": { "orderId": "order1" },
            "timestamp": T0
        }))
        .unwrap()
    }

    fn result(id: &str) -> CommandResult {
        CommandResult {
            command_id: CommandId::from(id),
            success: true,
            error: None,
            data: None,
            timestamp: 1.0,
        }
    }

    #[test]
    fn logbook_append_caps_at_limit() {
        let (mut m, _) = manager();
        for n in 0..=LOGBOOK_CAP + 5 {
            m.add_logbook_entry(logbook_entry(n));
        }
        let log = m.logbook(None);
        assert_eq!(log.len(), LOGBOOK_CAP);
        assert_eq!(log[0].id.as_str(), format!("log{}", LOGBOOK_CAP + 5));
    }

    #[test]
    fn logbook_replace_is_not_capped() {
        let (mut m, _) = manager();
        let entries: Vec<_> = (0..LOGBOOK_CAP + 10).map(logbook_entry).collect();
        m.update_logbook(entries);
        assert_eq!(m.logbook(None).len(), LOGBOOK_CAP + 10);
        assert_eq!(m.logbook(Some(3)).len(), 3);
    }

    #[test]
    fn pending_then_clear() {
        let (mut m, _) = manager();
        let c = command("cmd1");
        m.add_command(c.clone());
        assert_eq!(m.pending_commands(), vec![&c]);

        m.clear_pending_commands();
        m.clear_pending_commands();
        assert!(m.pending_commands().is_empty());
    }

    #[test]
    fn take_pending_empties_queue() {
        let (mut m, _) = manager();
        m.add_command(command("cmd1"));
        m.add_command(command("cmd2"));
        assert_eq!(m.take_pending_commands().len(), 2);
        assert!(m.take_pending_commands().is_empty());
    }

    #[test]
    fn result_resolves_pending_command() {
        let (mut m, _) = manager();
        m.add_command(command("cmd1"));
        let r = result("cmd1");
        m.add_command_result(r.clone());

        assert!(m.pending_commands().is_empty());
        assert_eq!(m.command_results(None), vec![&r]);
    }

    #[test]
    fn result_for_unknown_command_is_recorded() {
        let (mut m, _) = manager();
        m.add_command(command("cmd1"));
        m.add_command_result(result("ghost"));

        assert_eq!(m.pending_commands().len(), 1);
        assert_eq!(m.command_results(None).len(), 1);
    }

    #[test]
    fn batch_updates_merge() {
        let (mut m, _) = manager();
        m.update_factions(vec![faction("f1"), faction("f2")]);
        assert_eq!(m.faction("f1"), Some(&faction("f1")));
        assert_eq!(m.all_factions().len(), 2);

        m.update_faction(faction("f3"));
        assert!(m.faction("f1").is_some());
        assert!(m.faction("f2").is_some());
        assert_eq!(m.all_factions().len(), 3);
    }

    #[test]
    fn connectivity_follows_game_state_only() {
        let (mut m, clock) = manager();
        assert!(!m.is_connected(DEFAULT_CONNECTION_TIMEOUT));

        m.update_game_state(game_state());
        assert!(m.is_connected(DEFAULT_CONNECTION_TIMEOUT));
        assert_eq!(m.last_update(), T0);

        clock.advance(20_000);
        m.update_player(player());
        clock.advance(10_000);
        assert!(!m.is_connected(DEFAULT_CONNECTION_TIMEOUT));
    }

    #[test]
    fn game_state_replaces_player() {
        let (mut m, _) = manager();
        m.update_game_state(game_state());
        assert_eq!(m.player(), Some(&player()));
    }

    #[test]
    fn station_and_ship_filters() {
        let (mut m, _) = manager();
        m.update_stations(vec![
            station("s1", "sec1", true),
            station("s2", "sec2", false),
        ]);
        let in_sec1: Vec<_> = m
            .stations_in_sector("sec1")
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        let owned: Vec<_> = m.player_stations().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(in_sec1, ["s1"]);
        assert_eq!(owned, ["s1"]);

        m.update_ships(vec![ship("a", "sec1", false), ship("b", "sec1", true)]);
        assert_eq!(m.ships_in_sector("sec1").len(), 2);
        assert_eq!(m.player_ships().len(), 1);
        assert!(m.ships_in_sector("sec2").is_empty());
    }

    #[test]
    fn reset_clears_store_and_keeps_listeners() {
        let (mut m, _) = manager();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        m.subscribe(Topic::Faction, move |event| {
            sink.lock().unwrap().push(event.topic());
            Ok(())
        });
        let resets = Arc::new(AtomicUsize::new(0));
        let reset_hits = Arc::clone(&resets);
        m.subscribe(Topic::Reset, move |_| {
            reset_hits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        m.update_game_state(game_state());
        m.update_faction(faction("f1"));
        m.add_logbook_entry(logbook_entry(1));
        m.add_command(command("cmd1"));
        m.add_command_result(result("cmd0"));

        m.reset();
        let summary = m.summary(DEFAULT_CONNECTION_TIMEOUT);
        assert_eq!(summary.counts, StoreCounts::default());
        assert_eq!(summary.last_update, 0);
        assert!(!summary.connected);
        assert!(m.game_state().is_none());
        assert!(m.player().is_none());
        assert_eq!(resets.load(Ordering::SeqCst), 1);

        m.update_faction(faction("f2"));
        assert_eq!(*seen.lock().unwrap(), vec![Topic::Faction, Topic::Faction]);
    }

    #[test]
    fn listener_failure_does_not_block_mutation() {
        let (mut m, _) = manager();
        m.subscribe(Topic::Faction, |_| Err(anyhow::anyhow!("listener broke")));
        m.update_faction(faction("f1"));
        assert!(m.faction("f1").is_some());
    }

    #[test]
    fn unsubscribed_listener_is_silent() {
        let (mut m, _) = manager();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let id = m.subscribe(Topic::Factions, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        m.update_factions(vec![faction("f1")]);
        assert!(m.unsubscribe(id));
        assert!(!m.unsubscribe(id));
        m.update_factions(vec![faction("f2")]);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn summary_counts_collections() {
        let (mut m, _) = manager();
        m.update_stations(vec![station("s1", "sec1", true)]);
        m.add_command(command("cmd1"));
        m.add_logbook_entry(logbook_entry(1));
        let counts = m.summary(DEFAULT_CONNECTION_TIMEOUT).counts;
        assert_eq!(counts.stations, 1);
        assert_eq!(counts.pending_commands, 1);
        assert_eq!(counts.logbook_entries, 1);
        assert_eq!(counts.ships, 0);
    }
}
