//! Core state of the X4 game state hub.
//!
//! The [`StateManager`] owns every stored entity snapshot, publishes one
//! [`StateEvent`] per mutation through its [`EventBus`], derives the
//! connectivity flag from the age of the last full snapshot, and runs the
//! command lifecycle (enqueue, poll-and-clear, result reconciliation).
//!
//! The manager is plain synchronous data. Hosts running on a
//! multi-threaded runtime share it as [`SharedState`]: reads take the read
//! lock, every mutation and the poll-and-clear read take the write lock.
//! Listeners run while the write lock is held and must not touch the
//! shared state again.
//!
//! # Modules
//!
//! - [`bounded`] -- Capped newest-first history
//! - [`store`] -- Keyed maps and the entity store
//! - [`events`] -- Topics, events, and the listener registry
//! - [`manager`] -- The state manager facade
//! - [`clock`] -- Wall-clock source

pub mod bounded;
pub mod clock;
pub mod events;
pub mod manager;
pub mod store;

use std::sync::Arc;

use tokio::sync::RwLock;

pub use bounded::BoundedHistory;
pub use clock::{Clock, SystemClock};
pub use events::{EventBus, Listener, PublishReport, StateEvent, SubscriptionId, Topic};
pub use manager::{DEFAULT_CONNECTION_TIMEOUT, StateManager, StoreSummary};
pub use store::{COMMAND_RESULTS_CAP, EntityStore, Keyed, KeyedMap, LOGBOOK_CAP, StoreCounts};

/// A state manager shared across request handlers.
pub type SharedState = Arc<RwLock<StateManager>>;

/// Wrap `manager` for sharing.
pub fn shared(manager: StateManager) -> SharedState {
    Arc::new(RwLock::new(manager))
}
