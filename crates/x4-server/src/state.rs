//! Shared application state for the hub API server.
//!
//! [`AppState`] owns the [`SharedState`] handle to the state manager and the
//! broadcast channel that feeds `WebSocket` clients. A single bus listener
//! subscribed on every topic forwards each published [`StateEvent`] into
//! the channel, so the store stays unaware of the transport.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use x4_state::{DEFAULT_CONNECTION_TIMEOUT, Listener, SharedState, StateEvent, StateManager};

/// Capacity of the broadcast channel for state events.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
pub const BROADCAST_CAPACITY: usize = 256;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// The state manager behind a read-write lock.
    pub manager: SharedState,
    /// Broadcast sender for state events.
    pub tx: broadcast::Sender<StateEvent>,
    /// When the server state was created, for `/status` uptime.
    pub started_at: Instant,
    /// Connectivity timeout used by `/health` and `/status`.
    pub connection_timeout: Duration,
}

impl AppState {
    /// Take ownership of `manager` and wire its events into the broadcast
    /// channel.
    pub fn new(mut manager: StateManager, connection_timeout: Duration) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);

        let forward = tx.clone();
        let listener: Listener = Arc::new(move |event: &StateEvent| {
            // send fails only when no WebSocket client is connected.
            let _receivers = forward.send(event.clone()).unwrap_or(0);
            Ok(())
        });
        manager.subscribe_all(&listener);

        Self {
            manager: x4_state::shared(manager),
            tx,
            started_at: Instant::now(),
            connection_timeout,
        }
    }

    /// Subscribe to the state event broadcast.
    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.tx.subscribe()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(StateManager::new(), DEFAULT_CONNECTION_TIMEOUT)
    }
}

impl core::fmt::Debug for AppState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppState")
            .field("receivers", &self.tx.receiver_count())
            .field("started_at", &self.started_at)
            .field("connection_timeout", &self.connection_timeout)
            .finish_non_exhaustive()
    }
}
