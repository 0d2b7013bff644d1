//! `WebSocket` stream of state events.
//!
//! `GET /ws/events` sends every published [`StateEvent`] as a
//! `{"topic": ..., "payload": ...}` text frame. `?topics=stations,ships`
//! narrows the stream to the named topics; unknown names match nothing.
//! A client that falls behind the broadcast buffer resumes at the newest
//! event.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};
use x4_state::{StateEvent, Topic};

use crate::state::AppState;

/// Query parameters for `GET /ws/events`.
#[derive(Debug, Default, Deserialize)]
pub struct EventStreamQuery {
    /// Comma-separated topic names. Absent or blank means every topic.
    pub topics: Option<String>,
}

impl EventStreamQuery {
    /// The requested topics, or `None` when the client wants all of them.
    pub fn topic_filter(&self) -> Option<HashSet<Topic>> {
        let raw = self.topics.as_deref().filter(|t| !t.trim().is_empty())?;
        Some(
            raw.split(',')
                .filter_map(|name| topic_named(name.trim()))
                .collect(),
        )
    }
}

fn topic_named(name: &str) -> Option<Topic> {
    Topic::ALL.into_iter().find(|topic| topic.as_str() == name)
}

/// Upgrade to a `WebSocket` and stream state events.
///
/// # Route
///
/// `GET /ws/events`
pub async fn ws_events(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventStreamQuery>,
) -> impl IntoResponse {
    let filter = query.topic_filter();
    ws.on_upgrade(move |socket| stream_events(socket, state, filter))
}

/// Encode `event` as a text frame, unless the client filtered its topic out.
fn frame(event: &StateEvent, filter: Option<&HashSet<Topic>>) -> Option<Message> {
    let topic = event.topic();
    if filter.is_some_and(|wanted| !wanted.contains(&topic)) {
        return None;
    }
    match serde_json::to_string(event) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            warn!(topic = topic.as_str(), error = %e, "state event not serializable");
            None
        }
    }
}

async fn stream_events(
    mut socket: WebSocket,
    state: Arc<AppState>,
    filter: Option<HashSet<Topic>>,
) {
    let mut events = state.subscribe();
    debug!(filtered = filter.is_some(), "event stream opened");

    loop {
        let outgoing = tokio::select! {
            received = events.recv() => match received {
                Ok(event) => frame(&event, filter.as_ref()),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "event stream lagged");
                    None
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Ping(data))) => Some(Message::Pong(data)),
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    debug!(error = %e, "event stream socket error");
                    break;
                }
                // Inbound text and binary frames carry nothing for the hub.
                Some(Ok(_)) => None,
            },
        };

        let Some(message) = outgoing else {
            continue;
        };
        if socket.send(message).await.is_err() {
            break;
        }
    }

    debug!("event stream closed");
}
