//! Server-sent event stream carrying snapshots and private notices.
//!
//! A stream opened with a `connection_id` is that connection's presence:
//! when the stream is dropped the connection is disconnected, which
//! discards the session if it held a seat.

use std::convert::Infallible;

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::Router;
use futures_util::stream::{self, Stream};
use serde::Deserialize;
use tokio::runtime::Handle;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use uuid::Uuid;
use wordclash_core::command::Command;
use wordclash_session::application::command_handlers;
use wordclash_session::domain::commands;

use crate::state::AppState;

/// Query string for GET /events.
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    /// Connection whose private notices should be included.
    pub connection_id: Option<Uuid>,
}

/// Disconnects its connection when dropped.
struct ConnectionGuard {
    state: AppState,
    connection_id: Uuid,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let connection_id = self.connection_id;
        let Ok(runtime) = Handle::try_current() else {
            warn!(%connection_id, "no runtime available to release the connection");
            return;
        };
        let state = self.state.clone();
        runtime.spawn(release_connection(state, connection_id));
    }
}

async fn release_connection(state: AppState, connection_id: Uuid) {
    let command = commands::Disconnect {
        correlation_id: Uuid::new_v4(),
        connection_id,
    };

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        %connection_id,
        "event stream closed"
    );

    let _gate = state.command_gate.lock().await;
    match command_handlers::handle_disconnect(
        &command,
        state.clock.as_ref(),
        &*state.session_repository,
        &state.broadcaster,
    )
    .await
    {
        Ok(Some(result)) => {
            info!(session_id = %result.session_id, slot = ?result.slot, "seat released");
        }
        Ok(None) => {}
        Err(err) => error!(%connection_id, "failed to release connection: {err}"),
    }
}

/// GET /events
async fn stream_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.broadcaster.subscribe();
    let connection_id = query.connection_id;
    info!(connection_id = ?connection_id, "event stream opened");

    let guard = connection_id.map(|connection_id| ConnectionGuard {
        state,
        connection_id,
    });

    let events = stream::unfold((receiver, guard), move |(mut receiver, guard)| async move {
        loop {
            match receiver.recv().await {
                Ok(message) if message.is_visible_to(connection_id) => {
                    let event = Event::default()
                        .event(message.message_type)
                        .data(message.payload.to_string());
                    return Some((Ok(event), (receiver, guard)));
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event stream fell behind; messages dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Returns the router for the event stream.
pub fn router() -> Router<AppState> {
    Router::new().route("/events", get(stream_events))
}
