//! Wordclash API: HTTP transport for the word-guessing session.
//!
//! Commands arrive as JSON `POST`s under `/api/v1/session`; snapshots and
//! private notices leave through a server-sent event stream.

pub mod broadcast;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the application router without transport layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest(
            "/api/v1/session",
            routes::session::router().merge(routes::events::router()),
        )
        .with_state(state)
}
