//! Health check endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status: `ok`, or `degraded` when the store cannot be read.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Whether a session is currently live.
    pub session_live: bool,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, session_live) = match state.session_repository.load().await {
        Ok(session) => ("ok", session.is_some()),
        Err(err) => {
            warn!("session store unreadable: {err}");
            ("degraded", false)
        }
    };
    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        session_live,
    })
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
