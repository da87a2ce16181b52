//! Routes for the Session bounded context.
//!
//! Every command route runs under the command gate so that one
//! load-mutate-save cycle finishes before the next begins.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use wordclash_core::command::Command;

use wordclash_session::application::command_handlers::{self, SessionCommandResult};
use wordclash_session::application::query_handlers::{self, SessionView};
use wordclash_session::domain::commands;
use wordclash_session::domain::participant::Slot;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /join.
#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    /// Identity to join as.
    pub player_name: String,
    /// Connection to bind; a fresh one is issued when absent.
    pub connection_id: Option<Uuid>,
}

/// Request body for POST /submit-words.
#[derive(Debug, Deserialize)]
pub struct SubmitWordsRequest {
    /// The submitting connection.
    pub connection_id: Uuid,
    /// Secret words as typed.
    pub words: Vec<String>,
}

/// Request body for POST /guess-letter.
#[derive(Debug, Deserialize)]
pub struct GuessLetterRequest {
    /// The guessing connection.
    pub connection_id: Uuid,
    /// The letter as typed.
    pub letter: String,
}

/// Request body for POST /guess-word.
#[derive(Debug, Deserialize)]
pub struct GuessWordRequest {
    /// The guessing connection.
    pub connection_id: Uuid,
    /// The word as typed.
    pub word: String,
}

/// Request body for POST /reset and POST /disconnect.
#[derive(Debug, Deserialize)]
pub struct ConnectionRequest {
    /// The requesting connection.
    pub connection_id: Uuid,
}

/// Response body returned after a command is successfully handled.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// The session affected.
    pub session_id: Uuid,
    /// Seat of the caller.
    pub slot: Slot,
    /// IDs of the domain events produced.
    pub event_ids: Vec<Uuid>,
}

impl From<SessionCommandResult> for CommandResponse {
    fn from(result: SessionCommandResult) -> Self {
        Self {
            session_id: result.session_id,
            slot: result.slot,
            event_ids: result.events.iter().map(|e| e.metadata.event_id).collect(),
        }
    }
}

/// Response body for POST /join.
#[derive(Debug, Serialize)]
pub struct JoinResponse {
    /// Connection bound to the seat; used for every later request.
    pub connection_id: Uuid,
    /// The command outcome.
    #[serde(flatten)]
    pub command: CommandResponse,
}

/// Response body for POST /disconnect.
#[derive(Debug, Serialize)]
pub struct DisconnectResponse {
    /// Whether the connection held a seat and the session was discarded.
    pub left: bool,
}

/// Response body for GET /.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// The live session, if any.
    pub session: Option<SessionView>,
}

/// POST /join
#[instrument(skip(state, request), fields(player = %request.player_name))]
async fn join(
    State(state): State<AppState>,
    Json(request): Json<JoinRequest>,
) -> Result<Json<JoinResponse>, ApiError> {
    let command = commands::JoinSession {
        correlation_id: Uuid::new_v4(),
        connection_id: request.connection_id.unwrap_or_else(Uuid::new_v4),
        player_name: request.player_name,
    };

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        "handling command"
    );

    let _gate = state.command_gate.lock().await;
    let result = command_handlers::handle_join(
        &command,
        &state.settings,
        state.clock.as_ref(),
        &*state.session_repository,
        &state.broadcaster,
    )
    .await?;

    Ok(Json(JoinResponse {
        connection_id: command.connection_id,
        command: result.into(),
    }))
}

/// POST /submit-words
#[instrument(skip(state, request), fields(connection_id = %request.connection_id))]
async fn submit_words(
    State(state): State<AppState>,
    Json(request): Json<SubmitWordsRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::SubmitWords {
        correlation_id: Uuid::new_v4(),
        connection_id: request.connection_id,
        words: request.words,
    };

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        "handling command"
    );

    let _gate = state.command_gate.lock().await;
    let result = command_handlers::handle_submit_words(
        &command,
        state.clock.as_ref(),
        &state.rng,
        &*state.session_repository,
        &*state.validator,
        &state.broadcaster,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /guess-letter
#[instrument(skip(state, request), fields(connection_id = %request.connection_id))]
async fn guess_letter(
    State(state): State<AppState>,
    Json(request): Json<GuessLetterRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::GuessLetter {
        correlation_id: Uuid::new_v4(),
        connection_id: request.connection_id,
        letter: request.letter,
    };

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        "handling command"
    );

    let _gate = state.command_gate.lock().await;
    let result = command_handlers::handle_guess_letter(
        &command,
        state.clock.as_ref(),
        &state.rng,
        &*state.session_repository,
        &state.broadcaster,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /guess-word
#[instrument(skip(state, request), fields(connection_id = %request.connection_id))]
async fn guess_word(
    State(state): State<AppState>,
    Json(request): Json<GuessWordRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::GuessWord {
        correlation_id: Uuid::new_v4(),
        connection_id: request.connection_id,
        word: request.word,
    };

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        "handling command"
    );

    let _gate = state.command_gate.lock().await;
    let result = command_handlers::handle_guess_word(
        &command,
        state.clock.as_ref(),
        &state.rng,
        &*state.session_repository,
        &state.broadcaster,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /reset
#[instrument(skip(state, request), fields(connection_id = %request.connection_id))]
async fn reset(
    State(state): State<AppState>,
    Json(request): Json<ConnectionRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::ResetSession {
        correlation_id: Uuid::new_v4(),
        connection_id: request.connection_id,
    };

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        "handling command"
    );

    let _gate = state.command_gate.lock().await;
    let result = command_handlers::handle_reset(
        &command,
        &*state.session_repository,
        &state.broadcaster,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /disconnect
#[instrument(skip(state, request), fields(connection_id = %request.connection_id))]
async fn disconnect(
    State(state): State<AppState>,
    Json(request): Json<ConnectionRequest>,
) -> Result<Json<DisconnectResponse>, ApiError> {
    let command = commands::Disconnect {
        correlation_id: Uuid::new_v4(),
        connection_id: request.connection_id,
    };

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        "handling command"
    );

    let _gate = state.command_gate.lock().await;
    let result = command_handlers::handle_disconnect(
        &command,
        state.clock.as_ref(),
        &*state.session_repository,
        &state.broadcaster,
    )
    .await?;

    Ok(Json(DisconnectResponse {
        left: result.is_some(),
    }))
}

/// GET /
#[instrument(skip(state))]
async fn get_session(State(state): State<AppState>) -> Result<Json<SessionResponse>, ApiError> {
    let session = query_handlers::get_session_view(&*state.session_repository).await?;
    Ok(Json(SessionResponse { session }))
}

/// Returns the router for the session context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_session))
        .route("/join", post(join))
        .route("/submit-words", post(submit_words))
        .route("/guess-letter", post(guess_letter))
        .route("/guess-word", post(guess_word))
        .route("/reset", post(reset))
        .route("/disconnect", post(disconnect))
}
