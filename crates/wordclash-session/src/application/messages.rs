//! Outbound messages produced by the Session context.

use serde_json::json;
use uuid::Uuid;
use wordclash_core::broadcast::Outbound;
use wordclash_core::error::DomainError;

use crate::application::query_handlers::SessionView;
use crate::domain::events::{WordGuessed, WordResolved};
use crate::domain::participant::Slot;

/// Full snapshot, sent to everyone after each mutation.
pub const SESSION_STATE: &str = "session-state";
/// Seat assignment, sent to the joiner.
pub const YOUR_SLOT: &str = "your-slot";
/// The live session was discarded.
pub const SESSION_RESET: &str = "session-reset";
/// A participant disconnected and the session was discarded.
pub const PARTICIPANT_LEFT: &str = "participant-left";
/// Private feedback for a matching whole-word guess.
pub const CORRECT_WORD_GUESS: &str = "correct-word-guess";
/// Private feedback for a wrong whole-word guess.
pub const WRONG_WORD_GUESS: &str = "wrong-word-guess";
/// A word submission was refused.
pub const SETUP_REJECTED: &str = "setup-rejected";
/// A guess was malformed or repeated.
pub const GUESS_REJECTED: &str = "guess-rejected";
/// A join or reset carried malformed input.
pub const ACTION_REJECTED: &str = "action-rejected";
/// A guess arrived out of turn.
pub const NOT_YOUR_TURN: &str = "not-your-turn";
/// The action does not fit the current phase.
pub const PHASE_VIOLATION: &str = "phase-violation";
/// The caller may not act on this session.
pub const IDENTITY_VIOLATION: &str = "identity-violation";

/// The action a rejection refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Taking a seat.
    Join,
    /// Submitting secret words.
    SubmitWords,
    /// Guessing a letter or a word.
    Guess,
    /// Discarding the session.
    Reset,
}

/// Notice type reported to the offending connection, or `None` for
/// infrastructure faults.
#[must_use]
pub fn notice_type(action: Action, error: &DomainError) -> Option<&'static str> {
    match error {
        DomainError::PhaseViolation(_) => Some(PHASE_VIOLATION),
        DomainError::IdentityViolation(_) => Some(IDENTITY_VIOLATION),
        DomainError::TurnViolation(_) => Some(NOT_YOUR_TURN),
        DomainError::InputValidation(_) | DomainError::WordRejected(_) => match action {
            Action::SubmitWords => Some(SETUP_REJECTED),
            Action::Guess => Some(GUESS_REJECTED),
            Action::Join | Action::Reset => Some(ACTION_REJECTED),
        },
        DomainError::Infrastructure(_) => None,
    }
}

/// Builds the private rejection notice for `error`.
#[must_use]
pub fn rejection_notice(
    connection_id: Uuid,
    action: Action,
    error: &DomainError,
) -> Option<Outbound> {
    notice_type(action, error).map(|message_type| {
        Outbound::to_connection(
            connection_id,
            message_type,
            json!({ "code": error.code(), "message": error.to_string() }),
        )
    })
}

/// Snapshot broadcast.
#[must_use]
pub fn session_state(view: &SessionView) -> Outbound {
    Outbound::to_everyone(SESSION_STATE, json!(view))
}

/// Tells a joiner which seat they hold.
#[must_use]
pub fn your_slot(connection_id: Uuid, slot: Slot, name: &str) -> Outbound {
    Outbound::to_connection(
        connection_id,
        YOUR_SLOT,
        json!({ "slot": slot, "name": name, "connection_id": connection_id }),
    )
}

/// Announces a reset requested by `name`.
#[must_use]
pub fn session_reset(name: &str) -> Outbound {
    Outbound::to_everyone(
        SESSION_RESET,
        json!({ "by": name, "message": format!("{name} reset the game.") }),
    )
}

/// Announces a departure.
#[must_use]
pub fn participant_left(slot: Slot, name: &str) -> Outbound {
    Outbound::to_everyone(
        PARTICIPANT_LEFT,
        json!({ "slot": slot, "name": name, "message": format!("{name} has left the game.") }),
    )
}

/// Private feedback for a whole-word guess.
#[must_use]
pub fn word_guess_feedback(
    connection_id: Uuid,
    guessed: &WordGuessed,
    resolved: &WordResolved,
) -> Outbound {
    if resolved.matched {
        Outbound::to_connection(
            connection_id,
            CORRECT_WORD_GUESS,
            json!({ "word": resolved.word, "points": resolved.points }),
        )
    } else {
        Outbound::to_connection(
            connection_id,
            WRONG_WORD_GUESS,
            json!({
                "guessed": guessed.guess,
                "actual": resolved.word,
                "penalty": -resolved.points,
            }),
        )
    }
}
