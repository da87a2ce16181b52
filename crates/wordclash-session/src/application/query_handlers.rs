//! Query handlers for the Session context.
//!
//! The snapshot carries raw state; masking of unrevealed letters is left to
//! the client. Connection identifiers never leave the server.

use serde::Serialize;
use uuid::Uuid;
use wordclash_core::aggregate::AggregateRoot;
use wordclash_core::error::DomainError;
use wordclash_core::repository::SessionRepository;

use crate::domain::aggregates::{LogEntry, Phase, Session};
use crate::domain::participant::{Outcome, Participant, Slot};
use crate::domain::settings::GameVariant;
use crate::domain::termination::{SessionResult, TieBreak};

/// Read-only view of one participant.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantView {
    /// Seat.
    pub slot: Slot,
    /// Display name, once seated.
    pub name: Option<String>,
    /// Whether a connection holds the seat.
    pub connected: bool,
    /// Submitted secret words.
    pub words: Vec<String>,
    /// Own words not yet resolved by the opponent.
    pub remaining_words: Vec<String>,
    /// Own word currently exposed.
    pub active_word: Option<String>,
    /// Signed score.
    pub score: i64,
    /// Guesses made.
    pub turns_taken: u32,
    /// Letters tried against the opponent's active word.
    pub guessed_letters: Vec<char>,
    /// Misses against the opponent's active word.
    pub wrong_guess_count: u32,
    /// Single-word guesses left.
    pub guesses_remaining: Option<u32>,
    /// Final standing.
    pub outcome: Option<Outcome>,
}

impl From<&Participant> for ParticipantView {
    fn from(participant: &Participant) -> Self {
        Self {
            slot: participant.slot,
            name: participant.name.clone(),
            connected: participant.is_seated(),
            words: participant.words.clone(),
            remaining_words: participant.remaining_words.clone(),
            active_word: participant.active_word.clone(),
            score: participant.score,
            turns_taken: participant.turns_taken,
            guessed_letters: participant.guessed_letters.clone(),
            wrong_guess_count: participant.wrong_guess_count,
            guesses_remaining: participant.guesses_remaining,
            outcome: participant.outcome,
        }
    }
}

/// Read-only view of the session aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    /// The session identifier.
    pub session_id: Uuid,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Rules in force.
    pub variant: GameVariant,
    /// Identities allowed to join.
    pub allowed_names: [String; 2],
    /// Slot A then slot B.
    pub participants: Vec<ParticipantView>,
    /// Participant to move.
    pub current_turn: Option<Slot>,
    /// Per-participant turn limit, multi-word only.
    pub turn_limit: Option<u32>,
    /// Single-word tie-break progress.
    pub tie_break: TieBreak,
    /// Final result once finished.
    pub result: Option<SessionResult>,
    /// Narration.
    pub event_log: Vec<LogEntry>,
    /// Current version (event count).
    pub version: i64,
}

impl SessionView {
    /// Projects the aggregate.
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        let variant = session.settings().variant();
        Self {
            session_id: session.id,
            phase: session.phase(),
            variant,
            allowed_names: session.settings().allowed_names().clone(),
            participants: session
                .participants()
                .iter()
                .map(ParticipantView::from)
                .collect(),
            current_turn: session.current_turn(),
            turn_limit: variant.turn_limit(),
            tie_break: session.tie_break(),
            result: session.result(),
            event_log: session.event_log().to_vec(),
            version: session.version(),
        }
    }
}

/// Retrieves the live session snapshot, if a session exists.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the repository fails.
pub async fn get_session_view(
    repo: &dyn SessionRepository<Session>,
) -> Result<Option<SessionView>, DomainError> {
    Ok(repo.load().await?.as_ref().map(SessionView::from_session))
}
