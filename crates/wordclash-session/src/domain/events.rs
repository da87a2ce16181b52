//! Domain events for the Session context.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wordclash_core::event::{DomainEvent, EventMetadata};

use super::participant::{Outcome, Slot};
use super::termination::SessionResult;

/// Emitted when a connection takes a seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantJoined {
    /// The session identifier.
    pub session_id: Uuid,
    /// Seat taken.
    pub slot: Slot,
    /// Connection holding the seat.
    pub connection_id: Uuid,
    /// Identity the participant joined as.
    pub name: String,
}

/// Emitted when a participant's secret words are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordsSubmitted {
    /// The session identifier.
    pub session_id: Uuid,
    /// Owner of the words.
    pub slot: Slot,
    /// Normalized, validated words.
    pub words: Vec<String>,
    /// Word drawn to be exposed first.
    pub active_word: String,
}

/// Emitted when both participants have submitted and guessing begins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayStarted {
    /// The session identifier.
    pub session_id: Uuid,
    /// Participant who moves first.
    pub opening_turn: Slot,
}

/// Emitted for every accepted letter guess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LetterGuessed {
    /// The session identifier.
    pub session_id: Uuid,
    /// Guesser.
    pub slot: Slot,
    /// Lower-case letter.
    pub letter: char,
    /// Whether the letter occurs in the opponent's active word.
    pub hit: bool,
}

/// Emitted for every accepted whole-word guess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordGuessed {
    /// The session identifier.
    pub session_id: Uuid,
    /// Guesser.
    pub slot: Slot,
    /// Normalized guess.
    pub guess: String,
    /// Whether the guess equals the opponent's active word.
    pub matched: bool,
}

/// Emitted when an active word leaves play, by reveal or by a whole-word
/// guess (right or wrong).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordResolved {
    /// The session identifier.
    pub session_id: Uuid,
    /// Participant whose guess resolved the word.
    pub solver: Slot,
    /// The resolved word, owned by the solver's opponent.
    pub word: String,
    /// `true` if revealed or matched, `false` for a wrong word guess.
    pub matched: bool,
    /// Signed score change for the solver.
    pub points: i64,
    /// Next word exposed by the owner, if any remain.
    pub next_active_word: Option<String>,
}

/// Emitted when a participant's final standing is decided.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeRecorded {
    /// The session identifier.
    pub session_id: Uuid,
    /// Participant concerned.
    pub slot: Slot,
    /// Standing.
    pub outcome: Outcome,
}

/// Emitted when the single-word bonus turn is granted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TieWindowOpened {
    /// The session identifier.
    pub session_id: Uuid,
    /// Participant who finished first.
    pub leader: Slot,
    /// Participant granted one more turn.
    pub challenger: Slot,
}

/// Emitted when the turn pointer moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnPassed {
    /// The session identifier.
    pub session_id: Uuid,
    /// Participant to move next.
    pub next_turn: Slot,
}

/// Emitted when a termination rule fires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFinished {
    /// The session identifier.
    pub session_id: Uuid,
    /// Final result.
    pub result: SessionResult,
}

/// Emitted when a participant disconnects; the session is destroyed after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantLeft {
    /// The session identifier.
    pub session_id: Uuid,
    /// Seat that was vacated.
    pub slot: Slot,
}

/// Event type identifier for [`ParticipantJoined`].
pub const PARTICIPANT_JOINED_EVENT_TYPE: &str = "session.participant_joined";

/// Event type identifier for [`WordsSubmitted`].
pub const WORDS_SUBMITTED_EVENT_TYPE: &str = "session.words_submitted";

/// Event type identifier for [`PlayStarted`].
pub const PLAY_STARTED_EVENT_TYPE: &str = "session.play_started";

/// Event type identifier for [`LetterGuessed`].
pub const LETTER_GUESSED_EVENT_TYPE: &str = "session.letter_guessed";

/// Event type identifier for [`WordGuessed`].
pub const WORD_GUESSED_EVENT_TYPE: &str = "session.word_guessed";

/// Event type identifier for [`WordResolved`].
pub const WORD_RESOLVED_EVENT_TYPE: &str = "session.word_resolved";

/// Event type identifier for [`OutcomeRecorded`].
pub const OUTCOME_RECORDED_EVENT_TYPE: &str = "session.outcome_recorded";

/// Event type identifier for [`TieWindowOpened`].
pub const TIE_WINDOW_OPENED_EVENT_TYPE: &str = "session.tie_window_opened";

/// Event type identifier for [`TurnPassed`].
pub const TURN_PASSED_EVENT_TYPE: &str = "session.turn_passed";

/// Event type identifier for [`SessionFinished`].
pub const SESSION_FINISHED_EVENT_TYPE: &str = "session.finished";

/// Event type identifier for [`ParticipantLeft`].
pub const PARTICIPANT_LEFT_EVENT_TYPE: &str = "session.participant_left";

/// Event payload variants for the Session context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEventKind {
    /// A connection took a seat.
    ParticipantJoined(ParticipantJoined),
    /// Secret words were accepted.
    WordsSubmitted(WordsSubmitted),
    /// Guessing began.
    PlayStarted(PlayStarted),
    /// A letter was guessed.
    LetterGuessed(LetterGuessed),
    /// A whole word was guessed.
    WordGuessed(WordGuessed),
    /// An active word left play.
    WordResolved(WordResolved),
    /// A final standing was decided.
    OutcomeRecorded(OutcomeRecorded),
    /// The bonus turn was granted.
    TieWindowOpened(TieWindowOpened),
    /// The turn pointer moved.
    TurnPassed(TurnPassed),
    /// The session finished.
    SessionFinished(SessionFinished),
    /// A participant left.
    ParticipantLeft(ParticipantLeft),
}

/// Domain event envelope for the Session context.
#[derive(Debug, Clone)]
pub struct SessionEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: SessionEventKind,
}

impl SessionEventKind {
    /// Event type identifier of this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ParticipantJoined(_) => PARTICIPANT_JOINED_EVENT_TYPE,
            Self::WordsSubmitted(_) => WORDS_SUBMITTED_EVENT_TYPE,
            Self::PlayStarted(_) => PLAY_STARTED_EVENT_TYPE,
            Self::LetterGuessed(_) => LETTER_GUESSED_EVENT_TYPE,
            Self::WordGuessed(_) => WORD_GUESSED_EVENT_TYPE,
            Self::WordResolved(_) => WORD_RESOLVED_EVENT_TYPE,
            Self::OutcomeRecorded(_) => OUTCOME_RECORDED_EVENT_TYPE,
            Self::TieWindowOpened(_) => TIE_WINDOW_OPENED_EVENT_TYPE,
            Self::TurnPassed(_) => TURN_PASSED_EVENT_TYPE,
            Self::SessionFinished(_) => SESSION_FINISHED_EVENT_TYPE,
            Self::ParticipantLeft(_) => PARTICIPANT_LEFT_EVENT_TYPE,
        }
    }
}

impl DomainEvent for SessionEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("SessionEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
