//! Commands for the Session context.

use uuid::Uuid;
use wordclash_core::command::Command;

/// Command to take a seat, creating the session if none is live.
#[derive(Debug, Clone)]
pub struct JoinSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The joining connection.
    pub connection_id: Uuid,
    /// Identity to join as.
    pub player_name: String,
}

impl Command for JoinSession {
    fn command_type(&self) -> &'static str {
        "session.join"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn connection_id(&self) -> Uuid {
        self.connection_id
    }
}

/// Command to submit the caller's secret words.
#[derive(Debug, Clone)]
pub struct SubmitWords {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The submitting connection.
    pub connection_id: Uuid,
    /// Words as typed by the participant.
    pub words: Vec<String>,
}

impl Command for SubmitWords {
    fn command_type(&self) -> &'static str {
        "session.submit_words"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn connection_id(&self) -> Uuid {
        self.connection_id
    }
}

/// Command to guess one letter of the opponent's active word.
#[derive(Debug, Clone)]
pub struct GuessLetter {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The guessing connection.
    pub connection_id: Uuid,
    /// The letter as typed.
    pub letter: String,
}

impl Command for GuessLetter {
    fn command_type(&self) -> &'static str {
        "session.guess_letter"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn connection_id(&self) -> Uuid {
        self.connection_id
    }
}

/// Command to guess the opponent's whole active word.
#[derive(Debug, Clone)]
pub struct GuessWord {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The guessing connection.
    pub connection_id: Uuid,
    /// The word as typed.
    pub word: String,
}

impl Command for GuessWord {
    fn command_type(&self) -> &'static str {
        "session.guess_word"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn connection_id(&self) -> Uuid {
        self.connection_id
    }
}

/// Command to discard the live session.
#[derive(Debug, Clone)]
pub struct ResetSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The requesting connection.
    pub connection_id: Uuid,
}

impl Command for ResetSession {
    fn command_type(&self) -> &'static str {
        "session.reset"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn connection_id(&self) -> Uuid {
        self.connection_id
    }
}

/// Reported by the transport when a connection goes away.
#[derive(Debug, Clone)]
pub struct Disconnect {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The connection that went away.
    pub connection_id: Uuid,
}

impl Command for Disconnect {
    fn command_type(&self) -> &'static str {
        "session.disconnect"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn connection_id(&self) -> Uuid {
        self.connection_id
    }
}
