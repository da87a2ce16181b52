//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Every variant except `Infrastructure` rejects a single caller action and
/// leaves session state untouched.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The action is not valid in the session's current phase.
    #[error("phase violation: {0}")]
    PhaseViolation(String),

    /// The caller is not part of the session or may not join it.
    #[error("identity violation: {0}")]
    IdentityViolation(String),

    /// The caller acted out of turn.
    #[error("turn violation: {0}")]
    TurnViolation(String),

    /// Malformed letter, word, or word batch.
    #[error("invalid input: {0}")]
    InputValidation(String),

    /// The dictionary does not know the submitted word.
    #[error("word rejected: {0}")]
    WordRejected(String),

    /// A repository or synchronization failure.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Machine-readable code for this error kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::PhaseViolation(_) => "phase_violation",
            Self::IdentityViolation(_) => "identity_violation",
            Self::TurnViolation(_) => "turn_violation",
            Self::InputValidation(_) => "input_validation",
            Self::WordRejected(_) => "word_rejected",
            Self::Infrastructure(_) => "infrastructure_error",
        }
    }

    /// Returns `true` when the error rejects a caller action rather than
    /// signalling a fault in the host.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Infrastructure(_))
    }
}
