//! Dictionary validator abstraction.

use async_trait::async_trait;
use thiserror::Error;

/// Answer of a dictionary lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordVerdict {
    /// The dictionary knows the word.
    Accepted,
    /// The dictionary does not know the word.
    Rejected,
}

/// The lookup itself could not be completed.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Network or transport failure talking to the dictionary.
    #[error("dictionary lookup failed: {0}")]
    Transport(String),
}

/// External capability deciding whether a normalized word is a real word.
///
/// Callers pass words that are already lower-cased, trimmed, and made of
/// `a-z` only.
#[async_trait]
pub trait WordValidator: Send + Sync {
    /// Looks `word` up in the dictionary.
    async fn lookup(&self, word: &str) -> Result<WordVerdict, LookupError>;
}
