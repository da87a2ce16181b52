//! Test validators: scripted `WordValidator` implementations for tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use wordclash_core::validator::{LookupError, WordValidator, WordVerdict};

/// A validator that rejects a fixed set of words, or fails every lookup
/// when built with [`StubValidator::unreachable`]. Records every lookup.
#[derive(Debug)]
pub struct StubValidator {
    rejected: HashSet<String>,
    unreachable: bool,
    lookups: Mutex<Vec<String>>,
}

impl StubValidator {
    /// Accepts every word.
    #[must_use]
    pub fn accepting() -> Self {
        Self::rejecting(&[])
    }

    /// Rejects exactly the given words.
    #[must_use]
    pub fn rejecting(words: &[&str]) -> Self {
        Self {
            rejected: words.iter().map(|w| (*w).to_owned()).collect(),
            unreachable: false,
            lookups: Mutex::new(Vec::new()),
        }
    }

    /// Fails every lookup with a transport error.
    #[must_use]
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::accepting()
        }
    }

    /// Words looked up so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl WordValidator for StubValidator {
    async fn lookup(&self, word: &str) -> Result<WordVerdict, LookupError> {
        self.lookups.lock().unwrap().push(word.to_owned());
        if self.unreachable {
            return Err(LookupError::Transport("connection refused".into()));
        }
        if self.rejected.contains(word) {
            Ok(WordVerdict::Rejected)
        } else {
            Ok(WordVerdict::Accepted)
        }
    }
}
