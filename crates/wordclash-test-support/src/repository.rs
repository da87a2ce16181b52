//! Test repositories: mock `SessionRepository` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use wordclash_core::error::DomainError;
use wordclash_core::repository::SessionRepository;

/// A repository that keeps the live session in memory and counts saves.
#[derive(Debug)]
pub struct RecordingSessionRepository<S> {
    slot: Mutex<Option<S>>,
    saves: Mutex<usize>,
}

impl<S: Clone> RecordingSessionRepository<S> {
    /// Create a repository with no live session.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            slot: Mutex::new(None),
            saves: Mutex::new(0),
        }
    }

    /// Create a repository that already holds `session`.
    #[must_use]
    pub fn with_session(session: S) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
            saves: Mutex::new(0),
        }
    }

    /// Returns a copy of the live session.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn current(&self) -> Option<S> {
        self.slot.lock().unwrap().clone()
    }

    /// Number of `save` calls so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

#[async_trait]
impl<S> SessionRepository<S> for RecordingSessionRepository<S>
where
    S: Clone + Send + 'static,
{
    async fn load(&self) -> Result<Option<S>, DomainError> {
        Ok(self.slot.lock().unwrap().clone())
    }

    async fn save(&self, session: S) -> Result<(), DomainError> {
        *self.slot.lock().unwrap() = Some(session);
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }

    async fn clear(&self) -> Result<Option<S>, DomainError> {
        Ok(self.slot.lock().unwrap().take())
    }
}

/// A repository that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingSessionRepository;

#[async_trait]
impl<S> SessionRepository<S> for FailingSessionRepository
where
    S: Send + 'static,
{
    async fn load(&self) -> Result<Option<S>, DomainError> {
        Err(DomainError::Infrastructure("store unavailable".into()))
    }

    async fn save(&self, _session: S) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("store unavailable".into()))
    }

    async fn clear(&self) -> Result<Option<S>, DomainError> {
        Err(DomainError::Infrastructure("store unavailable".into()))
    }
}
