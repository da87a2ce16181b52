//! In-memory implementation of the `SessionRepository` trait.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use wordclash_core::error::DomainError;
use wordclash_core::repository::SessionRepository;

/// Holds zero or one live session in process memory.
///
/// `load` hands out clones; a session only changes when `save` replaces it.
#[derive(Debug)]
pub struct InMemorySessionRepository<S> {
    slot: RwLock<Option<S>>,
}

impl<S> InMemorySessionRepository<S> {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }
}

impl<S> Default for InMemorySessionRepository<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<S> SessionRepository<S> for InMemorySessionRepository<S>
where
    S: Clone + Send + Sync + 'static,
{
    async fn load(&self) -> Result<Option<S>, DomainError> {
        Ok(self.slot.read().await.clone())
    }

    async fn save(&self, session: S) -> Result<(), DomainError> {
        let replaced = self.slot.write().await.replace(session).is_some();
        debug!(replaced, "session saved");
        Ok(())
    }

    async fn clear(&self) -> Result<Option<S>, DomainError> {
        let removed = self.slot.write().await.take();
        debug!(removed = removed.is_some(), "session cleared");
        Ok(removed)
    }
}
