//! Session repository abstraction.
//!
//! The engine runs at most one live session at a time, so the repository is
//! a single slot rather than a keyed store.

use async_trait::async_trait;

use crate::error::DomainError;

/// Repository holding zero or one live session of type `S`.
#[async_trait]
pub trait SessionRepository<S>: Send + Sync
where
    S: Send + 'static,
{
    /// Returns a copy of the live session, if any.
    async fn load(&self) -> Result<Option<S>, DomainError>;

    /// Stores `session` as the live session, replacing any previous one.
    async fn save(&self, session: S) -> Result<(), DomainError>;

    /// Removes the live session and returns it.
    async fn clear(&self) -> Result<Option<S>, DomainError>;
}
