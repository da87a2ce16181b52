//! Shared application state.

use std::sync::{Arc, Mutex};

use wordclash_core::clock::Clock;
use wordclash_core::repository::SessionRepository;
use wordclash_core::rng::DeterministicRng;
use wordclash_core::validator::WordValidator;
use wordclash_session::domain::aggregates::Session;
use wordclash_session::domain::settings::SessionSettings;

use crate::broadcast::ChannelBroadcaster;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Rules every new session is created with.
    pub settings: Arc<SessionSettings>,
    /// Clock for narration and event timestamps.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// RNG for active-word draws.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Zero-or-one live session.
    pub session_repository: Arc<dyn SessionRepository<Session>>,
    /// Dictionary used during setup.
    pub validator: Arc<dyn WordValidator>,
    /// Outbound fan-out to event streams.
    pub broadcaster: ChannelBroadcaster,
    /// Serializes commands so each load-mutate-save runs alone.
    pub command_gate: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        settings: SessionSettings,
        clock: Arc<dyn Clock + Send + Sync>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        session_repository: Arc<dyn SessionRepository<Session>>,
        validator: Arc<dyn WordValidator>,
        broadcaster: ChannelBroadcaster,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            clock,
            rng,
            session_repository,
            validator,
            broadcaster,
            command_gate: Arc::new(tokio::sync::Mutex::new(())),
        }
    }
}
