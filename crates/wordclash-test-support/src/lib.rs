//! Shared test mocks and utilities for the Wordclash word-guessing engine.

mod broadcast;
mod clock;
mod repository;
mod rng;
mod validator;

pub use broadcast::RecordingBroadcaster;
pub use clock::FixedClock;
pub use repository::{FailingSessionRepository, RecordingSessionRepository};
pub use rng::{MockRng, SequenceRng};
pub use validator::StubValidator;
