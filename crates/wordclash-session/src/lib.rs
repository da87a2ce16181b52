//! Wordclash: Session bounded context.
//!
//! Responsible for the two-player session lifecycle: joining, word
//! submission, the turn engine, scoring, word rotation and the
//! termination rules of both game variants.

pub mod application;
pub mod domain;
