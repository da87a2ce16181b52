//! Route modules.

pub mod events;
pub mod health;
pub mod session;
