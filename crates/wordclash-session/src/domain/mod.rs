//! Domain model for the Session context.

pub mod aggregates;
pub mod commands;
pub mod events;
pub mod participant;
pub mod scoring;
pub mod settings;
pub mod termination;
pub mod words;
