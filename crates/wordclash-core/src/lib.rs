//! Wordclash Core: shared domain abstractions.
//!
//! This crate defines the traits and types the session context and its
//! adapters depend on: time, randomness, commands, events, the single-slot
//! session repository, the dictionary validator and the outbound
//! broadcaster. It contains no infrastructure code.

pub mod aggregate;
pub mod broadcast;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod repository;
pub mod rng;
pub mod validator;
