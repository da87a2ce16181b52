//! Wordclash Store: session persistence adapters.

pub mod memory_session_repository;
