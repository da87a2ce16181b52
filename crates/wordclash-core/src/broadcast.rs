//! Outbound message abstraction.
//!
//! The session context hands every snapshot and notice to a `Broadcaster`;
//! delivery to participants is the transport's job.

use serde::Serialize;
use uuid::Uuid;

/// Who an outbound message is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "connection_id", rename_all = "snake_case")]
pub enum Recipient {
    /// Every participant of the session.
    Everyone,
    /// A single connection.
    Connection(Uuid),
}

/// A message leaving the core.
#[derive(Debug, Clone, Serialize)]
pub struct Outbound {
    /// Addressee.
    pub recipient: Recipient,
    /// Message type, e.g. `session-state` or `not-your-turn`.
    pub message_type: &'static str,
    /// JSON payload.
    pub payload: serde_json::Value,
}

impl Outbound {
    /// Builds a message for every participant.
    #[must_use]
    pub fn to_everyone(message_type: &'static str, payload: serde_json::Value) -> Self {
        Self {
            recipient: Recipient::Everyone,
            message_type,
            payload,
        }
    }

    /// Builds a message for one connection.
    #[must_use]
    pub fn to_connection(
        connection_id: Uuid,
        message_type: &'static str,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            recipient: Recipient::Connection(connection_id),
            message_type,
            payload,
        }
    }

    /// Returns `true` if `connection_id` should receive this message.
    #[must_use]
    pub fn is_visible_to(&self, connection_id: Option<Uuid>) -> bool {
        match self.recipient {
            Recipient::Everyone => true,
            Recipient::Connection(target) => connection_id == Some(target),
        }
    }
}

/// Sink for outbound messages. Sending never blocks.
pub trait Broadcaster: Send + Sync {
    /// Hands `message` to the transport.
    fn send(&self, message: Outbound);
}
