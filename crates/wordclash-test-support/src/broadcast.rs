//! Test broadcaster: records outbound messages instead of delivering them.

use std::sync::Mutex;

use uuid::Uuid;
use wordclash_core::broadcast::{Broadcaster, Outbound, Recipient};

/// A broadcaster that keeps every message it is handed.
#[derive(Debug, Default)]
pub struct RecordingBroadcaster {
    sent: Mutex<Vec<Outbound>>,
}

impl RecordingBroadcaster {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages sent so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn messages(&self) -> Vec<Outbound> {
        self.sent.lock().unwrap().clone()
    }

    /// Message types sent so far, in order.
    pub fn message_types(&self) -> Vec<&'static str> {
        self.messages().iter().map(|m| m.message_type).collect()
    }

    /// Messages addressed privately to `connection_id`.
    pub fn sent_to(&self, connection_id: Uuid) -> Vec<Outbound> {
        self.messages()
            .into_iter()
            .filter(|m| m.recipient == Recipient::Connection(connection_id))
            .collect()
    }

    /// Forgets everything recorded so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

impl Broadcaster for RecordingBroadcaster {
    fn send(&self, message: Outbound) {
        self.sent.lock().unwrap().push(message);
    }
}
