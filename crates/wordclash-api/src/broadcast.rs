//! `Broadcaster` backed by a `tokio` broadcast channel.
//!
//! Every subscriber sees every message; the event stream route filters by
//! connection before writing to the wire.

use tokio::sync::broadcast;
use tracing::debug;
use wordclash_core::broadcast::{Broadcaster, Outbound};

/// Default number of messages buffered per subscriber.
pub const DEFAULT_CAPACITY: usize = 256;

/// Fan-out of outbound messages to all open event streams.
#[derive(Debug, Clone)]
pub struct ChannelBroadcaster {
    sender: broadcast::Sender<Outbound>,
}

impl ChannelBroadcaster {
    /// Creates a broadcaster buffering up to `capacity` messages per
    /// subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Opens a new subscription.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Outbound> {
        self.sender.subscribe()
    }
}

impl Default for ChannelBroadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Broadcaster for ChannelBroadcaster {
    fn send(&self, message: Outbound) {
        let message_type = message.message_type;
        if self.sender.send(message).is_err() {
            debug!(message_type, "no open event streams");
        }
    }
}
