use tokio::sync::broadcast;

use crate::model::StoreEvent;

const CHANNEL_CAPACITY: usize = 256;

/// Broadcast hub for store changes on one board.
pub struct NotifyHub {
    sender: broadcast::Sender<StoreEvent>,
}

impl Default for NotifyHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyHub {
    pub fn new() -> Self {
        Self {
            sender: broadcast::channel(CHANNEL_CAPACITY).0,
        }
    }

    /// Subscribe to every change applied after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// Send a notification. No-op if nobody is listening.
    pub fn send(&self, event: StoreEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
