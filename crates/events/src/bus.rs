//! In-process activity bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`ActivityBus`] carries every dispatched [`NotificationEvent`] to live
//! dashboard streams. It is shared via `Arc<ActivityBus>`.

use studioflow_core::notification::NotificationEvent;
use tokio::sync::broadcast;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// Fan-out bus for notification events.
///
/// When the buffer is full the oldest unconsumed events are dropped and slow
/// receivers observe `RecvError::Lagged`. Nothing is persisted: the activity
/// feeds are projections over stored projects, the bus only makes them live.
pub struct ActivityBus {
    sender: broadcast::Sender<NotificationEvent>,
}

impl ActivityBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event, returning how many subscribers received it.
    ///
    /// With no subscribers the event is dropped and `0` is returned.
    pub fn publish(&self, event: NotificationEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ActivityBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
