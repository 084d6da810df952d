use blocky_application::ports::{Event, EventSink};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 1024;

/// Bounded pub/sub event bus (§5). `emit` never blocks: publishing uses a
/// `tokio::sync::broadcast` channel, so a subscriber that falls behind
/// misses the oldest buffered events (`Lagged`) instead of stalling the
/// publisher or applying backpressure.
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventBus {
    fn emit(&self, event: Event) {
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_emitted_event() {
        let bus = EventBus::new();
        let mut receiver = bus.subscribe();
        bus.emit(Event::CacheHit { name: "example.com".to_string() });
        match receiver.recv().await.unwrap() {
            Event::CacheHit { name } => assert_eq!(name, "example.com"),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn emit_without_subscribers_does_not_panic() {
        let bus = EventBus::new();
        bus.emit(Event::Prefetched { name: "example.com".to_string() });
    }
}
