/// Named events the core emits; wiring subscribers (metrics registry,
/// management API) is external (§1). Publishers never block on subscribers
/// and overflow policy is drop-oldest (§5) — see
/// `blocky_infrastructure::events::EventBus` for the concrete bounded
/// implementation.
#[derive(Debug, Clone)]
pub enum Event {
    GroupChanged { list_type: &'static str, group: String, entry_count: usize },
    DownloadFailed { url: String },
    CacheHit { name: String },
    CacheMiss { name: String },
    Prefetched { name: String },
}

/// Non-blocking publish side of the event bus. `emit` must never await or
/// fail: a full subscriber queue drops the oldest entry rather than
/// applying backpressure to the caller.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}
