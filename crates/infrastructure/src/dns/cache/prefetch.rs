use super::key::CacheKey;
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::time::{Duration, Instant};

struct Window {
    count: u64,
    window_start: Instant,
}

/// Per-key access counter over a rolling window (§4.7 prefetch state).
/// When a key's count crosses `prefetch_threshold` within
/// `prefetch_expires_secs`, it becomes prefetchable; the counter resets at
/// the start of each window.
pub struct PrefetchTracker {
    windows: DashMap<CacheKey, Window, FxBuildHasher>,
    window_len: Duration,
    threshold: u64,
    max_items: usize,
}

impl PrefetchTracker {
    pub fn new(window_len_secs: u64, threshold: u64, max_items: usize) -> Self {
        Self { windows: DashMap::with_hasher(FxBuildHasher), window_len: Duration::from_secs(window_len_secs), threshold, max_items }
    }

    /// Records one access for `key`, returning `true` the moment it crosses
    /// the prefetch threshold within the current window.
    pub fn record_access(&self, key: &CacheKey) -> bool {
        if self.windows.len() >= self.max_items && !self.windows.contains_key(key) {
            return false;
        }
        let now = Instant::now();
        let mut entry = self.windows.entry(key.clone()).or_insert_with(|| Window { count: 0, window_start: now });
        if now.duration_since(entry.window_start) > self.window_len {
            entry.count = 0;
            entry.window_start = now;
        }
        entry.count += 1;
        entry.count == self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocky_domain::record::RecordType;

    #[test]
    fn crosses_threshold_exactly_once() {
        let tracker = PrefetchTracker::new(60, 3, 100);
        let key = CacheKey::new("example.com", RecordType::A);
        assert!(!tracker.record_access(&key));
        assert!(!tracker.record_access(&key));
        assert!(tracker.record_access(&key));
        assert!(!tracker.record_access(&key));
    }

    #[test]
    fn max_items_bounds_tracked_keys() {
        let tracker = PrefetchTracker::new(60, 3, 1);
        let a = CacheKey::new("a.com", RecordType::A);
        let b = CacheKey::new("b.com", RecordType::A);
        tracker.record_access(&a);
        assert!(!tracker.record_access(&b));
    }
}
