use super::key::CacheKey;
use blocky_application::ports::ResponseCachePort;
use blocky_domain::config::CacheConfig;
use blocky_domain::record::RecordType;
use blocky_domain::response::{Response, ResponseType};
use hickory_proto::op::ResponseCode;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

const SHARD_COUNT: usize = 16;

struct Entry {
    response: Response,
    expires_at: Instant,
    ttl_secs: u32,
}

/// TTL-aware LRU response cache (§4.7). Sharded to bound lock contention —
/// each shard owns its own `LruCache`, keyed by `hash(key) % SHARD_COUNT`
/// so at most one writer touches a given key's shard at a time (§5).
pub struct ResponseCache {
    shards: Vec<Mutex<LruCache<CacheKey, Entry>>>,
    config: CacheConfig,
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        let per_shard = (config.max_entries / SHARD_COUNT).max(1);
        let cap = NonZeroUsize::new(per_shard).unwrap();
        let shards = (0..SHARD_COUNT).map(|_| Mutex::new(LruCache::new(cap))).collect();
        Self { shards, config }
    }

    fn shard_for(&self, key: &CacheKey) -> &Mutex<LruCache<CacheKey, Entry>> {
        use std::hash::{Hash, Hasher};
        let mut hasher = rustc_hash::FxHasher::default();
        key.hash(&mut hasher);
        &self.shards[(hasher.finish() as usize) % SHARD_COUNT]
    }

    fn is_negative(message: &hickory_proto::op::Message) -> bool {
        message.response_code() == ResponseCode::NXDomain || message.answer_count() == 0
    }

    fn clamp_ttl(&self, min_answer_ttl: u32) -> u32 {
        let clamped = min_answer_ttl.max(self.config.min_cache_ttl_secs);
        if self.config.max_cache_ttl_secs > 0 {
            clamped.min(self.config.max_cache_ttl_secs)
        } else {
            clamped
        }
    }
}

impl ResponseCachePort for ResponseCache {
    fn get(&self, name: &str, qtype: RecordType) -> Option<Response> {
        let key = CacheKey::new(name, qtype);
        let shard = self.shard_for(&key);
        let mut guard = shard.lock().unwrap();
        let Some(entry) = guard.get(&key) else { return None };

        let now = Instant::now();
        if now >= entry.expires_at {
            guard.pop(&key);
            return None;
        }

        let remaining = (entry.expires_at - now).as_secs().min(u32::MAX as u64) as u32;
        let mut message = entry.response.message.clone();
        for answer in message.answers_mut() {
            answer.set_ttl(remaining);
        }
        debug!(name, qtype = %qtype, remaining_ttl = remaining, "response cache hit");
        Some(Response::new(message, ResponseType::Cached, format!("CACHED (ttl {remaining}s)")))
    }

    fn insert(&self, name: &str, qtype: RecordType, response: Response) {
        if !qtype.is_cacheable() {
            return;
        }
        let key = CacheKey::new(name, qtype);
        let negative = Self::is_negative(&response.message);
        let ttl = if negative {
            self.config.cache_time_negative_secs
        } else {
            let min_answer_ttl = response.message.answers().iter().map(|r| r.ttl()).min().unwrap_or(0);
            self.clamp_ttl(min_answer_ttl)
        };

        let shard = self.shard_for(&key);
        let mut guard = shard.lock().unwrap();
        guard.put(key, Entry { response, expires_at: Instant::now() + Duration::from_secs(ttl as u64), ttl_secs: ttl });
    }

    fn flush(&self) {
        for shard in &self.shards {
            shard.lock().unwrap().clear();
        }
    }
}

impl ResponseCache {
    /// Opportunistic sweep discarding expired entries, independent of LRU
    /// pressure (§4.7). Called by the cache-maintenance job.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        for shard in &self.shards {
            let mut guard = shard.lock().unwrap();
            let expired: Vec<CacheKey> = guard.iter().filter(|(_, e)| now >= e.expires_at).map(|(k, _)| k.clone()).collect();
            for key in expired {
                guard.pop(&key);
                removed += 1;
            }
        }
        removed
    }

    /// Seconds remaining before `(name, qtype)` expires, without disturbing
    /// LRU order; `None` if absent or already expired. Used by the
    /// response-cache stage to gate prefetch on the configured window.
    pub fn remaining_secs(&self, name: &str, qtype: RecordType) -> Option<u32> {
        let key = CacheKey::new(name, qtype);
        let shard = self.shard_for(&key);
        let guard = shard.lock().unwrap();
        let entry = guard.peek(&key)?;
        let now = Instant::now();
        if now >= entry.expires_at {
            return None;
        }
        Some((entry.expires_at - now).as_secs() as u32)
    }

    /// Entries close enough to expiry to be prefetch candidates: `ttl_secs`
    /// remaining is within `within_secs` of the original insert TTL window.
    pub fn near_expiry_keys(&self, within_secs: u32) -> Vec<(CacheKey, u32)> {
        let now = Instant::now();
        let mut out = Vec::new();
        for shard in &self.shards {
            let guard = shard.lock().unwrap();
            for (key, entry) in guard.iter() {
                if entry.expires_at > now {
                    let remaining = (entry.expires_at - now).as_secs() as u32;
                    if remaining <= within_secs {
                        out.push((key.clone(), entry.ttl_secs));
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::op::{Message, MessageType};
    use hickory_proto::rr::{Name, RData, Record};
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    fn answer_message(ttl: u32, rcode: ResponseCode) -> Message {
        let mut m = Message::new();
        m.set_message_type(MessageType::Response);
        m.set_response_code(rcode);
        if rcode == ResponseCode::NoError {
            let name = Name::from_str("example.com.").unwrap();
            let record = Record::from_rdata(name, ttl, RData::A(Ipv4Addr::new(1, 2, 3, 4).into()));
            m.add_answer(record);
        }
        m
    }

    fn cache() -> ResponseCache {
        ResponseCache::new(CacheConfig { max_entries: 1000, min_cache_ttl_secs: 0, max_cache_ttl_secs: 0, cache_time_negative_secs: 30, ..Default::default() })
    }

    #[test]
    fn miss_then_hit_after_insert() {
        let cache = cache();
        assert!(cache.get("example.com", RecordType::A).is_none());
        let response = Response::new(answer_message(300, ResponseCode::NoError), ResponseType::Resolved, "RESOLVED".to_string());
        cache.insert("example.com", RecordType::A, response);
        let hit = cache.get("example.com", RecordType::A).unwrap();
        assert_eq!(hit.response_type, ResponseType::Cached);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let cache = cache();
        let response = Response::new(answer_message(300, ResponseCode::NoError), ResponseType::Resolved, "RESOLVED".to_string());
        cache.insert("Example.COM", RecordType::A, response);
        assert!(cache.get("example.com", RecordType::A).is_some());
    }

    #[test]
    fn negative_response_uses_floor_ttl() {
        let cache = cache();
        let response = Response::new(answer_message(0, ResponseCode::NXDomain), ResponseType::NotFound, "NOTFOUND".to_string());
        cache.insert("nope.example.com", RecordType::A, response);
        assert!(cache.get("nope.example.com", RecordType::A).is_some());
    }

    #[test]
    fn flush_clears_all_shards() {
        let cache = cache();
        let response = Response::new(answer_message(300, ResponseCode::NoError), ResponseType::Resolved, "RESOLVED".to_string());
        cache.insert("example.com", RecordType::A, response);
        cache.flush();
        assert!(cache.get("example.com", RecordType::A).is_none());
    }
}
