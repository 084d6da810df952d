use async_trait::async_trait;
use blocky_domain::{DomainError, RecordType, Response};

/// Application-layer port for the TTL-aware response cache (§4.7).
///
/// `get` is a synchronous hot-path lookup against in-memory state; `resolve`
/// is the single-flight-protected path used on a miss — it takes a closure
/// that performs the actual upstream dispatch so the cache can collapse
/// concurrent misses on the same key without knowing about upstreams.
#[async_trait]
pub trait ResponseCachePort: Send + Sync {
    /// Returns a cloned, TTL-rewritten response if a live entry exists for
    /// `(qtype, name)`; `None` on miss or expiry.
    fn get(&self, name: &str, qtype: RecordType) -> Option<Response>;

    /// Inserts `response` for `(qtype, name)`, clamping its TTL per config
    /// and computing the absolute expiry used by `get`.
    fn insert(&self, name: &str, qtype: RecordType, response: Response);

    /// Discards all entries; functional behavior is unchanged modulo
    /// latency (§8 round-trip property).
    fn flush(&self);
}

/// Optional distributed cache backing the response cache can delegate to
/// (§6 persisted state / backing cache interface). The core only consumes
/// this simple key/value shape; any distributed implementation is external.
#[async_trait]
pub trait BackingCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<(Vec<u8>, u32)>, DomainError>;
    async fn set(&self, key: &str, bytes: Vec<u8>, ttl_secs: u32) -> Result<(), DomainError>;
    async fn flush_all(&self) -> Result<(), DomainError>;
}
