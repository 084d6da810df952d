mod key;
mod prefetch;
mod response_cache;

pub use key::CacheKey;
pub use prefetch::PrefetchTracker;
pub use response_cache::ResponseCache;
