use serde::{Deserialize, Serialize};

/// Response cache clamps, eviction, and prefetch knobs (§4.7, §6).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    #[serde(default = "default_min_cache_ttl")]
    pub min_cache_ttl_secs: u32,

    #[serde(default = "default_max_cache_ttl")]
    pub max_cache_ttl_secs: u32,

    /// `cacheTimeNegative`: TTL floor for NXDOMAIN/empty answers. Always the
    /// floor used as-is; never inferred from a response's SOA minimum (§9
    /// open question).
    #[serde(default = "default_cache_time_negative")]
    pub cache_time_negative_secs: u32,

    #[serde(default)]
    pub prefetch: PrefetchConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            min_cache_ttl_secs: default_min_cache_ttl(),
            max_cache_ttl_secs: default_max_cache_ttl(),
            cache_time_negative_secs: default_cache_time_negative(),
            prefetch: PrefetchConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PrefetchConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Rolling window over which accesses are counted.
    #[serde(default = "default_prefetch_expires_secs")]
    pub prefetch_expires_secs: u64,

    #[serde(default = "default_prefetch_threshold")]
    pub prefetch_threshold: u64,

    #[serde(default = "default_prefetch_max_items")]
    pub prefetch_max_items_count: usize,
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            prefetch_expires_secs: default_prefetch_expires_secs(),
            prefetch_threshold: default_prefetch_threshold(),
            prefetch_max_items_count: default_prefetch_max_items(),
        }
    }
}

fn default_max_entries() -> usize {
    200_000
}

fn default_min_cache_ttl() -> u32 {
    0
}

fn default_max_cache_ttl() -> u32 {
    0 // 0 means "no clamp"
}

fn default_cache_time_negative() -> u32 {
    30
}

fn default_prefetch_expires_secs() -> u64 {
    120
}

fn default_prefetch_threshold() -> u64 {
    5
}

fn default_prefetch_max_items() -> usize {
    1_000
}
