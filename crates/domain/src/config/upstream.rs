use serde::{Deserialize, Serialize};

/// `upstream.strategy`: selection policy across a group's upstreams (§4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UpstreamStrategy {
    ParallelBest,
    Strict,
    Random,
}

impl Default for UpstreamStrategy {
    fn default() -> Self {
        UpstreamStrategy::ParallelBest
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default)]
    pub strategy: UpstreamStrategy,

    #[serde(default = "default_upstream_timeout_ms")]
    pub upstream_timeout_ms: u64,

    /// Domain suffixes routed to a dedicated upstream group instead of the
    /// default (the conditional-upstream stage, §4.9).
    #[serde(default)]
    pub conditional_zones: Vec<ConditionalZone>,

    /// Optional upstream used to resolve the hostnames of other upstreams
    /// at startup.
    #[serde(default)]
    pub bootstrap_dns: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConditionalZone {
    pub suffix: String,
    pub group: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            strategy: UpstreamStrategy::default(),
            upstream_timeout_ms: default_upstream_timeout_ms(),
            conditional_zones: Vec::new(),
            bootstrap_dns: None,
        }
    }
}

fn default_upstream_timeout_ms() -> u64 {
    2_000
}
