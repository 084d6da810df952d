use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Shape of a synthesized block response (§4.6). Config carries this as a
/// plain string (`"zeroIp"`, `"nxDomain"`, or a literal IP) and parses it
/// with `BlockType::parse` at validation time, mirroring how the config
/// file itself writes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockType {
    ZeroIp,
    NxDomain,
    FixedIp(String),
}

impl Default for BlockType {
    fn default() -> Self {
        BlockType::ZeroIp
    }
}

impl BlockType {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw {
            "zeroIp" | "zeroIP" => Ok(BlockType::ZeroIp),
            "nxDomain" => Ok(BlockType::NxDomain),
            ip if ip.parse::<std::net::IpAddr>().is_ok() => Ok(BlockType::FixedIp(ip.to_string())),
            other => Err(format!("invalid blockType: {other}")),
        }
    }
}

/// Ad/content-blocking configuration: block response shape, list refresh
/// cadence, and client→group membership rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlockingConfig {
    #[serde(default = "default_block_type")]
    pub block_type: String,

    #[serde(default = "default_block_ttl")]
    pub block_ttl_secs: u32,

    /// `refreshPeriod`: duration in seconds; `<= 0` disables periodic
    /// refresh.
    #[serde(default = "default_refresh_period")]
    pub refresh_period_secs: i64,

    #[serde(default = "default_max_errors_per_source")]
    pub max_errors_per_source: u32,

    #[serde(default)]
    pub start_strategy: StartStrategy,

    /// Map of client-matcher (name, glob, or CIDR) → group list.
    #[serde(default)]
    pub client_groups_block: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StartStrategy {
    Blocking,
    #[default]
    Fast,
    FailOnError,
}

impl Default for BlockingConfig {
    fn default() -> Self {
        Self {
            block_type: default_block_type(),
            block_ttl_secs: default_block_ttl(),
            refresh_period_secs: default_refresh_period(),
            max_errors_per_source: default_max_errors_per_source(),
            start_strategy: StartStrategy::default(),
            client_groups_block: HashMap::new(),
        }
    }
}

fn default_block_type() -> String {
    "zeroIp".to_string()
}

fn default_block_ttl() -> u32 {
    21_600
}

fn default_refresh_period() -> i64 {
    4 * 3600
}

fn default_max_errors_per_source() -> u32 {
    5
}
