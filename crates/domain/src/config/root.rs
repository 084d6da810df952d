use super::blocking::BlockingConfig;
use super::cache::CacheConfig;
use super::downloader::DownloaderConfig;
use super::errors::ConfigError;
use super::local_records::LocalDnsRecord;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;
use crate::group::Group;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub blocking: BlockingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub downloader: DownloaderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub local_records: Vec<LocalDnsRecord>,
}

/// A handful of CLI flags that override file-sourced config post-load,
/// mirroring the way a thin composition-root binary layers overrides on a
/// parsed file without re-implementing its own config format.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub udp_bind: Option<String>,
    pub tcp_bind: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    pub fn load(path: &Path, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: Config = toml::from_str(&raw)?;
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(udp) = overrides.udp_bind {
            self.server.udp_bind = udp;
        }
        if let Some(tcp) = overrides.tcp_bind {
            self.server.tcp_bind = tcp;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Raises `ConfigError::Invalid` for impossible values; aborts the
    /// process at startup (§7) but is never consulted again afterward —
    /// refresh/runtime errors use `DomainError` instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.max_cache_ttl_secs != 0 && self.cache.min_cache_ttl_secs > self.cache.max_cache_ttl_secs {
            return Err(ConfigError::Invalid(format!(
                "minCacheTTL ({}) exceeds maxCacheTTL ({})",
                self.cache.min_cache_ttl_secs, self.cache.max_cache_ttl_secs
            )));
        }
        super::blocking::BlockType::parse(&self.blocking.block_type)
            .map_err(ConfigError::Invalid)?;
        for group in &self.groups {
            Group::validate_name(&group.name).map_err(ConfigError::Invalid)?;
        }
        Ok(())
    }
}
