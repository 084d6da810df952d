use serde::{Deserialize, Serialize};

/// `downloader.{timeout, attempts, cooldown, maxBackoff}` — §4.3 fetch tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloaderConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_attempts")]
    pub attempts: u32,

    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,

    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            attempts: default_attempts(),
            cooldown_ms: default_cooldown_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_attempts() -> u32 {
    3
}

fn default_cooldown_ms() -> u64 {
    500
}

fn default_max_backoff_ms() -> u64 {
    60_000
}
