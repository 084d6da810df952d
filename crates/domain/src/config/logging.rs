use serde::{Deserialize, Serialize};

/// Logging configuration (out-of-scope setup per §1; the schema lives here
/// because `blocky-cli` reads it, but parsing/printing the banner is not).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// "trace" | "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
