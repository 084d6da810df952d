use thiserror::Error;

/// The error kinds a resolver stage, loader, or dispatcher can produce.
///
/// Propagation follows the boundary rules documented on the core: stages
/// recover locally when a default substitute exists, the upstream stage
/// converts network errors to SERVFAIL while preserving the reason text,
/// and `Config` errors abort startup while everything else does not.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("transient network error: {0}")]
    TransientNetwork(String),

    #[error("permanent network error: {0}")]
    PermanentNetwork(String),

    #[error("all upstreams exhausted for group '{group}': {last}")]
    UpstreamExhausted { group: String, last: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("cancelled")]
    Cancelled,

    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Whether this error admits retry under the downloader's policy.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::TransientNetwork(_))
    }

    pub fn is_permanent(&self) -> bool {
        matches!(self, DomainError::PermanentNetwork(_))
    }
}
