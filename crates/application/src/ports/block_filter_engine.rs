use async_trait::async_trait;
use blocky_domain::DomainError;
use std::net::IpAddr;
use std::time::Duration;

/// The outcome of testing a domain against a group's allow/deny catalogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockMatch {
    Allowed,
    /// Blocked, naming the group whose deny-catalog matched (used to build
    /// the "BLOCKED (group)" reason string).
    Denied { group: String },
    NotMatched,
}

/// Application-layer port for the block-list matching engine (§4.5, §4.6).
///
/// `resolve_groups` and `check` are synchronous hot-path calls — catalogs
/// live in memory behind an atomic pointer swap. `reload` is async because
/// it fetches list sources over HTTP/file I/O.
#[async_trait]
pub trait BlockFilterEnginePort: Send + Sync {
    /// Groups applicable to a client: union of `clientGroupsBlock` matches
    /// (by name, glob, or CIDR) plus `default`.
    fn resolve_groups(&self, client_names: &[String], client_ip: IpAddr) -> Vec<String>;

    /// Test `domain` against the allow-catalog then the deny-catalog of
    /// each of `groups`, in order; allow wins over deny within the same
    /// group-scan pass (§4.6 steps 3-4).
    fn check(&self, domain: &str, groups: &[String]) -> BlockMatch;

    /// Recompile every group's catalogs from their configured sources and
    /// atomically swap them in. Failure semantics are per-group (§4.5):
    /// a transient or permanent error on one source leaves that group's
    /// previous catalog in place; other groups still refresh.
    async fn reload(&self) -> Result<(), DomainError>;

    /// Suppress blocking for `groups` (empty = all groups) for `duration`;
    /// `None` duration disables indefinitely until `enable()`.
    async fn disable(&self, duration: Option<Duration>, groups: Vec<String>);

    async fn enable(&self);

    fn status(&self) -> BlockingStatus;
}

#[derive(Debug, Clone)]
pub struct BlockingStatus {
    pub enabled: bool,
    pub disabled_groups: Vec<String>,
    pub auto_enable_in_secs: u64,
}
