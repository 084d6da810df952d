use async_trait::async_trait;
use blocky_domain::{DomainError, ListSourceDescriptor};

/// Produces a reader for a list source descriptor (§4.2). `text`/`file` are
/// served locally; `http(s)` goes through a `Downloader`.
#[async_trait]
pub trait ListSourceLoader: Send + Sync {
    async fn load(&self, source: &ListSourceDescriptor) -> Result<String, DomainError>;
}

/// HTTP GET with the §4.3 retry/backoff policy. A separate port from
/// `ListSourceLoader` so it can be unit-tested against canned HTTP
/// responses without touching the filesystem branch.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, DomainError>;
}
