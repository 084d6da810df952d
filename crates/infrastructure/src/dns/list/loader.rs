use async_trait::async_trait;
use blocky_application::ports::{Downloader, ListSourceLoader as ListSourceLoaderPort};
use blocky_domain::list_source::{ListSourceDescriptor, ListSourceKind};
use blocky_domain::DomainError;
use std::sync::Arc;

/// Resolves a list source descriptor to its raw text: `text` is served
/// inline, `file` is read from disk, `http(s)` is delegated to a
/// `Downloader` (§4.2).
pub struct FsHttpListSourceLoader {
    downloader: Arc<dyn Downloader>,
}

impl FsHttpListSourceLoader {
    pub fn new(downloader: Arc<dyn Downloader>) -> Self {
        Self { downloader }
    }
}

#[async_trait]
impl ListSourceLoaderPort for FsHttpListSourceLoader {
    async fn load(&self, source: &ListSourceDescriptor) -> Result<String, DomainError> {
        match source.kind {
            ListSourceKind::Text => Ok(source.from.clone()),
            ListSourceKind::File => tokio::fs::read_to_string(&source.from)
                .await
                .map_err(|e| DomainError::PermanentNetwork(format!("{}: {e}", source.from))),
            ListSourceKind::Http => self.downloader.fetch(&source.from).await,
        }
    }
}
