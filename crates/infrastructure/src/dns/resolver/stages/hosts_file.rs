use crate::dns::hosts::HostsMap;
use crate::dns::wire;
use async_trait::async_trait;
use blocky_application::ports::{Resolver, Stage};
use blocky_domain::response::{Response, ResponseType};
use blocky_domain::{DomainError, Request};

/// Serves answers from a parsed `/etc/hosts`-style file, distinct from the
/// custom-DNS static map (§4.9). Empty when no hosts file is configured.
pub struct HostsFileStage {
    inner: Stage,
    map: HostsMap,
}

impl HostsFileStage {
    pub fn new(inner: Stage, map: HostsMap) -> Self {
        Self { inner, map }
    }
}

#[async_trait]
impl Resolver for HostsFileStage {
    async fn resolve(&self, mut request: Request) -> Result<Response, DomainError> {
        if let Some(entry) = self.map.lookup_chain(&request.name, request.qtype) {
            request.annotate("hosts file");
            let message = wire::single_address_answer(&request, entry.ip, entry.ttl_secs)?;
            return Ok(Response::with_reason_trail(message, ResponseType::HostsFile, &request.reason, "HOSTSFILE"));
        }
        self.inner.resolve(request).await
    }
}
