use crate::dns::hosts::HostsMap;
use crate::dns::wire;
use async_trait::async_trait;
use blocky_application::ports::{Resolver, Stage};
use blocky_domain::response::{Response, ResponseType};
use blocky_domain::{DomainError, Request};

/// Serves answers from the configured `local_records` static map, with the
/// same subdomain walk as domain catalogs (§4.4, §4.9).
pub struct CustomDnsStage {
    inner: Stage,
    map: HostsMap,
}

impl CustomDnsStage {
    pub fn new(inner: Stage, map: HostsMap) -> Self {
        Self { inner, map }
    }
}

#[async_trait]
impl Resolver for CustomDnsStage {
    async fn resolve(&self, mut request: Request) -> Result<Response, DomainError> {
        if let Some(entry) = self.map.lookup_chain(&request.name, request.qtype) {
            request.annotate("custom DNS");
            let message = wire::single_address_answer(&request, entry.ip, entry.ttl_secs)?;
            return Ok(Response::with_reason_trail(message, ResponseType::CustomDns, &request.reason, "CUSTOMDNS"));
        }
        self.inner.resolve(request).await
    }
}
