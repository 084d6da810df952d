use crate::dns::wire;
use async_trait::async_trait;
use blocky_application::ports::{BlockFilterEnginePort, BlockMatch, Resolver, Stage};
use blocky_domain::config::BlockType;
use blocky_domain::response::{Response, ResponseType};
use blocky_domain::{DomainError, Request};
use std::net::IpAddr;
use std::sync::Arc;

/// Tests the client's applicable groups against allow/deny catalogs and
/// synthesizes a block response on a deny hit (§4.6). Allowed or unmatched
/// queries fall through to the rest of the chain.
pub struct BlockingStage {
    inner: Stage,
    engine: Arc<dyn BlockFilterEnginePort>,
    block_type: BlockType,
    block_ttl_secs: u32,
}

impl BlockingStage {
    pub fn new(inner: Stage, engine: Arc<dyn BlockFilterEnginePort>, block_type: BlockType, block_ttl_secs: u32) -> Self {
        Self { inner, engine, block_type, block_ttl_secs }
    }

    fn synthesize(&self, request: &Request) -> Result<hickory_proto::op::Message, DomainError> {
        match &self.block_type {
            BlockType::ZeroIp => wire::zero_ip_answer(request, self.block_ttl_secs),
            BlockType::NxDomain => wire::nxdomain(request),
            BlockType::FixedIp(ip) => {
                let addr: IpAddr = ip.parse().map_err(|e| DomainError::Config(format!("invalid fixed block IP '{ip}': {e}")))?;
                wire::single_address_answer(request, addr, self.block_ttl_secs)
            }
        }
    }
}

#[async_trait]
impl Resolver for BlockingStage {
    async fn resolve(&self, request: Request) -> Result<Response, DomainError> {
        let groups = self.engine.resolve_groups(&request.client_names, request.client_ip);
        match self.engine.check(&request.name, &groups) {
            BlockMatch::Denied { group } => {
                let terminal = format!("BLOCKED ({group})");
                let message = self.synthesize(&request)?;
                Ok(Response::with_reason_trail(message, ResponseType::Blocked, &request.reason, &terminal))
            }
            BlockMatch::Allowed | BlockMatch::NotMatched => self.inner.resolve(request).await,
        }
    }
}
