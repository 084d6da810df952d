use crate::dns::wire;
use async_trait::async_trait;
use blocky_application::ports::{dispatch_cancellable, BlockFilterEnginePort, Resolver, UpstreamDispatcher};
use blocky_domain::response::{Response, ResponseType};
use blocky_domain::upstream::Upstream;
use blocky_domain::{DomainError, Request};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Terminal stage of the chain (§4.1): dispatches to the client's group
/// upstream pool (first matched group with a non-empty pool, `default`
/// otherwise) and converts dispatch failures to SERVFAIL at the boundary
/// while preserving the error text in `reason` (§7).
pub struct UpstreamDispatchStage {
    groups_by_name: FxHashMap<String, Vec<Upstream>>,
    block_engine: Arc<dyn BlockFilterEnginePort>,
    dispatcher: Arc<dyn UpstreamDispatcher>,
    timeout: Duration,
}

impl UpstreamDispatchStage {
    pub fn new(
        groups_by_name: FxHashMap<String, Vec<Upstream>>,
        block_engine: Arc<dyn BlockFilterEnginePort>,
        dispatcher: Arc<dyn UpstreamDispatcher>,
        timeout: Duration,
    ) -> Self {
        Self { groups_by_name, block_engine, dispatcher, timeout }
    }
}

#[async_trait]
impl Resolver for UpstreamDispatchStage {
    async fn resolve(&self, request: Request) -> Result<Response, DomainError> {
        let groups = self.block_engine.resolve_groups(&request.client_names, request.client_ip);
        let upstreams = groups
            .iter()
            .filter_map(|group| self.groups_by_name.get(group))
            .find(|pool| !pool.is_empty())
            .cloned()
            .unwrap_or_default();

        let query = wire::build_query(&request)?;
        match dispatch_cancellable(self.dispatcher.as_ref(), &query, &upstreams, &request, self.timeout).await {
            Ok(message) => Ok(Response::with_reason_trail(message, ResponseType::Resolved, &request.reason, "RESOLVED")),
            Err(e) => {
                warn!(name = %request.name, error = %e, "upstream dispatch failed, returning SERVFAIL");
                let message = wire::servfail(&request)?;
                Ok(Response::with_reason_trail(message, ResponseType::Special, &request.reason, &format!("SERVFAIL ({e})")))
            }
        }
    }
}
