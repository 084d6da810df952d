use crate::dns::wire;
use async_trait::async_trait;
use blocky_application::ports::{dispatch_cancellable, Resolver, Stage, UpstreamDispatcher};
use blocky_domain::config::ConditionalZone;
use blocky_domain::response::{Response, ResponseType};
use blocky_domain::upstream::Upstream;
use blocky_domain::{DomainError, Request};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// When the query name ends in one of the configured zone suffixes,
/// delegates directly to that zone's upstream group instead of falling
/// through to custom-DNS/hosts-file/blocking/cache/default-upstream (§4.9).
/// A zone match is terminal: success or failure, it never falls through.
pub struct ConditionalStage {
    inner: Stage,
    zones: Vec<ConditionalZone>,
    upstreams_by_group: FxHashMap<String, Vec<Upstream>>,
    dispatcher: Arc<dyn UpstreamDispatcher>,
    timeout: Duration,
}

impl ConditionalStage {
    pub fn new(
        inner: Stage,
        zones: Vec<ConditionalZone>,
        upstreams_by_group: FxHashMap<String, Vec<Upstream>>,
        dispatcher: Arc<dyn UpstreamDispatcher>,
        timeout: Duration,
    ) -> Self {
        Self { inner, zones, upstreams_by_group, dispatcher, timeout }
    }

    fn matching_zone(&self, name: &str) -> Option<&ConditionalZone> {
        let trimmed = name.trim_end_matches('.');
        self.zones.iter().find(|zone| trimmed.ends_with(zone.suffix.trim_end_matches('.')))
    }
}

#[async_trait]
impl Resolver for ConditionalStage {
    async fn resolve(&self, mut request: Request) -> Result<Response, DomainError> {
        let Some(zone) = self.matching_zone(&request.name) else {
            return self.inner.resolve(request).await;
        };

        request.annotate(format!("conditional zone '{}'", zone.suffix));
        let upstreams = self.upstreams_by_group.get(&zone.group).cloned().unwrap_or_default();
        let query = wire::build_query(&request)?;

        match dispatch_cancellable(self.dispatcher.as_ref(), &query, &upstreams, &request, self.timeout).await {
            Ok(message) => Ok(Response::with_reason_trail(message, ResponseType::Conditional, &request.reason, "CONDITIONAL")),
            Err(e) => {
                warn!(zone = %zone.suffix, error = %e, "conditional upstream failed");
                let message = wire::servfail(&request)?;
                Ok(Response::with_reason_trail(message, ResponseType::Special, &request.reason, &format!("SERVFAIL ({e})")))
            }
        }
    }
}
