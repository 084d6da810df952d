use async_trait::async_trait;
use blocky_domain::{DomainError, Request, Upstream};
use hickory_proto::op::Message;
use std::time::Duration;

/// Dispatches a built DNS query `Message` to a group's upstream pool using
/// the configured strategy (§4.8). The chain's upstream-dispatch stage is a
/// thin wrapper over this port plus cache/single-flight bookkeeping.
#[async_trait]
pub trait UpstreamDispatcher: Send + Sync {
    async fn dispatch(&self, query: &Message, upstreams: &[Upstream]) -> Result<Message, DomainError>;
}

/// Runs a dispatch bounded by both `per_attempt_timeout` and whatever of the
/// request's own deadline remains, and aborts it if the request is cancelled
/// externally (§5). Any stage that hands a query to an `UpstreamDispatcher`
/// should go through this rather than calling `dispatch` directly.
pub async fn dispatch_cancellable(
    dispatcher: &dyn UpstreamDispatcher,
    query: &Message,
    upstreams: &[Upstream],
    request: &Request,
    per_attempt_timeout: Duration,
) -> Result<Message, DomainError> {
    let budget = per_attempt_timeout.min(request.remaining());
    if budget.is_zero() {
        return Err(DomainError::Cancelled);
    }
    tokio::select! {
        _ = request.cancellation.cancelled() => Err(DomainError::Cancelled),
        res = tokio::time::timeout(budget, dispatcher.dispatch(query, upstreams)) => match res {
            Ok(inner) => inner,
            Err(_) => Err(DomainError::Cancelled),
        },
    }
}
