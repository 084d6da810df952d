use crate::dns::transport::{create_tcp_fallback, create_transport};
use crate::dns::wire;
use blocky_domain::upstream::Upstream;
use blocky_domain::DomainError;
use hickory_proto::op::Message;
use std::time::Duration;
use tracing::debug;

/// Sends one query to one upstream, retrying over TCP if the UDP answer
/// comes back truncated (§4.8).
pub async fn dispatch_one(upstream: &Upstream, query: &Message, timeout: Duration) -> Result<Message, DomainError> {
    let bytes = wire::encode(query)?;
    let transport = create_transport(upstream)?;

    let response = transport.send(&bytes, timeout).await?;
    if response.truncated {
        debug!(upstream = %upstream.display(), "UDP response truncated, retrying over TCP");
        let tcp = create_tcp_fallback(upstream)?;
        let retried = tcp.send(&bytes, timeout).await?;
        return wire::decode(&retried.bytes);
    }

    wire::decode(&response.bytes)
}
