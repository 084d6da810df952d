use crate::dns::wire;
use async_trait::async_trait;
use blocky_application::ports::{Resolver, Stage};
use blocky_domain::record::RecordType;
use blocky_domain::response::{Response, ResponseType};
use blocky_domain::{DomainError, Request};

/// First stage of the chain (§4.1, §4.9): when IPv6 is disabled, answer
/// every AAAA query with NOERROR/empty instead of forwarding it.
pub struct Ipv6FilterStage {
    inner: Stage,
    disabled: bool,
}

impl Ipv6FilterStage {
    pub fn new(inner: Stage, disabled: bool) -> Self {
        Self { inner, disabled }
    }
}

#[async_trait]
impl Resolver for Ipv6FilterStage {
    async fn resolve(&self, mut request: Request) -> Result<Response, DomainError> {
        if self.disabled && request.qtype == RecordType::AAAA {
            request.annotate("ipv6 disabled");
            let message = wire::empty_answer(&request)?;
            return Ok(Response::with_reason_trail(message, ResponseType::Special, &request.reason, "SPECIAL (ipv6 disabled)"));
        }
        self.inner.resolve(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocky_domain::request::ClientProtocol;
    use std::net::IpAddr;
    use std::sync::Arc;

    struct Passthrough;
    #[async_trait]
    impl Resolver for Passthrough {
        async fn resolve(&self, request: Request) -> Result<Response, DomainError> {
            let message = wire::empty_answer(&request)?;
            Ok(Response::new(message, ResponseType::Resolved, "RESOLVED"))
        }
    }

    #[tokio::test]
    async fn disabled_ipv6_short_circuits_aaaa() {
        let stage = Ipv6FilterStage::new(Arc::new(Passthrough), true);
        let request = Request::new("example.com.", RecordType::AAAA, IpAddr::from([127, 0, 0, 1]), ClientProtocol::Udp);
        let response = stage.resolve(request).await.unwrap();
        assert_eq!(response.response_type, ResponseType::Special);
    }

    #[tokio::test]
    async fn a_queries_pass_through_even_when_disabled() {
        let stage = Ipv6FilterStage::new(Arc::new(Passthrough), true);
        let request = Request::new("example.com.", RecordType::A, IpAddr::from([127, 0, 0, 1]), ClientProtocol::Udp);
        let response = stage.resolve(request).await.unwrap();
        assert_eq!(response.response_type, ResponseType::Resolved);
    }
}
