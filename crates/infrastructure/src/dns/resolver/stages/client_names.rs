use crate::dns::wire;
use async_trait::async_trait;
use blocky_application::ports::{dispatch_cancellable, Resolver, Stage, UpstreamDispatcher};
use blocky_domain::record::RecordType;
use blocky_domain::upstream::Upstream;
use blocky_domain::{DomainError, Request};
use rustc_hash::FxHashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Resolves `request.client_names` when empty, by static mapping first and
/// a dedicated reverse-DNS upstream second (§4.9). Failures are tolerated:
/// the request proceeds with empty `client_names` rather than failing the
/// query.
pub struct ClientNamesStage {
    inner: Stage,
    static_mapping: FxHashMap<IpAddr, Vec<String>>,
    reverse_upstream: Option<(Arc<dyn UpstreamDispatcher>, Vec<Upstream>)>,
    timeout: Duration,
}

impl ClientNamesStage {
    pub fn new(
        inner: Stage,
        static_mapping: FxHashMap<IpAddr, Vec<String>>,
        reverse_upstream: Option<(Arc<dyn UpstreamDispatcher>, Vec<Upstream>)>,
        timeout: Duration,
    ) -> Self {
        Self { inner, static_mapping, reverse_upstream, timeout }
    }

    async fn reverse_resolve(&self, request: &Request) -> Vec<String> {
        let ip = request.client_ip;
        if let Some(names) = self.static_mapping.get(&ip) {
            return names.clone();
        }
        let Some((dispatcher, upstreams)) = &self.reverse_upstream else { return Vec::new() };
        let Some(ptr_name) = wire::ptr_query_name(ip) else { return Vec::new() };

        let mut query = hickory_proto::op::Message::new();
        query.set_message_type(hickory_proto::op::MessageType::Query);
        query.add_query(hickory_proto::op::Query::query(ptr_name, hickory_proto::rr::RecordType::PTR));

        match dispatch_cancellable(dispatcher.as_ref(), &query, upstreams, request, self.timeout).await {
            Ok(response) => response
                .answers()
                .iter()
                .filter_map(|record| match record.data() {
                    hickory_proto::rr::RData::PTR(name) => Some(name.0.to_string()),
                    _ => None,
                })
                .collect(),
            Err(e) => {
                debug!(%ip, error = %e, "reverse DNS lookup failed, leaving client_names empty");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl Resolver for ClientNamesStage {
    async fn resolve(&self, mut request: Request) -> Result<blocky_domain::Response, DomainError> {
        if request.client_names.is_empty() {
            request.client_names = self.reverse_resolve(&request).await;
        }
        self.inner.resolve(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocky_domain::request::ClientProtocol;
    use blocky_domain::response::{Response, ResponseType};

    struct Echo;
    #[async_trait]
    impl Resolver for Echo {
        async fn resolve(&self, request: Request) -> Result<Response, DomainError> {
            let message = wire::empty_answer(&request)?;
            let names = request.client_names.join(",");
            Ok(Response::new(message, ResponseType::Resolved, names))
        }
    }

    #[tokio::test]
    async fn static_mapping_resolves_without_upstream() {
        let mut mapping = FxHashMap::default();
        let ip: IpAddr = "192.168.1.5".parse().unwrap();
        mapping.insert(ip, vec!["nas".to_string()]);
        let stage = ClientNamesStage::new(Arc::new(Echo), mapping, None, Duration::from_millis(100));
        let request = Request::new("example.com.", RecordType::A, ip, ClientProtocol::Udp);
        let response = stage.resolve(request).await.unwrap();
        assert_eq!(response.reason, "nas");
    }

    #[tokio::test]
    async fn unknown_ip_without_upstream_leaves_names_empty() {
        let stage = ClientNamesStage::new(Arc::new(Echo), FxHashMap::default(), None, Duration::from_millis(100));
        let ip: IpAddr = "10.0.0.9".parse().unwrap();
        let request = Request::new("example.com.", RecordType::A, ip, ClientProtocol::Udp);
        let response = stage.resolve(request).await.unwrap();
        assert_eq!(response.reason, "");
    }
}
