use async_trait::async_trait;
use blocky_application::ports::{Resolver, Stage};
use blocky_domain::query_log::QueryStats;
use blocky_domain::response::ResponseType;
use blocky_domain::{DomainError, Request, Response};
use std::sync::atomic::{AtomicU64, Ordering};

/// Plain atomic counters backing `QueryStats` (§4.9: "increment counters
/// ... never fails"). No histogram library is in the dependency stack, so
/// latency is tracked as a running sum/count rather than buckets.
#[derive(Default)]
pub struct MetricsRegistry {
    queries_total: AtomicU64,
    queries_blocked: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    duration_sum_micros: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> QueryStats {
        QueryStats {
            queries_total: self.queries_total.load(Ordering::Relaxed),
            queries_blocked: self.queries_blocked.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
        }
    }

    pub fn mean_duration_micros(&self) -> f64 {
        let total = self.queries_total.load(Ordering::Relaxed);
        if total == 0 {
            0.0
        } else {
            self.duration_sum_micros.load(Ordering::Relaxed) as f64 / total as f64
        }
    }
}

/// Records per-query counters around the rest of the chain (§4.1, §4.9).
pub struct MetricsStage {
    inner: Stage,
    registry: std::sync::Arc<MetricsRegistry>,
}

impl MetricsStage {
    pub fn new(inner: Stage, registry: std::sync::Arc<MetricsRegistry>) -> Self {
        Self { inner, registry }
    }
}

#[async_trait]
impl Resolver for MetricsStage {
    async fn resolve(&self, request: Request) -> Result<Response, DomainError> {
        let start = std::time::Instant::now();
        self.registry.queries_total.fetch_add(1, Ordering::Relaxed);

        let result = self.inner.resolve(request).await;
        self.registry.duration_sum_micros.fetch_add(start.elapsed().as_micros() as u64, Ordering::Relaxed);

        if let Ok(response) = &result {
            match response.response_type {
                ResponseType::Blocked => {
                    self.registry.queries_blocked.fetch_add(1, Ordering::Relaxed);
                }
                ResponseType::Cached => {
                    self.registry.cache_hits.fetch_add(1, Ordering::Relaxed);
                }
                _ => {}
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocky_domain::record::RecordType;
    use blocky_domain::request::ClientProtocol;
    use std::net::IpAddr;
    use std::sync::Arc;

    struct AlwaysBlocked;
    #[async_trait]
    impl Resolver for AlwaysBlocked {
        async fn resolve(&self, request: Request) -> Result<Response, DomainError> {
            let message = crate::dns::wire::nxdomain(&request)?;
            Ok(Response::new(message, ResponseType::Blocked, "BLOCKED"))
        }
    }

    #[tokio::test]
    async fn counts_blocked_queries() {
        let registry = Arc::new(MetricsRegistry::new());
        let stage = MetricsStage::new(Arc::new(AlwaysBlocked), Arc::clone(&registry));
        let request = Request::new("ads.example.com.", RecordType::A, IpAddr::from([127, 0, 0, 1]), ClientProtocol::Udp);
        stage.resolve(request).await.unwrap();
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.queries_total, 1);
        assert_eq!(snapshot.queries_blocked, 1);
    }
}
