use async_trait::async_trait;
use blocky_application::ports::{QueryLogWriter, Resolver, Stage};
use blocky_domain::query_log::QueryLog;
use blocky_domain::{DomainError, Request, Response};
use std::sync::Arc;
use std::time::Instant;

/// Fans `(request, response, duration)` to a `QueryLogWriter` after the
/// rest of the chain completes (§4.9). Never delays the return path beyond
/// what the writer's own bounded buffering does.
pub struct QueryLogStage {
    inner: Stage,
    writer: Arc<dyn QueryLogWriter>,
}

impl QueryLogStage {
    pub fn new(inner: Stage, writer: Arc<dyn QueryLogWriter>) -> Self {
        Self { inner, writer }
    }
}

#[async_trait]
impl Resolver for QueryLogStage {
    async fn resolve(&self, request: Request) -> Result<Response, DomainError> {
        let start = Instant::now();
        let domain = request.name.clone();
        let record_type = request.qtype;
        let client_ip = request.client_ip;

        let result = self.inner.resolve(request).await;
        let duration = start.elapsed();

        if let Ok(response) = &result {
            self.writer
                .write(QueryLog {
                    domain,
                    record_type,
                    client_ip,
                    response_type: response.response_type,
                    duration,
                    reason: response.reason.clone(),
                })
                .await;
        }
        result
    }
}
