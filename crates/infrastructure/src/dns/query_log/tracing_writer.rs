use async_trait::async_trait;
use blocky_application::ports::QueryLogWriter;
use blocky_domain::query_log::QueryLog;
use tracing::info;

/// Emits each completed query as a structured `tracing` event (§4.9, §10).
/// The default sink: a production deployment wanting durable query logs
/// plugs in its own `QueryLogWriter` against this interface instead.
pub struct TracingQueryLogWriter;

#[async_trait]
impl QueryLogWriter for TracingQueryLogWriter {
    async fn write(&self, entry: QueryLog) {
        info!(
            domain = %entry.domain,
            record_type = %entry.record_type,
            client_ip = %entry.client_ip,
            response_type = entry.response_type.as_str(),
            duration_us = entry.duration.as_micros() as u64,
            reason = %entry.reason,
            "query"
        );
    }
}
