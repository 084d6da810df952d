use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use blocky_domain::DomainError;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .use_rustls_tls()
        .pool_max_idle_per_host(4)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});

/// DNS-over-HTTPS upstream dispatch, POST `application/dns-message` per
/// RFC 8484 §4.1.
pub struct HttpsTransport {
    url: String,
}

impl HttpsTransport {
    pub fn new(url: String) -> Self {
        Self { url }
    }
}

#[async_trait]
impl DnsTransport for HttpsTransport {
    async fn send(&self, message_bytes: &[u8], timeout: Duration) -> Result<TransportResponse, DomainError> {
        debug!(url = %self.url, len = message_bytes.len(), "sending DoH query");

        let response = tokio::time::timeout(
            timeout,
            SHARED_CLIENT
                .post(&self.url)
                .header("Content-Type", DNS_MESSAGE_CONTENT_TYPE)
                .header("Accept", DNS_MESSAGE_CONTENT_TYPE)
                .body(message_bytes.to_vec())
                .send(),
        )
        .await
        .map_err(|_| DomainError::TransientNetwork(format!("timeout sending DoH query to {}", self.url)))?
        .map_err(|e| DomainError::TransientNetwork(format!("DoH request to {} failed: {e}", self.url)))?;

        let status = response.status();
        if status.as_u16() == 404 || status.as_u16() == 410 {
            return Err(DomainError::PermanentNetwork(format!("DoH server {} returned HTTP {status}", self.url)));
        }
        if !status.is_success() {
            return Err(DomainError::TransientNetwork(format!("DoH server {} returned HTTP {status}", self.url)));
        }

        let bytes = tokio::time::timeout(timeout, response.bytes())
            .await
            .map_err(|_| DomainError::TransientNetwork(format!("timeout reading DoH response from {}", self.url)))?
            .map_err(|e| DomainError::TransientNetwork(format!("failed to read DoH response from {}: {e}", self.url)))?;

        Ok(TransportResponse { bytes: bytes.to_vec(), truncated: false })
    }
}
