use async_trait::async_trait;
use blocky_application::ports::{Downloader as DownloaderPort, Event, EventSink};
use blocky_domain::config::DownloaderConfig;
use blocky_domain::DomainError;
use std::sync::Arc;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::warn;

static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .user_agent(concat!("blocky/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("failed to build shared HTTP client")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Classification {
    /// 429/502/503/504: retried with backoff between attempts.
    Transient,
    /// Any other non-2xx: retried immediately, no backoff sleep.
    TransientNoBackoff,
    Permanent,
    Success,
}

fn classify(status: reqwest::StatusCode) -> Classification {
    if status.is_success() {
        return Classification::Success;
    }
    match status.as_u16() {
        404 | 410 => Classification::Permanent,
        429 | 502 | 503 | 504 => Classification::Transient,
        _ => Classification::TransientNoBackoff,
    }
}

/// HTTP GET with the §4.3 retry/backoff policy. Network timeouts and DNS
/// errors are treated as transient; 404/410 short-circuit as permanent.
pub struct HttpDownloader {
    config: DownloaderConfig,
    events: Arc<dyn EventSink>,
}

impl HttpDownloader {
    pub fn new(config: DownloaderConfig, events: Arc<dyn EventSink>) -> Self {
        Self { config, events }
    }

    fn backoff_for(&self, attempt: u32) -> Duration {
        let exp = self.config.cooldown_ms.saturating_mul(1u64 << attempt.min(16));
        Duration::from_millis(exp.min(self.config.max_backoff_ms))
    }
}

#[async_trait]
impl DownloaderPort for HttpDownloader {
    async fn fetch(&self, url: &str) -> Result<String, DomainError> {
        let timeout = Duration::from_millis(self.config.timeout_ms);
        let mut last_err: Option<DomainError> = None;

        for attempt in 0..self.config.attempts.max(1) {
            let outcome = SHARED_CLIENT.get(url).timeout(timeout).send().await;
            match outcome {
                Ok(resp) => match classify(resp.status()) {
                    Classification::Success => {
                        return resp
                            .text()
                            .await
                            .map_err(|e| DomainError::TransientNetwork(e.to_string()));
                    }
                    Classification::Permanent => {
                        self.events.emit(Event::DownloadFailed { url: url.to_string() });
                        return Err(DomainError::PermanentNetwork(format!(
                            "{url}: HTTP {}",
                            resp.status()
                        )));
                    }
                    Classification::Transient => {
                        warn!(url, status = %resp.status(), attempt, "list download attempt failed, retrying with backoff");
                        self.events.emit(Event::DownloadFailed { url: url.to_string() });
                        last_err = Some(DomainError::TransientNetwork(format!(
                            "{url}: HTTP {}",
                            resp.status()
                        )));
                        if attempt + 1 < self.config.attempts {
                            tokio::time::sleep(self.backoff_for(attempt)).await;
                        }
                        continue;
                    }
                    Classification::TransientNoBackoff => {
                        warn!(url, status = %resp.status(), attempt, "list download attempt failed, retrying immediately");
                        self.events.emit(Event::DownloadFailed { url: url.to_string() });
                        last_err = Some(DomainError::TransientNetwork(format!(
                            "{url}: HTTP {}",
                            resp.status()
                        )));
                        continue;
                    }
                },
                Err(e) => {
                    warn!(url, error = %e, attempt, "list download attempt errored, retrying");
                    self.events.emit(Event::DownloadFailed { url: url.to_string() });
                    last_err = Some(DomainError::TransientNetwork(e.to_string()));
                }
            }
            if attempt + 1 < self.config.attempts {
                tokio::time::sleep(self.backoff_for(attempt)).await;
            }
        }

        Err(last_err.unwrap_or_else(|| DomainError::TransientNetwork(format!("{url}: exhausted retries"))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_status_codes() {
        assert_eq!(classify(reqwest::StatusCode::OK), Classification::Success);
        assert_eq!(classify(reqwest::StatusCode::NOT_FOUND), Classification::Permanent);
        assert_eq!(classify(reqwest::StatusCode::GONE), Classification::Permanent);
        assert_eq!(classify(reqwest::StatusCode::TOO_MANY_REQUESTS), Classification::Transient);
        assert_eq!(classify(reqwest::StatusCode::BAD_GATEWAY), Classification::Transient);
        assert_eq!(classify(reqwest::StatusCode::INTERNAL_SERVER_ERROR), Classification::TransientNoBackoff);
        assert_eq!(classify(reqwest::StatusCode::BAD_REQUEST), Classification::TransientNoBackoff);
    }

    #[test]
    fn backoff_grows_and_clamps() {
        let config = DownloaderConfig { cooldown_ms: 100, max_backoff_ms: 1000, ..Default::default() };
        let events: Arc<dyn EventSink> = Arc::new(NullSink);
        let dl = HttpDownloader::new(config, events);
        assert_eq!(dl.backoff_for(0), Duration::from_millis(100));
        assert_eq!(dl.backoff_for(3), Duration::from_millis(800));
        assert_eq!(dl.backoff_for(10), Duration::from_millis(1000));
    }

    struct NullSink;
    impl EventSink for NullSink {
        fn emit(&self, _event: Event) {}
    }
}
