use blocky_infrastructure::dns::cache::ResponseCache;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Periodically sweeps expired entries from the response cache (§4.7).
/// Eviction also happens lazily on lookup/insert; this job just reclaims
/// memory held by entries nobody has looked up since they expired.
pub struct CacheMaintenanceJob {
    cache: Arc<ResponseCache>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl CacheMaintenanceJob {
    pub fn new(cache: Arc<ResponseCache>) -> Self {
        Self { cache, interval_secs: 300, shutdown: CancellationToken::new() }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(interval_secs = self.interval_secs, "Starting cache maintenance job");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("CacheMaintenanceJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let removed = self.cache.sweep_expired();
                        info!(removed, "CacheMaintenanceJob: sweep completed");
                    }
                }
            }
        });
    }
}
