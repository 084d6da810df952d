use crate::dns::cache::{CacheKey, PrefetchTracker, ResponseCache};
use async_trait::async_trait;
use blocky_application::ports::{Event, EventSink, Resolver, Stage};
use blocky_domain::config::PrefetchConfig;
use blocky_domain::response::Response;
use blocky_domain::{DomainError, Request};
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Terminal-adjacent stage wrapping the upstream-dispatch chain tail with
/// TTL-aware caching, single-flight miss coordination, and access-based
/// prefetch (§4.7, §5 single-flight invariant).
///
/// Concurrent misses on the same key share one `OnceCell`: the first caller
/// runs `inner.resolve` and populates the cache; later callers await the
/// same cell rather than dispatching their own upstream query. If the
/// initializing call errors, tokio retries with a new leader rather than
/// broadcasting the same error to every waiter — acceptable since the
/// single-flight invariant (§8 #4) is about successful collapses, not
/// shared failure delivery.
pub struct ResponseCacheStage {
    inner: Stage,
    cache: Arc<ResponseCache>,
    inflight: DashMap<CacheKey, Arc<OnceCell<Response>>, FxBuildHasher>,
    prefetch: PrefetchTracker,
    prefetch_config: PrefetchConfig,
    events: Arc<dyn EventSink>,
}

impl ResponseCacheStage {
    pub fn new(inner: Stage, cache: Arc<ResponseCache>, prefetch_config: PrefetchConfig, events: Arc<dyn EventSink>) -> Self {
        let prefetch = PrefetchTracker::new(
            prefetch_config.prefetch_expires_secs,
            prefetch_config.prefetch_threshold,
            prefetch_config.prefetch_max_items_count,
        );
        Self { inner, cache, inflight: DashMap::with_hasher(FxBuildHasher), prefetch, prefetch_config, events }
    }

    fn trigger_prefetch(&self, request: Request) {
        if !self.prefetch_config.enabled {
            return;
        }
        let inner = Arc::clone(&self.inner);
        let cache = Arc::clone(&self.cache);
        let events = Arc::clone(&self.events);
        let name = request.name.clone();
        let qtype = request.qtype;
        tokio::spawn(async move {
            if let Ok(response) = inner.resolve(request).await {
                cache.insert(&name, qtype, response);
                events.emit(Event::Prefetched { name });
            }
        });
    }
}

#[async_trait]
impl Resolver for ResponseCacheStage {
    async fn resolve(&self, request: Request) -> Result<Response, DomainError> {
        let key = CacheKey::new(&request.name, request.qtype);

        if let Some(cached) = self.cache.get(&request.name, request.qtype) {
            self.events.emit(Event::CacheHit { name: request.name.clone() });

            let crossed_threshold = self.prefetch.record_access(&key);
            let near_expiry = self
                .cache
                .remaining_secs(&request.name, request.qtype)
                .is_some_and(|remaining| u64::from(remaining) <= self.prefetch_config.prefetch_expires_secs);
            if crossed_threshold && near_expiry {
                self.trigger_prefetch(request);
            }
            return Ok(cached);
        }
        self.events.emit(Event::CacheMiss { name: request.name.clone() });

        let cell = self.inflight.entry(key.clone()).or_insert_with(|| Arc::new(OnceCell::new())).value().clone();

        let cache = Arc::clone(&self.cache);
        let name_for_insert = request.name.clone();
        let qtype_for_insert = request.qtype;

        let result = cell
            .get_or_try_init(|| async move {
                let response = self.inner.resolve(request).await?;
                cache.insert(&name_for_insert, qtype_for_insert, response.clone());
                Ok::<Response, DomainError>(response)
            })
            .await;

        self.inflight.remove(&key);
        result.map(Response::clone)
    }
}
