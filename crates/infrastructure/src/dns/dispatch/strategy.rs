use super::pool::dispatch_one;
use async_trait::async_trait;
use blocky_application::ports::UpstreamDispatcher as UpstreamDispatcherPort;
use blocky_domain::config::{UpstreamConfig, UpstreamStrategy};
use blocky_domain::upstream::Upstream;
use blocky_domain::DomainError;
use dashmap::DashMap;
use futures::stream::{FuturesUnordered, StreamExt};
use hickory_proto::op::Message;
use rustc_hash::FxBuildHasher;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Decayed error counter per upstream, keyed by its display string. The
/// decay half-life keeps a long-silent failure from permanently depressing
/// an upstream's selection weight.
struct ErrorScore {
    count: f64,
    last_update: Instant,
}

const HALF_LIFE: Duration = Duration::from_secs(60);

fn decayed(score: &ErrorScore, now: Instant) -> f64 {
    let elapsed = now.duration_since(score.last_update).as_secs_f64();
    let halvings = elapsed / HALF_LIFE.as_secs_f64();
    score.count * 0.5f64.powf(halvings)
}

/// Selects among a group's upstreams per the configured strategy and
/// dispatches (§4.8). `parallelBest` maintains an exponentially-decayed
/// error count per upstream and weights a two-pick random selection
/// inversely to it: `weight = 1 / (1 + decayed_error_count)`.
pub struct StrategyDispatcher {
    config: UpstreamConfig,
    errors: DashMap<String, Mutex<ErrorScore>, FxBuildHasher>,
}

impl StrategyDispatcher {
    pub fn new(config: UpstreamConfig) -> Self {
        Self { config, errors: DashMap::with_hasher(FxBuildHasher) }
    }

    fn record_success(&self, key: &str) {
        if let Some(entry) = self.errors.get(key) {
            let mut score = entry.lock().unwrap();
            let now = Instant::now();
            score.count = decayed(&score, now) * 0.5;
            score.last_update = now;
        }
    }

    fn record_failure(&self, key: &str) {
        let now = Instant::now();
        let mut entry = self.errors.entry(key.to_string()).or_insert_with(|| Mutex::new(ErrorScore { count: 0.0, last_update: now }));
        let mut score = entry.lock().unwrap();
        score.count = decayed(&score, now) + 1.0;
        score.last_update = now;
    }

    fn weight_of(&self, key: &str) -> f64 {
        match self.errors.get(key) {
            Some(entry) => 1.0 / (1.0 + decayed(&entry.lock().unwrap(), Instant::now())),
            None => 1.0,
        }
    }

    /// Weighted-without-replacement pick of up to `n` distinct indices.
    fn weighted_pick(&self, upstreams: &[Upstream], n: usize) -> Vec<usize> {
        let mut remaining: Vec<usize> = (0..upstreams.len()).collect();
        let mut picked = Vec::with_capacity(n);
        for _ in 0..n.min(remaining.len()) {
            let weights: Vec<f64> = remaining.iter().map(|&i| self.weight_of(&upstreams[i].display())).collect();
            let total: f64 = weights.iter().sum();
            let mut roll = fastrand::f64() * total;
            let mut chosen = remaining.len() - 1;
            for (idx, w) in weights.iter().enumerate() {
                if roll < *w {
                    chosen = idx;
                    break;
                }
                roll -= w;
            }
            picked.push(remaining.remove(chosen));
        }
        picked
    }

    async fn try_one(&self, upstream: &Upstream, query: &Message) -> Result<Message, DomainError> {
        let timeout = Duration::from_millis(self.config.upstream_timeout_ms);
        let key = upstream.display();
        match dispatch_one(upstream, query, timeout).await {
            Ok(response) => {
                self.record_success(&key);
                Ok(response)
            }
            Err(e) => {
                self.record_failure(&key);
                Err(e)
            }
        }
    }

    async fn dispatch_strict(&self, query: &Message, upstreams: &[Upstream]) -> Result<Message, DomainError> {
        let mut last_err = None;
        for upstream in upstreams {
            match self.try_one(upstream, query).await {
                Ok(response) => return Ok(response),
                Err(e) => last_err = Some(e),
            }
        }
        Err(exhausted(upstreams, last_err))
    }

    async fn dispatch_random(&self, query: &Message, upstreams: &[Upstream]) -> Result<Message, DomainError> {
        let idx = fastrand::usize(..upstreams.len());
        self.try_one(&upstreams[idx], query).await
    }

    /// Races the picked upstreams and returns the first success; the other
    /// attempt is dropped (and so cancelled) as soon as a winner is chosen,
    /// per the chain's cancel-the-loser contract.
    async fn dispatch_parallel_best(&self, query: &Message, upstreams: &[Upstream]) -> Result<Message, DomainError> {
        let picks = self.weighted_pick(upstreams, 2);
        let mut attempts = FuturesUnordered::new();
        for idx in picks {
            attempts.push(self.try_one(&upstreams[idx], query));
        }
        let mut last_err = None;
        while let Some(result) = attempts.next().await {
            match result {
                Ok(response) => return Ok(response),
                Err(e) => last_err = Some(e),
            }
        }
        Err(exhausted(upstreams, last_err))
    }
}

fn exhausted(upstreams: &[Upstream], last: Option<DomainError>) -> DomainError {
    let group = upstreams.first().map(|u| u.display()).unwrap_or_default();
    DomainError::UpstreamExhausted { group, last: last.map(|e| e.to_string()).unwrap_or_default() }
}

#[async_trait]
impl UpstreamDispatcherPort for StrategyDispatcher {
    async fn dispatch(&self, query: &Message, upstreams: &[Upstream]) -> Result<Message, DomainError> {
        if upstreams.is_empty() {
            return Err(DomainError::Config("no upstreams configured for group".to_string()));
        }
        match self.config.strategy {
            UpstreamStrategy::Strict => self.dispatch_strict(query, upstreams).await,
            UpstreamStrategy::Random => self.dispatch_random(query, upstreams).await,
            UpstreamStrategy::ParallelBest => self.dispatch_parallel_best(query, upstreams).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_decreases_after_failure() {
        let dispatcher = StrategyDispatcher::new(UpstreamConfig::default());
        dispatcher.record_failure("1.1.1.1:53");
        assert!(dispatcher.weight_of("1.1.1.1:53") < 1.0);
        assert_eq!(dispatcher.weight_of("8.8.8.8:53"), 1.0);
    }

    #[test]
    fn weight_recovers_after_success() {
        let dispatcher = StrategyDispatcher::new(UpstreamConfig::default());
        dispatcher.record_failure("1.1.1.1:53");
        let after_failure = dispatcher.weight_of("1.1.1.1:53");
        dispatcher.record_success("1.1.1.1:53");
        assert!(dispatcher.weight_of("1.1.1.1:53") > after_failure);
    }
}
