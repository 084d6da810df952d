use super::stages::{
    BlockingStage, ClientNamesStage, ConditionalStage, CustomDnsStage, HostsFileStage, Ipv6FilterStage, MetricsRegistry,
    MetricsStage, QueryLogStage, ResponseCacheStage, UpstreamDispatchStage,
};
use crate::dns::cache::ResponseCache;
use crate::dns::hosts::HostsMap;
use blocky_application::ports::{BlockFilterEnginePort, EventSink, QueryLogWriter, Stage, UpstreamDispatcher};
use blocky_domain::config::Config;
use blocky_domain::upstream::Upstream;
use rustc_hash::FxHashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

/// Everything the chain needs that isn't derivable from `Config` alone:
/// constructed singletons (catalogs, cache, dispatcher, I/O-backed maps)
/// the composition root assembles once at startup.
pub struct ChainDeps {
    pub block_engine: Arc<dyn BlockFilterEnginePort>,
    pub dispatcher: Arc<dyn UpstreamDispatcher>,
    pub cache: Arc<ResponseCache>,
    pub query_log_writer: Arc<dyn QueryLogWriter>,
    pub events: Arc<dyn EventSink>,
    pub custom_dns: HostsMap,
    pub hosts_file: HostsMap,
    pub client_names_static: FxHashMap<IpAddr, Vec<String>>,
    pub reverse_upstream: Option<(Arc<dyn UpstreamDispatcher>, Vec<Upstream>)>,
}

/// Builds the fixed-order resolver chain (§4.1):
/// ipv6-filter -> client-names -> query-log -> metrics -> conditional-upstream
/// -> custom-DNS -> hosts-file -> blocking -> response-cache -> upstream-dispatch.
///
/// Stages wrap an inner `Stage` from the inside out, so construction runs
/// in reverse chain order starting from the terminal upstream-dispatch stage.
pub fn build(config: &Config, deps: ChainDeps) -> (Stage, Arc<MetricsRegistry>) {
    let timeout = Duration::from_millis(config.upstream.upstream_timeout_ms);

    let groups_by_name: FxHashMap<String, Vec<Upstream>> =
        config.groups.iter().map(|g| (g.name.clone(), g.upstreams.clone())).collect();

    let stage: Stage = Arc::new(UpstreamDispatchStage::new(
        groups_by_name.clone(),
        Arc::clone(&deps.block_engine),
        Arc::clone(&deps.dispatcher),
        timeout,
    ));

    let stage: Stage = Arc::new(ResponseCacheStage::new(stage, deps.cache, config.cache.prefetch.clone(), Arc::clone(&deps.events)));

    let block_type = blocky_domain::config::BlockType::parse(&config.blocking.block_type).unwrap_or_default();
    let stage: Stage = Arc::new(BlockingStage::new(stage, Arc::clone(&deps.block_engine), block_type, config.blocking.block_ttl_secs));

    let stage: Stage = Arc::new(HostsFileStage::new(stage, deps.hosts_file));
    let stage: Stage = Arc::new(CustomDnsStage::new(stage, deps.custom_dns));

    let stage: Stage = Arc::new(ConditionalStage::new(
        stage,
        config.upstream.conditional_zones.clone(),
        groups_by_name,
        Arc::clone(&deps.dispatcher),
        timeout,
    ));

    let registry = Arc::new(MetricsRegistry::new());
    let stage: Stage = Arc::new(MetricsStage::new(stage, Arc::clone(&registry)));

    let stage: Stage = Arc::new(QueryLogStage::new(stage, deps.query_log_writer));

    let stage: Stage = Arc::new(ClientNamesStage::new(stage, deps.client_names_static, deps.reverse_upstream, timeout));

    let stage: Stage = Arc::new(Ipv6FilterStage::new(stage, config.server.disable_ipv6));

    (stage, registry)
}
