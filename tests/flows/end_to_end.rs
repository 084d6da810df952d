//! End-to-end scenarios driving the resolver chain directly, in-process,
//! against a fake upstream dispatcher. Mirrors the literal input/output
//! scenarios the chain is contracted to satisfy.

use async_trait::async_trait;
use blocky_application::ports::{
    BlockFilterEnginePort, Downloader, Event, EventSink, QueryLogWriter, UpstreamDispatcher,
};
use blocky_domain::config::{BlockingConfig, CacheConfig, Config, ConditionalZone, StartStrategy, UpstreamConfig};
use blocky_domain::group::Group;
use blocky_domain::list_source::ListSourceDescriptor;
use blocky_domain::query_log::QueryLog;
use blocky_domain::record::RecordType;
use blocky_domain::request::{ClientProtocol, Request};
use blocky_domain::response::ResponseType;
use blocky_domain::upstream::{Upstream, UpstreamProtocol};
use blocky_domain::DomainError;
use blocky_infrastructure::dns::blocking::{BlockFilterEngine, CatalogManager};
use blocky_infrastructure::dns::cache::ResponseCache;
use blocky_infrastructure::dns::hosts::HostsMap;
use blocky_infrastructure::dns::list::FsHttpListSourceLoader;
use blocky_infrastructure::dns::resolver::{self, ChainDeps};
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record};
use rustc_hash::FxHashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

struct NullEventSink;
impl EventSink for NullEventSink {
    fn emit(&self, _event: Event) {}
}

struct NullQueryLogWriter;
#[async_trait]
impl QueryLogWriter for NullQueryLogWriter {
    async fn write(&self, _entry: QueryLog) {}
}

struct NullDownloader;
#[async_trait]
impl Downloader for NullDownloader {
    async fn fetch(&self, _url: &str) -> Result<String, DomainError> {
        Err(DomainError::PermanentNetwork("not used in tests".to_string()))
    }
}

/// Answers every dispatch with a canned A record keyed by the upstream pool
/// it was handed, standing in for a real upstream resolver.
struct FakeDispatcher;

#[async_trait]
impl UpstreamDispatcher for FakeDispatcher {
    async fn dispatch(&self, query: &Message, upstreams: &[Upstream]) -> Result<Message, DomainError> {
        let question = query.queries().first().expect("query must carry a question");
        let name = question.name().clone();
        let host = upstreams.first().map(|u| u.host.as_str()).unwrap_or("");

        let (ip, ttl) = match host {
            "upstream-fritzbox" => (Ipv4Addr::new(192, 168, 178, 2), 3600),
            "upstream-cached" => (Ipv4Addr::new(123, 124, 122, 122), 123),
            _ => (Ipv4Addr::new(1, 2, 3, 4), 300),
        };

        let mut message = Message::new();
        message.set_message_type(MessageType::Response);
        message.set_response_code(ResponseCode::NoError);
        message.add_query(question.clone());
        message.add_answer(Record::from_rdata(name, ttl, RData::A(A(ip))));
        Ok(message)
    }
}

fn upstream(host: &str) -> Upstream {
    Upstream { protocol: UpstreamProtocol::Udp, host: host.to_string(), port: 53, path: None, server_name: None }
}

async fn build_engine(config: &Config) -> Arc<dyn BlockFilterEnginePort> {
    let events: Arc<dyn EventSink> = Arc::new(NullEventSink);
    let loader = Arc::new(FsHttpListSourceLoader::new(Arc::new(NullDownloader)));
    let catalogs = CatalogManager::new(&config.groups, loader, events.clone(), config.blocking.max_errors_per_source);
    let engine: Arc<dyn BlockFilterEnginePort> =
        Arc::new(BlockFilterEngine::new(config.groups.clone(), &config.blocking.client_groups_block, catalogs));
    engine.reload().await.expect("reload of inline-text sources cannot fail");
    engine
}

fn build_chain(config: &Config, engine: Arc<dyn BlockFilterEnginePort>) -> Arc<dyn blocky_application::ports::Resolver> {
    let dispatcher: Arc<dyn UpstreamDispatcher> = Arc::new(FakeDispatcher);
    let cache = Arc::new(ResponseCache::new(config.cache.clone()));
    let deps = ChainDeps {
        block_engine: engine,
        dispatcher,
        cache,
        query_log_writer: Arc::new(NullQueryLogWriter),
        events: Arc::new(NullEventSink),
        custom_dns: HostsMap::empty(),
        hosts_file: HostsMap::empty(),
        client_names_static: FxHashMap::default(),
        reverse_upstream: None,
    };
    let (chain, _metrics) = resolver::build(config, deps);
    chain
}

fn answer_ip(message: &Message) -> IpAddr {
    match message.answers().first().expect("response should carry an answer").data() {
        RData::A(A(ip)) => IpAddr::V4(*ip),
        other => panic!("unexpected rdata {other:?}"),
    }
}

fn ads_group_config() -> Config {
    Config {
        groups: vec![Group {
            name: "ads".to_string(),
            upstreams: vec![upstream("upstream-default")],
            deny_sources: vec![ListSourceDescriptor::text("doubleclick.net")],
            allow_sources: vec![],
        }],
        blocking: BlockingConfig {
            start_strategy: StartStrategy::Blocking,
            client_groups_block: [("192.168.1.50/32".to_string(), vec!["ads".to_string()])].into_iter().collect(),
            ..BlockingConfig::default()
        },
        ..Config::default()
    }
}

fn client_in_ads() -> IpAddr {
    "192.168.1.50".parse().unwrap()
}

#[tokio::test]
async fn deny_literal_blocks_with_zero_ip() {
    let config = ads_group_config();
    let engine = build_engine(&config).await;
    let chain = build_chain(&config, engine);

    let request = Request::new("doubleclick.net.", RecordType::A, client_in_ads(), ClientProtocol::Udp);
    let response = chain.resolve(request).await.unwrap();

    assert_eq!(response.response_type, ResponseType::Blocked);
    assert!(response.reason.contains("BLOCKED (ads)"), "reason was: {}", response.reason);
    assert_eq!(answer_ip(&response.message), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    assert_eq!(response.message.answers()[0].ttl(), 21_600);
}

#[tokio::test]
async fn deny_subdomain_blocks_the_same_as_the_parent() {
    let config = ads_group_config();
    let engine = build_engine(&config).await;
    let chain = build_chain(&config, engine);

    let request = Request::new("www.doubleclick.net.", RecordType::A, client_in_ads(), ClientProtocol::Udp);
    let response = chain.resolve(request).await.unwrap();

    assert_eq!(response.response_type, ResponseType::Blocked);
    assert_eq!(answer_ip(&response.message), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
}

#[tokio::test]
async fn allow_overrides_deny_within_the_same_group() {
    let config = Config {
        groups: vec![Group {
            name: "ads".to_string(),
            upstreams: vec![upstream("upstream-default")],
            deny_sources: vec![ListSourceDescriptor::text("heise.de")],
            allow_sources: vec![ListSourceDescriptor::text("heise.de")],
        }],
        blocking: BlockingConfig {
            start_strategy: StartStrategy::Blocking,
            client_groups_block: [("192.168.1.50/32".to_string(), vec!["ads".to_string()])].into_iter().collect(),
            ..BlockingConfig::default()
        },
        ..Config::default()
    };
    let engine = build_engine(&config).await;
    let chain = build_chain(&config, engine);

    let request = Request::new("heise.de.", RecordType::A, client_in_ads(), ClientProtocol::Udp);
    let response = chain.resolve(request).await.unwrap();

    assert_eq!(response.response_type, ResponseType::Resolved);
}

#[tokio::test]
async fn conditional_zone_delegates_to_its_own_upstream() {
    let config = Config {
        groups: vec![Group {
            name: "fritzbox".to_string(),
            upstreams: vec![upstream("upstream-fritzbox")],
            deny_sources: vec![],
            allow_sources: vec![],
        }],
        upstream: UpstreamConfig {
            conditional_zones: vec![ConditionalZone { suffix: "fritz.box".to_string(), group: "fritzbox".to_string() }],
            ..UpstreamConfig::default()
        },
        ..Config::default()
    };
    let engine = build_engine(&config).await;
    let chain = build_chain(&config, engine);

    let request = Request::new("host.fritz.box.", RecordType::A, "10.0.0.1".parse().unwrap(), ClientProtocol::Udp);
    let response = chain.resolve(request).await.unwrap();

    assert_eq!(response.response_type, ResponseType::Conditional);
    assert_eq!(answer_ip(&response.message), IpAddr::V4(Ipv4Addr::new(192, 168, 178, 2)));
    assert_eq!(response.message.answers()[0].ttl(), 3600);
}

#[tokio::test]
async fn repeated_query_within_ttl_hits_the_cache() {
    let config = Config {
        groups: vec![Group { name: "default".to_string(), upstreams: vec![upstream("upstream-cached")], deny_sources: vec![], allow_sources: vec![] }],
        cache: CacheConfig { min_cache_ttl_secs: 0, max_cache_ttl_secs: 0, ..CacheConfig::default() },
        ..Config::default()
    };
    let engine = build_engine(&config).await;
    let chain = build_chain(&config, engine);
    let ip: IpAddr = "10.0.0.2".parse().unwrap();

    let first = chain.resolve(Request::new("google.de.", RecordType::A, ip, ClientProtocol::Udp)).await.unwrap();
    assert_eq!(first.response_type, ResponseType::Resolved);
    assert_eq!(answer_ip(&first.message), IpAddr::V4(Ipv4Addr::new(123, 124, 122, 122)));

    let second = chain.resolve(Request::new("google.de.", RecordType::A, ip, ClientProtocol::Udp)).await.unwrap();
    assert_eq!(second.response_type, ResponseType::Cached);
    assert_eq!(answer_ip(&second.message), IpAddr::V4(Ipv4Addr::new(123, 124, 122, 122)));
    assert!(second.message.answers()[0].ttl() <= 123);
}

#[tokio::test]
async fn disable_with_duration_auto_reenables() {
    let config = ads_group_config();
    let engine = build_engine(&config).await;
    let chain = build_chain(&config, Arc::clone(&engine));

    engine.disable(Some(Duration::from_millis(500)), vec!["ads".to_string()]).await;
    let status = engine.status();
    assert!(!status.enabled);
    assert_eq!(status.disabled_groups, vec!["ads".to_string()]);

    tokio::time::sleep(Duration::from_millis(400)).await;
    let request = Request::new("doubleclick.net.", RecordType::A, client_in_ads(), ClientProtocol::Udp);
    let response = chain.resolve(request).await.unwrap();
    assert_eq!(response.response_type, ResponseType::Resolved, "blocking should still be suppressed at 400ms");

    tokio::time::sleep(Duration::from_millis(300)).await;
    let request = Request::new("doubleclick.net.", RecordType::A, client_in_ads(), ClientProtocol::Udp);
    let response = chain.resolve(request).await.unwrap();
    assert_eq!(response.response_type, ResponseType::Blocked, "blocking should have auto re-enabled by 700ms");
}

#[allow(dead_code)]
fn unused_name_helper() -> Name {
    Name::from_str("example.com.").unwrap()
}
