//! Thin composition root: loads config, initializes logging, assembles the
//! resolver chain, and runs the bare UDP/TCP listeners. The HTTP
//! management/REST and DoH transports are a separate adapter this binary
//! does not provide (§1).

mod bootstrap;
mod server;

use blocky_domain::config::CliOverrides;
use blocky_domain::config::StartStrategy;
use blocky_infrastructure::dns::blocking::{BlockFilterEngine, CatalogManager};
use blocky_infrastructure::dns::cache::ResponseCache;
use blocky_infrastructure::dns::dispatch::StrategyDispatcher;
use blocky_infrastructure::dns::events::EventBus;
use blocky_infrastructure::dns::hosts::HostsMap;
use blocky_infrastructure::dns::list::{FsHttpListSourceLoader, HttpDownloader};
use blocky_infrastructure::dns::query_log::TracingQueryLogWriter;
use blocky_infrastructure::dns::resolver::{self, ChainDeps};
use blocky_jobs::{BlocklistSyncJob, CacheMaintenanceJob, JobRunner};
use clap::Parser;
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "blocky")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "DNS proxy with ad-blocking, caching, and conditional forwarding")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the configured UDP bind address.
    #[arg(long)]
    udp_bind: Option<String>,

    /// Override the configured TCP bind address.
    #[arg(long)]
    tcp_bind: Option<String>,

    /// Override the configured log level.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        udp_bind: cli.udp_bind.clone(),
        tcp_bind: cli.tcp_bind.clone(),
        log_level: cli.log_level.clone(),
    };
    let config = bootstrap::load_config(&cli.config, overrides)?;
    bootstrap::init_logging(&config);

    tracing::info!("Starting blocky DNS server");

    let events = Arc::new(EventBus::new());
    let events_sink: Arc<dyn blocky_application::ports::EventSink> = events.clone();

    let downloader = Arc::new(HttpDownloader::new(config.downloader.clone(), events_sink.clone()));
    let loader = Arc::new(FsHttpListSourceLoader::new(downloader));
    let catalogs = CatalogManager::new(&config.groups, loader, events_sink.clone(), config.blocking.max_errors_per_source);
    let block_engine: Arc<dyn blocky_application::ports::BlockFilterEnginePort> =
        Arc::new(BlockFilterEngine::new(config.groups.clone(), &config.blocking.client_groups_block, catalogs));

    match config.blocking.start_strategy {
        StartStrategy::Blocking => {
            tracing::info!("Loading block lists before serving (startStrategy = blocking)");
            block_engine.reload().await?;
        }
        StartStrategy::FailOnError => {
            tracing::info!("Loading block lists before serving (startStrategy = failOnError)");
            if let Err(e) = block_engine.reload().await {
                tracing::warn!(error = %e, "initial block list load had failures; serving with partial catalogs");
            }
        }
        StartStrategy::Fast => {
            tracing::info!("Serving immediately, loading block lists in background (startStrategy = fast)");
            let engine = Arc::clone(&block_engine);
            tokio::spawn(async move {
                if let Err(e) = engine.reload().await {
                    tracing::warn!(error = %e, "background block list load had failures");
                }
            });
        }
    }

    let cache = Arc::new(ResponseCache::new(config.cache.clone()));
    let dispatcher: Arc<dyn blocky_application::ports::UpstreamDispatcher> = Arc::new(StrategyDispatcher::new(config.upstream.clone()));
    let query_log_writer: Arc<dyn blocky_application::ports::QueryLogWriter> = Arc::new(TracingQueryLogWriter);

    let custom_dns = HostsMap::from_local_records(&config.local_records, &None);
    let hosts_file = match &config.server.hosts_file_path {
        Some(path) => {
            let text = tokio::fs::read_to_string(path).await?;
            HostsMap::from_hosts_file(&text, config.blocking.block_ttl_secs)
        }
        None => HostsMap::empty(),
    };

    let deps = ChainDeps {
        block_engine: Arc::clone(&block_engine),
        dispatcher: Arc::clone(&dispatcher),
        cache: Arc::clone(&cache),
        query_log_writer,
        events: events_sink,
        custom_dns,
        hosts_file,
        client_names_static: FxHashMap::default(),
        reverse_upstream: None,
    };

    let (chain, _metrics) = resolver::build(&config, deps);

    let mut runner = JobRunner::new().with_cache_maintenance(CacheMaintenanceJob::new(Arc::clone(&cache)));
    if config.blocking.refresh_period_secs > 0 {
        runner = runner
            .with_blocklist_sync(BlocklistSyncJob::new(Arc::clone(&block_engine)).with_interval(config.blocking.refresh_period_secs as u64));
    }
    runner.start().await;

    let udp_bind = config.server.udp_bind.clone();
    let tcp_bind = config.server.tcp_bind.clone();
    let request_timeout = Duration::from_millis(config.server.request_timeout_ms);
    let udp_chain = Arc::clone(&chain);
    let tcp_chain = Arc::clone(&chain);

    let udp_task = tokio::spawn(async move { server::run_udp(udp_chain, &udp_bind, request_timeout).await });
    let tcp_task = tokio::spawn(async move { server::run_tcp(tcp_chain, &tcp_bind, request_timeout).await });

    tokio::select! {
        result = udp_task => result??,
        result = tcp_task => result??,
    }

    Ok(())
}
