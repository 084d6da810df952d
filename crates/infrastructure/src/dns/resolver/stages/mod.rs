mod blocking;
mod client_names;
mod conditional;
mod custom_dns;
mod hosts_file;
mod ipv6_filter;
mod metrics;
mod query_log;
mod response_cache;
mod upstream_dispatch;

pub use blocking::BlockingStage;
pub use client_names::ClientNamesStage;
pub use conditional::ConditionalStage;
pub use custom_dns::CustomDnsStage;
pub use hosts_file::HostsFileStage;
pub use ipv6_filter::Ipv6FilterStage;
pub use metrics::{MetricsRegistry, MetricsStage};
pub use query_log::QueryLogStage;
pub use response_cache::ResponseCacheStage;
pub use upstream_dispatch::UpstreamDispatchStage;
