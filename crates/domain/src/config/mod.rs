//! Configuration schema, organized by concern:
//! - `root`: the aggregate `Config` and `CliOverrides`
//! - `server`: inbound bind addresses / IPv6 disabling
//! - `upstream`: dispatch strategy, conditional zones, bootstrap DNS
//! - `blocking`: block response shape, refresh cadence, client→group rules
//! - `cache`: response cache clamps, eviction, prefetch
//! - `downloader`: list-fetch retry tuning
//! - `logging`: log level
//! - `local_records`: static hostname→IP mappings (custom-DNS / hosts-file)
//! - `errors`: configuration errors

pub mod blocking;
pub mod cache;
pub mod downloader;
pub mod errors;
pub mod local_records;
pub mod logging;
pub mod root;
pub mod server;
pub mod upstream;

pub use blocking::{BlockType, BlockingConfig, StartStrategy};
pub use cache::{CacheConfig, PrefetchConfig};
pub use downloader::DownloaderConfig;
pub use errors::ConfigError;
pub use local_records::LocalDnsRecord;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use upstream::{ConditionalZone, UpstreamConfig, UpstreamStrategy};
