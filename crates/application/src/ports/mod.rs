pub mod block_filter_engine;
pub mod event_sink;
pub mod list_source_loader;
pub mod query_log_writer;
pub mod resolver;
pub mod response_cache;
pub mod upstream_dispatcher;

pub use block_filter_engine::{BlockFilterEnginePort, BlockMatch, BlockingStatus};
pub use event_sink::{Event, EventSink};
pub use list_source_loader::{Downloader, ListSourceLoader};
pub use query_log_writer::QueryLogWriter;
pub use resolver::{Resolver, Stage};
pub use response_cache::{BackingCache, ResponseCachePort};
pub use upstream_dispatcher::{dispatch_cancellable, UpstreamDispatcher};
