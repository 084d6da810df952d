//! Blocky domain layer: plain data types, configuration schema, and errors.
//!
//! Nothing in this crate performs I/O; it is the vocabulary shared by the
//! `application` ports and the `infrastructure` implementations.

pub mod client_matcher;
pub mod config;
pub mod errors;
pub mod group;
pub mod list_source;
pub mod query_log;
pub mod record;
pub mod request;
pub mod response;
pub mod upstream;
pub mod validators;

pub use client_matcher::ClientMatcher;
pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use group::Group;
pub use list_source::{ListSourceDescriptor, ListSourceKind, ListType};
pub use query_log::{QueryLog, QueryStats};
pub use record::RecordType;
pub use request::{ClientProtocol, Request};
pub use response::{Response, ResponseType};
pub use upstream::{Upstream, UpstreamProtocol};
