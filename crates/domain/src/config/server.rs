use serde::{Deserialize, Serialize};

/// Bind addresses for the inbound DNS transports. Binding the sockets and
/// actually speaking DoH/REST is the external adapter's job (§1); the core
/// only needs to know what the adapter is configured to listen on so
/// conditional/EDNS0 helpers can reason about it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_udp_bind")]
    pub udp_bind: String,
    #[serde(default = "default_tcp_bind")]
    pub tcp_bind: String,
    #[serde(default)]
    pub tls_bind: Option<String>,
    #[serde(default)]
    pub https_bind: Option<String>,
    #[serde(default = "default_disable_ipv6")]
    pub disable_ipv6: bool,
    /// Optional path to a standard `/etc/hosts`-format file backing the
    /// hosts-file stage, distinct from `local_records` (custom-DNS).
    #[serde(default)]
    pub hosts_file_path: Option<String>,
    /// Soft per-request deadline (§5): the overall budget a query has before
    /// the current stage's I/O is cancelled and the request fails fast.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            udp_bind: default_udp_bind(),
            tcp_bind: default_tcp_bind(),
            tls_bind: None,
            https_bind: None,
            disable_ipv6: default_disable_ipv6(),
            hosts_file_path: None,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_udp_bind() -> String {
    "0.0.0.0:53".to_string()
}

fn default_tcp_bind() -> String {
    "0.0.0.0:53".to_string()
}

fn default_disable_ipv6() -> bool {
    false
}

fn default_request_timeout_ms() -> u64 {
    5000
}
