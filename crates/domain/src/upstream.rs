use serde::{Deserialize, Serialize};

/// Transport an upstream resolver is reached over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamProtocol {
    /// Plain UDP, retried over TCP on truncation.
    #[serde(alias = "udp+tcp")]
    Udp,
    Tcp,
    Tls,
    Https,
}

/// One upstream resolver entry, as declared in `clientGroupsBlock`-adjacent
/// upstream pools.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Upstream {
    pub protocol: UpstreamProtocol,
    pub host: String,
    pub port: u16,
    /// Path for DoH (`/dns-query` by default).
    #[serde(default)]
    pub path: Option<String>,
    /// Overrides the name used for TLS certificate verification; falls back
    /// to `host` when absent.
    #[serde(default)]
    pub server_name: Option<String>,
}

impl Upstream {
    pub fn display(&self) -> String {
        match self.protocol {
            UpstreamProtocol::Https => format!("https://{}:{}{}", self.host, self.port, self.path.as_deref().unwrap_or("/dns-query")),
            _ => format!("{}:{}", self.host, self.port),
        }
    }

    pub fn verify_name(&self) -> &str {
        self.server_name.as_deref().unwrap_or(&self.host)
    }
}
