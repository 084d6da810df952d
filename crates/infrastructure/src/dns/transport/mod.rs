pub mod https;
pub mod tcp;
pub mod tls;
pub mod udp;

use async_trait::async_trait;
use blocky_domain::upstream::{Upstream, UpstreamProtocol};
use blocky_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;

/// Raw bytes of a DNS response plus which protocol actually carried it
/// (UDP may hand back a truncated answer that the caller retries over TCP).
#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,
    pub truncated: bool,
}

/// Sends a wire-format DNS message and returns the wire-format response
/// (§4.8). Each protocol is a thin wrapper over its own socket/client type.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(&self, message_bytes: &[u8], timeout: Duration) -> Result<TransportResponse, DomainError>;
}

pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
    Tls(tls::TlsTransport),
    Https(https::HttpsTransport),
}

impl Transport {
    pub async fn send(&self, message_bytes: &[u8], timeout: Duration) -> Result<TransportResponse, DomainError> {
        match self {
            Self::Udp(t) => t.send(message_bytes, timeout).await,
            Self::Tcp(t) => t.send(message_bytes, timeout).await,
            Self::Tls(t) => t.send(message_bytes, timeout).await,
            Self::Https(t) => t.send(message_bytes, timeout).await,
        }
    }
}

fn socket_addr(upstream: &Upstream) -> Result<SocketAddr, DomainError> {
    format!("{}:{}", upstream.host, upstream.port)
        .parse()
        .map_err(|e| DomainError::Validation(format!("invalid upstream address {}:{}: {e}", upstream.host, upstream.port)))
}

/// Builds the transport for an upstream (§4.8): UDP retries on TCP at the
/// dispatch layer on truncation, so a `udp+tcp`-protocol upstream starts
/// out as plain `Transport::Udp`.
pub fn create_transport(upstream: &Upstream) -> Result<Transport, DomainError> {
    match upstream.protocol {
        UpstreamProtocol::Udp => Ok(Transport::Udp(udp::UdpTransport::new(socket_addr(upstream)?))),
        UpstreamProtocol::Tcp => Ok(Transport::Tcp(tcp::TcpTransport::new(socket_addr(upstream)?))),
        UpstreamProtocol::Tls => {
            let server_name = upstream.verify_name();
            Ok(Transport::Tls(tls::TlsTransport::new(socket_addr(upstream)?, server_name.to_string())))
        }
        UpstreamProtocol::Https => Ok(Transport::Https(https::HttpsTransport::new(upstream.display()))),
    }
}

/// Builds the plain-TCP fallback transport for a UDP upstream that
/// returned a truncated answer (§4.8 UDP retry-on-TCP).
pub fn create_tcp_fallback(upstream: &Upstream) -> Result<Transport, DomainError> {
    Ok(Transport::Tcp(tcp::TcpTransport::new(socket_addr(upstream)?)))
}
