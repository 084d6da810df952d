use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use blocky_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::debug;

/// EDNS0 headroom over the legacy 512-byte UDP payload limit (§6).
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(&self, message_bytes: &[u8], timeout: Duration) -> Result<TransportResponse, DomainError> {
        let bind_addr: SocketAddr = if self.server_addr.is_ipv4() { "0.0.0.0:0".parse().unwrap() } else { "[::]:0".parse().unwrap() };
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| DomainError::TransientNetwork(format!("failed to bind UDP socket: {e}")))?;

        tokio::time::timeout(timeout, socket.send_to(message_bytes, self.server_addr))
            .await
            .map_err(|_| DomainError::TransientNetwork(format!("timeout sending UDP query to {}", self.server_addr)))?
            .map_err(|e| DomainError::TransientNetwork(format!("failed to send UDP query to {}: {e}", self.server_addr)))?;

        let mut buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let (n, from) = tokio::time::timeout(timeout, socket.recv_from(&mut buf))
            .await
            .map_err(|_| DomainError::TransientNetwork(format!("timeout waiting for UDP response from {}", self.server_addr)))?
            .map_err(|e| DomainError::TransientNetwork(format!("failed to receive UDP response from {}: {e}", self.server_addr)))?;

        if from.ip() != self.server_addr.ip() {
            debug!(expected = %self.server_addr, from = %from, "UDP response from unexpected source");
        }
        buf.truncate(n);

        let truncated = hickory_proto::op::Message::from_vec(&buf).map(|m| m.truncated()).unwrap_or(false);
        Ok(TransportResponse { bytes: buf, truncated })
    }
}
