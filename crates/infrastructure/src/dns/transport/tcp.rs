use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use blocky_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Writes a length-prefixed DNS message per RFC 1035 §4.2.2: a two-byte
/// big-endian length followed by the wire message.
pub async fn write_framed(stream: &mut TcpStream, message_bytes: &[u8]) -> std::io::Result<()> {
    let len = message_bytes.len() as u16;
    stream.write_all(&len.to_be_bytes()).await?;
    stream.write_all(message_bytes).await
}

pub async fn read_framed(stream: &mut TcpStream) -> std::io::Result<Vec<u8>> {
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;
    let len = u16::from_be_bytes(len_buf) as usize;
    let mut body = vec![0u8; len];
    stream.read_exact(&mut body).await?;
    Ok(body)
}

pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(&self, message_bytes: &[u8], timeout: Duration) -> Result<TransportResponse, DomainError> {
        let connect = tokio::time::timeout(timeout, TcpStream::connect(self.server_addr))
            .await
            .map_err(|_| DomainError::TransientNetwork(format!("timeout connecting to {}", self.server_addr)))?
            .map_err(|e| DomainError::TransientNetwork(format!("failed to connect to {}: {e}", self.server_addr)))?;
        let mut stream = connect;

        tokio::time::timeout(timeout, write_framed(&mut stream, message_bytes))
            .await
            .map_err(|_| DomainError::TransientNetwork(format!("timeout sending TCP query to {}", self.server_addr)))?
            .map_err(|e| DomainError::TransientNetwork(format!("failed to send TCP query to {}: {e}", self.server_addr)))?;

        let bytes = tokio::time::timeout(timeout, read_framed(&mut stream))
            .await
            .map_err(|_| DomainError::TransientNetwork(format!("timeout reading TCP response from {}", self.server_addr)))?
            .map_err(|e| DomainError::TransientNetwork(format!("failed to read TCP response from {}: {e}", self.server_addr)))?;

        Ok(TransportResponse { bytes, truncated: false })
    }
}
