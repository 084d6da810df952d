use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use blocky_domain::DomainError;
use std::net::SocketAddr;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::ClientConfig;
use tokio_rustls::TlsConnector;

static TLS_CONFIG: LazyLock<Arc<ClientConfig>> = LazyLock::new(|| {
    let roots = tokio_rustls::rustls::RootCertStore { roots: webpki_roots::TLS_SERVER_ROOTS.into() };
    Arc::new(ClientConfig::builder().with_root_certificates(roots).with_no_client_auth())
});

/// DNS-over-TLS: length-prefixed framing (as TCP) inside a rustls session,
/// with certificate verification against `server_name` (§4.8; `verify_name`
/// falls back to the upstream's host when no override is configured).
pub struct TlsTransport {
    server_addr: SocketAddr,
    server_name: String,
}

impl TlsTransport {
    pub fn new(server_addr: SocketAddr, server_name: String) -> Self {
        Self { server_addr, server_name }
    }
}

#[async_trait]
impl DnsTransport for TlsTransport {
    async fn send(&self, message_bytes: &[u8], timeout: Duration) -> Result<TransportResponse, DomainError> {
        let connector = TlsConnector::from(Arc::clone(&TLS_CONFIG));
        let name = ServerName::try_from(self.server_name.clone())
            .map_err(|e| DomainError::Validation(format!("invalid TLS server name '{}': {e}", self.server_name)))?;

        let tcp = tokio::time::timeout(timeout, TcpStream::connect(self.server_addr))
            .await
            .map_err(|_| DomainError::TransientNetwork(format!("timeout connecting to {}", self.server_addr)))?
            .map_err(|e| DomainError::TransientNetwork(format!("failed to connect to {}: {e}", self.server_addr)))?;

        let mut stream = tokio::time::timeout(timeout, connector.connect(name, tcp))
            .await
            .map_err(|_| DomainError::TransientNetwork(format!("timeout establishing TLS with {}", self.server_addr)))?
            .map_err(|e| DomainError::TransientNetwork(format!("TLS handshake with {} failed: {e}", self.server_addr)))?;

        tokio::time::timeout(timeout, write_framed_tls(&mut stream, message_bytes))
            .await
            .map_err(|_| DomainError::TransientNetwork(format!("timeout sending TLS query to {}", self.server_addr)))?
            .map_err(|e| DomainError::TransientNetwork(format!("failed to send TLS query to {}: {e}", self.server_addr)))?;

        let bytes = tokio::time::timeout(timeout, read_framed_tls(&mut stream))
            .await
            .map_err(|_| DomainError::TransientNetwork(format!("timeout reading TLS response from {}", self.server_addr)))?
            .map_err(|e| DomainError::TransientNetwork(format!("failed to read TLS response from {}: {e}", self.server_addr)))?;

        Ok(TransportResponse { bytes, truncated: false })
    }
}

// `read_framed`/`write_framed` are generic over `TcpStream` only; the TLS
// session wraps one, so these thin adapters reuse the same wire framing.
async fn write_framed_tls(stream: &mut tokio_rustls::client::TlsStream<TcpStream>, message_bytes: &[u8]) -> std::io::Result<()> {
    use tokio::io::AsyncWriteExt;
    let len = message_bytes.len() as u16;
    stream.write_all(&len.to_be_bytes()).await?;
    stream.write_all(message_bytes).await
}

async fn read_framed_tls(stream: &mut tokio_rustls::client::TlsStream<TcpStream>) -> std::io::Result<Vec<u8>> {
    use tokio::io::AsyncReadExt;
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;
    let len = u16::from_be_bytes(len_buf) as usize;
    let mut body = vec![0u8; len];
    stream.read_exact(&mut body).await?;
    Ok(body)
}
