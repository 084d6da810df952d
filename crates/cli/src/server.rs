//! Bare inbound DNS listeners: decode a wire-format query, run it through
//! the resolver chain, encode the answer back. No REST/DoH here (§1) —
//! those transports are an external adapter this binary does not provide.

use blocky_application::ports::Stage;
use blocky_domain::request::ClientProtocol;
use blocky_domain::Request;
use blocky_infrastructure::dns::transport::tcp::{read_framed, write_framed};
use blocky_infrastructure::dns::wire;
use hickory_proto::op::{Message, ResponseCode};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, UdpSocket};
use tracing::{debug, error, warn};

const UDP_RECV_BUFFER: usize = 4096;

async fn resolve_query(
    chain: &Stage,
    query: &Message,
    client_ip: std::net::IpAddr,
    protocol: ClientProtocol,
    request_timeout: Duration,
) -> Message {
    let Some(question) = query.queries().first() else {
        let mut message = query.clone();
        message.set_response_code(ResponseCode::FormErr);
        return message;
    };

    let qtype = wire::from_hickory_type(question.query_type());
    let request = Request::new(question.name().to_string(), qtype, client_ip, protocol).with_timeout(request_timeout);

    let mut response = match chain.resolve(request).await {
        Ok(response) => response.message,
        Err(e) => {
            error!(error = %e, "resolver chain returned an error, answering SERVFAIL");
            let mut message = query.clone();
            message.set_message_type(hickory_proto::op::MessageType::Response);
            message.set_response_code(ResponseCode::ServFail);
            message
        }
    };
    response.set_id(query.id());
    response
}

/// Truncates `message` to fit `limit` bytes by dropping all answers and
/// setting the truncated bit, so a UDP client retries over TCP per RFC 1035.
fn truncate_to_fit(message: &mut Message, limit: usize) -> Result<Vec<u8>, blocky_domain::DomainError> {
    let encoded = wire::encode(message)?;
    if encoded.len() <= limit {
        return Ok(encoded);
    }
    message.answers_mut().clear();
    message.set_truncated(true);
    wire::encode(message)
}

pub async fn run_udp(chain: Stage, bind_addr: &str, request_timeout: Duration) -> std::io::Result<()> {
    let socket = UdpSocket::bind(bind_addr).await?;
    tracing::info!(bind_addr, "UDP listener ready");
    let socket = Arc::new(socket);
    let mut buf = vec![0u8; UDP_RECV_BUFFER];

    loop {
        let (len, peer) = match socket.recv_from(&mut buf).await {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "UDP recv failed");
                continue;
            }
        };

        let query = match wire::decode(&buf[..len]) {
            Ok(query) => query,
            Err(e) => {
                debug!(error = %e, %peer, "dropping malformed UDP query");
                continue;
            }
        };

        let chain = Arc::clone(&chain);
        let socket = Arc::clone(&socket);
        tokio::spawn(async move {
            let limit = wire::requested_udp_size(&query).map(usize::from).unwrap_or(wire::MAX_UDP_PAYLOAD_WITHOUT_EDNS);
            let mut response = resolve_query(&chain, &query, peer.ip(), ClientProtocol::Udp, request_timeout).await;
            match truncate_to_fit(&mut response, limit) {
                Ok(bytes) => {
                    if let Err(e) = socket.send_to(&bytes, peer).await {
                        warn!(error = %e, %peer, "UDP send failed");
                    }
                }
                Err(e) => error!(error = %e, %peer, "failed to encode UDP response"),
            }
        });
    }
}

pub async fn run_tcp(chain: Stage, bind_addr: &str, request_timeout: Duration) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!(bind_addr, "TCP listener ready");

    loop {
        let (mut stream, peer) = match listener.accept().await {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "TCP accept failed");
                continue;
            }
        };

        let chain = Arc::clone(&chain);
        tokio::spawn(async move {
            loop {
                let bytes = match read_framed(&mut stream).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        debug!(error = %e, %peer, "TCP connection closed");
                        return;
                    }
                };

                let query = match wire::decode(&bytes) {
                    Ok(query) => query,
                    Err(e) => {
                        debug!(error = %e, %peer, "dropping malformed TCP query");
                        return;
                    }
                };

                let response = resolve_query(&chain, &query, peer.ip(), ClientProtocol::Tcp, request_timeout).await;
                let encoded = match wire::encode(&response) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        error!(error = %e, %peer, "failed to encode TCP response");
                        return;
                    }
                };

                if let Err(e) = write_framed(&mut stream, &encoded).await {
                    warn!(error = %e, %peer, "TCP send failed");
                    return;
                }
            }
        });
    }
}
