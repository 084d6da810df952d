use crate::record::RecordType;
use std::net::IpAddr;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::Span;

/// Soft per-request deadline applied when a caller doesn't set one via
/// `with_timeout` (§5 "the overall request has a soft deadline").
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Transport the request arrived on.
///
/// Carried through the chain so stages (conditional forwarding, logging)
/// can record provenance; the transport itself is handled entirely outside
/// the core (see §6 of the spec — inbound transports are an adapter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientProtocol {
    Udp,
    Tcp,
    Tls,
    Https,
}

/// A single in-flight DNS question as it travels down the resolver chain.
///
/// Stages mutate `client_names` (client-name stage) and may rewrite `name`
/// (hosts-file / conditional are read-only; filters elsewhere may not be);
/// `reason` is append-only and carries the final response's provenance.
#[derive(Debug, Clone)]
pub struct Request {
    pub name: String,
    pub qtype: RecordType,
    pub client_ip: IpAddr,
    /// Names resolved for `client_ip` by the client-name stage. Empty until
    /// that stage runs or if reverse resolution failed.
    pub client_names: Vec<String>,
    pub protocol: ClientProtocol,
    pub received_at: Instant,
    /// Client identifier parsed from TLS SNI (`id-<name>.<rest>`) or the DoH
    /// path (`/dns-query/<clientID>`), when present.
    pub client_id: Option<String>,
    /// Running provenance trail; each stage appends its contribution.
    pub reason: Vec<String>,
    /// Soft deadline for the whole request; I/O-performing stages bound
    /// their own per-attempt timeout by whatever of it remains and fail
    /// fast once it's gone (§5).
    pub deadline: Instant,
    /// Cancellation signal tied to this request; dropping the future that
    /// awaits it (or an external caller cancelling it) aborts any
    /// in-flight I/O the current stage is waiting on (§5).
    pub cancellation: CancellationToken,
    /// Per-request structured-logging scope; stages log their contribution
    /// to the chain's decision into this span rather than a bare event.
    pub logger: Span,
}

impl Request {
    pub fn new(name: impl Into<String>, qtype: RecordType, client_ip: IpAddr, protocol: ClientProtocol) -> Self {
        let name = name.into().to_lowercase();
        let logger = tracing::info_span!("query", name = %name, %client_ip);
        Self {
            name,
            qtype,
            client_ip,
            client_names: Vec::new(),
            protocol,
            received_at: Instant::now(),
            client_id: None,
            reason: Vec::new(),
            deadline: Instant::now() + DEFAULT_TIMEOUT,
            cancellation: CancellationToken::new(),
            logger,
        }
    }

    /// Overrides the default soft deadline; called by the inbound
    /// transport with the configured request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Instant::now() + timeout;
        self
    }

    /// Time left until `deadline`, floored at zero.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Whether the request's budget is exhausted or it was cancelled
    /// externally; I/O-performing stages check this before starting work.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled() || self.remaining().is_zero()
    }

    pub fn annotate(&mut self, note: impl Into<String>) {
        let note = note.into();
        self.logger.in_scope(|| tracing::debug!(contribution = %note, "chain stage"));
        self.reason.push(note);
    }

    /// `q.name` with the leftmost label stripped, or `None` at the root.
    pub fn parent_label(name: &str) -> Option<&str> {
        name.find('.').map(|idx| &name[idx + 1..])
    }

    /// Client identifier embedded in a TLS SNI of the form `id-<name>.<rest>`.
    pub fn client_id_from_sni(sni: &str) -> Option<String> {
        sni.strip_prefix("id-")
            .and_then(|rest| rest.split_once('.'))
            .map(|(id, _)| id.to_string())
    }

    /// Client identifier embedded in a DoH path of the form `/dns-query/<id>`.
    pub fn client_id_from_doh_path(path: &str) -> Option<String> {
        path.strip_prefix("/dns-query/")
            .map(|rest| rest.trim_matches('/').to_string())
            .filter(|s| !s.is_empty())
    }
}
