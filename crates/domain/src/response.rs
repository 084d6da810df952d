use hickory_proto::op::Message;

/// The closed set of response provenance tags (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    Resolved,
    Cached,
    Blocked,
    Conditional,
    CustomDns,
    HostsFile,
    NotFound,
    Special,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Resolved => "RESOLVED",
            ResponseType::Cached => "CACHED",
            ResponseType::Blocked => "BLOCKED",
            ResponseType::Conditional => "CONDITIONAL",
            ResponseType::CustomDns => "CUSTOMDNS",
            ResponseType::HostsFile => "HOSTSFILE",
            ResponseType::NotFound => "NOTFOUND",
            ResponseType::Special => "SPECIAL",
        }
    }
}

/// The outcome of a completed resolver chain traversal.
#[derive(Debug, Clone)]
pub struct Response {
    pub message: Message,
    pub response_type: ResponseType,
    /// Human-readable provenance, e.g. "BLOCKED (ads)", built from the
    /// request's accumulated `reason` trail plus the terminal stage's note.
    pub reason: String,
}

impl Response {
    pub fn new(message: Message, response_type: ResponseType, reason: impl Into<String>) -> Self {
        Self {
            message,
            response_type,
            reason: reason.into(),
        }
    }

    pub fn with_reason_trail(message: Message, response_type: ResponseType, trail: &[String], terminal: &str) -> Self {
        let mut reason = trail.join("; ");
        if !reason.is_empty() {
            reason.push_str("; ");
        }
        reason.push_str(terminal);
        Self::new(message, response_type, reason)
    }
}
