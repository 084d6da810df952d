use std::fmt;
use std::str::FromStr;

/// The subset of DNS question types the core understands directly.
///
/// Types outside this set are still forwarded to upstream verbatim by the
/// chain (the chain does not need to interpret every RR type to proxy it),
/// but catalogs, caching, and block synthesis only reason about these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordType {
    A,
    AAAA,
    CNAME,
    MX,
    TXT,
    PTR,
    SRV,
    NS,
    SOA,
    Other(u16),
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::CNAME => "CNAME",
            RecordType::MX => "MX",
            RecordType::TXT => "TXT",
            RecordType::PTR => "PTR",
            RecordType::SRV => "SRV",
            RecordType::NS => "NS",
            RecordType::SOA => "SOA",
            RecordType::Other(_) => "OTHER",
        }
    }

    pub fn is_cacheable(&self) -> bool {
        // every class-IN answer type is cacheable; only the closed set of
        // auxiliary stage answers (e.g. synthesized blocks) bypass the cache.
        true
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::Other(code) => write!(f, "TYPE{code}"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::AAAA),
            "CNAME" => Ok(RecordType::CNAME),
            "MX" => Ok(RecordType::MX),
            "TXT" => Ok(RecordType::TXT),
            "PTR" => Ok(RecordType::PTR),
            "SRV" => Ok(RecordType::SRV),
            "NS" => Ok(RecordType::NS),
            "SOA" => Ok(RecordType::SOA),
            other => other
                .parse::<u16>()
                .map(RecordType::Other)
                .map_err(|_| format!("invalid record type: {s}")),
        }
    }
}
