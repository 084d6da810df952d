use blocky_domain::record::RecordType;
use compact_str::CompactString;

/// `(qtype, lowercased name)` — the response cache key (§3).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub qtype: RecordType,
    pub name: CompactString,
}

impl CacheKey {
    pub fn new(name: &str, qtype: RecordType) -> Self {
        Self { qtype, name: CompactString::from(name.to_ascii_lowercase()) }
    }
}
