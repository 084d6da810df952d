use crate::record::RecordType;
use crate::response::ResponseType;
use std::net::IpAddr;
use std::time::Duration;

/// One entry fanned out by the query-log stage (§4.9). Writers (file, db,
/// stdout, or none) receive these through the `QueryLogWriter` port;
/// persistence beyond an append-only writer interface is out of scope.
#[derive(Debug, Clone)]
pub struct QueryLog {
    pub domain: String,
    pub record_type: RecordType,
    pub client_ip: IpAddr,
    pub response_type: ResponseType,
    pub duration: Duration,
    pub reason: String,
}

/// Aggregate counters exposed by the metrics stage; computing them never
/// fails, so this type has no fallible constructors.
#[derive(Debug, Clone, Default)]
pub struct QueryStats {
    pub queries_total: u64,
    pub queries_blocked: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

impl QueryStats {
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}
