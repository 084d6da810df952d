use async_trait::async_trait;
use blocky_domain::QueryLog;

/// Append-only sink for completed query-log entries (§4.9, §1 non-goal:
/// persistence beyond this interface is out of scope). Implementations may
/// write to a file, a database, stdout, or discard entries entirely;
/// the stage only requires that `write` never blocks the return path
/// beyond bounded buffering.
#[async_trait]
pub trait QueryLogWriter: Send + Sync {
    async fn write(&self, entry: QueryLog);
}
