//! Stable identifier for an analyzed log set.

use crate::types::LogEntry;

/// Deterministic id over the ordered (endpoint, timestamp, status, response time)
/// tuples. Same entries in the same order yield the same id.
pub fn analysis_id(entries: &[LogEntry]) -> String {
  let mut hasher = blake3::Hasher::new();
  for e in entries {
    hasher.update(e.endpoint.as_bytes());
    hasher.update(b"|");
    if let Some(ts) = e.timestamp {
      hasher.update(&ts.timestamp_millis().to_le_bytes());
    }
    hasher.update(b"|");
    hasher.update(&e.status_code.to_le_bytes());
    hasher.update(&e.response_time.to_bits().to_le_bytes());
    hasher.update(b"\n");
  }
  let hex = hasher.finalize().to_hex();
  format!("ana-{}", &hex[..16])
}
