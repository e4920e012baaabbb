//! Traffic impact: how much logged traffic flows through a feature's related endpoints.

use std::collections::HashSet;

use log_engine::{EndpointStatistic, LogEntry};

use crate::types::{RelatedEndpoint, TrafficImpact};

/// Aggregate endpoint statistics over the related endpoints. Users are counted once
/// across all of them, by client key.
pub fn compute_traffic_impact(
  related: &[RelatedEndpoint],
  statistics: &[EndpointStatistic],
  entries: &[LogEntry],
) -> TrafficImpact {
  let is_related = |endpoint: &str| related.iter().any(|r| r.endpoint == endpoint);
  let hits: Vec<&EndpointStatistic> = statistics
    .iter()
    .filter(|s| is_related(s.endpoint.as_str()))
    .collect();
  let unique_users = entries
    .iter()
    .filter(|e| is_related(e.endpoint.as_str()))
    .filter_map(LogEntry::client_key)
    .collect::<HashSet<_>>()
    .len() as u64;

  let affected_requests: u64 = hits.iter().map(|s| s.count).sum();
  let weighted_time: f64 = hits
    .iter()
    .map(|s| s.avg_response_time * s.count as f64)
    .sum();

  TrafficImpact {
    affected_endpoints: hits.len() as u64,
    affected_requests,
    traffic_share: log_engine::stats::rate(affected_requests, entries.len() as u64),
    avg_response_time: if affected_requests == 0 {
      0.0
    } else {
      weighted_time / affected_requests as f64
    },
    worst_drop_frequency: hits
      .iter()
      .map(|s| s.drop_frequency)
      .fold(0.0, f64::max),
    unique_users,
  }
}
