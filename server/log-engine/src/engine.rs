//! Core engine: parses uploads and aggregates entries per endpoint.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::Value;

use crate::config::Config;
use crate::error::LogError;
use crate::fingerprint;
use crate::parse;
use crate::stats;
use crate::types::*;

/// The log analysis engine. Stateless apart from its configuration.
pub struct Engine {
  config: Config,
}

impl Engine {
  pub fn new(config: Config) -> Self {
    Self { config }
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default())
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Parse uploaded file content (CSV or JSON, auto-detected).
  pub fn parse(&self, text: &str) -> Result<ParsedLogs, LogError> {
    parse::parse_auto(text, &self.config)
  }

  /// Normalize already-decoded JSON records.
  pub fn parse_values(&self, values: &[Value]) -> ParsedLogs {
    parse::parse_values(values, &self.config)
  }

  /// Per-endpoint statistics, busiest endpoint first (ties by endpoint name).
  pub fn endpoint_statistics(&self, entries: &[LogEntry]) -> Vec<EndpointStatistic> {
    let mut out: Vec<EndpointStatistic> = group_by_endpoint(entries)
      .into_iter()
      .map(|(endpoint, group)| endpoint_statistic(endpoint, &group, &self.config))
      .collect();
    // Groups come out of the BTreeMap name-ordered, so a stable sort keeps the tie-break.
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
  }

  /// Whole-set analysis of a parsed upload.
  pub fn analyze(&self, parsed: &ParsedLogs) -> LogAnalysis {
    let entries = &parsed.entries;
    let offset = self.config.offset();
    let total = entries.len() as u64;

    let endpoints = self.endpoint_statistics(entries);
    let times = stats::sorted_response_times(entries);
    let hours = stats::hourly_distribution(entries, &offset);
    let successes = entries.iter().filter(|e| e.is_success()).count() as u64;
    let failures = entries.iter().filter(|e| e.is_failure()).count() as u64;

    let unique_ips = entries
      .iter()
      .filter(|e| !e.ip.is_empty())
      .map(|e| e.ip.as_str())
      .collect::<HashSet<_>>()
      .len() as u64;
    let unique_users = entries
      .iter()
      .filter_map(LogEntry::client_key)
      .collect::<HashSet<_>>()
      .len() as u64;

    let timestamps = entries.iter().filter_map(|e| e.timestamp);
    let time_range = match (timestamps.clone().min(), timestamps.max()) {
      (Some(start), Some(end)) => Some(TimeRange { start, end }),
      _ => None,
    };

    let slowest_endpoints = ranked(&endpoints, self.config.top_n, |a, b| {
      b.avg_response_time.total_cmp(&a.avg_response_time)
    });
    let failing: Vec<EndpointStatistic> = endpoints
      .iter()
      .filter(|s| s.drop_frequency > 0.0)
      .cloned()
      .collect();
    let error_prone_endpoints = ranked(&failing, self.config.top_n, |a, b| {
      b.drop_frequency
        .total_cmp(&a.drop_frequency)
        .then(b.count.cmp(&a.count))
    });

    LogAnalysis {
      analysis_id: fingerprint::analysis_id(entries),
      total_requests: total,
      skipped_rows: parsed.skipped as u64,
      unique_endpoints: endpoints.len() as u64,
      unique_ips,
      unique_users,
      success_rate: stats::rate(successes, total),
      error_rate: stats::rate(failures, total),
      avg_response_time: stats::mean(&times),
      p50: stats::percentile(&times, 50.0),
      p95: stats::percentile(&times, 95.0),
      p99: stats::percentile(&times, 99.0),
      peak_hour: stats::peak_hour(&hours),
      time_range,
      status_codes: stats::status_distribution(entries),
      methods: stats::method_distribution(entries),
      hourly_distribution: hours.to_vec(),
      daily_distribution: stats::daily_distribution(entries, &offset),
      endpoints,
      slowest_endpoints,
      error_prone_endpoints,
    }
  }

  /// Drill-down for one endpoint (exact string match). `None` when no entry matches.
  pub fn endpoint_report(&self, entries: &[LogEntry], endpoint: &str) -> Option<EndpointReport> {
    let group: Vec<&LogEntry> = entries.iter().filter(|e| e.endpoint == endpoint).collect();
    if group.is_empty() {
      return None;
    }
    let offset = self.config.offset();
    let members = || group.iter().copied();

    let mut clients: HashMap<&str, u64> = HashMap::new();
    for key in members().filter_map(LogEntry::client_key) {
      *clients.entry(key).or_insert(0) += 1;
    }
    let mut top_clients: Vec<ClientCount> = clients
      .into_iter()
      .map(|(client, count)| ClientCount {
        client: client.to_string(),
        count,
      })
      .collect();
    top_clients.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.client.cmp(&b.client)));
    top_clients.truncate(self.config.top_n);

    let mut recent_errors: Vec<LogEntry> = members().filter(|e| e.is_failure()).cloned().collect();
    // Newest first; entries without a timestamp sort last.
    recent_errors.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    recent_errors.truncate(self.config.recent_errors);

    Some(EndpointReport {
      statistic: endpoint_statistic(endpoint, &group, &self.config),
      status_codes: stats::status_distribution(members()),
      hourly_distribution: stats::hourly_distribution(members(), &offset).to_vec(),
      daily_distribution: stats::daily_distribution(members(), &offset),
      top_clients,
      recent_errors,
    })
  }
}

/// Group by exact endpoint string; no path-parameter normalization.
fn group_by_endpoint(entries: &[LogEntry]) -> BTreeMap<&str, Vec<&LogEntry>> {
  let mut groups: BTreeMap<&str, Vec<&LogEntry>> = BTreeMap::new();
  for e in entries {
    groups.entry(e.endpoint.as_str()).or_default().push(e);
  }
  groups
}

fn endpoint_statistic(endpoint: &str, group: &[&LogEntry], config: &Config) -> EndpointStatistic {
  let count = group.len() as u64;
  let members = || group.iter().copied();
  let times = stats::sorted_response_times(members());
  let successes = members().filter(|e| e.is_success()).count() as u64;
  let failures = members().filter(|e| e.is_failure()).count() as u64;
  let hours = stats::hourly_distribution(members(), &config.offset());
  let unique_users = members()
    .filter_map(LogEntry::client_key)
    .collect::<HashSet<_>>()
    .len() as u64;

  EndpointStatistic {
    endpoint: endpoint.to_string(),
    count,
    success_rate: stats::rate(successes, count),
    drop_frequency: stats::rate(failures, count),
    avg_response_time: stats::mean(&times),
    min_response_time: times.first().copied().unwrap_or(0.0),
    max_response_time: times.last().copied().unwrap_or(0.0),
    p50: stats::percentile(&times, 50.0),
    p95: stats::percentile(&times, 95.0),
    p99: stats::percentile(&times, 99.0),
    peak_hour: stats::peak_hour(&hours),
    daily_frequency: count as f64 / config.effective_days(),
    unique_users,
    methods: stats::method_distribution(members()),
  }
}

/// Endpoint names of the top `n` statistics under `order` (ties by name).
fn ranked(
  statistics: &[EndpointStatistic],
  n: usize,
  order: impl Fn(&EndpointStatistic, &EndpointStatistic) -> std::cmp::Ordering,
) -> Vec<String> {
  let mut sorted: Vec<&EndpointStatistic> = statistics.iter().collect();
  sorted.sort_by(|a, b| order(a, b).then_with(|| a.endpoint.cmp(&b.endpoint)));
  sorted.into_iter().take(n).map(|s| s.endpoint.clone()).collect()
}
