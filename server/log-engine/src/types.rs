//! Core types for the log engine (normalized entries + JSON output contracts).

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Inbound records
// ---------------------------------------------------------------------------

/// One raw log record before normalization: lowercase column name -> cell text.
/// CSV rows and JSON objects are both flattened into this shape.
pub type RawRecord = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Normalized entry
// ---------------------------------------------------------------------------

/// Canonical log entry after column-alias resolution and defaulting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  /// `None` when the source timestamp was missing or unparseable.
  pub timestamp: Option<DateTime<FixedOffset>>,
  pub ip: String,
  pub endpoint: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub method: Option<String>,
  pub status_code: u16,
  /// Milliseconds.
  pub response_time: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub user_agent: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub username: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub device_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub request_body: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub response_body: Option<String>,
}

impl LogEntry {
  /// Minimal entry; every optional field empty.
  pub fn new(endpoint: impl Into<String>, status_code: u16, response_time: f64) -> Self {
    Self {
      id: None,
      timestamp: None,
      ip: String::new(),
      endpoint: endpoint.into(),
      method: None,
      status_code,
      response_time,
      user_agent: None,
      username: None,
      device_id: None,
      request_body: None,
      response_body: None,
    }
  }

  pub fn with_timestamp(mut self, ts: DateTime<FixedOffset>) -> Self {
    self.timestamp = Some(ts);
    self
  }

  /// 2xx and 3xx.
  pub fn is_success(&self) -> bool {
    (200..400).contains(&self.status_code)
  }

  /// 4xx and 5xx.
  pub fn is_failure(&self) -> bool {
    self.status_code >= 400
  }

  /// Who made the request: username, else device id, else IP. `None` if all are blank.
  pub fn client_key(&self) -> Option<&str> {
    [self.username.as_deref(), self.device_id.as_deref(), Some(self.ip.as_str())]
      .into_iter()
      .flatten()
      .find(|s| !s.is_empty())
  }
}

/// Result of parsing one upload: the usable entries plus how many records were dropped.
#[derive(Debug, Clone, Default)]
pub struct ParsedLogs {
  pub entries: Vec<LogEntry>,
  pub skipped: usize,
}

// ---------------------------------------------------------------------------
// Output types (JSON contract)
// ---------------------------------------------------------------------------

/// Aggregate statistics for one endpoint string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointStatistic {
  pub endpoint: String,
  pub count: u64,
  /// Percent of requests with 200 <= status < 400.
  pub success_rate: f64,
  /// Percent of requests with status >= 400.
  pub drop_frequency: f64,
  pub avg_response_time: f64,
  pub min_response_time: f64,
  pub max_response_time: f64,
  pub p50: f64,
  pub p95: f64,
  pub p99: f64,
  pub peak_hour: u8,
  pub daily_frequency: f64,
  pub unique_users: u64,
  pub methods: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCount {
  /// `YYYY-MM-DD` in the configured local offset.
  pub date: String,
  pub count: u64,
  pub failures: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeRange {
  pub start: DateTime<FixedOffset>,
  pub end: DateTime<FixedOffset>,
}

/// Whole-upload summary returned by the upload route and the CLI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogAnalysis {
  pub analysis_id: String,
  pub total_requests: u64,
  pub skipped_rows: u64,
  pub unique_endpoints: u64,
  pub unique_ips: u64,
  pub unique_users: u64,
  pub success_rate: f64,
  pub error_rate: f64,
  pub avg_response_time: f64,
  pub p50: f64,
  pub p95: f64,
  pub p99: f64,
  pub peak_hour: u8,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub time_range: Option<TimeRange>,
  pub status_codes: BTreeMap<u16, u64>,
  pub methods: BTreeMap<String, u64>,
  pub hourly_distribution: Vec<u64>,
  pub daily_distribution: Vec<DayCount>,
  pub endpoints: Vec<EndpointStatistic>,
  pub slowest_endpoints: Vec<String>,
  pub error_prone_endpoints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientCount {
  pub client: String,
  pub count: u64,
}

/// Drill-down for a single endpoint (feeds the PDF report).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointReport {
  pub statistic: EndpointStatistic,
  pub status_codes: BTreeMap<u16, u64>,
  pub hourly_distribution: Vec<u64>,
  pub daily_distribution: Vec<DayCount>,
  pub top_clients: Vec<ClientCount>,
  pub recent_errors: Vec<LogEntry>,
}

// ---------------------------------------------------------------------------
// CLI stream wrappers
// ---------------------------------------------------------------------------

/// Structured error output for the stdin/stdout binary.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub field: Option<String>,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
      field: None,
    }
  }

  pub fn with_field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }
}
