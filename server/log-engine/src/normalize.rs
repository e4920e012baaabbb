//! Normalize raw records (CSV rows, JSON objects) into canonical LogEntry models.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

use crate::error::LogError;
use crate::types::{LogEntry, RawRecord};

// Column aliases, lowercase, in precedence order.
const ID: &[&str] = &["id", "_id"];
const IP: &[&str] = &["ip", "public_ip", "clientip"];
pub(crate) const ENDPOINT: &[&str] = &["requestendpoint", "request_path", "url", "endpoint", "path"];
const STATUS: &[&str] = &["responsecode", "status_code", "status", "statuscode"];
const RESPONSE_TIME: &[&str] = &["responsetime", "response_time", "duration"];
const USER_AGENT: &[&str] = &["useragent", "user_agent"];
const METHOD: &[&str] = &["method", "request_method"];
const USERNAME: &[&str] = &["username", "user"];
const DEVICE_ID: &[&str] = &["deviceid", "device_id"];
const REQUEST_BODY: &[&str] = &["requestbody"];
const RESPONSE_BODY: &[&str] = &["responsebody"];
const TIMESTAMP: &[&str] = &["createdat", "timestamp", "created_at"];

const NAIVE_FORMATS: &[&str] = &[
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y/%m/%d %H:%M:%S%.f",
  "%Y-%m-%d %H:%M",
];

/// Whether any of the given (lowercase) headers can supply an endpoint.
pub fn has_endpoint_column(headers: &[String]) -> bool {
  headers.iter().any(|h| ENDPOINT.contains(&h.as_str()))
}

/// Build a LogEntry from a raw record. Fails only when no endpoint value is present.
pub fn normalize(raw: &RawRecord, offset: &FixedOffset) -> Result<LogEntry, LogError> {
  let endpoint = lookup(raw, ENDPOINT)
    .ok_or_else(|| LogError::validation("endpoint", "missing endpoint/path value"))?;

  let status_code = lookup(raw, STATUS).and_then(parse_status).unwrap_or(200);
  let response_time = lookup(raw, RESPONSE_TIME)
    .and_then(parse_response_time)
    .unwrap_or(0.0);
  let timestamp = lookup(raw, TIMESTAMP).and_then(|s| parse_timestamp(s, offset));

  Ok(LogEntry {
    id: owned(raw, ID),
    timestamp,
    ip: owned(raw, IP).unwrap_or_default(),
    endpoint: endpoint.to_string(),
    method: lookup(raw, METHOD).map(|m| m.to_ascii_uppercase()),
    status_code,
    response_time,
    user_agent: owned(raw, USER_AGENT),
    username: owned(raw, USERNAME),
    device_id: owned(raw, DEVICE_ID),
    request_body: owned(raw, REQUEST_BODY),
    response_body: owned(raw, RESPONSE_BODY),
  })
}

/// First non-blank value among the aliases.
fn lookup<'a>(raw: &'a RawRecord, aliases: &[&str]) -> Option<&'a str> {
  aliases
    .iter()
    .filter_map(|k| raw.get(*k))
    .map(|v| v.trim())
    .find(|v| !v.is_empty())
}

fn owned(raw: &RawRecord, aliases: &[&str]) -> Option<String> {
  lookup(raw, aliases).map(str::to_string)
}

/// Accepts "404" and "404.0"; anything else is unknown.
fn parse_status(s: &str) -> Option<u16> {
  if let Ok(code) = s.parse::<u16>() {
    return Some(code);
  }
  let f = s.parse::<f64>().ok()?;
  (f.is_finite() && f >= 0.0 && f <= u16::MAX as f64 && f.fract() == 0.0).then_some(f as u16)
}

/// Milliseconds; tolerates a trailing "ms".
fn parse_response_time(s: &str) -> Option<f64> {
  let s = s.strip_suffix("ms").unwrap_or(s).trim();
  let v = s.parse::<f64>().ok()?;
  (v.is_finite() && v >= 0.0).then_some(v)
}

/// Parse a timestamp into the configured local offset.
///
/// Supported: RFC 3339, naive date-times (interpreted as local), bare dates,
/// integer epoch milliseconds.
pub fn parse_timestamp(s: &str, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
  let s = s.trim();
  if s.is_empty() {
    return None;
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.with_timezone(offset));
  }
  if s.bytes().all(|b| b.is_ascii_digit()) {
    let millis = s.parse::<i64>().ok()?;
    return DateTime::from_timestamp_millis(millis).map(|dt| dt.with_timezone(offset));
  }
  let naive = NAIVE_FORMATS
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    .or_else(|| {
      NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    })?;
  offset.from_local_datetime(&naive).single()
}

/// Flatten a JSON object into a raw record. Scalars become their text form,
/// nested values their compact JSON; nulls are dropped.
pub fn record_from_json(obj: &serde_json::Map<String, serde_json::Value>) -> RawRecord {
  obj
    .iter()
    .filter_map(|(k, v)| {
      let text = match v {
        serde_json::Value::Null => return None,
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
      };
      Some((k.to_ascii_lowercase(), text))
    })
    .collect()
}
