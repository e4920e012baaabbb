//! Upload parsing: CSV and JSON log files into normalized entries.
//!
//! Malformed records are skipped and counted; they never abort the rest of the file.
//! CSV rows are one per physical line, so a broken row costs only that line.

use chrono::FixedOffset;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::LogError;
use crate::normalize;
use crate::types::{ParsedLogs, RawRecord};

/// Parse CSV with a header row. Header names are matched case-insensitively.
pub fn parse_csv(text: &str, config: &Config) -> Result<ParsedLogs, LogError> {
  if text.trim().is_empty() {
    return Ok(ParsedLogs::default());
  }

  let mut reader = csv::ReaderBuilder::new()
    .has_headers(true)
    .trim(csv::Trim::All)
    .from_reader(text.as_bytes());

  let headers: Vec<String> = reader
    .headers()?
    .iter()
    .map(|h| h.trim_start_matches('\u{feff}').to_ascii_lowercase())
    .collect();
  if !normalize::has_endpoint_column(&headers) {
    return Err(LogError::validation(
      "file",
      &format!(
        "no endpoint column; expected one of {}",
        normalize::ENDPOINT.join(", ")
      ),
    ));
  }

  let offset = config.offset();
  let mut parsed = ParsedLogs::default();
  let mut rest = &text[reader.position().byte() as usize..];
  // Physical lines before `rest`.
  let mut line_base = reader.position().line().saturating_sub(1);
  while let Some(resume) = read_rows(rest, line_base, &headers, &offset, &mut parsed) {
    line_base += rest[..resume].matches('\n').count() as u64;
    rest = &rest[resume..];
  }
  Ok(parsed)
}

/// Read rows until one is malformed, then return the byte offset of the line after
/// its first line so the caller can restart there. A row is malformed when its field
/// count differs from the header or a quoted field runs across a line break; an
/// unbalanced quote would otherwise swallow every following row.
fn read_rows(
  text: &str,
  line_base: u64,
  headers: &[String],
  offset: &FixedOffset,
  parsed: &mut ParsedLogs,
) -> Option<usize> {
  let mut reader = csv::ReaderBuilder::new()
    .has_headers(false)
    .flexible(true)
    .trim(csv::Trim::All)
    .from_reader(text.as_bytes());
  let mut row = csv::StringRecord::new();
  loop {
    let start = match reader.read_record(&mut row) {
      Ok(false) => return None,
      Ok(true) => row.position().cloned(),
      Err(e) => {
        let start = e.position().cloned();
        debug!(line = start.as_ref().map(|p| line_base + p.line()), error = %e, "skipping unreadable csv row");
        parsed.skipped += 1;
        return start.and_then(|p| line_after(text, p.byte() as usize));
      }
    };
    let line = start.as_ref().map(|p| line_base + p.line());

    if row.len() != headers.len() || row.iter().any(|f| f.contains('\n')) {
      debug!(line, fields = row.len(), expected = headers.len(), "skipping malformed csv row");
      parsed.skipped += 1;
      return start.and_then(|p| line_after(text, p.byte() as usize));
    }

    let raw: RawRecord = headers
      .iter()
      .cloned()
      .zip(row.iter().map(str::to_string))
      .collect();
    match normalize::normalize(&raw, offset) {
      Ok(entry) => parsed.entries.push(entry),
      Err(e) => {
        debug!(line, error = %e, "skipping csv row");
        parsed.skipped += 1;
      }
    }
  }
}

/// Offset of the line following the first non-blank line at or after `start`.
fn line_after(text: &str, start: usize) -> Option<usize> {
  let tail = &text[start..];
  let body = start + (tail.len() - tail.trim_start_matches(['\r', '\n']).len());
  text[body..].find('\n').map(|i| body + i + 1)
}

/// Parse JSON logs: an array of objects, an object with a `logs` array, a single
/// object, or JSON lines.
pub fn parse_json(text: &str, config: &Config) -> Result<ParsedLogs, LogError> {
  let trimmed = text.trim();
  if trimmed.is_empty() {
    return Ok(ParsedLogs::default());
  }

  match serde_json::from_str::<Value>(trimmed) {
    Ok(Value::Array(items)) => Ok(parse_values(&items, config)),
    Ok(Value::Object(mut map)) => match map.remove("logs") {
      Some(Value::Array(items)) => Ok(parse_values(&items, config)),
      Some(_) => Err(LogError::validation("logs", "expected an array")),
      None => Ok(parse_values(&[Value::Object(map)], config)),
    },
    Ok(_) => Err(LogError::validation("file", "expected a JSON array or object")),
    // More than one top-level value: treat as JSON lines.
    Err(_) if trimmed.starts_with('{') && trimmed.contains('\n') => Ok(parse_json_lines(trimmed, config)),
    Err(e) => Err(e.into()),
  }
}

/// Normalize already-decoded JSON values. Non-objects and objects without an
/// endpoint are skipped.
pub fn parse_values(values: &[Value], config: &Config) -> ParsedLogs {
  let offset = config.offset();
  let mut parsed = ParsedLogs::default();
  for (idx, value) in values.iter().enumerate() {
    let Some(obj) = value.as_object() else {
      debug!(index = idx, "skipping non-object log record");
      parsed.skipped += 1;
      continue;
    };
    match normalize::normalize(&normalize::record_from_json(obj), &offset) {
      Ok(entry) => parsed.entries.push(entry),
      Err(e) => {
        debug!(index = idx, error = %e, "skipping log record");
        parsed.skipped += 1;
      }
    }
  }
  parsed
}

fn parse_json_lines(text: &str, config: &Config) -> ParsedLogs {
  let mut values = Vec::new();
  let mut bad_lines = 0;
  for (idx, line) in text.lines().enumerate() {
    let line = line.trim();
    if line.is_empty() {
      continue;
    }
    match serde_json::from_str::<Value>(line) {
      Ok(v) => values.push(v),
      Err(e) => {
        debug!(line = idx + 1, error = %e, "skipping unreadable json line");
        bad_lines += 1;
      }
    }
  }
  let mut parsed = parse_values(&values, config);
  parsed.skipped += bad_lines;
  parsed
}

/// JSON when the content starts with `[` or `{`, CSV otherwise.
pub fn parse_auto(text: &str, config: &Config) -> Result<ParsedLogs, LogError> {
  let body = text.trim_start_matches('\u{feff}').trim_start();
  if body.starts_with('[') || body.starts_with('{') {
    parse_json(body, config)
  } else {
    parse_csv(body, config)
  }
}
