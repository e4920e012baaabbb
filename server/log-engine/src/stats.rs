//! Statistics primitives: rates, means, percentiles, hour/day histograms.

use chrono::{FixedOffset, Timelike};
use std::collections::BTreeMap;

use crate::types::{DayCount, LogEntry};

/// 100 * part / total; 0 when total is 0.
pub fn rate(part: u64, total: u64) -> f64 {
  if total == 0 {
    0.0
  } else {
    100.0 * part as f64 / total as f64
  }
}

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
  if values.is_empty() {
    0.0
  } else {
    values.iter().sum::<f64>() / values.len() as f64
  }
}

/// Nearest-rank percentile over an ascending-sorted slice.
///
/// Index is `ceil(p / 100 * n) - 1`, clamped to `[0, n - 1]`. Empty slice yields 0.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
  if sorted.is_empty() {
    return 0.0;
  }
  let n = sorted.len();
  let rank = (p / 100.0 * n as f64).ceil() - 1.0;
  let idx = if rank.is_nan() || rank < 0.0 {
    0
  } else {
    (rank as usize).min(n - 1)
  };
  sorted[idx]
}

/// Response times in ascending order.
pub fn sorted_response_times<'a>(entries: impl IntoIterator<Item = &'a LogEntry>) -> Vec<f64> {
  let mut times: Vec<f64> = entries.into_iter().map(|e| e.response_time).collect();
  times.sort_by(f64::total_cmp);
  times
}

/// Request counts per hour of day (local offset). Entries without a timestamp are ignored.
pub fn hourly_distribution<'a>(
  entries: impl IntoIterator<Item = &'a LogEntry>,
  offset: &FixedOffset,
) -> [u64; 24] {
  let mut hours = [0u64; 24];
  for ts in entries.into_iter().filter_map(|e| e.timestamp) {
    hours[ts.with_timezone(offset).hour() as usize] += 1;
  }
  hours
}

/// Hour with the most requests; ties go to the earliest hour, empty histogram gives 0.
pub fn peak_hour(hours: &[u64; 24]) -> u8 {
  let mut best = 0usize;
  for (hour, &count) in hours.iter().enumerate() {
    if count > hours[best] {
      best = hour;
    }
  }
  best as u8
}

/// Per-day request and failure counts (local offset), oldest first.
pub fn daily_distribution<'a>(
  entries: impl IntoIterator<Item = &'a LogEntry>,
  offset: &FixedOffset,
) -> Vec<DayCount> {
  let mut days: BTreeMap<chrono::NaiveDate, (u64, u64)> = BTreeMap::new();
  for e in entries {
    let Some(ts) = e.timestamp else { continue };
    let slot = days.entry(ts.with_timezone(offset).date_naive()).or_default();
    slot.0 += 1;
    if e.is_failure() {
      slot.1 += 1;
    }
  }
  days
    .into_iter()
    .map(|(date, (count, failures))| DayCount {
      date: date.format("%Y-%m-%d").to_string(),
      count,
      failures,
    })
    .collect()
}

pub fn status_distribution<'a>(entries: impl IntoIterator<Item = &'a LogEntry>) -> BTreeMap<u16, u64> {
  let mut out = BTreeMap::new();
  for e in entries {
    *out.entry(e.status_code).or_insert(0) += 1;
  }
  out
}

/// Counts per HTTP method; entries without a method are not counted.
pub fn method_distribution<'a>(
  entries: impl IntoIterator<Item = &'a LogEntry>,
) -> BTreeMap<String, u64> {
  let mut out = BTreeMap::new();
  for method in entries.into_iter().filter_map(|e| e.method.as_deref()) {
    *out.entry(method.to_string()).or_insert(0) += 1;
  }
  out
}
