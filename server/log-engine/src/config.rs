//! Engine configuration with sane defaults.

use chrono::{FixedOffset, Offset, Utc};

/// Tunables for log aggregation.
#[derive(Debug, Clone)]
pub struct Config {
  /// Number of days the sample is assumed to span. `daily_frequency` divides by this
  /// constant; it is never derived from the data.
  pub days_in_sample: f64,
  /// Offset (minutes east of UTC) used as "local time" for hour/day bucketing and for
  /// timestamps that carry no zone.
  pub utc_offset_minutes: i32,
  /// Length of the slowest / error-prone endpoint lists and of top-client rankings.
  pub top_n: usize,
  /// Number of failed requests listed in an endpoint report.
  pub recent_errors: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      days_in_sample: 7.0,
      utc_offset_minutes: 0,
      top_n: 5,
      recent_errors: 10,
    }
  }
}

impl Config {
  /// The configured local offset; out-of-range values fall back to UTC.
  pub fn offset(&self) -> FixedOffset {
    FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
      .unwrap_or_else(|| Utc.fix())
  }

  /// Sample span used as divisor; anything below one day counts as one day.
  pub fn effective_days(&self) -> f64 {
    if self.days_in_sample.is_finite() && self.days_in_sample >= 1.0 {
      self.days_in_sample
    } else {
      1.0
    }
  }
}
