//! Engine configuration with sane defaults.

/// Tunable thresholds for feature scoring.
#[derive(Debug, Clone)]
pub struct Config {
  /// An endpoint is related to a feature when its match score is strictly above this.
  pub match_threshold: f64,
  /// Tokens shorter than this are ignored by keyword matching.
  pub min_token_len: usize,
  /// Drop frequency (percent) above which a related endpoint is called out.
  pub failing_endpoint_pct: f64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      match_threshold: 0.2,
      min_token_len: 4,
      failing_endpoint_pct: 10.0,
    }
  }
}
