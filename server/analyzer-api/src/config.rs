//! Service configuration from environment variables.

use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("configuration error: {0}")]
pub struct ConfigError(String);

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub host: String,
  pub port: u16,
  pub log_level: String,
  /// Request bodies above this are rejected with 413.
  pub max_upload_bytes: usize,
  /// Divisor for per-endpoint daily frequency.
  pub days_in_sample: f64,
  /// Local offset for hour/day bucketing.
  pub utc_offset_minutes: i32,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      host: "127.0.0.1".to_owned(),
      port: 5005,
      log_level: "info".to_owned(),
      max_upload_bytes: 10 * 1024 * 1024,
      days_in_sample: 7.0,
      utc_offset_minutes: 0,
    }
  }
}

impl AppConfig {
  /// Load configuration from environment variables.
  /// Loads `.env` file if present; every variable is optional.
  pub fn from_env() -> Result<Self, ConfigError> {
    // Best-effort .env load; ignore if missing
    let _ = dotenvy::dotenv();
    let defaults = Self::default();

    Ok(Self {
      host: get_var_or("HOST", &defaults.host),
      port: parse_var("PORT", defaults.port)?,
      log_level: get_var_or("LOG_LEVEL", &defaults.log_level),
      max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
      days_in_sample: parse_var("DAYS_IN_SAMPLE", defaults.days_in_sample)?,
      utc_offset_minutes: parse_var("UTC_OFFSET_MINUTES", defaults.utc_offset_minutes)?,
    })
  }

  pub fn bind_addr(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}

fn get_var_or(key: &str, default: &str) -> String {
  env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_var<T>(key: &str, default: T) -> Result<T, ConfigError>
where
  T: std::str::FromStr,
  T::Err: std::fmt::Display,
{
  match env::var(key) {
    Ok(raw) => raw
      .trim()
      .parse()
      .map_err(|e| ConfigError(format!("invalid {key}: {e}"))),
    Err(_) => Ok(default),
  }
}
