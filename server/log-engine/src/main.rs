//! Binary entrypoint: read a CSV or JSON log file from stdin, write one LogAnalysis to stdout.
//!
//! Environment:
//! - `DAYS_IN_SAMPLE`: divisor for per-endpoint daily frequency (default 7)
//! - `UTC_OFFSET_MINUTES`: local offset for hour/day bucketing (default 0)
//!
//! On failure a single ErrorOutput object is written instead and the exit code is 1.

use log_engine::types::ErrorOutput;
use log_engine::{Config, Engine, LogError};
use std::io::{self, Read, Write};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .init();

  let mut out = io::stdout().lock();
  if let Err(e) = run_binary(&mut out) {
    error!(error = %e, "log-engine failed");
    let err = match &e {
      LogError::Validation { field, reason } => ErrorOutput::new(reason.clone()).with_field(field.clone()),
      _ => ErrorOutput::new(e.to_string()),
    };
    let _ = serde_json::to_writer(&mut out, &err);
    let _ = writeln!(out);
    std::process::exit(1);
  }
}

fn run_binary(out: &mut impl Write) -> Result<(), LogError> {
  let config = config_from_env()?;
  let mut raw = String::new();
  io::stdin()
    .lock()
    .read_to_string(&mut raw)
    .map_err(|e| LogError::parse(format!("read stdin: {}", e)))?;

  let engine = Engine::new(config);
  let parsed = engine.parse(&raw)?;
  let analysis = engine.analyze(&parsed);
  info!(
    entries = parsed.entries.len(),
    skipped = parsed.skipped,
    endpoints = analysis.unique_endpoints,
    "analyzed logs"
  );

  serde_json::to_writer(&mut *out, &analysis)?;
  writeln!(out).map_err(|e| LogError::parse(format!("write stdout: {}", e)))?;
  Ok(())
}

fn config_from_env() -> Result<Config, LogError> {
  let mut config = Config::default();
  if let Ok(days) = std::env::var("DAYS_IN_SAMPLE") {
    config.days_in_sample = days
      .parse()
      .map_err(|_| LogError::validation("DAYS_IN_SAMPLE", "must be a number"))?;
  }
  if let Ok(minutes) = std::env::var("UTC_OFFSET_MINUTES") {
    config.utc_offset_minutes = minutes
      .parse()
      .map_err(|_| LogError::validation("UTC_OFFSET_MINUTES", "must be an integer"))?;
  }
  Ok(config)
}
