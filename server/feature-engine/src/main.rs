//! Binary entrypoint: read one JSON object from stdin, write one to stdout.

use feature_engine::{run, Input};
use std::io::{self, Read, Write};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .init();

  if let Err(e) = run_binary() {
    error!(error = %e, "feature-engine failed");
    std::process::exit(1);
  }
}

fn run_binary() -> Result<(), Box<dyn std::error::Error>> {
  let mut raw = String::new();
  io::stdin().lock().read_to_string(&mut raw)?;
  let input: Input = serde_json::from_str(&raw)?;

  let out = run(&input)?;
  let json = serde_json::to_vec(&out)?;
  io::stdout().write_all(&json)?;
  Ok(())
}
