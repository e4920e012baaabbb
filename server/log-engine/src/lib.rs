//! Feature Analyzer Log Engine — deterministic access-log aggregation.
//!
//! Parses uploaded CSV/JSON logs (flexible column naming, malformed rows skipped),
//! groups entries by exact endpoint string, and computes per-endpoint success and
//! drop rates, response-time percentiles, peak hour, and hour/day histograms.
//!
//! No DB, no network; pure computation over in-memory entries.

pub mod config;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod normalize;
pub mod parse;
pub mod stats;
pub mod types;

pub use config::Config;
pub use engine::Engine;
pub use error::LogError;
pub use types::{EndpointReport, EndpointStatistic, LogAnalysis, LogEntry, ParsedLogs};
