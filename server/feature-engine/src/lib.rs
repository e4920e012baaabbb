//! Feature Analyzer Feature Engine — rule-based prioritization; no AI, no DB, no network.
//! Used by the API as a library and by the binary for stdin/stdout.

mod config;
mod error;
mod impact;
mod matching;
mod rice;
mod risk;
mod score;
mod types;

use std::collections::BTreeSet;
use tracing::debug;

pub use config::Config;
pub use error::FeatureError;
pub use matching::{match_score, tokenize};
pub use rice::compute_rice;
pub use types::{FeatureInput, FeatureReport, Input, Level, Output, RelatedEndpoint, TrafficImpact};

/// Run the engine with default thresholds and default log settings.
pub fn run(input: &Input) -> Result<Output, FeatureError> {
  run_with(input, &Config::default(), &log_engine::Engine::with_defaults())
}

/// Run the engine on parsed input and return the reports, best priority first (no I/O).
/// `logs` is the engine that parses and aggregates `input.logs`.
pub fn run_with(
  input: &Input,
  config: &Config,
  logs: &log_engine::Engine,
) -> Result<Output, FeatureError> {
  for (idx, feature) in input.features.iter().enumerate() {
    if feature.name.trim().is_empty() {
      return Err(FeatureError::validation(
        &format!("features[{}].name", idx),
        "must not be empty",
      ));
    }
  }

  // Log statistics are optional; without logs there is no traffic impact.
  let parsed = logs.parse_values(&input.logs);
  let statistics = logs.endpoint_statistics(&parsed.entries);
  let total_requests = parsed.entries.len() as u64;
  let has_logs = !parsed.entries.is_empty();

  let endpoints: BTreeSet<&str> = input
    .endpoints
    .iter()
    .map(String::as_str)
    .chain(statistics.iter().map(|s| s.endpoint.as_str()))
    .collect();

  debug!(
    features = input.features.len(),
    endpoints = endpoints.len(),
    log_entries = total_requests,
    "scoring features"
  );

  let scores: Vec<f64> = input
    .features
    .iter()
    .map(|f| compute_rice(f.reach, f.impact, f.confidence, f.effort))
    .collect();
  let ranked: Vec<(&str, f64)> = input
    .features
    .iter()
    .zip(&scores)
    .map(|(f, &s)| (f.name.as_str(), s))
    .collect();
  let priorities = rice::assign_priorities(&ranked);

  let mut features: Vec<FeatureReport> = input
    .features
    .iter()
    .zip(scores)
    .zip(priorities)
    .map(|((feature, rice_score), (priority_rank, priority_tier))| {
      let text = format!("{} {}", feature.name, feature.description);
      let risk_flags = risk::compute_risk_flags(&text);
      let related = matching::related_endpoints(&text, endpoints.iter().copied(), config);
      let traffic_impact =
        has_logs.then(|| impact::compute_traffic_impact(&related, &statistics, &parsed.entries));
      let explanations = score::compute_explanations(
        &risk_flags,
        traffic_impact.as_ref(),
        rice_score,
        feature.rice_score,
        config.failing_endpoint_pct,
      );

      FeatureReport {
        name: feature.name.clone(),
        reach: feature.reach,
        impact: feature.impact,
        confidence: rice::normalize_confidence(feature.confidence),
        effort: feature.effort,
        rice_score,
        supplied_rice_score: feature.rice_score,
        priority_rank,
        priority_tier,
        risk: risk::risk_level(&risk_flags, feature.effort),
        complexity: score::compute_complexity(feature.effort, risk_flags.len(), related.len()),
        business_value: score::compute_business_value(feature.reach, feature.impact),
        timeline_weeks: score::compute_timeline_weeks(feature.effort),
        dependencies: related.iter().map(|r| r.endpoint.clone()).collect(),
        risk_flags,
        related_endpoints: related,
        traffic_impact,
        explanations,
      }
    })
    .collect();
  features.sort_by_key(|f| f.priority_rank);

  Ok(Output { features })
}
