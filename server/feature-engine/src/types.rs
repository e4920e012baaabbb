//! Input/output types for the feature engine (JSON contract with the API and CLI callers).

use serde::{Deserialize, Serialize};

/// One feature request as entered by a product manager.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureInput {
  pub name: String,
  #[serde(default)]
  pub description: String,
  /// People or events affected per period.
  pub reach: f64,
  /// Impact multiplier (0.25 minimal .. 3 massive).
  pub impact: f64,
  /// Fraction in [0, 1]; values above 1 are read as percentages.
  pub confidence: f64,
  /// Person-months.
  pub effort: f64,
  /// Literal score supplied by the caller; echoed, never used for ranking.
  #[serde(default)]
  pub rice_score: Option<f64>,
}

/// Input: features plus the API surface to match them against.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
  pub features: Vec<FeatureInput>,
  /// Known endpoint paths (in addition to those seen in `logs`).
  #[serde(default)]
  pub endpoints: Vec<String>,
  /// Raw access-log records; enables traffic impact.
  #[serde(default)]
  pub logs: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
  Low,
  Medium,
  High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedEndpoint {
  pub endpoint: String,
  pub score: f64,
}

/// Share of logged traffic that flows through a feature's related endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficImpact {
  pub affected_endpoints: u64,
  pub affected_requests: u64,
  /// Percent of all logged requests.
  pub traffic_share: f64,
  /// Request-weighted mean over the related endpoints.
  pub avg_response_time: f64,
  pub worst_drop_frequency: f64,
  pub unique_users: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureReport {
  pub name: String,
  pub reach: f64,
  pub impact: f64,
  pub confidence: f64,
  pub effort: f64,
  pub rice_score: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub supplied_rice_score: Option<f64>,
  pub priority_rank: u32,
  pub priority_tier: Level,
  pub risk: Level,
  pub risk_flags: Vec<String>,
  pub complexity: Level,
  pub business_value: Level,
  pub timeline_weeks: u32,
  pub dependencies: Vec<String>,
  pub related_endpoints: Vec<RelatedEndpoint>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub traffic_impact: Option<TrafficImpact>,
  pub explanations: Vec<String>,
}

/// Output: reports ordered by priority rank.
#[derive(Debug, Serialize)]
pub struct Output {
  pub features: Vec<FeatureReport>,
}
