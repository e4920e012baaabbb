//! Feature-to-endpoint keyword matching.
//!
//! Best-effort heuristic: a feature token "matches" when it contains, or is contained
//! in, some endpoint token. The score is the matched fraction of the feature's tokens,
//! so swapping the two texts generally gives a different score.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::config::Config;
use crate::types::RelatedEndpoint;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid regex"));

/// Lowercase, strip non-word characters, split on whitespace, drop short tokens.
/// Distinct tokens, sorted.
pub fn tokenize(text: &str, min_len: usize) -> BTreeSet<String> {
  let lower = text.to_lowercase();
  NON_WORD
    .replace_all(&lower, "")
    .split_whitespace()
    .filter(|t| t.chars().count() >= min_len)
    .map(str::to_string)
    .collect()
}

/// Fraction of feature tokens related to at least one endpoint token.
pub fn match_score(feature_text: &str, endpoint: &str, config: &Config) -> f64 {
  let feature_tokens = tokenize(feature_text, config.min_token_len);
  let endpoint_tokens = tokenize(endpoint, config.min_token_len);
  let matched = feature_tokens
    .iter()
    .filter(|f| {
      endpoint_tokens
        .iter()
        .any(|e| f.contains(e.as_str()) || e.contains(f.as_str()))
    })
    .count();
  matched as f64 / feature_tokens.len().max(1) as f64
}

/// Endpoints scoring above the threshold, best first (ties by path).
pub fn related_endpoints<'a>(
  feature_text: &str,
  endpoints: impl IntoIterator<Item = &'a str>,
  config: &Config,
) -> Vec<RelatedEndpoint> {
  let mut related: Vec<RelatedEndpoint> = endpoints
    .into_iter()
    .map(|endpoint| RelatedEndpoint {
      endpoint: endpoint.to_string(),
      score: match_score(feature_text, endpoint, config),
    })
    .filter(|r| r.score > config.match_threshold)
    .collect();
  related.sort_by(|a, b| {
    b.score
      .total_cmp(&a.score)
      .then_with(|| a.endpoint.cmp(&b.endpoint))
  });
  related
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tokenize_strips_punctuation_and_short_tokens() {
    let tokens = tokenize("Add CSV export, for the Admin-Dashboard!", 4);
    let v: Vec<&str> = tokens.iter().map(String::as_str).collect();
    assert_eq!(v, vec!["admindashboard", "export"]);
  }

  #[test]
  fn endpoint_path_collapses_to_one_token() {
    let tokens = tokenize("/api/users/profile", 4);
    assert_eq!(tokens.len(), 1);
    assert!(tokens.contains("apiusersprofile"));
  }

  #[test]
  fn substring_relation_counts_both_ways() {
    let config = Config::default();
    // "profile" is inside "apiusersprofile".
    let score = match_score("profile editing", "/api/users/profile", &config);
    assert!((score - 0.5).abs() < 1e-9);
    // No feature tokens at all: denominator clamps to 1.
    assert_eq!(match_score("a b c", "/api/users", &config), 0.0);
  }

  #[test]
  fn related_requires_score_above_threshold() {
    let config = Config::default();
    let endpoints = ["/api/payments", "/api/users/profile", "/health"];
    let related = related_endpoints("Payment retries", endpoints.iter().copied(), &config);
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].endpoint, "/api/payments");
  }

  #[test]
  fn exactly_threshold_is_not_related() {
    // 1 of 5 tokens matches: 0.2 is not > 0.2.
    let config = Config::default();
    let text = "orders alpha bravo charlie delta";
    let related = related_endpoints(text, ["/orders"], &config);
    assert!(related.is_empty());
  }
}
