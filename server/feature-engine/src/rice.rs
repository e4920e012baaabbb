//! RICE scoring and priority ranking.

use crate::types::Level;

/// Confidence in [0, 1]; values above 1 are percentages.
pub fn normalize_confidence(confidence: f64) -> f64 {
  if confidence > 1.0 {
    confidence / 100.0
  } else {
    confidence
  }
}

/// Reach x Impact x Confidence / Effort. Zero for non-positive effort or any
/// negative / non-finite input.
pub fn compute_rice(reach: f64, impact: f64, confidence: f64, effort: f64) -> f64 {
  let confidence = normalize_confidence(confidence);
  let inputs = [reach, impact, confidence, effort];
  if inputs.iter().any(|v| !v.is_finite() || *v < 0.0) || effort <= 0.0 {
    return 0.0;
  }
  reach * impact * confidence / effort
}

/// 1-based rank by score descending (ties by name) and the tier for each input
/// position: first third high, second third medium, the rest low.
pub fn assign_priorities(scored: &[(&str, f64)]) -> Vec<(u32, Level)> {
  let mut order: Vec<usize> = (0..scored.len()).collect();
  order.sort_by(|&a, &b| {
    scored[b]
      .1
      .total_cmp(&scored[a].1)
      .then_with(|| scored[a].0.cmp(scored[b].0))
  });

  let third = scored.len().div_ceil(3);
  let mut out = vec![(0, Level::Low); scored.len()];
  for (pos, &idx) in order.iter().enumerate() {
    let tier = if pos < third {
      Level::High
    } else if pos < 2 * third {
      Level::Medium
    } else {
      Level::Low
    };
    out[idx] = (pos as u32 + 1, tier);
  }
  out
}
