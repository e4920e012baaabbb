//! Complexity, business value, timeline, and human-readable explanations.

use crate::types::{Level, TrafficImpact};

/// Effort (person-months) plus breadth of risk and API surface.
pub fn compute_complexity(effort: f64, flag_count: usize, related_count: usize) -> Level {
  let mut points = 0;
  if effort >= 8.0 {
    points += 2;
  } else if effort >= 3.0 {
    points += 1;
  }
  if flag_count >= 2 {
    points += 1;
  }
  if related_count >= 3 {
    points += 1;
  }
  match points {
    0 => Level::Low,
    1 | 2 => Level::Medium,
    _ => Level::High,
  }
}

/// Value from reach x impact.
pub fn compute_business_value(reach: f64, impact: f64) -> Level {
  let value = reach.max(0.0) * impact.max(0.0);
  if value >= 2000.0 {
    Level::High
  } else if value >= 500.0 {
    Level::Medium
  } else {
    Level::Low
  }
}

/// Four weeks per person-month, at least one week.
pub fn compute_timeline_weeks(effort: f64) -> u32 {
  if !effort.is_finite() || effort <= 0.0 {
    return 1;
  }
  ((effort * 4.0).ceil() as u32).max(1)
}

/// Short human-readable reasons.
pub fn compute_explanations(
  risk_flags: &[String],
  traffic: Option<&TrafficImpact>,
  rice_score: f64,
  supplied_rice: Option<f64>,
  failing_endpoint_pct: f64,
) -> Vec<String> {
  let mut out = Vec::new();
  for flag in risk_flags {
    let s = match flag.as_str() {
      "auth" => "Touches authentication or permissions",
      "payment" => "Touches payment or billing flows",
      "data" => "Involves data migration, import or export",
      "integration" => "Depends on external integrations",
      "performance" => "Has real-time or throughput requirements",
      "security" => "Security or compliance sensitive",
      "notification" => "Sends user notifications",
      _ => continue,
    };
    out.push(s.to_string());
  }
  if let Some(t) = traffic {
    if t.affected_endpoints == 0 {
      out.push("No related endpoints found in API logs".to_string());
    } else {
      out.push(format!(
        "Related endpoints carry {:.1}% of logged traffic ({} requests)",
        t.traffic_share, t.affected_requests
      ));
      if t.worst_drop_frequency > failing_endpoint_pct {
        out.push(format!(
          "A related endpoint fails {:.1}% of requests",
          t.worst_drop_frequency
        ));
      }
    }
  }
  if let Some(supplied) = supplied_rice {
    if (supplied - rice_score).abs() > 0.01 {
      out.push(format!(
        "Supplied RICE score {:.2} differs from computed {:.2}",
        supplied, rice_score
      ));
    }
  }
  out
}
