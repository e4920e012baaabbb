//! Risk flags derived from keywords in the feature text.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::Level;

/// Flag name and the whole-word keywords that raise it, in flag order.
static RISK_KEYWORDS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
  [
    (
      "auth",
      r"auth|authn|authz|authenticat\w*|authoriz\w*|oauth\d*|logins?|log-in|sign-in|single sign-on|sso|permissions?|sessions?|roles?",
    ),
    (
      "data",
      r"migrations?|migrate|schemas?|databases?|exports?|exporting|imports?|importing|backups?",
    ),
    (
      "integration",
      r"integrations?|integrate|webhooks?|third-party|third party|external|partners?",
    ),
    (
      "notification",
      r"notifications?|notify|e-?mails?|sms|push|alerts?|alerting",
    ),
    (
      "payment",
      r"payments?|billing|invoices?|invoicing|checkout|subscriptions?|refunds?|stripe",
    ),
    (
      "performance",
      r"real-time|realtime|performance|latency|cach(?:e|es|ed|ing)|bulk|batch(?:es|ed|ing)?",
    ),
    (
      "security",
      r"security|encrypt(?:ion|ed|s)?|passwords?|tokens?|2fa|mfa|gdpr|compliance",
    ),
  ]
  .into_iter()
  .map(|(flag, words)| {
    let re = Regex::new(&format!(r"\b(?:{})\b", words)).expect("valid regex");
    (flag, re)
  })
  .collect()
});

/// Risk flags from feature name + description (lowercase, no duplicates, sorted).
/// Keywords match whole words only, so "author" is not "auth".
pub fn compute_risk_flags(text: &str) -> Vec<String> {
  let t = text.to_lowercase();
  RISK_KEYWORDS
    .iter()
    .filter(|(_, re)| re.is_match(&t))
    .map(|(flag, _)| flag.to_string())
    .collect()
}

/// High for sensitive areas or wide blast radius; medium for any flag or large effort.
pub fn risk_level(risk_flags: &[String], effort: f64) -> Level {
  let sensitive = risk_flags
    .iter()
    .any(|f| matches!(f.as_str(), "auth" | "payment" | "security"));
  if sensitive || risk_flags.len() >= 3 {
    Level::High
  } else if !risk_flags.is_empty() || effort >= 5.0 {
    Level::Medium
  } else {
    Level::Low
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flags_are_sorted_and_deduplicated() {
    let flags = compute_risk_flags("Stripe checkout with email receipts and payment retries");
    assert_eq!(flags, vec!["notification".to_string(), "payment".to_string()]);
  }

  #[test]
  fn keywords_match_whole_words_only() {
    assert!(compute_risk_flags("Author bio on the controller page").is_empty());
    assert!(compute_risk_flags("Show when a branch was pushed").is_empty());
    assert!(compute_risk_flags("Improve the search tokenizer").is_empty());
    assert_eq!(compute_risk_flags("Role-based access"), vec!["auth".to_string()]);
    assert_eq!(
      compute_risk_flags("Rotate API tokens; send push alerts"),
      vec!["notification".to_string(), "security".to_string()]
    );
    assert_eq!(compute_risk_flags("Authorization rules"), vec!["auth".to_string()]);
  }

  #[test]
  fn plain_text_has_no_flags() {
    assert!(compute_risk_flags("Dark mode toggle").is_empty());
  }

  #[test]
  fn risk_levels() {
    assert_eq!(risk_level(&["auth".into()], 1.0), Level::High);
    assert_eq!(
      risk_level(&["data".into(), "integration".into(), "performance".into()], 1.0),
      Level::High
    );
    assert_eq!(risk_level(&["data".into()], 1.0), Level::Medium);
    assert_eq!(risk_level(&[], 6.0), Level::Medium);
    assert_eq!(risk_level(&[], 1.0), Level::Low);
  }
}
