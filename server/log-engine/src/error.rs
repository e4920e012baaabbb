//! Structured error types for the log engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
  #[error("validation: {field}: {reason}")]
  Validation { field: String, reason: String },

  #[error("parse: {0}")]
  Parse(String),

  #[error("csv: {0}")]
  Csv(#[from] csv::Error),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
}

impl LogError {
  pub fn validation(field: &str, reason: &str) -> Self {
    Self::Validation {
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }

  pub fn parse(msg: impl Into<String>) -> Self {
    Self::Parse(msg.into())
  }
}
