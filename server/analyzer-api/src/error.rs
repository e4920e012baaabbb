//! HTTP error type: every failure becomes a JSON `{error, details?}` payload.

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use feature_engine::FeatureError;
use log_engine::LogError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{message}")]
  BadRequest {
    message: String,
    details: Option<String>,
  },

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  PayloadTooLarge(String),

  #[error("{0}")]
  Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
  error: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  details: Option<&'a str>,
}

impl ApiError {
  pub fn bad_request(message: impl Into<String>) -> Self {
    Self::BadRequest {
      message: message.into(),
      details: None,
    }
  }

  pub fn bad_request_with(message: impl Into<String>, details: impl Into<String>) -> Self {
    Self::BadRequest {
      message: message.into(),
      details: Some(details.into()),
    }
  }

  fn status(&self) -> StatusCode {
    match self {
      Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
      Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<LogError> for ApiError {
  fn from(err: LogError) -> Self {
    match err {
      LogError::Validation { field, reason } => {
        Self::bad_request_with("Invalid log file", format!("{}: {}", field, reason))
      }
      other => Self::bad_request_with("Failed to parse log file", other.to_string()),
    }
  }
}

impl From<FeatureError> for ApiError {
  fn from(err: FeatureError) -> Self {
    Self::bad_request_with("Invalid feature request", err.to_string())
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
      return Self::PayloadTooLarge("Request body too large".to_string());
    }
    Self::bad_request_with("Invalid JSON body", rejection.body_text())
  }
}

impl From<MultipartError> for ApiError {
  fn from(err: MultipartError) -> Self {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
      return Self::PayloadTooLarge("Uploaded file too large".to_string());
    }
    Self::bad_request_with("Failed to read upload", err.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let (message, details) = match &self {
      Self::BadRequest { message, details } => (message.as_str(), details.as_deref()),
      Self::NotFound(m) | Self::PayloadTooLarge(m) | Self::Internal(m) => (m.as_str(), None),
    };

    if status.is_server_error() {
      error!(%status, error = message, details, "request failed");
    } else {
      warn!(%status, error = message, details, "request rejected");
    }

    let body = ErrorBody {
      error: message,
      details,
    };
    (status, Json(body)).into_response()
  }
}
