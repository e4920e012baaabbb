//! Request/response types for the API.

use log_engine::LogAnalysis;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/generate-endpoint-pdf`. Fields are optional here so that a
/// missing one becomes a 400 with a clear message instead of a generic rejection.
#[derive(Debug, Deserialize)]
pub struct EndpointPdfRequest {
  pub endpoint: Option<String>,
  pub logs: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointPdfResponse {
  pub pdf_base64: String,
  pub filename: String,
}

/// Body of `POST /api/logs/analyze`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeLogsRequest {
  pub logs: Option<Vec<serde_json::Value>>,
}

/// Response of the upload and analyze routes.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
  pub success: bool,
  pub message: String,
  pub analysis: LogAnalysis,
}

impl AnalysisResponse {
  pub fn new(analysis: LogAnalysis) -> Self {
    let message = if analysis.skipped_rows == 0 {
      format!("Processed {} log entries", analysis.total_requests)
    } else {
      format!(
        "Processed {} log entries ({} malformed rows skipped)",
        analysis.total_requests, analysis.skipped_rows
      )
    };
    Self {
      success: true,
      message,
      analysis,
    }
  }
}
