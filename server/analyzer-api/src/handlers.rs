//! HTTP handlers for the analyzer API.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::pdf;
use crate::state::AppState;
use crate::types::{AnalysisResponse, AnalyzeLogsRequest, EndpointPdfRequest, EndpointPdfResponse};

pub async fn health() -> &'static str {
  "ok"
}

/// `POST /api/logs/upload`: multipart form, field `file`, CSV or JSON content.
pub async fn upload_logs(
  State(state): State<Arc<AppState>>,
  mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, ApiError> {
  let mut upload = None;
  while let Some(field) = multipart.next_field().await? {
    if field.name() != Some("file") {
      continue;
    }
    let filename = field.file_name().unwrap_or("upload").to_string();
    let bytes = field.bytes().await?;
    upload = Some((filename, bytes));
  }

  let (filename, bytes) = upload.ok_or_else(|| ApiError::bad_request("No file uploaded"))?;
  if bytes.is_empty() {
    return Err(ApiError::bad_request("Uploaded file is empty"));
  }
  let text = std::str::from_utf8(&bytes)
    .map_err(|e| ApiError::bad_request_with("Uploaded file is not UTF-8 text", e.to_string()))?;

  let parsed = state.log_engine.parse(text)?;
  let analysis = state.log_engine.analyze(&parsed);
  info!(
    filename = %filename,
    entries = analysis.total_requests,
    skipped = analysis.skipped_rows,
    endpoints = analysis.unique_endpoints,
    "processed log upload"
  );
  Ok(Json(AnalysisResponse::new(analysis)))
}

/// `POST /api/logs/analyze`: same analysis for callers that already hold JSON records.
pub async fn analyze_logs(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<AnalyzeLogsRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
  let Json(req) = payload?;
  let logs = req.logs.ok_or_else(|| ApiError::bad_request("Logs are required"))?;
  let parsed = state.log_engine.parse_values(&logs);
  let analysis = state.log_engine.analyze(&parsed);
  info!(entries = analysis.total_requests, "analyzed json logs");
  Ok(Json(AnalysisResponse::new(analysis)))
}

/// `POST /api/generate-endpoint-pdf`: body `{endpoint, logs}`.
pub async fn generate_endpoint_pdf(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<EndpointPdfRequest>, JsonRejection>,
) -> Result<Json<EndpointPdfResponse>, ApiError> {
  let Json(req) = payload?;
  let endpoint = req
    .endpoint
    .filter(|e| !e.trim().is_empty())
    .ok_or_else(|| ApiError::bad_request("Endpoint is required"))?;
  let logs = req.logs.ok_or_else(|| ApiError::bad_request("Logs are required"))?;

  let parsed = state.log_engine.parse_values(&logs);
  let report = state
    .log_engine
    .endpoint_report(&parsed.entries, &endpoint)
    .ok_or_else(|| ApiError::NotFound(format!("No logs found for endpoint {}", endpoint)))?;

  let generated_at = chrono::Utc::now();
  let bytes = tokio::task::spawn_blocking(move || pdf::render_endpoint_report(&report, generated_at))
    .await
    .map_err(|e| ApiError::Internal(format!("Failed to generate PDF: {}", e)))?
    .map_err(|e| ApiError::Internal(format!("Failed to generate PDF: {}", e)))?;

  info!(endpoint = %endpoint, bytes = bytes.len(), "generated endpoint pdf");
  Ok(Json(EndpointPdfResponse {
    pdf_base64: STANDARD.encode(&bytes),
    filename: pdf::report_filename(&endpoint),
  }))
}

/// `POST /api/features/analyze`: body `{features, endpoints?, logs?}`.
pub async fn analyze_features(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<feature_engine::Input>, JsonRejection>,
) -> Result<Json<feature_engine::Output>, ApiError> {
  let Json(input) = payload?;
  let output = feature_engine::run_with(&input, &state.features, &state.log_engine)?;
  info!(features = output.features.len(), "analyzed features");
  Ok(Json(output))
}
