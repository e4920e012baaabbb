//! HTTP-level tests for the analyzer API.

use analyzer_api::{build_router, AppConfig, AppState};
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "X-ANALYZER-BOUNDARY";

const LOGS_CSV: &str = "createdAt,requestEndPoint,responseCode,responseTime,clientIp,username\n\
2025-01-15T09:00:00Z,/api/orders,200,100,10.0.0.1,alice\n\
2025-01-15T09:30:00Z,/api/orders,500,300,10.0.0.2,bob\n\
2025-01-15T10:00:00Z,/api/login,200,50,10.0.0.1,alice\n\
2025-01-15T10:10:00Z,/api/login,200,50,10.0.0.1,alice,unexpected\n";

fn app() -> Router {
  app_with(AppConfig::default())
}

fn app_with(config: AppConfig) -> Router {
  build_router(Arc::new(AppState::new(config)))
}

fn multipart_body(field: &str, filename: &str, content: &str) -> Body {
  Body::from(format!(
    "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n--{b}--\r\n",
    b = BOUNDARY,
  ))
}

fn upload_request(body: Body) -> Request<Body> {
  Request::post("/api/logs/upload")
    .header(
      header::CONTENT_TYPE,
      format!("multipart/form-data; boundary={}", BOUNDARY),
    )
    .body(body)
    .unwrap()
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
  Request::post(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .unwrap()
}

async fn read_json(resp: Response) -> serde_json::Value {
  let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

fn sample_logs() -> serde_json::Value {
  serde_json::json!([
    {"timestamp": "2025-01-15T09:00:00Z", "endpoint": "/api/orders", "statusCode": 200, "responseTime": 100, "username": "alice"},
    {"timestamp": "2025-01-15T09:30:00Z", "endpoint": "/api/orders", "statusCode": 500, "responseTime": 300, "username": "bob"},
    {"timestamp": "2025-01-15T10:00:00Z", "endpoint": "/api/login", "statusCode": 200, "responseTime": 50}
  ])
}

// ── health ─────────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
  let resp = app()
    .oneshot(Request::get("/health").body(Body::empty()).unwrap())
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
  let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  assert_eq!(&bytes[..], b"ok");
}

// ── POST /api/logs/upload ──────────────────────────────────────────

#[tokio::test]
async fn upload_csv_returns_analysis() {
  let resp = app()
    .oneshot(upload_request(multipart_body("file", "logs.csv", LOGS_CSV)))
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
  let body = read_json(resp).await;
  assert_eq!(body["success"], true);
  assert!(body["message"].as_str().unwrap().contains("1 malformed"));

  let analysis = &body["analysis"];
  assert_eq!(analysis["totalRequests"], 3);
  assert_eq!(analysis["skippedRows"], 1);
  assert_eq!(analysis["uniqueEndpoints"], 2);
  let orders = &analysis["endpoints"][0];
  assert_eq!(orders["endpoint"], "/api/orders");
  assert_eq!(orders["count"], 2);
  assert_eq!(orders["successRate"], 50.0);
  assert_eq!(orders["dropFrequency"], 50.0);
  assert_eq!(orders["avgResponseTime"], 200.0);
  assert_eq!(orders["peakHour"], 9);
}

#[tokio::test]
async fn upload_without_file_field_is_400() {
  let resp = app()
    .oneshot(upload_request(multipart_body("other", "logs.csv", LOGS_CSV)))
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = read_json(resp).await;
  assert_eq!(body["error"], "No file uploaded");
}

#[tokio::test]
async fn upload_empty_file_is_400() {
  let resp = app()
    .oneshot(upload_request(multipart_body("file", "logs.csv", "")))
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_without_endpoint_column_has_details() {
  let resp = app()
    .oneshot(upload_request(multipart_body("file", "logs.csv", "a,b\n1,2\n")))
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = read_json(resp).await;
  assert_eq!(body["error"], "Invalid log file");
  assert!(body["details"].as_str().unwrap().contains("endpoint"));
}

#[tokio::test]
async fn upload_oversized_is_413() {
  let config = AppConfig {
    max_upload_bytes: 64,
    ..AppConfig::default()
  };
  let resp = app_with(config)
    .oneshot(upload_request(multipart_body("file", "logs.csv", LOGS_CSV)))
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
  let body = read_json(resp).await;
  assert_eq!(body["error"], "Uploaded file too large");
}

#[tokio::test]
async fn upload_with_truncated_multipart_is_400() {
  // No closing boundary.
  let body = Body::from(format!(
    "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"logs.csv\"\r\nContent-Type: text/csv\r\n\r\n{content}",
    b = BOUNDARY,
    content = LOGS_CSV,
  ));
  let resp = app().oneshot(upload_request(body)).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = read_json(resp).await;
  assert_eq!(body["error"], "Failed to read upload");
  assert!(!body["details"].as_str().unwrap().is_empty());
}

// ── POST /api/logs/analyze ─────────────────────────────────────────

#[tokio::test]
async fn analyze_json_logs() {
  let resp = app()
    .oneshot(json_request(
      "/api/logs/analyze",
      serde_json::json!({ "logs": sample_logs() }),
    ))
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
  let body = read_json(resp).await;
  assert_eq!(body["analysis"]["totalRequests"], 3);
}

#[tokio::test]
async fn oversized_body_is_413() {
  let config = AppConfig {
    max_upload_bytes: 64,
    ..AppConfig::default()
  };
  let resp = app_with(config)
    .oneshot(json_request(
      "/api/logs/analyze",
      serde_json::json!({ "logs": sample_logs() }),
    ))
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
  let body = read_json(resp).await;
  assert!(body["error"].is_string());
}

// ── POST /api/generate-endpoint-pdf ────────────────────────────────

#[tokio::test]
async fn endpoint_pdf_is_base64_pdf() {
  let resp = app()
    .oneshot(json_request(
      "/api/generate-endpoint-pdf",
      serde_json::json!({ "endpoint": "/api/orders", "logs": sample_logs() }),
    ))
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
  let body = read_json(resp).await;
  assert_eq!(body["filename"], "endpoint-report-api-orders.pdf");
  let pdf = STANDARD.decode(body["pdfBase64"].as_str().unwrap()).unwrap();
  assert!(pdf.starts_with(b"%PDF-1.4"));
  let doc = lopdf::Document::load_mem(&pdf).unwrap();
  assert_eq!(doc.get_pages().len(), 1);
  assert!(String::from_utf8_lossy(&pdf).contains("Endpoint Report: /api/orders"));
}

#[tokio::test]
async fn endpoint_pdf_requires_endpoint() {
  let resp = app()
    .oneshot(json_request(
      "/api/generate-endpoint-pdf",
      serde_json::json!({ "logs": sample_logs() }),
    ))
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = read_json(resp).await;
  assert_eq!(body["error"], "Endpoint is required");
}

#[tokio::test]
async fn endpoint_pdf_requires_logs() {
  let resp = app()
    .oneshot(json_request(
      "/api/generate-endpoint-pdf",
      serde_json::json!({ "endpoint": "/api/orders" }),
    ))
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn endpoint_pdf_unknown_endpoint_is_404() {
  let resp = app()
    .oneshot(json_request(
      "/api/generate-endpoint-pdf",
      serde_json::json!({ "endpoint": "/api/missing", "logs": sample_logs() }),
    ))
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body = read_json(resp).await;
  assert!(body["error"].as_str().unwrap().contains("/api/missing"));
}

#[tokio::test]
async fn malformed_json_is_400_with_error_payload() {
  let req = Request::post("/api/generate-endpoint-pdf")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{not json"))
    .unwrap();
  let resp = app().oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = read_json(resp).await;
  assert_eq!(body["error"], "Invalid JSON body");
}

// ── POST /api/features/analyze ─────────────────────────────────────

#[tokio::test]
async fn features_are_scored_against_logs() {
  let resp = app()
    .oneshot(json_request(
      "/api/features/analyze",
      serde_json::json!({
        "features": [
          {"name": "Order history export", "description": "Export past orders",
           "reach": 500, "impact": 2, "confidence": 0.8, "effort": 2},
          {"name": "Dark mode", "reach": 100, "impact": 1, "confidence": 0.5, "effort": 1}
        ],
        "logs": sample_logs()
      }),
    ))
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
  let body = read_json(resp).await;
  let first = &body["features"][0];
  assert_eq!(first["name"], "Order history export");
  assert_eq!(first["riceScore"], 400.0);
  assert_eq!(first["priorityRank"], 1);
  assert_eq!(first["dependencies"][0], "/api/orders");
  assert_eq!(first["trafficImpact"]["affectedRequests"], 2);
}

#[tokio::test]
async fn feature_without_name_is_400() {
  let resp = app()
    .oneshot(json_request(
      "/api/features/analyze",
      serde_json::json!({
        "features": [{"name": "", "reach": 1, "impact": 1, "confidence": 1, "effort": 1}]
      }),
    ))
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = read_json(resp).await;
  assert_eq!(body["error"], "Invalid feature request");
}
