//! Feature Analyzer API
//!
//! HTTP service that analyzes uploaded access logs, renders per-endpoint PDF reports,
//! and scores feature requests. Bind to 127.0.0.1 by default (internal only).

mod config;
mod error;
mod handlers;
mod pdf;
mod state;
mod telemetry;
mod types;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{AppConfig, ConfigError};
pub use error::ApiError;
pub use handlers::{analyze_features, analyze_logs, generate_endpoint_pdf, health, upload_logs};
pub use state::AppState;
pub use telemetry::init_tracing;

pub fn build_router(state: Arc<AppState>) -> Router {
  let body_limit = state.config.max_upload_bytes;
  Router::new()
    .route("/health", get(health))
    .route("/api/logs/upload", post(upload_logs))
    .route("/api/logs/analyze", post(analyze_logs))
    .route("/api/generate-endpoint-pdf", post(generate_endpoint_pdf))
    .route("/api/features/analyze", post(analyze_features))
    .layer(DefaultBodyLimit::max(body_limit))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(state)
}
