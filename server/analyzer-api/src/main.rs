//! Binary entrypoint for the analyzer API.

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use analyzer_api::{build_router, init_tracing, AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  let config = AppConfig::from_env()?;
  init_tracing(&config.log_level);

  let addr: SocketAddr = config.bind_addr().parse()?;
  let state = Arc::new(AppState::new(config));
  let app = build_router(state);

  info!(%addr, "analyzer-api listening");
  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}
