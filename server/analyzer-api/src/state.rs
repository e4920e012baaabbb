//! Shared, immutable per-process state.

use crate::config::AppConfig;

pub struct AppState {
  pub config: AppConfig,
  pub log_engine: log_engine::Engine,
  pub features: feature_engine::Config,
}

impl AppState {
  pub fn new(config: AppConfig) -> Self {
    let log_engine = log_engine::Engine::new(log_engine::Config {
      days_in_sample: config.days_in_sample,
      utc_offset_minutes: config.utc_offset_minutes,
      ..log_engine::Config::default()
    });
    Self {
      config,
      log_engine,
      features: feature_engine::Config::default(),
    }
  }
}
