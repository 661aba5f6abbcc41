pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod llm;
pub mod parser;
pub mod scraper;
pub mod service;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use service::QaService;
use tracing_subscriber::EnvFilter;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QaService>,
}

impl AppState {
    pub fn new(service: QaService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Installs the fmt subscriber; `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
}
