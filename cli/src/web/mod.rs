//! Browser form and JSON API in front of the diagnosis crew.

pub mod error;
pub mod handlers;
pub mod page;
pub mod router;

use anyhow::{Context, Result};
use medcrew_core::{Config, DiagnosisService};
use std::sync::Arc;

pub use router::build_router;

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DiagnosisService>,
    pub model: String,
}

impl AppState {
    pub fn new(service: DiagnosisService, model: impl Into<String>) -> Self {
        Self {
            service: Arc::new(service),
            model: model.into(),
        }
    }
}

pub async fn serve(config: &Config) -> Result<()> {
    let service = DiagnosisService::from_config(config)?;
    let app = build_router(AppState::new(service, config.model.clone()));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(%addr, model = %config.model, "medcrew web UI listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server stopped unexpectedly")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
