use axum::Router;
use axum::routing::{get, post};

use crate::web::{AppState, handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/diagnose", post(handlers::diagnose_form))
        .route("/api/diagnose", post(handlers::diagnose_api))
        .route("/api/health", get(handlers::health))
        .with_state(state)
}
