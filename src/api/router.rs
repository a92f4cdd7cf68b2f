use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::engine::DocDb;

use super::handlers::*;

/// Application state shared across all handlers
pub struct AppState {
    pub db: Arc<DocDb>,
}

impl AppState {
    pub fn new(db: Arc<DocDb>) -> Self {
        Self { db }
    }
}

/// Create the HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        // Documents
        .route("/docs", post(add_document).get(search_documents))
        .route("/docs/:id", get(get_document))
        // Health and metrics
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
