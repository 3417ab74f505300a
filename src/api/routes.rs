use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::handlers::{ask_question, welcome, AppState};
use crate::services::QuestionPipeline;

/// Create router with application state
pub fn create_router_with_state(pipeline: Arc<QuestionPipeline>) -> Router {
    let state = AppState { pipeline };

    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        .route("/question", post(ask_question))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
