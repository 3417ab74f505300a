use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::middleware::AppError;
use crate::models::{QuestionRequest, QuestionResponse};
use crate::services::QuestionPipeline;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<QuestionPipeline>,
}

/// Root endpoint
pub async fn welcome() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to chat assistance"
    }))
}

/// Answer a natural-language question about the ads data
pub async fn ask_question(
    State(state): State<AppState>,
    Json(payload): Json<QuestionRequest>,
) -> Result<Json<QuestionResponse>, AppError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("question", %request_id);

    let response = state
        .pipeline
        .run(&payload.question)
        .instrument(span)
        .await?;

    Ok(Json(response))
}
