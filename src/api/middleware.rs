use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::database::DbError;
use crate::services::llm_service::ProviderError;

/// Message returned to clients for any database-side failure.
pub const EXECUTION_FAILED_DETAIL: &str = "Error: Failed to execute SQL query.";

/// Application error types
///
/// Every pipeline failure lands in exactly one of these kinds. The `Display`
/// text is what gets logged; [`AppError::detail`] is what the client sees.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database connection failed.")]
    ConnectionFailed(#[source] DbError),

    #[error("Illegal SQL query.")]
    InvalidSql { reason: String },

    #[error("Error: Failed to execute SQL query.")]
    ExecutionFailed(#[source] DbError),

    #[error("{0}")]
    Other(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl AppError {
    pub fn invalid_sql(reason: impl Into<String>) -> Self {
        AppError::InvalidSql {
            reason: reason.into(),
        }
    }

    /// Client-facing message. Connection and execution failures are
    /// deliberately indistinguishable from the outside.
    pub fn detail(&self) -> String {
        match self {
            AppError::ConnectionFailed(_) | AppError::ExecutionFailed(_) => {
                EXECUTION_FAILED_DETAIL.to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            detail: self.detail(),
        });

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Convert anyhow::Error to AppError
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Other(err.to_string())
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::Other(err.to_string())
    }
}
