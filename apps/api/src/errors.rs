use std::fmt;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::llm_client::LlmError;

/// Which endpoint an upstream failure belongs to; shapes the format-error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GenerateQuestions,
    EvaluateAnswers,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::GenerateQuestions => f.write_str("generate questions"),
            Operation::EvaluateAnswers => f.write_str("evaluate answers"),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Failed to {0}: Unexpected API response format.")]
    UnexpectedFormat(Operation),

    /// A body axum could not read at all (too large, broken stream).
    #[error("{}", .0.body_text())]
    Rejected(JsonRejection),

    #[error("Internal server error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Maps a remote-call failure for `op` onto the HTTP error taxonomy.
    /// Raw model output is logged here and never reaches the caller.
    pub fn from_llm(op: Operation, err: LlmError) -> Self {
        match err {
            LlmError::UnexpectedFormat { raw } => {
                warn!(operation = %op, response = %raw, "Gemini API response structure unexpected");
                AppError::UnexpectedFormat(op)
            }
            LlmError::Decode { source, raw } => {
                warn!(
                    operation = %op,
                    error = %source,
                    text = %raw,
                    "Gemini API returned text that does not match the response schema"
                );
                AppError::UnexpectedFormat(op)
            }
            other => AppError::Upstream(other.to_string()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Rejected(rejection) => rejection.status(),
            AppError::UnexpectedFormat(_) | AppError::Upstream(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            error!("{message}");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
