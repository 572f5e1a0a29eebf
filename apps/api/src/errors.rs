use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::analysis::error::{AnalysisError, FailureKind};
use crate::storage::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Analysis(e) => (analysis_status(e), e.kind.code(), analysis_message(e)),
            AppError::Storage(StoreError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "STORAGE_ERROR",
                    "Failed to upload file".to_string(),
                )
            }
        }
    }
}

fn analysis_status(error: &AnalysisError) -> StatusCode {
    match error.kind {
        FailureKind::InvalidInput | FailureKind::DecodeFailure => StatusCode::BAD_REQUEST,
        FailureKind::FetchFailure | FailureKind::UpstreamUnavailable if error.timed_out => {
            StatusCode::GATEWAY_TIMEOUT
        }
        FailureKind::FetchFailure | FailureKind::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
        FailureKind::ParseFailure | FailureKind::MalformedResponse => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Caller-fixable failures carry their detail; model failures get a stable message.
fn analysis_message(error: &AnalysisError) -> String {
    match error.kind {
        FailureKind::UpstreamUnavailable => {
            "The analysis service is temporarily unavailable. Please try again.".to_string()
        }
        FailureKind::MalformedResponse => {
            "The analysis service returned an unusable response. Please try again.".to_string()
        }
        _ => error.message.clone(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let mut error: Value = json!({
            "code": code,
            "message": message
        });
        if let AppError::Analysis(e) = &self {
            error["stage"] = json!(e.stage);
            error["retryable"] = json!(e.kind.is_retryable());
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
