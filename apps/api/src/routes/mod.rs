pub mod health;
pub mod multipart;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::state::AppState;
use crate::storage::handlers as storage;

/// Slack for JSON framing and multipart headers on top of the encoded file.
const BODY_LIMIT_SLACK: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    // base64 inflates a file by 4/3
    let body_limit = state.config.max_resume_bytes * 4 / 3 + BODY_LIMIT_SLACK;

    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/resume/analyze", post(analysis::handle_analyze))
        .route(
            "/api/resume/analyze/upload",
            post(analysis::handle_analyze_upload),
        )
        // Storage API
        .route("/api/upload/resume", post(storage::handle_upload_resume))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
