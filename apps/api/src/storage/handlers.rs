use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;
use tracing::info;

use crate::auth::CallerIdentity;
use crate::errors::AppError;
use crate::routes::multipart::read_resume_form;
use crate::state::AppState;
use crate::storage::{store_resume, StoredResume};

/// POST /api/upload/resume
///
/// Stores a PDF resume and returns its public URL, which can then be passed
/// to the analysis endpoint as `resumeUrl`.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    caller: CallerIdentity,
    multipart: Multipart,
) -> Result<Json<StoredResume>, AppError> {
    let form = read_resume_form(multipart).await?;
    let upload = form
        .file
        .ok_or_else(|| AppError::Validation("No file provided".to_string()))?;

    info!(
        user_id = %caller.user_id,
        file_name = %upload.file_name,
        bytes = upload.bytes.len(),
        "resume upload received"
    );

    let stored = store_resume(
        state.store.as_ref(),
        &caller.user_id,
        upload,
        state.config.max_resume_bytes,
        Utc::now(),
    )
    .await?;

    Ok(Json(stored))
}
