//! Axum route handlers for the Analysis API.

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::analysis::models::{AnalysisRequest, AnalysisResult, AnalyzeResumeBody, ResumeSource};
use crate::auth::CallerIdentity;
use crate::errors::AppError;
use crate::routes::multipart::read_resume_form;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub analysis: AnalysisResult,
    pub analyzed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

/// POST /api/resume/analyze
///
/// Scores a resume (URL or base64 data URI) against a job description.
pub async fn handle_analyze(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<AnalyzeResumeBody>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(body) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let request = AnalysisRequest::try_from(&body)?;

    info!(user_id = %caller.user_id, source = request.source().kind(), "analysis requested");

    let resume_url = match request.source() {
        ResumeSource::Url(url) => Some(url.clone()),
        _ => None,
    };
    let analysis = state.analysis.analyze(request).await?;

    Ok(Json(AnalyzeResponse {
        analysis,
        analyzed_at: Utc::now(),
        resume_url,
        job_id: body.job_id,
    }))
}

/// POST /api/resume/analyze/upload
///
/// Multipart variant: a `file` part with the PDF and a `jobDescription` text part.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    caller: CallerIdentity,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let form = read_resume_form(multipart).await?;
    let job_id = form.field("jobId").map(String::from);
    let job_description = form.field("jobDescription").unwrap_or_default().to_string();

    let upload = form
        .file
        .ok_or_else(|| AppError::Validation("No resume provided".to_string()))?;
    let source = ResumeSource::Upload {
        bytes: upload.bytes,
        media_type: upload.content_type,
    };
    let request = AnalysisRequest::new(source, &job_description)?;

    info!(user_id = %caller.user_id, source = "upload", "analysis requested");

    let analysis = state.analysis.analyze(request).await?;

    Ok(Json(AnalyzeResponse {
        analysis,
        analyzed_at: Utc::now(),
        resume_url: None,
        job_id,
    }))
}
