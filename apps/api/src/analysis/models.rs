use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::analysis::error::AnalysisError;

/// One of the accepted resume encodings.
#[derive(Debug, Clone)]
pub enum ResumeSource {
    /// Remote PDF, fetched with a single GET.
    Url(String),
    /// Raw file bytes from a multipart upload.
    Upload { bytes: Bytes, media_type: String },
    /// A `data:` URI or bare base64 text.
    Base64(String),
}

impl ResumeSource {
    pub fn kind(&self) -> &'static str {
        match self {
            ResumeSource::Url(_) => "url",
            ResumeSource::Upload { .. } => "upload",
            ResumeSource::Base64(_) => "base64",
        }
    }
}

/// A validated analysis request: one resume source and a non-empty job description.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    source: ResumeSource,
    job_description: String,
}

impl AnalysisRequest {
    pub fn new(source: ResumeSource, job_description: &str) -> Result<Self, AnalysisError> {
        let job_description = job_description.trim();
        if job_description.is_empty() {
            return Err(AnalysisError::invalid_input("Job description is required"));
        }
        Ok(Self {
            source,
            job_description: job_description.to_string(),
        })
    }

    pub fn source(&self) -> &ResumeSource {
        &self.source
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }
}

/// JSON body of `POST /api/resume/analyze`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResumeBody {
    pub resume_url: Option<String>,
    pub resume_file: Option<String>,
    pub job_description: Option<String>,
    /// Echoed back so the client can correlate the result with a posting.
    pub job_id: Option<String>,
}

impl TryFrom<&AnalyzeResumeBody> for AnalysisRequest {
    type Error = AnalysisError;

    fn try_from(body: &AnalyzeResumeBody) -> Result<Self, Self::Error> {
        let url = present(&body.resume_url);
        let file = present(&body.resume_file);

        let source = match (url, file) {
            (Some(url), None) => ResumeSource::Url(url.to_string()),
            (None, Some(file)) => ResumeSource::Base64(file.to_string()),
            (None, None) => return Err(AnalysisError::invalid_input("No resume provided")),
            (Some(_), Some(_)) => {
                return Err(AnalysisError::invalid_input(
                    "Provide exactly one of resumeUrl or resumeFile",
                ))
            }
        };

        AnalysisRequest::new(source, body.job_description.as_deref().unwrap_or_default())
    }
}

/// Blank strings count as absent.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Fixed-shape fit assessment. Lists are never null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Fit score, 0 – 100.
    pub score: u8,
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub matching_skills: Vec<String>,
    pub skill_gaps: Vec<String>,
    pub overall_assessment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_match: Option<String>,
}
