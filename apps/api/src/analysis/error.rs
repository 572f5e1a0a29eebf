//! Stage-tagged failures of the analysis pipeline.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::analysis::extractor::ExtractError;
use crate::analysis::requester::RequestError;
use crate::analysis::source::ResolveError;

/// Pipeline step that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Validating,
    Resolving,
    Extracting,
    Requesting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "Validating",
            Stage::Resolving => "Resolving",
            Stage::Extracting => "Extracting",
            Stage::Requesting => "Requesting",
        };
        f.write_str(name)
    }
}

/// What went wrong, independent of where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    /// Caller error, not retryable.
    InvalidInput,
    /// Resume URL unreachable or not a PDF.
    FetchFailure,
    /// Malformed base64 payload.
    DecodeFailure,
    /// Not a PDF, or a PDF without a text layer.
    ParseFailure,
    /// Model API unreachable, rate limited or timed out.
    UpstreamUnavailable,
    /// Model output did not match the analysis schema.
    MalformedResponse,
}

impl FailureKind {
    /// Whether re-invoking with the same input can succeed.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            FailureKind::FetchFailure
                | FailureKind::UpstreamUnavailable
                | FailureKind::MalformedResponse
        )
    }

    pub fn code(self) -> &'static str {
        match self {
            FailureKind::InvalidInput => "INVALID_INPUT",
            FailureKind::FetchFailure => "FETCH_FAILURE",
            FailureKind::DecodeFailure => "DECODE_FAILURE",
            FailureKind::ParseFailure => "PARSE_FAILURE",
            FailureKind::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            FailureKind::MalformedResponse => "MALFORMED_RESPONSE",
        }
    }
}

#[derive(Debug, Error)]
#[error("{stage} failed ({}): {message}", kind.code())]
pub struct AnalysisError {
    pub stage: Stage,
    pub kind: FailureKind,
    pub message: String,
    /// The outbound call hit its deadline.
    pub timed_out: bool,
    /// Raw model text, kept for diagnostics only.
    pub raw_response: Option<String>,
}

impl AnalysisError {
    pub fn new(stage: Stage, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            stage,
            kind,
            message: message.into(),
            timed_out: false,
            raw_response: None,
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(Stage::Validating, FailureKind::InvalidInput, message)
    }
}

impl From<ResolveError> for AnalysisError {
    fn from(error: ResolveError) -> Self {
        let kind = match &error {
            ResolveError::InvalidInput(_) => FailureKind::InvalidInput,
            ResolveError::Fetch { .. } => FailureKind::FetchFailure,
            ResolveError::Decode(_) => FailureKind::DecodeFailure,
        };
        let timed_out = matches!(error, ResolveError::Fetch { timed_out: true, .. });
        Self {
            timed_out,
            ..Self::new(Stage::Resolving, kind, error.to_string())
        }
    }
}

impl From<ExtractError> for AnalysisError {
    fn from(error: ExtractError) -> Self {
        Self::new(Stage::Extracting, FailureKind::ParseFailure, error.to_string())
    }
}

impl From<RequestError> for AnalysisError {
    fn from(error: RequestError) -> Self {
        match error {
            RequestError::Upstream(e) => Self {
                timed_out: e.is_timeout(),
                ..Self::new(Stage::Requesting, FailureKind::UpstreamUnavailable, e.to_string())
            },
            RequestError::Malformed { reason, raw } => Self {
                raw_response: Some(raw),
                ..Self::new(
                    Stage::Requesting,
                    FailureKind::MalformedResponse,
                    format!("model response malformed: {reason}"),
                )
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::llm_client::LlmError;

    #[test]
    fn test_fetch_timeout_keeps_flag() {
        let error: AnalysisError = ResolveError::Fetch {
            message: "deadline exceeded".to_string(),
            timed_out: true,
        }
        .into();
        assert_eq!(error.stage, Stage::Resolving);
        assert_eq!(error.kind, FailureKind::FetchFailure);
        assert!(error.timed_out);
    }

    #[test]
    fn test_model_timeout_is_upstream_unavailable() {
        let error: AnalysisError =
            RequestError::Upstream(LlmError::Timeout(Duration::from_secs(60))).into();
        assert_eq!(error.stage, Stage::Requesting);
        assert_eq!(error.kind, FailureKind::UpstreamUnavailable);
        assert!(error.timed_out);
    }

    #[test]
    fn test_malformed_keeps_raw_text() {
        let error: AnalysisError = RequestError::Malformed {
            reason: "expected value".to_string(),
            raw: "Sorry, I cannot help".to_string(),
        }
        .into();
        assert_eq!(error.kind, FailureKind::MalformedResponse);
        assert_eq!(error.raw_response.as_deref(), Some("Sorry, I cannot help"));
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(FailureKind::UpstreamUnavailable.is_retryable());
        assert!(FailureKind::MalformedResponse.is_retryable());
        assert!(FailureKind::FetchFailure.is_retryable());
        assert!(!FailureKind::InvalidInput.is_retryable());
        assert!(!FailureKind::DecodeFailure.is_retryable());
        assert!(!FailureKind::ParseFailure.is_retryable());
    }

    #[test]
    fn test_display_names_stage_and_code() {
        let error = AnalysisError::invalid_input("Job description is required");
        assert_eq!(
            error.to_string(),
            "Validating failed (INVALID_INPUT): Job description is required"
        );
    }
}
