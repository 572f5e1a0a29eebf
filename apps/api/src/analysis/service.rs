//! Analysis Service — the Resolving → Extracting → Requesting pipeline.
//!
//! Requests are validated by construction (`AnalysisRequest`), so a call to
//! `analyze` starts at Resolving. The first failing stage short-circuits the
//! pipeline; there are no partial results and no retries.

use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::analysis::error::{AnalysisError, Stage};
use crate::analysis::extractor::extract_text;
use crate::analysis::models::{AnalysisRequest, AnalysisResult};
use crate::analysis::requester::{AnalysisModel, AnalysisRequester};
use crate::analysis::source::{ResumeFetcher, ResumeResolver};

pub struct AnalysisService {
    resolver: ResumeResolver,
    requester: AnalysisRequester,
}

impl AnalysisService {
    pub fn new(
        fetcher: Arc<dyn ResumeFetcher>,
        model: Arc<dyn AnalysisModel>,
        max_resume_bytes: usize,
    ) -> Self {
        Self {
            resolver: ResumeResolver::new(fetcher, max_resume_bytes),
            requester: AnalysisRequester::new(model),
        }
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let span = info_span!(
            "analysis",
            request_id = %Uuid::new_v4(),
            source = request.source().kind()
        );

        async move {
            let outcome = self.run(&request).await;
            match &outcome {
                Ok(result) => info!(score = result.score, "analysis complete"),
                Err(e) => {
                    warn!(stage = %e.stage, kind = e.kind.code(), "analysis failed: {}", e.message);
                    if let Some(raw) = &e.raw_response {
                        debug!(raw = %raw, "rejected model output");
                    }
                }
            }
            outcome
        }
        .instrument(span)
        .await
    }

    async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        debug!(stage = %Stage::Resolving, "entering stage");
        let bytes = self.resolver.resolve(request.source()).await?;

        debug!(stage = %Stage::Extracting, "entering stage");
        let resume_text = extract_text(bytes).await?;

        debug!(stage = %Stage::Requesting, "entering stage");
        let result = self
            .requester
            .request(&resume_text, request.job_description())
            .await?;

        Ok(result)
    }
}
