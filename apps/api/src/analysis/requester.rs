//! Analysis Requester — prompts the model once and normalizes its JSON into `AnalysisResult`.
//!
//! The model sits behind the `AnalysisModel` trait. `LlmClient` is the
//! production implementation; tests plug in scripted models.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::analysis::models::AnalysisResult;
use crate::analysis::prompts::{ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM};
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::{strip_json_fences, LlmClient, LlmError};

/// Resume text beyond this many characters is not sent to the model.
const MAX_RESUME_CHARS: usize = 30_000;

const SCORE_FIELDS: &[&str] = &["score", "matchPercentage"];
const SUGGESTION_FIELDS: &[&str] = &["suggestions", "improvementTips"];

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("model unavailable: {0}")]
    Upstream(#[from] LlmError),

    #[error("model response malformed: {reason}")]
    Malformed { reason: String, raw: String },
}

/// A text-completion model that answers a single prompt.
#[async_trait]
pub trait AnalysisModel: Send + Sync {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl AnalysisModel for LlmClient {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        LlmClient::complete(self, prompt, system).await
    }
}

pub struct AnalysisRequester {
    model: Arc<dyn AnalysisModel>,
}

impl AnalysisRequester {
    pub fn new(model: Arc<dyn AnalysisModel>) -> Self {
        Self { model }
    }

    pub async fn request(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisResult, RequestError> {
        let prompt = build_analysis_prompt(resume_text, job_description);
        let raw = self.model.complete(&prompt, ANALYSIS_SYSTEM).await?;
        debug!(chars = raw.len(), "model responded");
        parse_analysis(&raw)
    }
}

/// Fills the analysis template. Each placeholder is substituted exactly once and
/// substituted text is never rescanned, so braces inside a resume stay literal.
pub fn build_analysis_prompt(resume_text: &str, job_description: &str) -> String {
    let resume_text = truncate_chars(resume_text, MAX_RESUME_CHARS);
    fill_in_order(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("{grounding}", GROUNDING_INSTRUCTION),
            ("{resume_text}", resume_text),
            ("{job_description}", job_description),
        ],
    )
}

fn fill_in_order(template: &str, slots: &[(&str, &str)]) -> String {
    let extra: usize = slots.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    for (placeholder, value) in slots {
        if let Some((head, tail)) = rest.split_once(placeholder) {
            out.push_str(head);
            out.push_str(value);
            rest = tail;
        }
    }

    out.push_str(rest);
    out
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => {
            warn!(max, "resume text truncated before analysis");
            &text[..idx]
        }
        None => text,
    }
}

/// Parses raw model output into a guaranteed-shape `AnalysisResult`.
///
/// - code fences around the JSON are ignored
/// - the score is required, clamped to 0 – 100 and rounded
/// - missing or null lists become empty lists
pub fn parse_analysis(raw: &str) -> Result<AnalysisResult, RequestError> {
    let malformed = |reason: String| RequestError::Malformed {
        reason,
        raw: raw.to_string(),
    };

    let value: Value =
        serde_json::from_str(strip_json_fences(raw)).map_err(|e| malformed(e.to_string()))?;
    let obj = value
        .as_object()
        .ok_or_else(|| malformed("expected a JSON object".to_string()))?;

    let score = first_present(obj, SCORE_FIELDS)
        .and_then(numeric)
        .ok_or_else(|| malformed("missing numeric score".to_string()))?;

    Ok(AnalysisResult {
        score: clamp_score(score),
        summary: text_field(obj, "summary"),
        strengths: list_field(obj, &["strengths"]),
        weaknesses: list_field(obj, &["weaknesses"]),
        suggestions: list_field(obj, SUGGESTION_FIELDS),
        missing_keywords: list_field(obj, &["missingKeywords"]),
        matching_skills: list_field(obj, &["matchingSkills"]),
        skill_gaps: list_field(obj, &["skillGaps"]),
        overall_assessment: text_field(obj, "overallAssessment"),
        experience_match: Some(text_field(obj, "experienceMatch")).filter(|s| !s.is_empty()),
    })
}

fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

/// Numbers and numeric strings ("85", "85%") are accepted. Values beyond the
/// f64 range come back as infinities and clamp like any other out-of-range score.
fn numeric(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64().or_else(|| n.to_string().parse::<f64>().ok()),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (!n.is_nan()).then_some(n)
}

fn clamp_score(score: f64) -> u8 {
    score.clamp(0.0, 100.0).round() as u8
}

fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn list_field(obj: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    let clean = |s: &str| Some(s.trim()).filter(|s| !s.is_empty()).map(String::from);

    match first_present(obj, keys) {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).filter_map(clean).collect(),
        Some(Value::String(single)) => clean(single.as_str()).into_iter().collect(),
        _ => Vec::new(),
    }
}
