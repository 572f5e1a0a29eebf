//! Text Extractor — PDF bytes to plain text via `pdf-extract`.

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

/// The `%PDF-` marker must appear within the first KiB of the file.
const HEADER_SEARCH_WINDOW: usize = 1024;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("resume is not a readable PDF: {0}")]
    Invalid(String),

    #[error("resume PDF contains no extractable text (is it a scanned image?)")]
    NoText,
}

/// Extracts text on the blocking pool. A parser panic is reported as `Invalid`.
pub async fn extract_text(bytes: Bytes) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || extract_text_blocking(&bytes))
        .await
        .map_err(|e| ExtractError::Invalid(format!("PDF parser aborted: {e}")))?
}

pub fn extract_text_blocking(bytes: &[u8]) -> Result<String, ExtractError> {
    if !has_pdf_header(bytes) {
        return Err(ExtractError::Invalid("missing %PDF header".to_string()));
    }

    let raw = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractError::Invalid(e.to_string()))?;

    let text = normalize_whitespace(&raw);
    if text.is_empty() {
        return Err(ExtractError::NoText);
    }

    debug!(chars = text.len(), "extracted resume text");
    Ok(text)
}

fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(5).any(|w| w == b"%PDF-")
}

/// Trims line ends and collapses runs of blank lines into one.
fn normalize_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut blank_run = false;

    for line in raw.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank_run = true;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if blank_run {
                out.push('\n');
            }
        }
        blank_run = false;
        out.push_str(line);
    }

    out
}
