//! Resume Source Resolver — turns any accepted resume encoding into raw PDF bytes.
//!
//! URL sources are fetched through a `ResumeFetcher` so the network can be
//! replaced in tests. A fetched body is only accepted when the server declares
//! a PDF content type; an HTML error page from a dead link never reaches the parser.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::{Bytes, BytesMut};
use reqwest::{header::CONTENT_TYPE, Client, Url};
use thiserror::Error;
use tracing::debug;

use crate::analysis::models::ResumeSource;

const PDF_MEDIA_TYPES: &[&str] = &["application/pdf", "application/x-pdf"];

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("could not fetch resume: {message}")]
    Fetch { message: String, timed_out: bool },

    #[error("could not decode resume payload: {0}")]
    Decode(String),
}

impl ResolveError {
    fn fetch(message: impl Into<String>) -> Self {
        ResolveError::Fetch {
            message: message.into(),
            timed_out: false,
        }
    }
}

/// A fetched resume body and the content type the server declared for it.
#[derive(Debug, Clone)]
pub struct FetchedResume {
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Retrieves a resume file by URL.
#[async_trait]
pub trait ResumeFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedResume, ResolveError>;
}

/// `reqwest`-backed fetcher used in production.
pub struct HttpResumeFetcher {
    client: Client,
    timeout: Duration,
    max_bytes: usize,
}

impl HttpResumeFetcher {
    pub fn new(timeout: Duration, max_bytes: usize) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            timeout,
            max_bytes,
        })
    }

    fn classify(&self, error: reqwest::Error) -> ResolveError {
        if error.is_timeout() {
            ResolveError::Fetch {
                message: format!("timed out after {:?}", self.timeout),
                timed_out: true,
            }
        } else {
            ResolveError::fetch(error.to_string())
        }
    }

    fn too_large(&self) -> ResolveError {
        ResolveError::fetch(format!("resume exceeds the {} byte limit", self.max_bytes))
    }
}

#[async_trait]
impl ResumeFetcher for HttpResumeFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedResume, ResolveError> {
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::fetch(format!("resume URL returned {status}")));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        // Reject before reading so an HTML error page is never downloaded.
        check_pdf_content_type(content_type.as_deref())?;

        if let Some(length) = response.content_length() {
            if usize::try_from(length).map_or(true, |l| l > self.max_bytes) {
                return Err(self.too_large());
            }
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| self.classify(e))? {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large());
            }
            body.extend_from_slice(&chunk);
        }

        Ok(FetchedResume {
            content_type,
            body: body.freeze(),
        })
    }
}

/// Normalizes a `ResumeSource` into the bytes of a PDF file.
pub struct ResumeResolver {
    fetcher: Arc<dyn ResumeFetcher>,
    max_bytes: usize,
}

impl ResumeResolver {
    pub fn new(fetcher: Arc<dyn ResumeFetcher>, max_bytes: usize) -> Self {
        Self { fetcher, max_bytes }
    }

    pub async fn resolve(&self, source: &ResumeSource) -> Result<Bytes, ResolveError> {
        let bytes = match source {
            ResumeSource::Url(raw) => self.resolve_url(raw).await?,
            ResumeSource::Upload { bytes, media_type } => {
                if !is_pdf_media_type(media_type) {
                    return Err(ResolveError::InvalidInput(format!(
                        "Only PDF files are allowed, got '{media_type}'"
                    )));
                }
                bytes.clone()
            }
            ResumeSource::Base64(payload) => Bytes::from(decode_base64_payload(payload)?),
        };

        if bytes.is_empty() {
            return Err(ResolveError::InvalidInput("Resume file is empty".to_string()));
        }
        if bytes.len() > self.max_bytes {
            return Err(ResolveError::InvalidInput(format!(
                "Resume must be at most {} bytes, got {}",
                self.max_bytes,
                bytes.len()
            )));
        }

        debug!(source = source.kind(), bytes = bytes.len(), "resume resolved");
        Ok(bytes)
    }

    async fn resolve_url(&self, raw: &str) -> Result<Bytes, ResolveError> {
        let url = Url::parse(raw)
            .map_err(|e| ResolveError::InvalidInput(format!("Invalid resume URL '{raw}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ResolveError::InvalidInput(format!(
                "Resume URL must be http or https, got '{}'",
                url.scheme()
            )));
        }

        let fetched = self.fetcher.fetch(&url).await?;
        check_pdf_content_type(fetched.content_type.as_deref())?;

        // Same classification as the fetcher's own cap.
        if fetched.body.len() > self.max_bytes {
            return Err(ResolveError::fetch(format!(
                "resume is {} bytes, limit is {}",
                fetched.body.len(),
                self.max_bytes
            )));
        }
        Ok(fetched.body)
    }
}

fn check_pdf_content_type(content_type: Option<&str>) -> Result<(), ResolveError> {
    match content_type {
        Some(ct) if is_pdf_media_type(ct) => Ok(()),
        Some(ct) => Err(ResolveError::fetch(format!(
            "expected a PDF but the server sent '{ct}'"
        ))),
        None => Err(ResolveError::fetch(
            "expected a PDF but the server sent no content type",
        )),
    }
}

/// Accepts `application/pdf` with or without parameters (`; charset=binary`).
pub fn is_pdf_media_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    PDF_MEDIA_TYPES.contains(&essence.as_str())
}

/// Decodes a `data:<type>;base64,<payload>` URI or bare base64 text.
pub fn decode_base64_payload(payload: &str) -> Result<Vec<u8>, ResolveError> {
    let payload = payload.trim();
    let encoded = match payload.strip_prefix("data:") {
        Some(uri) => {
            let (header, data) = uri
                .split_once(',')
                .ok_or_else(|| ResolveError::Decode("data URI has no payload".to_string()))?;
            if !header.ends_with(";base64") {
                return Err(ResolveError::Decode(
                    "data URI is not base64-encoded".to_string(),
                ));
            }
            data
        }
        None => payload,
    };

    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(ResolveError::Decode("payload is empty".to_string()));
    }

    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ResolveError::Decode(e.to_string()))
}
