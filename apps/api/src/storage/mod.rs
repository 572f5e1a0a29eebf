//! Resume uploads to the object store (S3 / MinIO).

pub mod handlers;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::analysis::source::is_pdf_media_type;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("upload failed: {0}")]
    Upload(String),
}

/// Where an uploaded resume can be fetched from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResume {
    pub url: String,
    pub public_id: String,
    pub download_url: String,
}

/// Object storage for resume files. Returns the public URL of the stored object.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<String, StoreError>;
}

pub struct S3ResumeStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3ResumeStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ResumeStore for S3ResumeStore {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<String, StoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StoreError::Upload(DisplayErrorContext(&e).to_string()))?;

        info!("Uploaded resume to s3://{}/{}", self.bucket, key);
        Ok(format!("{}/{}", self.public_base_url, key))
    }
}

/// A resume file received from a client, before validation.
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Validates and stores a resume under `resumes/{user}/{millis}_{name}`.
pub async fn store_resume(
    store: &dyn ResumeStore,
    user_id: &str,
    upload: ResumeUpload,
    max_bytes: usize,
    now: DateTime<Utc>,
) -> Result<StoredResume, StoreError> {
    validate_upload(&upload, max_bytes)?;

    let key = resume_key(user_id, &upload.file_name, now);
    let url = store.put(&key, upload.bytes, "application/pdf").await?;

    Ok(StoredResume {
        download_url: format!("{url}?download=1"),
        url,
        public_id: key,
    })
}

fn validate_upload(upload: &ResumeUpload, max_bytes: usize) -> Result<(), StoreError> {
    if !is_pdf_media_type(&upload.content_type) {
        return Err(StoreError::InvalidInput("Only PDF files are allowed".to_string()));
    }
    if upload.bytes.is_empty() {
        return Err(StoreError::InvalidInput("File is empty".to_string()));
    }
    if upload.bytes.len() > max_bytes {
        return Err(StoreError::InvalidInput(format!(
            "File size must be less than {}MB",
            max_bytes / (1024 * 1024)
        )));
    }
    Ok(())
}

pub fn resume_key(user_id: &str, file_name: &str, now: DateTime<Utc>) -> String {
    format!(
        "resumes/{}/{}_{}",
        sanitize_filename(user_id),
        now.timestamp_millis(),
        sanitize_filename(file_name)
    )
}

/// Keeps `[A-Za-z0-9._-]`, replaces everything else with `_`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    // "." and ".." would escape the user prefix in path-style gateways.
    if cleaned.chars().all(|c| c == '.') {
        cleaned.replace('.', "_")
    } else {
        cleaned
    }
}
