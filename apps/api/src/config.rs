use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    /// Overrides the Messages API endpoint (proxies, local gateways).
    pub llm_api_url: Option<String>,
    pub llm_timeout: Duration,
    pub resume_fetch_timeout: Duration,
    pub max_resume_bytes: usize,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub s3_public_base_url: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let s3_bucket = require_env("S3_BUCKET")?;
        let s3_endpoint = require_env("S3_ENDPOINT")?;
        let s3_public_base_url = std::env::var("S3_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("{}/{}", s3_endpoint.trim_end_matches('/'), s3_bucket));

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            llm_api_url: std::env::var("LLM_API_URL").ok(),
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 60)?),
            resume_fetch_timeout: Duration::from_secs(parse_env("RESUME_FETCH_TIMEOUT_SECS", 15)?),
            max_resume_bytes: parse_env("MAX_RESUME_BYTES", DEFAULT_MAX_RESUME_BYTES)?,
            s3_bucket,
            s3_endpoint,
            s3_public_base_url,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default() {
        let value: u64 = parse_env("FITCHECK_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("FITCHECK_TEST_BAD_NUMBER", "fifteen");
        let result: Result<u64> = parse_env("FITCHECK_TEST_BAD_NUMBER", 15);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_env_reads_value() {
        std::env::set_var("FITCHECK_TEST_GOOD_NUMBER", " 30 ");
        let value: u64 = parse_env("FITCHECK_TEST_GOOD_NUMBER", 15).unwrap();
        assert_eq!(value, 30);
    }
}
