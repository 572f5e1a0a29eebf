mod analysis;
mod auth;
mod config;
mod errors;
mod llm_client;
mod routes;
mod state;
mod storage;
#[cfg(test)]
mod test_server;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::analysis::service::AnalysisService;
use crate::analysis::source::HttpResumeFetcher;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::S3ResumeStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting FitCheck API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    let store = S3ResumeStore::new(
        s3,
        config.s3_bucket.clone(),
        config.s3_public_base_url.clone(),
    );
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    // Initialize LLM client
    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.llm_api_url.clone(),
        config.llm_timeout,
    )
    .context("Failed to build LLM client")?;
    info!(
        "LLM client initialized (model: {}, timeout: {:?})",
        llm_client::MODEL,
        config.llm_timeout
    );

    // Initialize resume fetcher
    let fetcher = HttpResumeFetcher::new(config.resume_fetch_timeout, config.max_resume_bytes)
        .context("Failed to build resume fetcher")?;

    let analysis = AnalysisService::new(
        Arc::new(fetcher),
        Arc::new(llm),
        config.max_resume_bytes,
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        analysis: Arc::new(analysis),
        store: Arc::new(store),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the job-board frontend

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "fitcheck-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO serves buckets path-style
    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
