use std::sync::Arc;

use crate::analysis::service::AnalysisService;
use crate::config::Config;
use crate::storage::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every client inside is built once in `main` and owned here.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub analysis: Arc<AnalysisService>,
    /// Pluggable object store. Default: S3ResumeStore (MinIO locally).
    pub store: Arc<dyn ResumeStore>,
}
