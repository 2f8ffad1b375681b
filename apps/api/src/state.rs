use std::sync::Arc;

use crate::config::Config;
use crate::converter::PdfConverter;
use crate::registry::FileRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable PDF backend. Default: CloudConvert, disabled without an API key.
    pub converter: Arc<dyn PdfConverter>,
    /// Download tokens for generated files; the only mutable shared state.
    pub files: Arc<FileRegistry>,
}

impl AppState {
    pub fn new(config: Config, converter: Arc<dyn PdfConverter>) -> Self {
        let files = Arc::new(FileRegistry::new(config.file_ttl));
        Self {
            config,
            converter,
            files,
        }
    }
}
