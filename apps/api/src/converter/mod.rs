//! DOCX → PDF conversion backends.
//!
//! Conversion is best effort: callers treat every `ConvertError` as "PDF
//! unavailable" and still return the DOCX.

pub mod cloudconvert;
pub mod office;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{Config, PdfBackend};

pub use cloudconvert::CloudConvertClient;
pub use office::OfficeConverter;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("PDF conversion unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Conversion API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Conversion job failed: {0}")]
    Job(String),

    #[error("Conversion timed out after {attempts} attempts")]
    Timeout { attempts: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Converter process failed: {0}")]
    Process(String),
}

/// Writes a PDF rendering of `docx` to `pdf`.
#[async_trait]
pub trait PdfConverter: Send + Sync {
    fn name(&self) -> &'static str;

    async fn convert(&self, docx: &Path, pdf: &Path) -> Result<(), ConvertError>;
}

/// How long a single conversion may keep its request waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionPolicy {
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl ConversionPolicy {
    pub fn deadline(&self) -> Duration {
        self.poll_interval * self.max_attempts
    }
}

impl Default for ConversionPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_attempts: 30,
        }
    }
}

/// Stand-in used when no backend is configured.
pub struct DisabledConverter {
    reason: String,
}

impl DisabledConverter {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl PdfConverter for DisabledConverter {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn convert(&self, _docx: &Path, _pdf: &Path) -> Result<(), ConvertError> {
        Err(ConvertError::Unavailable(self.reason.clone()))
    }
}

/// Picks the converter for the configured backend.
///
/// A CloudConvert backend without an API key falls back to disabled rather
/// than failing startup.
pub fn from_config(config: &Config) -> Result<Arc<dyn PdfConverter>, ConvertError> {
    let policy = config.conversion_policy();
    let converter: Arc<dyn PdfConverter> = match config.pdf_backend {
        PdfBackend::CloudConvert => match &config.cloudconvert_api_key {
            Some(key) => Arc::new(CloudConvertClient::new(
                key.clone(),
                config.cloudconvert_base_url.clone(),
                policy,
            )?),
            None => {
                warn!("CLOUDCONVERT_API_KEY not set, PDF output disabled");
                Arc::new(DisabledConverter::new("CloudConvert API key not configured"))
            }
        },
        PdfBackend::Office => Arc::new(OfficeConverter::new(config.soffice_path.clone(), policy)),
        PdfBackend::None => Arc::new(DisabledConverter::new("PDF conversion turned off")),
    };
    info!("PDF converter: {}", converter.name());
    Ok(converter)
}
