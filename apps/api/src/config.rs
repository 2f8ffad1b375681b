use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::converter::ConversionPolicy;

/// Which backend turns DOCX into PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfBackend {
    CloudConvert,
    Office,
    None,
}

impl FromStr for PdfBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cloudconvert" => Ok(PdfBackend::CloudConvert),
            "office" | "soffice" | "libreoffice" => Ok(PdfBackend::Office),
            "none" | "off" | "" => Ok(PdfBackend::None),
            other => bail!("PDF_BACKEND must be cloudconvert, office or none (got '{other}')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Everything has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Root for per-request work directories.
    pub output_dir: PathBuf,
    /// Blank workbook served by `GET /template`.
    pub template_path: PathBuf,
    pub pdf_backend: PdfBackend,
    pub cloudconvert_api_key: Option<String>,
    pub cloudconvert_base_url: String,
    pub conversion_poll_interval: Duration,
    pub conversion_max_attempts: u32,
    pub soffice_path: PathBuf,
    pub file_ttl: Duration,
    pub sweep_interval: Duration,
    pub max_upload_bytes: usize,
    /// Allowed CORS origins; empty means permissive.
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            port: parse_var(&lookup, "PORT", 8000)?,
            rust_log: var("RUST_LOG", "info"),
            output_dir: lookup("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join("resume-api")),
            template_path: PathBuf::from(var("TEMPLATE_PATH", "Resume_Creator.xlsx")),
            pdf_backend: var("PDF_BACKEND", "cloudconvert").parse()?,
            cloudconvert_api_key: lookup("CLOUDCONVERT_API_KEY").filter(|k| !k.trim().is_empty()),
            cloudconvert_base_url: var("CLOUDCONVERT_BASE_URL", "https://api.cloudconvert.com"),
            conversion_poll_interval: Duration::from_millis(parse_var(
                &lookup,
                "CONVERSION_POLL_INTERVAL_MS",
                1000,
            )?),
            conversion_max_attempts: parse_var(&lookup, "CONVERSION_MAX_ATTEMPTS", 30)?,
            soffice_path: PathBuf::from(var("SOFFICE_PATH", "soffice")),
            file_ttl: Duration::from_secs(parse_var(&lookup, "FILE_TTL_SECS", 3600)?),
            sweep_interval: Duration::from_secs(parse_var(&lookup, "SWEEP_INTERVAL_SECS", 300)?),
            max_upload_bytes: parse_var(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            cors_origins: lookup("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    pub fn conversion_policy(&self) -> ConversionPolicy {
        ConversionPolicy {
            poll_interval: self.conversion_poll_interval,
            max_attempts: self.conversion_max_attempts,
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
