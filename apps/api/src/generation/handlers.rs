//! Axum handlers for resume generation, preview, template and downloads.

use std::path::{Path as FsPath, PathBuf};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::OutputFormat;
use crate::generation::generator::{generate_resume, preview_resume, PreviewOutcome};
use crate::registry::{FileKind, StoredFiles};
use crate::state::AppState;

const XLSX_MEDIA_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const TEMPLATE_FILENAME: &str = "Resume_Creator.xlsx";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    pub format: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct DownloadLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docx: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub name: String,
    pub file_id: Uuid,
    pub files: DownloadLinks,
}

// ────────────────────────────────────────────────────────────────────────────
// Upload helpers
// ────────────────────────────────────────────────────────────────────────────

fn is_workbook_name(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    lower.ends_with(".xlsx") || lower.ends_with(".xlsm")
}

/// Pulls the `file` field out of a multipart upload and checks its extension.
async fn read_workbook_upload(mut multipart: Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        if !is_workbook_name(&file_name) {
            return Err(AppError::Validation("File must be Excel".to_string()));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
        info!("Received workbook '{file_name}' ({} bytes)", bytes.len());
        return Ok(bytes.to_vec());
    }
    Err(AppError::Validation("Missing 'file' field".to_string()))
}

/// Owns a request's work directory until its files are registered.
///
/// Dropping the guard deletes the directory, which covers failed
/// generations and requests abandoned mid-flight (client disconnects during
/// conversion).
struct WorkDirGuard {
    path: PathBuf,
    keep: bool,
}

impl WorkDirGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    fn path(&self) -> &FsPath {
        &self.path
    }

    /// Hands the directory over; it outlives the guard.
    fn keep(mut self) -> PathBuf {
        self.keep = true;
        std::mem::take(&mut self.path)
    }
}

impl Drop for WorkDirGuard {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => debug!("Removed work dir {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Could not clean up {}: {e}", self.path.display()),
        }
    }
}

fn attachment(media_type: &str, file_name: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, media_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
        ],
        body,
    )
        .into_response()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /generate?format=pdf|docx|both
///
/// Generates the resume in a fresh work directory and registers the outputs
/// under a download token. PDF unavailability is not an error: the link is
/// simply absent.
pub async fn handle_generate(
    State(state): State<AppState>,
    Query(params): Query<GenerateParams>,
    multipart: Multipart,
) -> Result<Json<GenerateResponse>, AppError> {
    let format = match params.format.as_deref() {
        None => OutputFormat::default(),
        Some(raw) => raw.parse::<OutputFormat>().map_err(AppError::Validation)?,
    };
    let bytes = read_workbook_upload(multipart).await?;

    let work_dir =
        WorkDirGuard::new(state.config.output_dir.join(Uuid::new_v4().to_string()));
    let outcome =
        generate_resume(bytes, work_dir.path(), format, state.converter.as_ref()).await;

    if !outcome.success {
        return Err(AppError::Generation(
            outcome
                .error
                .unwrap_or_else(|| "Resume generation failed".to_string()),
        ));
    }

    let file_id = state.files.insert(StoredFiles::new(
        outcome.name.clone(),
        outcome.docx_path.clone(),
        outcome.pdf_path.clone(),
        work_dir.keep(),
    ));

    let link = |path: &Option<PathBuf>, kind: &str| {
        path.as_ref()
            .filter(|p| p.exists())
            .map(|_| format!("/download/{file_id}/{kind}"))
    };
    let files = DownloadLinks {
        pdf: link(&outcome.pdf_path, "pdf"),
        docx: link(&outcome.docx_path, "docx"),
    };

    Ok(Json(GenerateResponse {
        success: true,
        name: outcome.name,
        file_id,
        files,
    }))
}

/// GET /download/:file_id/:file_type
///
/// Serves one registered file with headers that keep browsers from sniffing
/// or caching it.
pub async fn handle_download(
    State(state): State<AppState>,
    Path((file_id, file_type)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let not_found = || AppError::NotFound("File not found or expired".to_string());
    let id = Uuid::parse_str(&file_id).map_err(|_| not_found())?;
    let stored = state.files.get(&id).ok_or_else(not_found)?;

    let unavailable = || AppError::NotFound(format!("{} file not available", file_type.to_uppercase()));
    let kind: FileKind = file_type.parse().map_err(|_| unavailable())?;
    let path = stored.path(kind).ok_or_else(unavailable)?;

    let body = match tokio::fs::read(path).await {
        Ok(body) => body,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(unavailable()),
        Err(e) => return Err(AppError::Internal(e.into())),
    };
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{}.{file_type}", stored.name));

    info!("Serving {} for {id}", kind.label());
    let mut response = attachment(kind.media_type(), &file_name, body);
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, header::HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, header::HeaderValue::from_static("0"));
    Ok(response)
}

/// POST /generate-preview
pub async fn handle_preview(multipart: Multipart) -> Result<Json<PreviewOutcome>, AppError> {
    let bytes = read_workbook_upload(multipart).await?;
    Ok(Json(preview_resume(bytes).await))
}

/// GET /template
pub async fn handle_template(State(state): State<AppState>) -> Result<Response, AppError> {
    match tokio::fs::read(&state.config.template_path).await {
        Ok(body) => Ok(attachment(XLSX_MEDIA_TYPE, TEMPLATE_FILENAME, body)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AppError::NotFound("Template file not found".to_string()))
        }
        Err(e) => Err(AppError::Internal(e.into())),
    }
}
