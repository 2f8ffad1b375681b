//! Resume generation: orchestrates the full generation pipeline.
//!
//! Flow: load workbook → extract sections → resolve styles → assemble →
//!       write DOCX → (optional) convert to PDF.
//!
//! Everything before the conversion is CPU/disk bound and runs on the
//! blocking pool. Callers always receive an outcome value; errors are folded
//! into `success = false` with a message.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::converter::PdfConverter;
use crate::document::Document;
use crate::export::{export_documents, OutputFormat};
use crate::generation::assembler::{assemble, base_filename, output_stem};
use crate::generation::GenerationError;
use crate::layout::resolve_styles;
use crate::models::resume::SectionKind;
use crate::workbook::{extract_preview, extract_resume, Workbook};

// ────────────────────────────────────────────────────────────────────────────
// Outcomes
// ────────────────────────────────────────────────────────────────────────────

/// Result of one generation request.
///
/// `success` is true once the document was assembled and written; a missing
/// PDF alone never flips it.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub success: bool,
    /// File-name base derived from the contact name.
    pub name: String,
    pub docx_path: Option<PathBuf>,
    pub pdf_path: Option<PathBuf>,
    pub error: Option<String>,
}

impl GenerationOutcome {
    fn failed(err: GenerationError) -> Self {
        Self {
            success: false,
            name: String::new(),
            docx_path: None,
            pdf_path: None,
            error: Some(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections_included: Option<Vec<SectionKind>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_work_roles: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PreviewOutcome {
    fn failed(err: GenerationError) -> Self {
        Self {
            success: false,
            name: None,
            sections_included: None,
            total_work_roles: None,
            error: Some(err.to_string()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

fn task_error(e: tokio::task::JoinError) -> GenerationError {
    GenerationError::Task(e.to_string())
}

/// Synchronous core: extracted sections rendered into a document, plus the
/// contact name used for file naming.
pub fn render_workbook(workbook: &Workbook) -> Result<(Document, String), GenerationError> {
    let data = extract_resume(workbook)?;
    let styles = resolve_styles(workbook);
    let document = assemble(&data, &styles);
    if document.is_empty() {
        warn!("Workbook has no included content; writing an empty document");
    }
    info!("Assembled document with {} paragraphs", document.len());
    Ok((document, data.contact.name().unwrap_or_default().to_string()))
}

/// Generates the resume for an uploaded workbook into `work_dir`.
pub async fn generate_resume(
    bytes: Vec<u8>,
    work_dir: &Path,
    format: OutputFormat,
    converter: &dyn PdfConverter,
) -> GenerationOutcome {
    let loaded = tokio::task::spawn_blocking(move || Workbook::from_bytes(bytes))
        .await
        .map_err(task_error)
        .and_then(|result| result);

    match loaded {
        Ok(workbook) => generate_from_workbook(workbook, work_dir, format, converter).await,
        Err(e) => {
            error!("Workbook load failed: {e}");
            GenerationOutcome::failed(e)
        }
    }
}

/// Same as [`generate_resume`] for an already-loaded workbook.
pub async fn generate_from_workbook(
    workbook: Workbook,
    work_dir: &Path,
    format: OutputFormat,
    converter: &dyn PdfConverter,
) -> GenerationOutcome {
    match run_pipeline(workbook, work_dir, format, converter).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Resume generation failed: {e}");
            GenerationOutcome::failed(e)
        }
    }
}

async fn run_pipeline(
    workbook: Workbook,
    work_dir: &Path,
    format: OutputFormat,
    converter: &dyn PdfConverter,
) -> Result<GenerationOutcome, GenerationError> {
    let (document, name) = tokio::task::spawn_blocking(move || render_workbook(&workbook))
        .await
        .map_err(task_error)??;

    tokio::fs::create_dir_all(work_dir).await?;
    let stem = output_stem(&name, Local::now().naive_local());
    let files = export_documents(document, work_dir, &stem, format, converter).await?;

    info!(
        "Generated resume '{stem}' (docx: {}, pdf: {})",
        files.docx.is_some(),
        files.pdf.is_some()
    );

    Ok(GenerationOutcome {
        success: true,
        name: base_filename(&name),
        docx_path: files.docx,
        pdf_path: files.pdf,
        error: None,
    })
}

/// Summarises an uploaded workbook without rendering anything.
pub async fn preview_resume(bytes: Vec<u8>) -> PreviewOutcome {
    let result = tokio::task::spawn_blocking(move || {
        let workbook = Workbook::from_bytes(bytes)?;
        Ok::<_, GenerationError>(preview_workbook(&workbook))
    })
    .await
    .map_err(task_error)
    .and_then(|result| result);

    match result {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Preview failed: {e}");
            PreviewOutcome::failed(e)
        }
    }
}

pub fn preview_workbook(workbook: &Workbook) -> PreviewOutcome {
    match extract_preview(workbook) {
        Ok(preview) => PreviewOutcome {
            success: true,
            name: Some(preview.contact.name().unwrap_or("Unknown").to_string()),
            sections_included: Some(preview.order.enabled().cloned().collect()),
            total_work_roles: Some(preview.work_roles.len()),
            error: None,
        },
        Err(e) => PreviewOutcome::failed(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::Data;

    use crate::converter::DisabledConverter;
    use crate::export::docx::test_support::paragraph_texts;
    use crate::workbook::test_support::{minimal_sheets, workbook, xlsx_bytes, SheetBuilder};

    fn minimal() -> Workbook {
        workbook(minimal_sheets())
    }

    #[test]
    fn test_render_workbook_uses_fallback_order() {
        let (doc, name) = render_workbook(&minimal()).unwrap();
        assert_eq!(name, "Jordan Lee");
        let texts: Vec<String> = doc.paragraphs.iter().map(|p| p.text()).collect();
        assert_eq!(texts[0], "Jordan Lee");
        assert!(texts.contains(&"PROFESSIONAL EXPERIENCE".to_string()));
        assert!(texts.contains(&"Acme\tJan 2020 - Present".to_string()));
        // Glyph stripped from the experience bullet.
        assert!(texts.contains(&"Shipped the billing service".to_string()));
    }

    #[tokio::test]
    async fn test_pdf_without_converter_still_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let converter = DisabledConverter::new("no key");
        let outcome =
            generate_from_workbook(minimal(), dir.path(), OutputFormat::Pdf, &converter).await;

        assert!(outcome.success);
        assert_eq!(outcome.name, "Jordan_Lee");
        assert_eq!(outcome.pdf_path, None);
        assert_eq!(outcome.docx_path, None);
        assert_eq!(outcome.error, None);
    }

    #[tokio::test]
    async fn test_docx_output_written_to_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        let work_dir = dir.path().join("job");
        let converter = DisabledConverter::new("off");
        let outcome =
            generate_from_workbook(minimal(), &work_dir, OutputFormat::Both, &converter).await;

        let docx = outcome.docx_path.expect("docx path");
        assert!(docx.starts_with(&work_dir));
        assert!(docx.exists());
        let file_name = docx.file_name().unwrap().to_string_lossy().into_owned();
        assert!(file_name.starts_with("Jordan_Lee_"));
        assert!(file_name.ends_with(".docx"));
    }

    #[tokio::test]
    async fn test_missing_mandatory_sheet_fails_with_name() {
        let dir = tempfile::tempdir().unwrap();
        let sheets: Vec<_> = minimal_sheets()
            .into_iter()
            .filter(|(name, _)| *name != "Work_Experience")
            .collect();
        let outcome = generate_from_workbook(
            workbook(sheets),
            dir.path(),
            OutputFormat::Docx,
            &DisabledConverter::new("off"),
        )
        .await;

        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("Work_Experience"));
        assert_eq!(outcome.docx_path, None);
    }

    #[tokio::test]
    async fn test_unreadable_upload_fails() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = generate_resume(
            b"plain text".to_vec(),
            dir.path(),
            OutputFormat::Docx,
            &DisabledConverter::new("off"),
        )
        .await;
        assert!(!outcome.success);
        assert!(outcome.error.is_some());
    }

    #[test]
    fn test_preview_counts_included_roles() {
        let mut sheets = minimal_sheets();
        sheets[1] = (
            "Work_Roles",
            SheetBuilder::new()
                .text(4, 2, "Acme")
                .text(4, 7, "Yes")
                .text(5, 2, "Globex")
                .text(5, 7, "No")
                .text(6, 2, "Initech")
                .text(6, 7, "y")
                .text(7, 2, "Hooli"),
        );
        let outcome = preview_workbook(&workbook(sheets));
        assert!(outcome.success);
        assert_eq!(outcome.name.as_deref(), Some("Jordan Lee"));
        assert_eq!(outcome.total_work_roles, Some(2));
        assert_eq!(
            outcome.sections_included.map(|s| s.len()),
            Some(SectionKind::FALLBACK_ORDER.len())
        );
    }

    #[test]
    fn test_preview_defaults_name_and_serializes_ids() {
        let sheets = vec![
            ("Contact_Info", SheetBuilder::new()),
            ("Work_Roles", SheetBuilder::new()),
            (
                "Order",
                SheetBuilder::new()
                    .text(2, 3, "Summary")
                    .text(2, 4, "Yes")
                    .text(3, 3, "Skills")
                    .text(3, 4, "No"),
            ),
        ];
        let outcome = preview_workbook(&workbook(sheets));
        assert_eq!(outcome.name.as_deref(), Some("Unknown"));
        assert_eq!(outcome.total_work_roles, Some(0));

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["sections_included"], serde_json::json!(["Summary"]));
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_preview_missing_contact_sheet() {
        let outcome = preview_workbook(&Workbook::default());
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("Contact_Info"));
    }

    #[tokio::test]
    async fn test_real_workbook_renders_to_docx() {
        let mut sheets = minimal_sheets();
        sheets[0] = (
            "Contact_Info",
            SheetBuilder::new()
                .text(4, 2, "Name")
                .text(4, 3, "Jordan Lee")
                .text(4, 4, "Yes")
                .text(5, 2, "Phone")
                .value(5, 3, Data::Float(5551234567.0))
                .text(5, 4, "Yes"),
        );
        sheets[1] = (
            "Work_Roles",
            SheetBuilder::new()
                .text(4, 2, "Acme")
                .text(4, 3, "Engineer")
                .date(4, 4, 43831.0)
                .text(4, 5, "present")
                .text(4, 7, "Yes"),
        );
        // Equal orders keep sheet order; a blank order sorts last.
        sheets.push((
            "Highlights",
            SheetBuilder::new()
                .text(4, 2, "• First")
                .text(4, 3, "Yes")
                .value(4, 4, Data::Float(2.0))
                .text(5, 2, "Second")
                .text(5, 3, "Yes")
                .value(5, 4, Data::Float(1.0))
                .text(6, 2, "Third")
                .text(6, 3, "Yes")
                .value(6, 4, Data::Float(2.0))
                .text(7, 2, "Fourth")
                .text(7, 3, "Yes"),
        ));

        let dir = tempfile::tempdir().unwrap();
        let outcome = generate_resume(
            xlsx_bytes(sheets),
            dir.path(),
            OutputFormat::Docx,
            &DisabledConverter::new("off"),
        )
        .await;
        assert!(outcome.success, "{:?}", outcome.error);

        let docx = std::fs::read(outcome.docx_path.unwrap()).unwrap();
        let texts = paragraph_texts(&docx);
        assert_eq!(texts[..2], ["Jordan Lee", "5551234567"]);
        assert!(texts.contains(&"AcmeJan 2020 - Present".to_string()));
        assert!(texts.contains(&"Shipped the billing service".to_string()));

        let highlights: Vec<&str> = texts
            .iter()
            .map(String::as_str)
            .filter(|t| ["First", "Second", "Third", "Fourth"].contains(t))
            .collect();
        assert_eq!(highlights, ["Second", "First", "Third", "Fourth"]);
    }
}
