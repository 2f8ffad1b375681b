// Export adapter: writes the assembled document and, when asked, a PDF copy.
// Conversion failures never fail the export; the PDF is simply absent.

pub mod docx;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::converter::PdfConverter;
use crate::document::Document;
use crate::generation::GenerationError;

/// Requested saved-document formats (`?format=` on the generate route).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pdf,
    Docx,
    Both,
}

impl OutputFormat {
    pub fn wants_pdf(self) -> bool {
        matches!(self, OutputFormat::Pdf | OutputFormat::Both)
    }

    pub fn wants_docx(self) -> bool {
        matches!(self, OutputFormat::Docx | OutputFormat::Both)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "docx" => Ok(OutputFormat::Docx),
            "both" => Ok(OutputFormat::Both),
            other => Err(format!(
                "Unknown format '{other}', expected pdf, docx or both"
            )),
        }
    }
}

/// Paths of the files actually produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportedFiles {
    pub docx: Option<PathBuf>,
    pub pdf: Option<PathBuf>,
}

/// Writes `<dir>/<stem>.docx`, then converts it to `<stem>.pdf` if PDF is
/// requested. With PDF-only output the intermediate DOCX is removed once the
/// PDF exists; if conversion fails it stays on disk but is not reported.
pub async fn export_documents(
    document: Document,
    dir: &Path,
    stem: &str,
    format: OutputFormat,
    converter: &dyn PdfConverter,
) -> Result<ExportedFiles, GenerationError> {
    let docx_path = dir.join(format!("{stem}.docx"));
    let pdf_path = dir.join(format!("{stem}.pdf"));

    let target = docx_path.clone();
    tokio::task::spawn_blocking(move || docx::write_docx(&document, &target))
        .await
        .map_err(|e| GenerationError::Task(e.to_string()))??;
    info!("DOCX written: {}", docx_path.display());

    let mut files = ExportedFiles::default();

    if format.wants_pdf() {
        match converter.convert(&docx_path, &pdf_path).await {
            Ok(()) => {
                info!("PDF written via {}: {}", converter.name(), pdf_path.display());
                files.pdf = Some(pdf_path);
            }
            Err(e) => warn!("PDF unavailable ({}): {e}", converter.name()),
        }
    }

    if format.wants_docx() {
        files.docx = Some(docx_path);
    } else if files.pdf.is_some() {
        if let Err(e) = tokio::fs::remove_file(&docx_path).await {
            warn!("Could not remove intermediate DOCX: {e}");
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{ConvertError, DisabledConverter};
    use crate::layout::{BaseFont, PageSetup};
    use async_trait::async_trait;

    /// Copies the DOCX bytes to the PDF path.
    struct CopyConverter;

    #[async_trait]
    impl PdfConverter for CopyConverter {
        fn name(&self) -> &'static str {
            "copy"
        }

        async fn convert(&self, docx: &Path, pdf: &Path) -> Result<(), ConvertError> {
            tokio::fs::copy(docx, pdf).await?;
            Ok(())
        }
    }

    fn document() -> Document {
        Document::new(PageSetup::letter(), BaseFont::default())
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("PDF".parse::<OutputFormat>(), Ok(OutputFormat::Pdf));
        assert_eq!("both".parse::<OutputFormat>(), Ok(OutputFormat::Both));
        assert!("html".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default(), OutputFormat::Pdf);
        assert!(OutputFormat::Both.wants_pdf() && OutputFormat::Both.wants_docx());
        assert!(!OutputFormat::Docx.wants_pdf());
    }

    #[tokio::test]
    async fn test_pdf_only_removes_intermediate_docx() {
        let dir = tempfile::tempdir().unwrap();
        let files = export_documents(document(), dir.path(), "Jane_Public", OutputFormat::Pdf, &CopyConverter)
            .await
            .unwrap();
        assert_eq!(files.docx, None);
        assert_eq!(files.pdf, Some(dir.path().join("Jane_Public.pdf")));
        assert!(!dir.path().join("Jane_Public.docx").exists());
    }

    #[tokio::test]
    async fn test_both_keeps_docx() {
        let dir = tempfile::tempdir().unwrap();
        let files = export_documents(document(), dir.path(), "r", OutputFormat::Both, &CopyConverter)
            .await
            .unwrap();
        assert!(files.docx.as_ref().is_some_and(|p| p.exists()));
        assert!(files.pdf.as_ref().is_some_and(|p| p.exists()));
    }

    #[tokio::test]
    async fn test_conversion_failure_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let disabled = DisabledConverter::new("off");

        let both = export_documents(document(), dir.path(), "a", OutputFormat::Both, &disabled)
            .await
            .unwrap();
        assert_eq!(both.pdf, None);
        assert!(both.docx.is_some());

        let pdf_only = export_documents(document(), dir.path(), "b", OutputFormat::Pdf, &disabled)
            .await
            .unwrap();
        assert_eq!(pdf_only, ExportedFiles::default());
    }

    #[tokio::test]
    async fn test_docx_only_never_converts() {
        let dir = tempfile::tempdir().unwrap();
        let files = export_documents(document(), dir.path(), "c", OutputFormat::Docx, &CopyConverter)
            .await
            .unwrap();
        assert!(files.docx.is_some());
        assert_eq!(files.pdf, None);
        assert!(!dir.path().join("c.pdf").exists());
    }
}
