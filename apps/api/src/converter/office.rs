//! Local conversion through a headless LibreOffice (`soffice`) process.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use super::{ConversionPolicy, ConvertError, PdfConverter};

pub struct OfficeConverter {
    program: PathBuf,
    policy: ConversionPolicy,
}

impl OfficeConverter {
    pub fn new(program: impl Into<PathBuf>, policy: ConversionPolicy) -> Self {
        Self {
            program: program.into(),
            policy,
        }
    }
}

/// Where `soffice --outdir <dir>` puts the PDF for `docx`.
fn produced_path(docx: &Path, out_dir: &Path) -> PathBuf {
    let stem = docx.file_stem().unwrap_or_default().to_string_lossy();
    out_dir.join(format!("{stem}.pdf"))
}

#[async_trait]
impl PdfConverter for OfficeConverter {
    fn name(&self) -> &'static str {
        "office"
    }

    async fn convert(&self, docx: &Path, pdf: &Path) -> Result<(), ConvertError> {
        let out_dir = pdf.parent().unwrap_or_else(|| Path::new("."));
        info!("Converting {} with {}", docx.display(), self.program.display());

        let child = Command::new(&self.program)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(out_dir)
            .arg(docx)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let deadline = self.policy.deadline();
        let output = tokio::time::timeout(deadline, child.wait_with_output())
            .await
            .map_err(|_| ConvertError::Process(format!("no result within {deadline:?}")))??;

        if !output.status.success() {
            return Err(ConvertError::Process(format!(
                "exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let produced = produced_path(docx, out_dir);
        if !produced.exists() {
            return Err(ConvertError::Process(format!(
                "expected output {} was not written",
                produced.display()
            )));
        }
        if produced != pdf {
            debug!("Renaming {} → {}", produced.display(), pdf.display());
            tokio::fs::rename(&produced, pdf).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn policy() -> ConversionPolicy {
        ConversionPolicy {
            poll_interval: Duration::from_secs(1),
            max_attempts: 5,
        }
    }

    #[test]
    fn test_produced_path_uses_docx_stem() {
        assert_eq!(
            produced_path(Path::new("/w/in/Jane_Public_2024.docx"), Path::new("/w/out")),
            PathBuf::from("/w/out/Jane_Public_2024.pdf")
        );
    }

    #[tokio::test]
    async fn test_missing_program_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let converter = OfficeConverter::new("/nonexistent/bin/soffice", policy());
        let err = converter
            .convert(&dir.path().join("a.docx"), &dir.path().join("a.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Io(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_silent_program_without_output_fails() {
        let dir = tempfile::tempdir().unwrap();
        // `true` accepts any arguments and writes nothing.
        let converter = OfficeConverter::new("true", policy());
        let err = converter
            .convert(&dir.path().join("a.docx"), &dir.path().join("a.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Process(_)));
    }
}
