// Resume generation: workbook → styled sections → assembled document → exported files.
// Everything up to the DOCX write is synchronous and runs on the blocking pool.

pub mod assembler;
pub mod generator;
pub mod handlers;
pub mod sections;

use thiserror::Error;

/// Fatal input or output failures of one generation request.
///
/// Degraded data (bad cells, missing optional sheets, PDF conversion
/// problems) never produces one of these.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Required sheet '{0}' not found in workbook")]
    MissingSheet(String),

    #[error("Could not read workbook: {0}")]
    Spreadsheet(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DOCX write failed: {0}")]
    Docx(String),

    #[error("Generation task failed: {0}")]
    Task(String),
}
