//! Spreadsheet reader: typed access to the resume template workbook.
//!
//! The template is a lightly-typed record store addressed by fixed
//! coordinates. `Workbook` owns every sheet as a calamine `Range<Data>`;
//! `schema` pins the coordinates, `cells` parses single values and `extract`
//! turns sheets into the records in `models::resume`.

pub mod cells;
pub mod extract;
pub mod schema;

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};
use tracing::{debug, warn};

use crate::generation::GenerationError;

pub use extract::{extract_preview, extract_resume};

/// An in-memory workbook: sheet name → cell range.
///
/// Cells are addressed 1-based `(row, column)` to match the template's
/// documentation (`B5` is `(5, 2)`). Anything outside a sheet's used range
/// reads as empty.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: HashMap<String, Range<Data>>,
}

static EMPTY: Data = Data::Empty;

impl Workbook {
    /// Loads an `.xlsx` / `.xlsm` workbook from raw bytes (an uploaded file).
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, GenerationError> {
        let xlsx: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| GenerationError::Spreadsheet(e.to_string()))?;
        Ok(Self::load_sheets(xlsx))
    }

    fn load_sheets<R: std::io::Read + std::io::Seek>(mut xlsx: Xlsx<R>) -> Self {
        let mut sheets = HashMap::new();
        for name in xlsx.sheet_names() {
            match xlsx.worksheet_range(&name) {
                Ok(range) => {
                    debug!("Loaded sheet '{name}' ({:?})", range.get_size());
                    sheets.insert(name, range);
                }
                // An unreadable sheet behaves like a missing one.
                Err(e) => warn!("Skipping unreadable sheet '{name}': {e}"),
            }
        }
        Self { sheets }
    }

    /// Builds a workbook from already-materialized ranges.
    #[cfg(test)]
    pub fn from_sheets(sheets: impl IntoIterator<Item = (String, Range<Data>)>) -> Self {
        Self {
            sheets: sheets.into_iter().collect(),
        }
    }

    pub fn sheet(&self, name: &str) -> Option<Sheet<'_>> {
        self.sheets
            .get(name)
            .map(|range| Sheet { range })
    }

    /// Like [`Workbook::sheet`], but absence is a fatal input error.
    pub fn required_sheet(&self, name: &str) -> Result<Sheet<'_>, GenerationError> {
        self.sheet(name)
            .ok_or_else(|| GenerationError::MissingSheet(name.to_string()))
    }
}

/// Borrowed view over one worksheet.
#[derive(Debug, Clone, Copy)]
pub struct Sheet<'a> {
    range: &'a Range<Data>,
}

impl<'a> Sheet<'a> {
    /// Raw cell at 1-based `(row, col)`.
    pub fn cell(&self, row: u32, col: u32) -> &'a Data {
        if row == 0 || col == 0 {
            return &EMPTY;
        }
        self.range.get_value((row - 1, col - 1)).unwrap_or(&EMPTY)
    }

    /// Trimmed text of the cell at 1-based `(row, col)`.
    pub fn text(&self, row: u32, col: u32) -> String {
        cells::cell_text(self.cell(row, col))
    }
}
