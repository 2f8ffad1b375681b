//! Typography catalog for the nine resume style categories.
//!
//! Every category starts from an embedded Calibri default. A workbook's
//! Defaults sheet may override font, size, bold and italic per category.
//! The resolved `StyleSheet` is immutable and shared by reference with every
//! section builder for the duration of one request.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::workbook::cells::{cell_text, parse_integer};
use crate::workbook::schema::{DEFAULTS, DEFAULTS_SHEET};
use crate::workbook::Workbook;

// ────────────────────────────────────────────────────────────────────────────
// Style categories
// ────────────────────────────────────────────────────────────────────────────

/// The fixed typography roles, each applied uniformly across sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleCategory {
    /// Name and credentials line of the contact header.
    Name,
    /// Professional title under the name.
    Title,
    /// Pipe-joined email/phone/links/location line.
    ContactLine,
    SectionHeader,
    /// Company and school names.
    Organization,
    DateRange,
    /// Job titles and degrees.
    Role,
    Location,
    /// Bullets, summary text and skill lines.
    Body,
}

impl StyleCategory {
    pub const ALL: [StyleCategory; 9] = [
        StyleCategory::Name,
        StyleCategory::Title,
        StyleCategory::ContactLine,
        StyleCategory::SectionHeader,
        StyleCategory::Organization,
        StyleCategory::DateRange,
        StyleCategory::Role,
        StyleCategory::Location,
        StyleCategory::Body,
    ];

    /// Row label identifying this category on the Defaults sheet.
    pub fn label(self) -> &'static str {
        match self {
            StyleCategory::Name => "Name & Credentials",
            StyleCategory::Title => "Title",
            StyleCategory::ContactLine => "Contact Information",
            StyleCategory::SectionHeader => "Section Headers",
            StyleCategory::Organization => "Company/School Names",
            StyleCategory::DateRange => "Employed/Enrolled Dates",
            StyleCategory::Role => "Job Title/Degree",
            StyleCategory::Location => "Location",
            StyleCategory::Body => "Body (Bullets)",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Font settings for one category. `size_pt` is always positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSpec {
    pub font: String,
    pub size_pt: u32,
    pub bold: bool,
    pub italic: bool,
}

impl StyleSpec {
    fn calibri(size_pt: u32, bold: bool, italic: bool) -> Self {
        Self {
            font: DEFAULT_FONT.to_string(),
            size_pt,
            bold,
            italic,
        }
    }
}

const DEFAULT_FONT: &str = "Calibri";

// ────────────────────────────────────────────────────────────────────────────
// Style sheet
// ────────────────────────────────────────────────────────────────────────────

/// Resolved mapping from every category to its `StyleSpec`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheet {
    specs: [StyleSpec; 9],
}

impl StyleSheet {
    /// The built-in catalog used when the workbook says nothing.
    pub fn embedded() -> Self {
        Self {
            specs: [
                StyleSpec::calibri(20, true, false),  // Name
                StyleSpec::calibri(14, true, false),  // Title
                StyleSpec::calibri(10, false, false), // ContactLine
                StyleSpec::calibri(11, true, false),  // SectionHeader
                StyleSpec::calibri(10, true, false),  // Organization
                StyleSpec::calibri(10, false, false), // DateRange
                StyleSpec::calibri(10, false, true),  // Role
                StyleSpec::calibri(10, false, true),  // Location
                StyleSpec::calibri(10, false, false), // Body
            ],
        }
    }

    pub fn get(&self, category: StyleCategory) -> &StyleSpec {
        &self.specs[category.index()]
    }

    fn get_mut(&mut self, category: StyleCategory) -> &mut StyleSpec {
        &mut self.specs[category.index()]
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::embedded()
    }
}

/// Builds the style sheet for a workbook: embedded defaults overlaid with
/// the Defaults sheet. Never fails; a missing sheet or unreadable row keeps
/// the embedded values.
///
/// Overlay rules per matching row: a non-empty font replaces the default, a
/// positive integer size replaces the default, and bold/italic are always
/// taken from the row (`yes` → true, anything else → false).
pub fn resolve_styles(workbook: &Workbook) -> StyleSheet {
    let mut styles = StyleSheet::embedded();
    let Some(sheet) = workbook.sheet(DEFAULTS_SHEET) else {
        debug!("No Defaults sheet, using embedded styles");
        return styles;
    };

    for row in DEFAULTS.rows.rows() {
        let Some(category) = StyleCategory::from_label(&sheet.text(row, DEFAULTS.label)) else {
            continue;
        };
        let spec = styles.get_mut(category);

        let font = sheet.text(row, DEFAULTS.font);
        if !font.is_empty() {
            spec.font = font;
        }
        if let Some(size) = parse_integer(sheet.cell(row, DEFAULTS.size))
            .and_then(|s| u32::try_from(s).ok())
            .filter(|s| *s > 0)
        {
            spec.size_pt = size;
        }
        spec.bold = is_yes(sheet.cell(row, DEFAULTS.bold));
        spec.italic = is_yes(sheet.cell(row, DEFAULTS.italic));
    }

    styles
}

/// The Defaults sheet only honours the full word; `y` is not enough here.
fn is_yes(cell: &calamine::Data) -> bool {
    cell_text(cell).eq_ignore_ascii_case("yes")
}
