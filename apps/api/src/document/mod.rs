//! Format-neutral document model produced by the section builders.
//!
//! A `Document` is a flat list of paragraphs made of styled runs. Nothing
//! here knows about DOCX; `export::docx` maps it onto docx-rs.

use serde::Serialize;

use crate::layout::{BaseFont, PageSetup, StyleSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
}

/// Paragraph spacing in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Spacing {
    pub before_pt: u32,
    pub after_pt: u32,
}

/// A right-aligned tab stop measured from the left margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TabStop {
    pub position_pt: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub text: String,
    pub font: String,
    pub size_pt: u32,
    pub bold: bool,
    pub italic: bool,
    /// Emit a tab character before the text, jumping to the next tab stop.
    pub leading_tab: bool,
}

impl Run {
    pub fn styled(text: impl Into<String>, style: &StyleSpec) -> Self {
        Self {
            text: text.into(),
            font: style.font.clone(),
            size_pt: style.size_pt,
            bold: style.bold,
            italic: style.italic,
            leading_tab: false,
        }
    }

    pub fn after_tab(mut self) -> Self {
        self.leading_tab = true;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Paragraph {
    pub alignment: Alignment,
    pub spacing: Spacing,
    pub left_indent_pt: u32,
    pub bullet: bool,
    pub tab_stops: Vec<TabStop>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn centered(mut self) -> Self {
        self.alignment = Alignment::Center;
        self
    }

    pub fn spacing(mut self, before_pt: u32, after_pt: u32) -> Self {
        self.spacing = Spacing {
            before_pt,
            after_pt,
        };
        self
    }

    pub fn bulleted(mut self, indent_pt: u32) -> Self {
        self.bullet = true;
        self.left_indent_pt = indent_pt;
        self
    }

    pub fn tab_stop(mut self, position_pt: u32) -> Self {
        self.tab_stops.push(TabStop { position_pt });
        self
    }

    /// Appends a run; runs with empty text are dropped.
    pub fn run(mut self, run: Run) -> Self {
        if !run.text.is_empty() {
            self.runs.push(run);
        }
        self
    }

    pub fn has_runs(&self) -> bool {
        !self.runs.is_empty()
    }

    /// Concatenated run text, tabs rendered as `\t`.
    #[cfg(test)]
    pub fn text(&self) -> String {
        self.runs
            .iter()
            .map(|r| {
                if r.leading_tab {
                    format!("\t{}", r.text)
                } else {
                    r.text.clone()
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub page: PageSetup,
    pub base: BaseFont,
    pub paragraphs: Vec<Paragraph>,
}

impl Document {
    pub fn new(page: PageSetup, base: BaseFont) -> Self {
        Self {
            page,
            base,
            paragraphs: Vec::new(),
        }
    }

    /// Appends a paragraph unconditionally, including run-less spacers.
    pub fn push(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Appends a paragraph only if it carries at least one run.
    pub fn push_content(&mut self, paragraph: Paragraph) -> bool {
        if paragraph.has_runs() {
            self.paragraphs.push(paragraph);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Sets the space after the last paragraph, if any was added since
    /// `section_start`.
    pub fn close_section(&mut self, section_start: usize, after_pt: u32) {
        if self.paragraphs.len() > section_start {
            if let Some(last) = self.paragraphs.last_mut() {
                last.spacing.after_pt = after_pt;
            }
        }
    }
}
