//! Document model → `.docx` through docx-rs.

use std::fs::File;
use std::path::Path;

use docx_rs::{
    AbstractNumbering, AlignmentType, Docx, IndentLevel, Level, LevelJc, LevelText, LineSpacing,
    NumberFormat, Numbering, NumberingId, PageMargin, RunFonts, SpecialIndentType, Start, Tab,
    TabValueType,
};
use tracing::debug;

use crate::document::{Alignment, Document, Paragraph, Run};
use crate::generation::GenerationError;

const BULLET_NUMBERING_ID: usize = 1;
/// Distance between the bullet glyph and its text.
const BULLET_HANGING_PT: u32 = 9;

fn twips(pt: u32) -> u32 {
    pt * 20
}

fn half_points(pt: u32) -> usize {
    pt as usize * 2
}

fn fonts(name: &str) -> RunFonts {
    RunFonts::new()
        .ascii(name)
        .hi_ansi(name)
        .east_asia(name)
        .cs(name)
}

fn to_run(run: &Run) -> docx_rs::Run {
    let mut out = docx_rs::Run::new();
    if run.leading_tab {
        out = out.add_tab();
    }
    out = out
        .add_text(&run.text)
        .size(half_points(run.size_pt))
        .fonts(fonts(&run.font));
    if run.bold {
        out = out.bold();
    }
    if run.italic {
        out = out.italic();
    }
    out
}

fn to_paragraph(paragraph: &Paragraph) -> docx_rs::Paragraph {
    let mut out = docx_rs::Paragraph::new().line_spacing(
        LineSpacing::new()
            .before(twips(paragraph.spacing.before_pt))
            .after(twips(paragraph.spacing.after_pt)),
    );

    if paragraph.alignment == Alignment::Center {
        out = out.align(AlignmentType::Center);
    }
    if paragraph.bullet {
        out = out
            .numbering(NumberingId::new(BULLET_NUMBERING_ID), IndentLevel::new(0))
            .indent(
                Some(twips(paragraph.left_indent_pt) as i32),
                Some(SpecialIndentType::Hanging(twips(BULLET_HANGING_PT) as i32)),
                None,
                None,
            );
    } else if paragraph.left_indent_pt > 0 {
        out = out.indent(Some(twips(paragraph.left_indent_pt) as i32), None, None, None);
    }
    for stop in &paragraph.tab_stops {
        out = out.add_tab(
            Tab::new()
                .val(TabValueType::Right)
                .pos(twips(stop.position_pt) as usize),
        );
    }
    for run in &paragraph.runs {
        out = out.add_run(to_run(run));
    }
    out
}

fn bullet_numbering() -> AbstractNumbering {
    AbstractNumbering::new(BULLET_NUMBERING_ID).add_level(Level::new(
        0,
        Start::new(1),
        NumberFormat::new("bullet"),
        LevelText::new("•"),
        LevelJc::new("left"),
    ))
}

/// Builds the docx-rs document: page geometry, base font, bullet
/// numbering, then every paragraph in order.
pub fn to_docx(document: &Document) -> Docx {
    let page = &document.page;
    let mut docx = Docx::new()
        .page_size(twips(page.width_pt), twips(page.height_pt))
        .page_margin(
            PageMargin::new()
                .top(twips(page.margin_top_pt) as i32)
                .bottom(twips(page.margin_bottom_pt) as i32)
                .left(twips(page.margin_left_pt) as i32)
                .right(twips(page.margin_right_pt) as i32),
        )
        .default_fonts(fonts(&document.base.font))
        .default_size(half_points(document.base.size_pt))
        .add_abstract_numbering(bullet_numbering())
        .add_numbering(Numbering::new(BULLET_NUMBERING_ID, BULLET_NUMBERING_ID));

    for paragraph in &document.paragraphs {
        docx = docx.add_paragraph(to_paragraph(paragraph));
    }
    docx
}

/// Renders `document` and writes it to `path`.
pub fn write_docx(document: &Document, path: &Path) -> Result<(), GenerationError> {
    let file = File::create(path)?;
    to_docx(document)
        .build()
        .pack(file)
        .map_err(|e| GenerationError::Docx(e.to_string()))?;
    debug!(
        "Wrote {} paragraphs to {}",
        document.paragraphs.len(),
        path.display()
    );
    Ok(())
}
