//! Document assembly: walks the section order and dispatches to the builders.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::document::Document;
use crate::generation::sections::{
    build_bullet_section, build_contact_header, build_education, build_skills, build_summary,
    build_work_experience,
};
use crate::layout::{BaseFont, PageSetup, StyleSheet};
use crate::models::resume::{ResumeData, SectionKind};

/// Builds the full document for one resume.
///
/// Sections render in the order of the enabled entries. A kind listed twice
/// renders once, at its first position; unknown identifiers are skipped.
pub fn assemble(data: &ResumeData, styles: &StyleSheet) -> Document {
    let mut doc = Document::new(PageSetup::letter(), BaseFont::default());
    let mut rendered: HashSet<&SectionKind> = HashSet::new();

    for kind in data.order.enabled() {
        if !rendered.insert(kind) {
            debug!("Section '{kind}' already rendered, skipping repeat");
            continue;
        }
        let before = doc.len();

        match kind {
            SectionKind::ContactInfo => build_contact_header(&mut doc, &data.contact, styles),
            SectionKind::Summary => build_summary(
                &mut doc,
                &data.summary.title,
                data.summary.content.as_deref(),
                styles,
            ),
            SectionKind::WorkRoles => build_work_experience(
                &mut doc,
                &data.work_roles.title,
                &data.work_roles.content,
                styles,
            ),
            SectionKind::Education => build_education(
                &mut doc,
                &data.education.title,
                &data.education.content,
                styles,
            ),
            SectionKind::Skills => {
                build_skills(&mut doc, &data.skills.title, &data.skills.content, styles)
            }
            SectionKind::Other(id) => {
                debug!("Unknown section '{id}' in order, skipping");
                continue;
            }
            bullet_kind => {
                if let Some(section) = data.bullet_section(bullet_kind) {
                    build_bullet_section(&mut doc, &section.title, &section.content, styles);
                }
            }
        }

        debug!("Section '{kind}': {} paragraphs", doc.len() - before);
    }

    doc
}

/// File-name base derived from the candidate's name.
///
/// Two or more words keep only the first and last (`Jane Q Public` →
/// `Jane_Public`); a single word is kept; an empty name yields `Resume`.
pub fn base_filename(name: &str) -> String {
    let name = name.replace(['/', '\\'], "_");
    let tokens: Vec<&str> = name.split_whitespace().collect();
    match tokens.as_slice() {
        [] => "Resume".to_string(),
        [only] => only.to_string(),
        [first, .., last] => format!("{first}_{last}"),
    }
}

/// `<base>_<YYYY-MM-DD_HHMMSS>`, shared by the DOCX and PDF outputs.
pub fn output_stem(name: &str, now: NaiveDateTime) -> String {
    format!("{}_{}", base_filename(name), now.format("%Y-%m-%d_%H%M%S"))
}
