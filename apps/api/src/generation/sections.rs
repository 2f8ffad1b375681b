//! Section builders: each appends one resume section to a `Document`.
//!
//! Builders are pure with respect to their inputs and no-op on empty
//! content, so the assembler can call them unconditionally.

use tracing::debug;

use crate::document::{Document, Paragraph, Run};
use crate::layout::{StyleCategory, StyleSheet};
use crate::models::resume::{ContactInfo, EducationRecord, Graduation, SkillCategory, WorkRole};

// ────────────────────────────────────────────────────────────────────────────
// Spacing (points)
// ────────────────────────────────────────────────────────────────────────────

const HEADER_BEFORE: u32 = 6;
const HEADER_AFTER: u32 = 4;
const SECTION_AFTER: u32 = 6;
const BULLET_INDENT: u32 = 18;
const BULLET_AFTER: u32 = 3;
const ROW_GAP: u32 = 2;
const ROLE_SPACER_AFTER: u32 = 4;
const DEGREE_AFTER: u32 = 4;
const CONTACT_LINE_AFTER: u32 = 4;

// ────────────────────────────────────────────────────────────────────────────
// Shared pieces
// ────────────────────────────────────────────────────────────────────────────

fn push_header(doc: &mut Document, title: &str, styles: &StyleSheet) {
    doc.push_content(
        Paragraph::new()
            .centered()
            .spacing(HEADER_BEFORE, HEADER_AFTER)
            .run(Run::styled(
                title.to_uppercase(),
                styles.get(StyleCategory::SectionHeader),
            )),
    );
}

fn push_bullets(doc: &mut Document, bullets: &[String], styles: &StyleSheet) {
    let body = styles.get(StyleCategory::Body);
    for bullet in bullets {
        doc.push_content(
            Paragraph::new()
                .bulleted(BULLET_INDENT)
                .spacing(0, BULLET_AFTER)
                .run(Run::styled(bullet.as_str(), body)),
        );
    }
}

/// `left` flush left, `right` pushed to `right_tab_pt` (the right margin) with
/// a tab.
fn two_column(right_tab_pt: u32, left: Run, right: Option<Run>) -> Paragraph {
    let paragraph = Paragraph::new().tab_stop(right_tab_pt).run(left);
    match right {
        Some(run) => paragraph.run(run.after_tab()),
        None => paragraph,
    }
}

fn date_range(start: &str, end: &str) -> String {
    match (start.is_empty(), end.is_empty()) {
        (false, false) => format!("{start} - {end}"),
        (false, true) => start.to_string(),
        (true, false) => end.to_string(),
        (true, true) => String::new(),
    }
}

fn graduation_text(record: &EducationRecord) -> String {
    match record.graduated {
        Graduation::Yes => format!("Graduated {}", record.end_date).trim_end().to_string(),
        Graduation::No if record.end_date.is_empty() => "In Progress".to_string(),
        Graduation::No => format!("Anticipated {}", record.end_date),
        Graduation::Unspecified => record.end_date.clone(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Builders
// ────────────────────────────────────────────────────────────────────────────

/// Centered three-line header: name with credentials, title, then a
/// pipe-separated line of the remaining contact details.
pub fn build_contact_header(doc: &mut Document, contact: &ContactInfo, styles: &StyleSheet) {
    if contact.is_empty() {
        return;
    }

    let name_line = [contact.name(), contact.get("Credentials")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
    doc.push_content(
        Paragraph::new()
            .centered()
            .spacing(0, CONTACT_LINE_AFTER)
            .run(Run::styled(name_line, styles.get(StyleCategory::Name))),
    );

    if let Some(title) = contact.get("Title") {
        doc.push_content(
            Paragraph::new()
                .centered()
                .spacing(0, CONTACT_LINE_AFTER)
                .run(Run::styled(title, styles.get(StyleCategory::Title))),
        );
    }

    let mut parts: Vec<String> = ["Email", "Phone", "LinkedIn", "Website"]
        .into_iter()
        .filter_map(|field| contact.get(field))
        .map(str::to_string)
        .collect();
    let location = ["City", "State", "Country"]
        .into_iter()
        .filter_map(|field| contact.get(field))
        .collect::<Vec<_>>()
        .join(", ");
    if !location.is_empty() {
        parts.push(location);
    }
    if !parts.is_empty() {
        doc.push_content(
            Paragraph::new().centered().spacing(0, SECTION_AFTER).run(Run::styled(
                parts.join(" | "),
                styles.get(StyleCategory::ContactLine),
            )),
        );
    }
}

pub fn build_summary(doc: &mut Document, title: &str, text: Option<&str>, styles: &StyleSheet) {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return;
    };
    let start = doc.len();
    push_header(doc, title, styles);
    doc.push_content(Paragraph::new().run(Run::styled(text, styles.get(StyleCategory::Body))));
    doc.close_section(start, SECTION_AFTER);
}

/// Header followed by one bulleted paragraph per item.
pub fn build_bullet_section(
    doc: &mut Document,
    title: &str,
    bullets: &[String],
    styles: &StyleSheet,
) {
    if bullets.is_empty() {
        return;
    }
    let start = doc.len();
    push_header(doc, title, styles);
    push_bullets(doc, bullets, styles);
    doc.close_section(start, SECTION_AFTER);
}

pub fn build_work_experience(
    doc: &mut Document,
    title: &str,
    roles: &[WorkRole],
    styles: &StyleSheet,
) {
    if roles.is_empty() {
        return;
    }
    let start = doc.len();
    let right_tab = doc.page.text_width_pt();
    push_header(doc, title, styles);

    for (i, role) in roles.iter().enumerate() {
        debug!(
            "Rendering role '{}' at '{}' ({} bullets)",
            role.title,
            role.company,
            role.bullets.len()
        );
        let dates = date_range(&role.start_date, &role.end_date);
        doc.push_content(
            two_column(
                right_tab,
                Run::styled(role.company.as_str(), styles.get(StyleCategory::Organization)),
                Some(Run::styled(dates, styles.get(StyleCategory::DateRange))),
            )
            .spacing(ROW_GAP, 0),
        );
        doc.push_content(
            two_column(
                right_tab,
                Run::styled(role.title.as_str(), styles.get(StyleCategory::Role)),
                Some(Run::styled(
                    role.location.as_str(),
                    styles.get(StyleCategory::Location),
                )),
            )
            .spacing(0, ROW_GAP),
        );
        push_bullets(doc, &role.bullets, styles);

        if i + 1 < roles.len() {
            doc.push(Paragraph::new().spacing(0, ROLE_SPACER_AFTER));
        }
    }

    doc.close_section(start, SECTION_AFTER);
}

pub fn build_education(
    doc: &mut Document,
    title: &str,
    records: &[EducationRecord],
    styles: &StyleSheet,
) {
    if records.is_empty() {
        return;
    }
    let start = doc.len();
    let right_tab = doc.page.text_width_pt();
    push_header(doc, title, styles);

    for record in records {
        doc.push_content(
            two_column(
                right_tab,
                Run::styled(record.school.as_str(), styles.get(StyleCategory::Organization)),
                Some(Run::styled(
                    graduation_text(record),
                    styles.get(StyleCategory::DateRange),
                )),
            )
            .spacing(ROW_GAP, 0),
        );

        let degree = if record.major.is_empty() {
            record.degree.clone()
        } else {
            format!("{}, {}", record.degree, record.major)
        };
        doc.push_content(
            two_column(
                right_tab,
                Run::styled(degree, styles.get(StyleCategory::Role)),
                Some(Run::styled(
                    record.location.as_str(),
                    styles.get(StyleCategory::Location),
                )),
            )
            .spacing(0, DEGREE_AFTER),
        );
    }

    doc.close_section(start, SECTION_AFTER);
}

/// One line per category: a bold `Name: ` label then the comma-joined skills.
pub fn build_skills(
    doc: &mut Document,
    title: &str,
    categories: &[SkillCategory],
    styles: &StyleSheet,
) {
    if categories.is_empty() {
        return;
    }
    let start = doc.len();
    push_header(doc, title, styles);

    let body = styles.get(StyleCategory::Body);
    for category in categories {
        doc.push_content(
            Paragraph::new()
                .spacing(0, ROW_GAP)
                .run(Run::styled(format!("{}: ", category.name), body).bold())
                .run(Run::styled(category.skills.join(", "), body)),
        );
    }

    doc.close_section(start, SECTION_AFTER);
}
