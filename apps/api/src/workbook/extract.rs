//! Sheet → record extraction.
//!
//! List scans stop at the first blank primary key (a blank company, school,
//! bullet text or section id ends the list). Two scans are exceptions and
//! walk their whole span filtering by inclusion: per-company experience
//! bullets and skill columns.

use tracing::{debug, info};

use crate::generation::GenerationError;
use crate::models::resume::{
    sort_bullets, BulletItem, ContactInfo, EducationRecord, Graduation, ResumeData,
    SectionEntry, SectionKind, SectionOrder, SkillCategory, Titled, WorkRole,
};
use crate::workbook::cells::{
    custom_section_name, format_date, parse_include, parse_order, strip_bullet_prefix,
};
use crate::workbook::schema::{
    BULLETS, CONTACT, CONTACT_SHEET, EDUCATION, ORDER, ORDER_SHEET, SECTION_NAME_CELL, SKILLS,
    SUMMARY, WORK_EXPERIENCE, WORK_EXPERIENCE_SHEET, WORK_ROLES, WORK_ROLES_SHEET,
};
use crate::workbook::{Sheet, Workbook};

/// Reads every section of the template.
///
/// Fails only when a mandatory sheet (Contact_Info, Work_Roles,
/// Work_Experience) is missing; every other gap degrades to an empty
/// section.
pub fn extract_resume(workbook: &Workbook) -> Result<ResumeData, GenerationError> {
    let contact_sheet = workbook.required_sheet(CONTACT_SHEET)?;
    let roles_sheet = workbook.required_sheet(WORK_ROLES_SHEET)?;
    let experience_sheet = workbook.required_sheet(WORK_EXPERIENCE_SHEET)?;

    let order = read_section_order(workbook);
    let contact = read_contact_info(contact_sheet);

    let summary = Titled {
        title: section_title(workbook, &SectionKind::Summary),
        content: workbook.sheet(SectionKind::Summary.id()).and_then(read_summary),
    };

    let mut roles = read_work_roles(roles_sheet);
    for role in &mut roles {
        role.bullets = read_role_bullets(experience_sheet, &role.company);
    }
    let work_roles = Titled {
        title: section_title(workbook, &SectionKind::WorkRoles),
        content: roles,
    };

    let education = Titled {
        title: section_title(workbook, &SectionKind::Education),
        content: workbook
            .sheet(SectionKind::Education.id())
            .map(read_education)
            .unwrap_or_default(),
    };

    let skills = Titled {
        title: section_title(workbook, &SectionKind::Skills),
        content: workbook
            .sheet(SectionKind::Skills.id())
            .map(read_skills)
            .unwrap_or_default(),
    };

    let bullet_sections = SectionKind::BULLET_LISTS
        .into_iter()
        .map(|kind| {
            let section = Titled {
                title: section_title(workbook, &kind),
                content: workbook
                    .sheet(kind.id())
                    .map(read_bullet_section)
                    .unwrap_or_default(),
            };
            (kind, section)
        })
        .collect();

    info!(
        "Extracted resume: {} contact fields, {} roles, {} education records, {} skill categories",
        contact.len(),
        work_roles.content.len(),
        education.content.len(),
        skills.content.len()
    );

    Ok(ResumeData {
        order,
        contact,
        summary,
        work_roles,
        education,
        skills,
        bullet_sections,
    })
}

/// The slice of the template a preview needs.
#[derive(Debug, Clone)]
pub struct PreviewData {
    pub contact: ContactInfo,
    pub order: SectionOrder,
    pub work_roles: Vec<WorkRole>,
}

/// Reads contact, order and roles only; experience bullets are not needed.
pub fn extract_preview(workbook: &Workbook) -> Result<PreviewData, GenerationError> {
    let contact = read_contact_info(workbook.required_sheet(CONTACT_SHEET)?);
    let work_roles = read_work_roles(workbook.required_sheet(WORK_ROLES_SHEET)?);
    Ok(PreviewData {
        contact,
        order: read_section_order(workbook),
        work_roles,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Per-sheet readers
// ────────────────────────────────────────────────────────────────────────────

/// Display title for a section: the sheet's custom name, else the default.
pub fn section_title(workbook: &Workbook, kind: &SectionKind) -> String {
    workbook
        .sheet(kind.id())
        .and_then(|sheet| {
            let (row, col) = SECTION_NAME_CELL;
            custom_section_name(&sheet.text(row, col))
        })
        .unwrap_or_else(|| kind.default_title().to_string())
}

pub fn read_section_order(workbook: &Workbook) -> SectionOrder {
    let Some(sheet) = workbook.sheet(ORDER_SHEET) else {
        debug!("No Order sheet, using fallback section order");
        return SectionOrder::fallback();
    };

    let mut entries = Vec::new();
    for row in ORDER.rows.rows() {
        let id = sheet.text(row, ORDER.section);
        if id.is_empty() {
            break;
        }
        entries.push(SectionEntry {
            kind: SectionKind::from_id(&id),
            include: parse_include(sheet.cell(row, ORDER.include)),
        });
    }
    SectionOrder { entries }
}

pub fn read_contact_info(sheet: Sheet<'_>) -> ContactInfo {
    let mut contact = ContactInfo::default();
    for row in CONTACT.rows.rows() {
        let field = sheet.text(row, CONTACT.field);
        let value = sheet.text(row, CONTACT.value);
        if parse_include(sheet.cell(row, CONTACT.include)) && !value.is_empty() {
            contact.insert(field, value);
        }
    }
    contact
}

pub fn read_summary(sheet: Sheet<'_>) -> Option<String> {
    let (include_row, include_col) = SUMMARY.include;
    let (text_row, text_col) = SUMMARY.text;
    let text = sheet.text(text_row, text_col);
    (parse_include(sheet.cell(include_row, include_col)) && !text.is_empty()).then_some(text)
}

/// Generic bullet sheet: ends at the first blank text cell.
pub fn read_bullet_section(sheet: Sheet<'_>) -> Vec<String> {
    let mut items = Vec::new();
    for row in BULLETS.rows.rows() {
        let text = sheet.text(row, BULLETS.text);
        if text.is_empty() {
            break;
        }
        if parse_include(sheet.cell(row, BULLETS.include)) {
            items.push(BulletItem {
                order: parse_order(sheet.cell(row, BULLETS.order)),
                text: strip_bullet_prefix(&text),
            });
        }
    }
    sort_bullets(items)
}

/// Included roles in sheet order; ends at the first blank company.
pub fn read_work_roles(sheet: Sheet<'_>) -> Vec<WorkRole> {
    let mut roles = Vec::new();
    for row in WORK_ROLES.rows.rows() {
        let company = sheet.text(row, WORK_ROLES.company);
        if company.is_empty() {
            break;
        }
        if !parse_include(sheet.cell(row, WORK_ROLES.include)) {
            debug!("Skipping excluded role at row {row}: {company}");
            continue;
        }
        roles.push(WorkRole {
            company,
            title: sheet.text(row, WORK_ROLES.title),
            start_date: format_date(sheet.cell(row, WORK_ROLES.start_date)),
            end_date: format_date(sheet.cell(row, WORK_ROLES.end_date)),
            location: sheet.text(row, WORK_ROLES.location),
            bullets: Vec::new(),
        });
    }
    roles
}

/// Bullets for one company. Scans the full span: rows for other companies
/// and blank rows are skipped, not terminal.
pub fn read_role_bullets(sheet: Sheet<'_>, company: &str) -> Vec<String> {
    let mut items = Vec::new();
    for row in WORK_EXPERIENCE.rows.rows() {
        if sheet.text(row, WORK_EXPERIENCE.company) != company {
            continue;
        }
        let text = sheet.text(row, WORK_EXPERIENCE.text);
        if parse_include(sheet.cell(row, WORK_EXPERIENCE.include)) && !text.is_empty() {
            items.push(BulletItem {
                order: parse_order(sheet.cell(row, WORK_EXPERIENCE.order)),
                text: strip_bullet_prefix(&text),
            });
        }
    }
    sort_bullets(items)
}

pub fn read_education(sheet: Sheet<'_>) -> Vec<EducationRecord> {
    let mut records = Vec::new();
    for row in EDUCATION.rows.rows() {
        let school = sheet.text(row, EDUCATION.school);
        if school.is_empty() {
            break;
        }
        records.push(EducationRecord {
            school,
            degree: sheet.text(row, EDUCATION.degree),
            major: sheet.text(row, EDUCATION.major),
            end_date: format_date(sheet.cell(row, EDUCATION.end_date)),
            location: sheet.text(row, EDUCATION.location),
            graduated: Graduation::from_cell(&sheet.text(row, EDUCATION.graduated)),
        });
    }
    records
}

/// Up to four categories; unnamed or empty categories are dropped.
pub fn read_skills(sheet: Sheet<'_>) -> Vec<SkillCategory> {
    SKILLS
        .category_columns
        .iter()
        .filter_map(|&col| {
            let name = sheet.text(SKILLS.header_row, col);
            if name.is_empty() {
                return None;
            }
            let mut items = Vec::new();
            for row in SKILLS.rows.rows() {
                let skill = sheet.text(row, col);
                if parse_include(sheet.cell(row, col + SKILLS.include_offset))
                    && !skill.is_empty()
                {
                    items.push(BulletItem {
                        order: parse_order(sheet.cell(row, col + SKILLS.order_offset)),
                        text: skill,
                    });
                }
            }
            let skills = sort_bullets(items);
            (!skills.is_empty()).then_some(SkillCategory { name, skills })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::test_support::{minimal_sheets, workbook, SheetBuilder};

    fn with_sheet(name: &'static str, sheet: SheetBuilder) -> Workbook {
        let mut sheets = minimal_sheets();
        sheets.retain(|(n, _)| *n != name);
        sheets.push((name, sheet));
        workbook(sheets)
    }

    #[test]
    fn test_missing_mandatory_sheets_are_fatal() {
        for missing in [CONTACT_SHEET, WORK_ROLES_SHEET, WORK_EXPERIENCE_SHEET] {
            let mut sheets = minimal_sheets();
            sheets.retain(|(n, _)| *n != missing);
            let err = extract_resume(&workbook(sheets)).unwrap_err();
            assert!(
                matches!(&err, GenerationError::MissingSheet(name) if name == missing),
                "expected MissingSheet({missing}), got {err:?}"
            );
        }
    }

    #[test]
    fn test_optional_sheets_missing_yield_empty_sections() {
        let data = extract_resume(&workbook(minimal_sheets())).unwrap();
        assert!(data.summary.content.is_none());
        assert!(data.education.content.is_empty());
        assert!(data.skills.content.is_empty());
        assert!(data
            .bullet_sections
            .iter()
            .all(|(_, section)| section.content.is_empty()));
        assert_eq!(data.order, SectionOrder::fallback());
    }

    #[test]
    fn test_contact_only_included_non_empty() {
        let wb = with_sheet(
            CONTACT_SHEET,
            SheetBuilder::new()
                .text(4, 2, "Name")
                .text(4, 3, "Jordan Lee")
                .text(4, 4, "yes")
                .text(5, 2, "Email")
                .text(5, 3, "jordan@example.com")
                .text(5, 4, "No")
                .text(6, 2, "Phone")
                .text(6, 4, "Yes")
                .text(7, 2, "City")
                .text(7, 3, "Denver")
                .text(7, 4, "Y"),
        );
        let contact = read_contact_info(wb.sheet(CONTACT_SHEET).unwrap());
        assert_eq!(contact.name(), Some("Jordan Lee"));
        assert_eq!(contact.get("Email"), None);
        assert_eq!(contact.get("Phone"), None);
        assert_eq!(contact.get("City"), Some("Denver"));
    }

    #[test]
    fn test_order_sheet_stops_at_blank_and_keeps_flags() {
        let wb = with_sheet(
            ORDER_SHEET,
            SheetBuilder::new()
                .text(1, 3, "Section")
                .text(2, 3, "Contact_Info")
                .text(2, 4, "Yes")
                .text(3, 3, "Awards")
                .text(3, 4, "No")
                .text(4, 3, "Work_Roles")
                .text(4, 4, "yes")
                .text(6, 3, "Skills")
                .text(6, 4, "yes"),
        );
        let order = read_section_order(&wb);
        assert_eq!(order.entries.len(), 3);
        let enabled: Vec<_> = order.enabled().cloned().collect();
        assert_eq!(enabled, vec![SectionKind::ContactInfo, SectionKind::WorkRoles]);
    }

    #[test]
    fn test_excluded_role_is_dropped() {
        let wb = with_sheet(
            WORK_ROLES_SHEET,
            SheetBuilder::new()
                .text(4, 2, "Acme")
                .text(4, 7, "Yes")
                .text(5, 2, "Globex")
                .text(5, 7, "No")
                .text(6, 2, "Initech")
                .text(6, 7, "y"),
        );
        let roles = read_work_roles(wb.sheet(WORK_ROLES_SHEET).unwrap());
        let names: Vec<_> = roles.iter().map(|r| r.company.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Initech"]);
    }

    #[test]
    fn test_roles_stop_at_first_blank_company() {
        let wb = with_sheet(
            WORK_ROLES_SHEET,
            SheetBuilder::new()
                .text(4, 2, "Acme")
                .text(4, 7, "Yes")
                .text(6, 2, "Hidden")
                .text(6, 7, "Yes"),
        );
        assert_eq!(read_work_roles(wb.sheet(WORK_ROLES_SHEET).unwrap()).len(), 1);
    }

    #[test]
    fn test_role_dates_are_normalized() {
        let wb = with_sheet(
            WORK_ROLES_SHEET,
            SheetBuilder::new()
                .text(4, 2, "Acme")
                .value(4, 4, calamine::Data::DateTimeIso("2019-03-01T00:00:00".into()))
                .text(4, 5, "PRESENT")
                .text(4, 7, "Yes"),
        );
        let roles = read_work_roles(wb.sheet(WORK_ROLES_SHEET).unwrap());
        assert_eq!(roles[0].start_date, "Mar 2019");
        assert_eq!(roles[0].end_date, "Present");
    }

    #[test]
    fn test_shared_company_bullets_attach_to_both_roles() {
        let mut sheets = minimal_sheets();
        sheets.retain(|(n, _)| *n != WORK_ROLES_SHEET && *n != WORK_EXPERIENCE_SHEET);
        sheets.push((
            WORK_ROLES_SHEET,
            SheetBuilder::new()
                .text(4, 2, "Acme")
                .text(4, 3, "Senior Engineer")
                .text(4, 7, "Yes")
                .text(5, 2, "Acme")
                .text(5, 3, "Engineer")
                .text(5, 7, "Yes"),
        ));
        sheets.push((
            WORK_EXPERIENCE_SHEET,
            SheetBuilder::new()
                .text(4, 2, "Acme")
                .text(4, 3, "second")
                .text(4, 4, "Yes")
                .text(4, 5, "2")
                // Blank row in the middle must not end the scan.
                .text(6, 2, "Globex")
                .text(6, 3, "other company")
                .text(6, 4, "Yes")
                .text(7, 2, "Acme")
                .text(7, 3, "- first")
                .text(7, 4, "Yes")
                .text(7, 5, "1")
                .text(8, 2, "Acme")
                .text(8, 3, "excluded")
                .text(8, 4, "No")
                .text(8, 5, "0")
                .text(9, 2, "acme")
                .text(9, 3, "case differs")
                .text(9, 4, "Yes"),
        ));
        let data = extract_resume(&workbook(sheets)).unwrap();
        assert_eq!(data.work_roles.content.len(), 2);
        for role in &data.work_roles.content {
            assert_eq!(role.bullets, vec!["first", "second"]);
        }
    }

    #[test]
    fn test_bullet_section_sorted_stable_and_stripped() {
        let wb = workbook(vec![(
            "Highlights",
            SheetBuilder::new()
                .text(2, 2, "Key Wins <---- rename me")
                .text(4, 2, "• gamma")
                .text(4, 3, "Yes")
                .text(4, 4, "2")
                .text(5, 2, "alpha")
                .text(5, 3, "Yes")
                .text(5, 4, "1")
                .text(6, 2, "skipped")
                .text(6, 3, "No")
                .text(6, 4, "0")
                .text(7, 2, "beta")
                .text(7, 3, "Yes")
                .text(7, 4, "1")
                .text(8, 2, "unordered")
                .text(8, 3, "yes"),
        )]);
        let sheet = wb.sheet("Highlights").unwrap();
        assert_eq!(
            read_bullet_section(sheet),
            vec!["alpha", "beta", "gamma", "unordered"]
        );
        assert_eq!(section_title(&wb, &SectionKind::Highlights), "Key Wins");
        assert_eq!(section_title(&wb, &SectionKind::Awards), "Awards");
    }

    #[test]
    fn test_bullet_section_stops_at_blank_text() {
        let wb = workbook(vec![(
            "Awards",
            SheetBuilder::new()
                .text(4, 2, "first")
                .text(4, 3, "Yes")
                .text(6, 2, "after gap")
                .text(6, 3, "Yes"),
        )]);
        assert_eq!(read_bullet_section(wb.sheet("Awards").unwrap()), vec!["first"]);
    }

    #[test]
    fn test_summary_requires_flag_and_text() {
        let included = workbook(vec![(
            "Summary",
            SheetBuilder::new().text(3, 4, "Yes").text(5, 2, " Builder of things. "),
        )]);
        assert_eq!(
            read_summary(included.sheet("Summary").unwrap()),
            Some("Builder of things.".to_string())
        );

        let excluded = workbook(vec![(
            "Summary",
            SheetBuilder::new().text(3, 4, "No").text(5, 2, "Hidden"),
        )]);
        assert_eq!(read_summary(excluded.sheet("Summary").unwrap()), None);
    }

    #[test]
    fn test_education_records_in_row_order() {
        let wb = workbook(vec![(
            "Education",
            SheetBuilder::new()
                .text(4, 2, "State University")
                .text(4, 3, "B.S.")
                .text(4, 4, "Computer Science")
                .value(4, 6, calamine::Data::DateTimeIso("2016-05-15".into()))
                .text(4, 7, "Boulder, CO")
                .text(4, 8, "Yes")
                .text(5, 2, "Tech Institute")
                .text(5, 3, "M.S.")
                .text(5, 8, "no"),
        )]);
        let records = read_education(wb.sheet("Education").unwrap());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].end_date, "May 2016");
        assert_eq!(records[0].graduated, Graduation::Yes);
        assert_eq!(records[1].school, "Tech Institute");
        assert_eq!(records[1].graduated, Graduation::No);
    }

    #[test]
    fn test_skills_categories_filtered_and_sorted() {
        let wb = workbook(vec![(
            "Skills",
            SheetBuilder::new()
                // Category B: two skills, reversed by order.
                .text(3, 2, "Languages")
                .text(4, 2, "Rust")
                .text(4, 3, "Yes")
                .text(4, 4, "2")
                .text(6, 2, "Go")
                .text(6, 3, "Yes")
                .text(6, 4, "1")
                // Category F: named but nothing included.
                .text(3, 6, "Tools")
                .text(4, 6, "Vim")
                .text(4, 7, "No")
                // Category J: skills without a name are ignored.
                .text(4, 10, "Orphan")
                .text(4, 11, "Yes")
                // Category N.
                .text(3, 14, "Cloud")
                .text(5, 14, "AWS")
                .text(5, 15, "y"),
        )]);
        let categories = read_skills(wb.sheet("Skills").unwrap());
        assert_eq!(
            categories,
            vec![
                SkillCategory {
                    name: "Languages".into(),
                    skills: vec!["Go".into(), "Rust".into()],
                },
                SkillCategory {
                    name: "Cloud".into(),
                    skills: vec!["AWS".into()],
                },
            ]
        );
    }

    #[test]
    fn test_preview_ignores_experience_sheet() {
        let mut sheets = minimal_sheets();
        sheets.retain(|(n, _)| *n != WORK_EXPERIENCE_SHEET);
        let preview = extract_preview(&workbook(sheets)).unwrap();
        assert_eq!(preview.contact.name(), Some("Jordan Lee"));
        assert_eq!(preview.work_roles.len(), 1);
    }
}
