use std::fmt;

use serde::{Deserialize, Serialize};

/// Included, non-empty contact fields keyed by their template label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    fields: Vec<(String, String)>,
}

impl ContactInfo {
    /// Sets a field; a later row with the same label wins.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn name(&self) -> Option<&str> {
        self.get("Name")
    }
}

/// One orderable line of a list section, before sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletItem {
    pub order: i64,
    pub text: String,
}

/// Stable ascending sort by order value, then flatten to text.
pub fn sort_bullets(mut items: Vec<BulletItem>) -> Vec<String> {
    items.sort_by_key(|item| item.order);
    items.into_iter().map(|item| item.text).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkRole {
    pub company: String,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    /// Bullets from the experience sheet whose company matches exactly.
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Graduation {
    Yes,
    No,
    Unspecified,
}

impl Graduation {
    pub fn from_cell(text: &str) -> Self {
        match text.trim().to_uppercase().as_str() {
            "YES" => Graduation::Yes,
            "NO" => Graduation::No,
            _ => Graduation::Unspecified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationRecord {
    pub school: String,
    pub degree: String,
    pub major: String,
    pub end_date: String,
    pub location: String,
    pub graduated: Graduation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub name: String,
    pub skills: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// The fixed vocabulary of resume sections. Identifiers outside it are kept
/// as `Other` so the Order sheet can name future sections harmlessly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SectionKind {
    ContactInfo,
    Summary,
    Highlights,
    WorkRoles,
    Education,
    LicensesCertifications,
    Skills,
    Achievements,
    Memberships,
    Awards,
    Projects,
    CustomSection,
    Other(String),
}

impl SectionKind {
    /// Sections rendered when the workbook has no Order sheet.
    pub const FALLBACK_ORDER: [SectionKind; 8] = [
        SectionKind::ContactInfo,
        SectionKind::Summary,
        SectionKind::Highlights,
        SectionKind::WorkRoles,
        SectionKind::Education,
        SectionKind::LicensesCertifications,
        SectionKind::Skills,
        SectionKind::Achievements,
    ];

    /// Generic bullet-list sections, all read with the same layout.
    pub const BULLET_LISTS: [SectionKind; 7] = [
        SectionKind::Highlights,
        SectionKind::LicensesCertifications,
        SectionKind::Achievements,
        SectionKind::Memberships,
        SectionKind::Awards,
        SectionKind::Projects,
        SectionKind::CustomSection,
    ];

    pub fn from_id(id: &str) -> Self {
        match id.trim() {
            "Contact_Info" => SectionKind::ContactInfo,
            "Summary" => SectionKind::Summary,
            "Highlights" => SectionKind::Highlights,
            "Work_Roles" => SectionKind::WorkRoles,
            "Education" => SectionKind::Education,
            "Licenses_Certifications" => SectionKind::LicensesCertifications,
            "Skills" => SectionKind::Skills,
            "Achievements" => SectionKind::Achievements,
            "Memberships" => SectionKind::Memberships,
            "Awards" => SectionKind::Awards,
            "Projects" => SectionKind::Projects,
            "Custom_Section" => SectionKind::CustomSection,
            other => SectionKind::Other(other.to_string()),
        }
    }

    /// Template identifier; doubles as the sheet name for the section.
    pub fn id(&self) -> &str {
        match self {
            SectionKind::ContactInfo => "Contact_Info",
            SectionKind::Summary => "Summary",
            SectionKind::Highlights => "Highlights",
            SectionKind::WorkRoles => "Work_Roles",
            SectionKind::Education => "Education",
            SectionKind::LicensesCertifications => "Licenses_Certifications",
            SectionKind::Skills => "Skills",
            SectionKind::Achievements => "Achievements",
            SectionKind::Memberships => "Memberships",
            SectionKind::Awards => "Awards",
            SectionKind::Projects => "Projects",
            SectionKind::CustomSection => "Custom_Section",
            SectionKind::Other(id) => id,
        }
    }

    /// Display title used when the sheet has no custom name.
    pub fn default_title(&self) -> &str {
        match self {
            SectionKind::ContactInfo => "Contact Information",
            SectionKind::Summary => "Professional Summary",
            SectionKind::Highlights => "Highlights",
            SectionKind::WorkRoles => "Professional Experience",
            SectionKind::Education => "Education",
            SectionKind::LicensesCertifications => "Licenses & Certifications",
            SectionKind::Skills => "Skills",
            SectionKind::Achievements => "Achievements",
            SectionKind::Memberships => "Memberships",
            SectionKind::Awards => "Awards",
            SectionKind::Projects => "Projects",
            SectionKind::CustomSection => "Additional Information",
            SectionKind::Other(id) => id,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl Serialize for SectionKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionEntry {
    pub kind: SectionKind,
    pub include: bool,
}

/// Which sections render, and in what vertical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionOrder {
    pub entries: Vec<SectionEntry>,
}

impl SectionOrder {
    pub fn fallback() -> Self {
        Self {
            entries: SectionKind::FALLBACK_ORDER
                .iter()
                .cloned()
                .map(|kind| SectionEntry {
                    kind,
                    include: true,
                })
                .collect(),
        }
    }

    pub fn enabled(&self) -> impl Iterator<Item = &SectionKind> {
        self.entries.iter().filter(|e| e.include).map(|e| &e.kind)
    }
}

/// A list section with its resolved display title.
#[derive(Debug, Clone, PartialEq)]
pub struct Titled<T> {
    pub title: String,
    pub content: T,
}

/// Everything the assembler needs, extracted once from the workbook.
#[derive(Debug, Clone)]
pub struct ResumeData {
    pub order: SectionOrder,
    pub contact: ContactInfo,
    pub summary: Titled<Option<String>>,
    pub work_roles: Titled<Vec<WorkRole>>,
    pub education: Titled<Vec<EducationRecord>>,
    pub skills: Titled<Vec<SkillCategory>>,
    /// Generic bullet sections keyed by kind, in no particular order.
    pub bullet_sections: Vec<(SectionKind, Titled<Vec<String>>)>,
}

impl ResumeData {
    pub fn bullet_section(&self, kind: &SectionKind) -> Option<&Titled<Vec<String>>> {
        self.bullet_sections
            .iter()
            .find(|(k, _)| k == kind)
            .map(|(_, section)| section)
    }
}
