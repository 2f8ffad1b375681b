//! Fixed coordinates of the resume template.
//!
//! Each sheet has one constant layout here; `extract` reads through these
//! tables only, so a template revision touches this file and nothing else.
//! Rows and columns are 1-based (`B` = 2).

// ────────────────────────────────────────────────────────────────────────────
// Sheet names
// ────────────────────────────────────────────────────────────────────────────

pub const DEFAULTS_SHEET: &str = "Defaults";
pub const ORDER_SHEET: &str = "Order";
pub const CONTACT_SHEET: &str = "Contact_Info";
pub const WORK_ROLES_SHEET: &str = "Work_Roles";
pub const WORK_EXPERIENCE_SHEET: &str = "Work_Experience";

/// Row/column span scanned for one list-like sheet.
#[derive(Debug, Clone, Copy)]
pub struct RowSpan {
    pub first: u32,
    pub last: u32,
}

impl RowSpan {
    pub fn rows(&self) -> std::ops::RangeInclusive<u32> {
        self.first..=self.last
    }
}

/// Cell holding the per-sheet custom display title (`B2`).
pub const SECTION_NAME_CELL: (u32, u32) = (2, 2);

// ────────────────────────────────────────────────────────────────────────────
// Per-sheet layouts
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct DefaultsLayout {
    pub rows: RowSpan,
    pub label: u32,
    pub font: u32,
    pub size: u32,
    pub bold: u32,
    pub italic: u32,
}

pub const DEFAULTS: DefaultsLayout = DefaultsLayout {
    rows: RowSpan { first: 3, last: 11 },
    label: 2,
    font: 3,
    size: 4,
    bold: 5,
    italic: 6,
};

#[derive(Debug, Clone, Copy)]
pub struct OrderLayout {
    pub rows: RowSpan,
    pub section: u32,
    pub include: u32,
}

pub const ORDER: OrderLayout = OrderLayout {
    rows: RowSpan { first: 2, last: 49 },
    section: 3,
    include: 4,
};

#[derive(Debug, Clone, Copy)]
pub struct ContactLayout {
    pub rows: RowSpan,
    pub field: u32,
    pub value: u32,
    pub include: u32,
}

pub const CONTACT: ContactLayout = ContactLayout {
    rows: RowSpan { first: 4, last: 14 },
    field: 2,
    value: 3,
    include: 4,
};

#[derive(Debug, Clone, Copy)]
pub struct SummaryLayout {
    pub include: (u32, u32),
    pub text: (u32, u32),
}

pub const SUMMARY: SummaryLayout = SummaryLayout {
    include: (3, 4),
    text: (5, 2),
};

/// Layout shared by every generic bullet sheet (Highlights, Awards, ...).
#[derive(Debug, Clone, Copy)]
pub struct BulletLayout {
    pub rows: RowSpan,
    pub text: u32,
    pub include: u32,
    pub order: u32,
}

pub const BULLETS: BulletLayout = BulletLayout {
    rows: RowSpan { first: 4, last: 200 },
    text: 2,
    include: 3,
    order: 4,
};

#[derive(Debug, Clone, Copy)]
pub struct WorkRolesLayout {
    pub rows: RowSpan,
    pub company: u32,
    pub title: u32,
    pub start_date: u32,
    pub end_date: u32,
    pub location: u32,
    pub include: u32,
}

pub const WORK_ROLES: WorkRolesLayout = WorkRolesLayout {
    rows: RowSpan { first: 4, last: 100 },
    company: 2,
    title: 3,
    start_date: 4,
    end_date: 5,
    location: 6,
    include: 7,
};

#[derive(Debug, Clone, Copy)]
pub struct WorkExperienceLayout {
    pub rows: RowSpan,
    pub company: u32,
    pub text: u32,
    pub include: u32,
    pub order: u32,
}

pub const WORK_EXPERIENCE: WorkExperienceLayout = WorkExperienceLayout {
    rows: RowSpan { first: 4, last: 200 },
    company: 2,
    text: 3,
    include: 4,
    order: 5,
};

#[derive(Debug, Clone, Copy)]
pub struct EducationLayout {
    pub rows: RowSpan,
    pub school: u32,
    pub degree: u32,
    pub major: u32,
    pub end_date: u32,
    pub location: u32,
    pub graduated: u32,
}

pub const EDUCATION: EducationLayout = EducationLayout {
    rows: RowSpan { first: 4, last: 50 },
    school: 2,
    degree: 3,
    major: 4,
    end_date: 6,
    location: 7,
    graduated: 8,
};

/// Skills are laid out as up to four side-by-side category blocks; each
/// block is `skill | include | order` starting at one of `category_columns`.
#[derive(Debug, Clone, Copy)]
pub struct SkillsLayout {
    pub header_row: u32,
    pub rows: RowSpan,
    pub category_columns: [u32; 4],
    pub include_offset: u32,
    pub order_offset: u32,
}

pub const SKILLS: SkillsLayout = SkillsLayout {
    header_row: 3,
    rows: RowSpan { first: 4, last: 50 },
    category_columns: [2, 6, 10, 14],
    include_offset: 1,
    order_offset: 2,
};
