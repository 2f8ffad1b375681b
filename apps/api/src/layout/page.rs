use serde::{Deserialize, Serialize};

/// Points per inch.
pub const PT_PER_INCH: u32 = 72;

/// Page size and margins, in points.
///
/// The resume always uses US letter (8.5" × 11") with 0.5" margins, which
/// leaves a 7.5" text column: two-column rows put their right-aligned tab
/// stop at exactly that width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSetup {
    pub width_pt: u32,
    pub height_pt: u32,
    pub margin_top_pt: u32,
    pub margin_bottom_pt: u32,
    pub margin_left_pt: u32,
    pub margin_right_pt: u32,
}

impl PageSetup {
    pub fn letter() -> Self {
        let half_inch = PT_PER_INCH / 2;
        Self {
            width_pt: 17 * half_inch,
            height_pt: 11 * PT_PER_INCH,
            margin_top_pt: half_inch,
            margin_bottom_pt: half_inch,
            margin_left_pt: half_inch,
            margin_right_pt: half_inch,
        }
    }

    /// Width between the left and right margins.
    pub fn text_width_pt(&self) -> u32 {
        self.width_pt - self.margin_left_pt - self.margin_right_pt
    }
}

/// Document-wide baseline applied before any section renders: the font and
/// size of unstyled text, with zero paragraph spacing and single line height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseFont {
    pub font: String,
    pub size_pt: u32,
}

impl Default for BaseFont {
    fn default() -> Self {
        Self {
            font: "Times New Roman".to_string(),
            size_pt: 10,
        }
    }
}
