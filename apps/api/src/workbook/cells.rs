//! Fail-open parsers for individual template cells.
//!
//! Every function here maps a malformed value to a default instead of
//! erroring: a bad cell degrades the output, it never aborts generation.

use calamine::Data;
use chrono::{NaiveDate, NaiveDateTime};

/// Order value for rows whose order cell is blank or unparsable (sorts last).
pub const DEFAULT_ORDER: i64 = 9999;

/// Marker the template uses to append instructions after a custom section name.
const INSTRUCTION_MARKER: &str = "<----";

/// Glyphs users paste in front of bullet text.
const BULLET_GLYPHS: &[char] = &[
    '•', '●', '○', '◦', '▪', '▫', '■', '□', '-', '*', '→', '⇒', '►', '▸',
];

/// Trimmed textual form of a cell; empty cells yield `""`.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => if *b { "True" } else { "False" }.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Error(e) => e.to_string(),
    }
}

/// Inclusion flag: only `yes` / `y` (any case) count as included.
pub fn parse_include(cell: &Data) -> bool {
    is_affirmative(&cell_text(cell))
}

pub fn is_affirmative(text: &str) -> bool {
    let upper = text.trim().to_uppercase();
    upper == "YES" || upper == "Y"
}

/// Row order value. Floats truncate; anything non-integral falls back to
/// [`DEFAULT_ORDER`].
pub fn parse_order(cell: &Data) -> i64 {
    parse_integer(cell).unwrap_or(DEFAULT_ORDER)
}

/// Integer view of a cell, if it has one.
pub fn parse_integer(cell: &Data) -> Option<i64> {
    match cell {
        Data::Int(i) => Some(*i),
        Data::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        Data::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Normalizes a date cell for display.
///
/// `PRESENT` in any case becomes `Present`; real dates become `Jan 2023`;
/// everything else passes through as trimmed text.
pub fn format_date(cell: &Data) -> String {
    let text = cell_text(cell);
    if text.eq_ignore_ascii_case("present") {
        return "Present".to_string();
    }
    match cell_date(cell) {
        Some(date) => date.format("%b %Y").to_string(),
        None => text,
    }
}

fn cell_date(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::DateTime(dt) if !dt.is_duration() => dt.as_datetime(),
        Data::DateTimeIso(s) => {
            let s = s.trim();
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                })
        }
        _ => None,
    }
}

/// Removes one leading bullet glyph and the whitespace around it.
pub fn strip_bullet_prefix(text: &str) -> String {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) if BULLET_GLYPHS.contains(&first) => chars.as_str().trim().to_string(),
        _ => trimmed.to_string(),
    }
}

/// Custom display title from a sheet's name cell, minus any instruction text.
pub fn custom_section_name(raw: &str) -> Option<String> {
    let name = match raw.find(INSTRUCTION_MARKER) {
        Some(idx) => &raw[..idx],
        None => raw,
    }
    .trim();
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn test_include_accepts_yes_and_y_in_any_case() {
        for v in ["yes", "YES", "Yes", "y", "Y", "  yes  "] {
            assert!(parse_include(&s(v)), "{v:?} should be included");
        }
    }

    #[test]
    fn test_include_rejects_everything_else() {
        for v in ["", "no", "n", "yeah", "true", "1", "ye s"] {
            assert!(!parse_include(&s(v)), "{v:?} should not be included");
        }
        assert!(!parse_include(&Data::Empty));
        assert!(!parse_include(&Data::Bool(true)));
        assert!(!parse_include(&Data::Int(1)));
    }

    #[test]
    fn test_order_parses_integers() {
        assert_eq!(parse_order(&Data::Int(3)), 3);
        assert_eq!(parse_order(&Data::Float(2.0)), 2);
        assert_eq!(parse_order(&Data::Float(2.9)), 2);
        assert_eq!(parse_order(&s(" 7 ")), 7);
        assert_eq!(parse_order(&s("-1")), -1);
    }

    #[test]
    fn test_order_defaults_to_sentinel() {
        assert_eq!(parse_order(&Data::Empty), DEFAULT_ORDER);
        assert_eq!(parse_order(&s("")), DEFAULT_ORDER);
        assert_eq!(parse_order(&s("first")), DEFAULT_ORDER);
        assert_eq!(parse_order(&s("2.5")), DEFAULT_ORDER);
        assert_eq!(parse_order(&Data::Float(f64::NAN)), DEFAULT_ORDER);
    }

    #[test]
    fn test_format_date_present_any_case() {
        assert_eq!(format_date(&s("present")), "Present");
        assert_eq!(format_date(&s("PRESENT")), "Present");
        assert_eq!(format_date(&s(" Present ")), "Present");
    }

    #[test]
    fn test_format_date_iso_cells() {
        assert_eq!(
            format_date(&Data::DateTimeIso("2023-01-15T00:00:00".into())),
            "Jan 2023"
        );
        assert_eq!(format_date(&Data::DateTimeIso("2021-09-01".into())), "Sep 2021");
    }

    #[test]
    fn test_format_date_serial_cell() {
        use calamine::{ExcelDateTime, ExcelDateTimeType};
        // 44927 is 2023-01-01 in the 1900 date system.
        let cell = Data::DateTime(ExcelDateTime::new(
            44927.0,
            ExcelDateTimeType::DateTime,
            false,
        ));
        assert_eq!(format_date(&cell), "Jan 2023");
    }

    #[test]
    fn test_format_date_passes_text_through() {
        assert_eq!(format_date(&s("  Spring 2019 ")), "Spring 2019");
        assert_eq!(format_date(&Data::Int(2019)), "2019");
        assert_eq!(format_date(&Data::Empty), "");
    }

    #[test]
    fn test_strip_bullet_prefix_removes_one_glyph() {
        assert_eq!(strip_bullet_prefix("• Led the team"), "Led the team");
        assert_eq!(strip_bullet_prefix("  -   Led the team "), "Led the team");
        assert_eq!(strip_bullet_prefix("►Led"), "Led");
        assert_eq!(strip_bullet_prefix("** bold"), "* bold");
        assert_eq!(strip_bullet_prefix("Led - the team"), "Led - the team");
        assert_eq!(strip_bullet_prefix(""), "");
    }

    #[test]
    fn test_custom_section_name_drops_instructions() {
        assert_eq!(
            custom_section_name("Career Highlights <---- rename this section"),
            Some("Career Highlights".to_string())
        );
        assert_eq!(custom_section_name("  Projects  "), Some("Projects".to_string()));
        assert_eq!(custom_section_name("<---- type a name"), None);
        assert_eq!(custom_section_name(""), None);
    }

    #[test]
    fn test_cell_text_renders_integral_floats() {
        assert_eq!(cell_text(&Data::Float(5.0)), "5");
        assert_eq!(cell_text(&Data::Float(5.5)), "5.5");
        assert_eq!(cell_text(&Data::Bool(true)), "True");
    }

    proptest! {
        #[test]
        fn prop_include_true_only_for_yes_or_y(text in "\\PC{0,8}") {
            let expected = matches!(text.trim().to_uppercase().as_str(), "YES" | "Y");
            prop_assert_eq!(parse_include(&Data::String(text.clone())), expected);
        }

        #[test]
        fn prop_non_integer_order_is_sentinel(text in "[a-zA-Z ]{0,10}") {
            prop_assert_eq!(parse_order(&Data::String(text)), DEFAULT_ORDER);
        }

        #[test]
        fn prop_integer_order_round_trips(n in -100_000i64..100_000) {
            prop_assert_eq!(parse_order(&Data::String(n.to_string())), n);
        }

        #[test]
        fn prop_strip_only_touches_first_glyph(body in "[a-z][a-z ]{0,20}") {
            let stripped = strip_bullet_prefix(&format!("• {body}"));
            prop_assert_eq!(stripped, body.trim().to_string());
        }
    }
}
