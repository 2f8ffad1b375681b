// Typography and page geometry shared by the section builders and the DOCX writer.

pub mod page;
pub mod styles;

pub use page::{BaseFont, PageSetup};
pub use styles::{resolve_styles, StyleCategory, StyleSheet, StyleSpec};
