pub mod csv_report;
pub mod excel_report;
pub mod summary;

use rust_xlsxwriter::{Format, FormatBorder};

/// Blue header, white bold text, thin border.
pub fn create_header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color("2C5F8A")
        .set_font_color("FFFFFF")
        .set_font_size(11)
        .set_border(FormatBorder::Thin)
        .set_text_wrap()
}

/// Integer format #,##0
pub fn create_integer_format() -> Format {
    Format::new().set_num_format("#,##0")
}

/// Wrapped cell for long free-text columns (descriptions, reasons).
pub fn create_wrap_format() -> Format {
    Format::new().set_text_wrap()
}
