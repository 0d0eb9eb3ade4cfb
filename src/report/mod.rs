//! Combined Report
//!
//! Renders the ordered list of document summaries into one PDF:
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │      [logo]  Institution Title       │
//! │                                      │
//! │        Summary of first.pdf          │
//! │  ──────────────────────────────────  │
//! │  wrapped summary text ...            │
//! │                                      │
//! │        Summary of second.pdf         │
//! │  ...                                 │
//! └──────────────────────────────────────┘
//! ```
//!
//! All text is transcoded to Latin-1 before drawing; characters outside it
//! are printed as `?`.

pub mod canvas;
pub mod fonts;
pub mod image;

pub use canvas::{Align, PdfCanvas};
pub use fonts::{to_latin1, Font};
pub use self::image::LogoImage;

use crate::models::DocumentSummary;

/// Download name of the combined report, also its name inside the request directory
pub const REPORT_FILENAME: &str = "combined_summaries.pdf";

const LOGO_SIZE: f32 = 30.0;
const LOGO_GAP: f32 = 10.0;
const HEADER_TOP: f32 = 10.0;
const TITLE_FONT_SIZE: f32 = 18.0;
const HEADING_FONT_SIZE: f32 = 16.0;
const BODY_FONT_SIZE: f32 = 12.0;
const LINE_HEIGHT: f32 = 10.0;
const SECTION_GAP: f32 = 10.0;
const RULE_START: f32 = 15.0;
const RULE_END: f32 = 195.0;
const RULE_WIDTH: f32 = 0.5;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] ::image::ImageError),
}

/// Left edge of the logo so that logo, gap and title sit centered on the page
pub fn header_start_x(title_width: f32) -> f32 {
    let total_width = LOGO_SIZE + LOGO_GAP + title_width;
    (canvas::PAGE_WIDTH - total_width) / 2.0
}

pub fn build_report(
    summaries: &[DocumentSummary],
    title: &str,
    logo: Option<&LogoImage>,
) -> Result<Vec<u8>, ReportError> {
    let mut pdf = PdfCanvas::new();
    pdf.add_page();

    let title = to_latin1(title);
    pdf.set_font(Font::TimesBold, TITLE_FONT_SIZE);
    let start_x = header_start_x(pdf.string_width(&title));

    if let Some(logo) = logo {
        pdf.image(logo, start_x, HEADER_TOP, LOGO_SIZE, LOGO_SIZE);
    }

    pdf.set_xy(start_x + LOGO_SIZE + LOGO_GAP, HEADER_TOP + LOGO_SIZE / 4.0);
    pdf.cell(0.0, LINE_HEIGHT, &title, Align::Left, false);
    pdf.ln(LOGO_SIZE + LOGO_GAP);

    for summary in summaries {
        pdf.set_font(Font::HelveticaBold, HEADING_FONT_SIZE);
        let heading = to_latin1(&format!("Summary of {}", summary.filename));
        pdf.cell(0.0, LINE_HEIGHT, &heading, Align::Center, true);

        pdf.set_line_width(RULE_WIDTH);
        let y = pdf.y();
        pdf.line(RULE_START, y, RULE_END, y);
        pdf.ln(SECTION_GAP);

        pdf.set_font(Font::Helvetica, BODY_FONT_SIZE);
        pdf.multi_cell(0.0, LINE_HEIGHT, &to_latin1(&summary.summary_text));
        pdf.ln(SECTION_GAP);
    }

    pdf.finish()
}
