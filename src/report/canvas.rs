//! A small cursor-based drawing surface that renders to PDF through `lopdf`.
//!
//! Coordinates are millimetres from the top-left corner of an A4 page, the
//! cursor moves the way a typewriter does: cells advance it to the right,
//! line breaks return it to the left margin. Text is passed as Latin-1 bytes.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use super::fonts::Font;
use super::image::LogoImage;
use super::ReportError;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
/// Points per millimetre
pub const SCALE: f32 = 72.0 / 25.4;
/// Horizontal padding inside a cell
pub const CELL_MARGIN: f32 = 1.0;

const IMAGE_RESOURCE: &str = "Im1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

pub struct PdfCanvas {
    pages: Vec<Vec<Operation>>,
    x: f32,
    y: f32,
    left_margin: f32,
    right_margin: f32,
    top_margin: f32,
    break_margin: f32,
    font: Font,
    font_size: f32,
    line_width: f32,
    image: Option<Stream>,
}

impl Default for PdfCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfCanvas {
    /// A4 portrait, 10 mm margins, automatic page break 15 mm above the bottom
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            x: 10.0,
            y: 10.0,
            left_margin: 10.0,
            right_margin: 10.0,
            top_margin: 10.0,
            break_margin: 15.0,
            font: Font::Helvetica,
            font_size: 12.0,
            line_width: 0.2,
            image: None,
        }
    }

    pub fn add_page(&mut self) {
        self.pages.push(Vec::new());
        self.x = self.left_margin;
        self.y = self.top_margin;
        // Graphics state does not carry over between content streams
        self.set_line_width(self.line_width);
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn set_xy(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn set_font(&mut self, font: Font, size_pt: f32) {
        self.font = font;
        self.font_size = size_pt;
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
        self.push(Operation::new("w", vec![(width * SCALE).into()]));
    }

    /// Width of `text` in the current font, in millimetres
    pub fn string_width(&self, text: &[u8]) -> f32 {
        self.font.text_width(text, self.font_size) / SCALE
    }

    pub fn content_width(&self) -> f32 {
        PAGE_WIDTH - self.left_margin - self.right_margin
    }

    /// Move to the left margin and down by `h`
    pub fn ln(&mut self, h: f32) {
        self.x = self.left_margin;
        self.y += h;
    }

    /// Draw one line of text in a `w` x `h` box at the cursor.
    ///
    /// `w == 0` extends the box to the right margin. Breaks to a new page
    /// first if the box would cross the bottom margin.
    pub fn cell(&mut self, w: f32, h: f32, text: &[u8], align: Align, line_break: bool) {
        if self.y + h > PAGE_HEIGHT - self.break_margin {
            let x = self.x;
            self.add_page();
            self.x = x;
        }

        let w = if w == 0.0 { PAGE_WIDTH - self.right_margin - self.x } else { w };

        if !text.is_empty() {
            let dx = match align {
                Align::Left => CELL_MARGIN,
                Align::Center => (w - self.string_width(text)) / 2.0,
            };
            let font_height = self.font_size / SCALE;
            let baseline = self.y + 0.5 * h + 0.3 * font_height;
            self.text_at(self.x + dx, baseline, text);
        }

        if line_break {
            self.ln(h);
        } else {
            self.x += w;
        }
    }

    /// Word-wrapped paragraph of `h`-high lines in a box `w` wide.
    pub fn multi_cell(&mut self, w: f32, h: f32, text: &[u8]) {
        let w = if w == 0.0 { PAGE_WIDTH - self.right_margin - self.x } else { w };
        let left = self.x;
        for line in self.wrap(text, w - 2.0 * CELL_MARGIN) {
            self.x = left;
            self.cell(w, h, &line, Align::Left, true);
        }
        self.x = self.left_margin;
    }

    /// Split `text` into lines no wider than `max_width` millimetres.
    ///
    /// Newlines force a break, words wider than a whole line are split
    /// between characters.
    pub fn wrap(&self, text: &[u8], max_width: f32) -> Vec<Vec<u8>> {
        let space_width = self.string_width(b" ");
        let mut lines = Vec::new();

        for paragraph in text.split(|&b| b == b'\n') {
            let mut line: Vec<u8> = Vec::new();
            let mut line_width = 0.0;

            let words = paragraph
                .split(|&b| b == b' ' || b == b'\t' || b == b'\r')
                .filter(|w| !w.is_empty());

            for word in words {
                let word_width = self.string_width(word);
                let sep = if line.is_empty() { 0.0 } else { space_width };

                if line_width + sep + word_width <= max_width {
                    if !line.is_empty() {
                        line.push(b' ');
                    }
                    line.extend_from_slice(word);
                    line_width += sep + word_width;
                    continue;
                }

                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0.0;
                }

                if word_width <= max_width {
                    line.extend_from_slice(word);
                    line_width = word_width;
                } else {
                    for &b in word {
                        let char_width = self.string_width(&[b]);
                        if line_width + char_width > max_width && !line.is_empty() {
                            lines.push(std::mem::take(&mut line));
                            line_width = 0.0;
                        }
                        line.push(b);
                        line_width += char_width;
                    }
                }
            }

            lines.push(line);
        }

        lines
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.push(Operation::new("m", vec![(x1 * SCALE).into(), ((PAGE_HEIGHT - y1) * SCALE).into()]));
        self.push(Operation::new("l", vec![(x2 * SCALE).into(), ((PAGE_HEIGHT - y2) * SCALE).into()]));
        self.push(Operation::new("S", vec![]));
    }

    /// Place the logo with its top-left corner at (`x`, `y`)
    pub fn image(&mut self, logo: &LogoImage, x: f32, y: f32, w: f32, h: f32) {
        if self.image.is_none() {
            self.image = Some(logo.to_xobject());
        }
        self.push(Operation::new("q", vec![]));
        self.push(Operation::new(
            "cm",
            vec![
                (w * SCALE).into(),
                0.into(),
                0.into(),
                (h * SCALE).into(),
                (x * SCALE).into(),
                ((PAGE_HEIGHT - y - h) * SCALE).into(),
            ],
        ));
        self.push(Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.as_bytes().to_vec())]));
        self.push(Operation::new("Q", vec![]));
    }

    fn text_at(&mut self, x: f32, baseline: f32, text: &[u8]) {
        let font = Object::Name(self.font.resource_name().as_bytes().to_vec());
        self.push(Operation::new("BT", vec![]));
        self.push(Operation::new("Tf", vec![font, self.font_size.into()]));
        self.push(Operation::new(
            "Td",
            vec![(x * SCALE).into(), ((PAGE_HEIGHT - baseline) * SCALE).into()],
        ));
        self.push(Operation::new("Tj", vec![Object::string_literal(text.to_vec())]));
        self.push(Operation::new("ET", vec![]));
    }

    fn push(&mut self, op: Operation) {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        if let Some(page) = self.pages.last_mut() {
            page.push(op);
        }
    }

    /// Assemble the document and serialize it
    pub fn finish(self) -> Result<Vec<u8>, ReportError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for font in Font::ALL {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_name(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), font_id);
        }

        let mut resources = dictionary! { "Font" => fonts };
        if let Some(image) = self.image {
            let image_id = doc.add_object(image);
            resources.set("XObject", dictionary! { IMAGE_RESOURCE => image_id });
        }
        let resources_id = doc.add_object(resources);

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    (PAGE_WIDTH * SCALE).into(),
                    (PAGE_HEIGHT * SCALE).into(),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut output = Vec::new();
        doc.save_to(&mut output)?;
        Ok(output)
    }
}
