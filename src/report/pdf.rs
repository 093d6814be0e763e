//! PDF rendering of a [`ReportDocument`] via `printpdf`.
//!
//! A4 portrait, one-inch margins, Helvetica builtin fonts. Pages are appended
//! whenever the cursor reaches the bottom margin. The scan is decoded at render
//! time; if decoding fails the placeholder line is drawn instead.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};

use super::document::{ImageSource, KeyValue, ReportBlock, ReportDocument, IMAGE_UNAVAILABLE};
use super::{DocumentRenderer, ReportError};

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN: f32 = 25.4;
const INDENT: f32 = 7.0;
/// Longest edge of the embedded scan, in inches.
const IMAGE_BOX_IN: f32 = 3.0;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const LINE: f32 = 5.0;

/// Renders report documents to PDF bytes.
#[derive(Debug, Clone, Default)]
pub struct PdfRenderer;

impl DocumentRenderer for PdfRenderer {
    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, ReportError> {
        render_pdf(document)
    }
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Cursor over the current page; opens a new page on overflow.
struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl<'a> PageCursor<'a> {
    fn new(doc: &'a PdfDocumentReference, layer: PdfLayerReference) -> Self {
        Self {
            doc,
            layer,
            y: top(),
            pages: 1,
        }
    }

    /// Make sure `height` mm fit above the bottom margin.
    fn reserve(&mut self, height: f32) {
        if self.y - height < MARGIN {
            let (page, layer) =
                self.doc
                    .add_page(PAGE_WIDTH, PAGE_HEIGHT, format!("Layer {}", self.pages + 1));
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = top();
            self.pages += 1;
        }
    }

    fn text(&mut self, text: &str, size: f32, x: f32, font: &IndirectFontRef) {
        self.reserve(LINE);
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
        self.y -= LINE;
    }

    /// Lay out `text` in lines of at most `max_chars`, breaking between
    /// words. A word longer than the budget gets a line of its own.
    /// Returns the number of lines drawn.
    fn wrapped(
        &mut self,
        text: &str,
        max_chars: usize,
        x: f32,
        font: &IndirectFontRef,
    ) -> usize {
        let mut drawn = 0;
        let mut line = String::new();
        for word in text.split_whitespace() {
            if !line.is_empty() && line.len() + 1 + word.len() > max_chars {
                self.text(&line, BODY_SIZE, x, font);
                drawn += 1;
                line.clear();
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        if !line.is_empty() {
            self.text(&line, BODY_SIZE, x, font);
            drawn += 1;
        }
        drawn
    }

    fn space(&mut self, mm: f32) {
        self.y -= mm;
    }
}

fn top() -> f32 {
    PAGE_HEIGHT.0 - MARGIN
}

fn render_pdf(document: &ReportDocument) -> Result<Vec<u8>, ReportError> {
    let (doc, page1, layer1) = PdfDocument::new(&document.title, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?,
    };

    let layer = doc.get_page(page1).get_layer(layer1);
    let mut cursor = PageCursor::new(&doc, layer);

    for block in &document.blocks {
        draw_block(&mut cursor, &fonts, block);
    }
    tracing::debug!(pages = cursor.pages, "report laid out");
    drop(cursor);

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Pdf(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ReportError::Pdf(format!("buffer error: {e}")))
}

fn draw_block(cursor: &mut PageCursor<'_>, fonts: &Fonts, block: &ReportBlock) {
    match block {
        ReportBlock::Heading { text } => {
            cursor.reserve(LINE * 2.0);
            cursor.text(text, TITLE_SIZE, MARGIN, &fonts.bold);
            cursor.space(LINE);
        }
        ReportBlock::KeyValues { heading, pairs } => {
            if let Some(heading) = heading {
                draw_heading(cursor, fonts, heading);
            }
            draw_pairs(cursor, fonts, pairs);
            cursor.space(LINE);
        }
        ReportBlock::Image { heading, source } => {
            draw_heading(cursor, fonts, heading);
            match source {
                ImageSource::File { path } => draw_image(cursor, fonts, path),
                ImageSource::Unavailable { placeholder } => {
                    cursor.text(placeholder, BODY_SIZE, MARGIN, &fonts.regular)
                }
            }
            cursor.space(LINE);
        }
        ReportBlock::Paragraph {
            heading,
            text,
            indented,
        } => {
            draw_heading(cursor, fonts, heading);
            let (x, width) = if *indented {
                (MARGIN + INDENT, 82)
            } else {
                (MARGIN, 88)
            };
            for raw in text.split('\n') {
                if raw.trim().is_empty() {
                    cursor.space(LINE / 2.0);
                    continue;
                }
                cursor.wrapped(raw, width, x, &fonts.regular);
            }
            cursor.space(LINE);
        }
    }
}

fn draw_heading(cursor: &mut PageCursor<'_>, fonts: &Fonts, heading: &str) {
    // Keep a heading on the same page as its first body line.
    cursor.reserve(LINE * 2.0);
    cursor.text(heading, HEADING_SIZE, MARGIN, &fonts.bold);
    cursor.space(1.5);
}

fn draw_pairs(cursor: &mut PageCursor<'_>, fonts: &Fonts, pairs: &[KeyValue]) {
    for pair in pairs {
        let label = format!("{}:", pair.key);
        let indent = MARGIN + label.len() as f32 * 2.2 + 2.0;
        cursor.reserve(LINE);
        cursor
            .layer
            .use_text(&label, BODY_SIZE, Mm(MARGIN), Mm(cursor.y), &fonts.bold);
        cursor
            .layer
            .use_text(&pair.value, BODY_SIZE, Mm(indent), Mm(cursor.y), &fonts.regular);
        cursor.space(LINE);
    }
}

fn draw_image(cursor: &mut PageCursor<'_>, fonts: &Fonts, path: &Path) {
    let decoded = match image::open(path) {
        Ok(img) => img,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "scan could not be decoded");
            cursor.text(IMAGE_UNAVAILABLE, BODY_SIZE, MARGIN, &fonts.regular);
            return;
        }
    };

    let (w, h) = (decoded.width(), decoded.height());
    if w == 0 || h == 0 {
        cursor.text(IMAGE_UNAVAILABLE, BODY_SIZE, MARGIN, &fonts.regular);
        return;
    }

    // Scale so the longest edge spans IMAGE_BOX_IN inches.
    let dpi = w.max(h) as f32 / IMAGE_BOX_IN;
    let height_mm = h as f32 / dpi * 25.4;

    cursor.reserve(height_mm + 1.0);
    let bottom = cursor.y - height_mm;

    let rgb = image::DynamicImage::ImageRgb8(decoded.to_rgb8());
    Image::from_dynamic_image(&rgb).add_to_layer(
        cursor.layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN)),
            translate_y: Some(Mm(bottom)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
    cursor.y = bottom - 1.0;
}

/// Saves PDF bytes into `dir`, creating it when missing.
pub fn export_pdf_to_file(pdf_bytes: &[u8], filename: &str, dir: &Path) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    std::fs::write(&path, pdf_bytes)?;
    tracing::info!(path = %path.display(), bytes = pdf_bytes.len(), "report exported");
    Ok(path)
}
