//! PDF painting with `printpdf`.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use scriptorium_config::ExportConfig;
use scriptorium_core::Document;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::ExportError;
use crate::layout::{self, Page, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::sanitize::fold_latin1;

const LAYER_NAME: &str = "Text";

/// Regular and bold faces used on every page.
struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Built-in fonts need Latin-1 text.
    builtin: bool,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference, font_path: Option<&Path>) -> Result<Self, ExportError> {
        if let Some(path) = font_path {
            match load_external(doc, path) {
                Ok(font) => {
                    debug!(font = %path.display(), "Embedding external font");
                    return Ok(Self {
                        regular: font.clone(),
                        bold: font,
                        builtin: false,
                    });
                }
                Err(e) => warn!(error = %e, "Falling back to built-in Helvetica"),
            }
        }

        Ok(Self {
            regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
            bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
            builtin: true,
        })
    }
}

fn load_external(doc: &PdfDocumentReference, path: &Path) -> Result<IndirectFontRef, ExportError> {
    let file = std::fs::File::open(path)
        .map_err(|e| ExportError::Font(format!("{}: {e}", path.display())))?;
    doc.add_external_font(file)
        .map_err(|e| ExportError::Font(format!("{}: {e}", path.display())))
}

/// Render the full document layout to PDF bytes.
pub fn render_document(document: &Document, style: &ExportConfig) -> Result<Vec<u8>, ExportError> {
    let title = if document.title.trim().is_empty() {
        document.topic.clone()
    } else {
        document.title.clone()
    };
    let title = fold_latin1(&title);
    let (doc, first_page, first_layer) =
        PdfDocument::new(title.as_str(), Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);

    let fonts = Fonts::load(&doc, style.font_path.as_deref())?;
    let blocks = layout::plan(document);
    let pages = if fonts.builtin {
        layout::lay_out(&blocks, style, fold_latin1)?
    } else {
        layout::lay_out(&blocks, style, str::to_string)?
    };

    for (index, page) in pages.iter().enumerate() {
        let (page_idx, layer_idx) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME)
        };
        paint(&doc.get_page(page_idx).get_layer(layer_idx), page, &fonts);
    }

    debug!(pages = pages.len(), "PDF laid out");
    Ok(doc.save_to_bytes()?)
}

fn paint(layer: &printpdf::PdfLayerReference, page: &Page, fonts: &Fonts) {
    for line in &page.lines {
        let font = if line.is_bold() { &fonts.bold } else { &fonts.regular };
        layer.use_text(line.text.clone(), line.size, Mm(line.x), Mm(line.y), font);
    }
}

/// A one-page PDF carrying a single error line.
pub fn render_error_page(reason: &str) -> Result<Vec<u8>, ExportError> {
    let (doc, page, layer) =
        PdfDocument::new("Export error", Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    let message = fold_latin1(&format!("Error generating PDF: {reason}"));
    let line = layout::wrap(&message, 11.0, false, PAGE_WIDTH_MM - 30.0)
        .into_iter()
        .next()
        .unwrap_or_default();

    doc.get_page(page)
        .get_layer(layer)
        .use_text(line, 11.0, Mm(15.0), Mm(PAGE_HEIGHT_MM - 25.0), &font);

    Ok(doc.save_to_bytes()?)
}
