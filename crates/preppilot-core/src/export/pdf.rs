use printpdf::{BuiltinFont, Color, Greyscale, IndirectFontRef, Line, Mm, PdfDocument, Point};

use crate::error::ExportError;

use super::cursor::{Layout, Mark};
use super::metrics::Font;

const RULE_GREY: f32 = 220.0 / 255.0;
const RULE_THICKNESS_PT: f32 = 0.5;

fn pdf_err(err: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(err.to_string())
}

/// Built-in PDF fonts only cover WinAnsi. ASCII and Latin-1 pass through,
/// common typographic marks get ASCII stand-ins, anything else becomes `?`.
pub fn to_pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' '..='~' => out.push(c),
            '•' => out.push('-'),
            '—' | '–' => out.push('-'),
            '‘' | '’' => out.push('\''),
            '“' | '”' => out.push('"'),
            '…' => out.push_str("..."),
            '\t' | '\u{a0}' => out.push(' '),
            '\u{a1}'..='\u{ff}' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn grey(level: f32) -> Color {
    Color::Greyscale(Greyscale::new(level, None))
}

/// Draw a finished layout into PDF bytes.
pub fn render(layout: &Layout, title: &str) -> Result<Vec<u8>, ExportError> {
    let geometry = layout.geometry;
    let (doc, first_page, first_layer) = PdfDocument::new(
        title,
        Mm(geometry.width),
        Mm(geometry.height),
        "Layer 1",
    );

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_err)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_err)?;

    for (idx, page) in layout.pages.iter().enumerate() {
        let layer = if idx == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) =
                doc.add_page(Mm(geometry.width), Mm(geometry.height), "Layer 1");
            doc.get_page(page_idx).get_layer(layer_idx)
        };

        for mark in &page.marks {
            match mark {
                Mark::Text { x, y, text, style } => {
                    let font: &IndirectFontRef = match style.font() {
                        Font::Helvetica => &regular,
                        Font::HelveticaBold => &bold,
                    };
                    layer.set_fill_color(grey(style.grey()));
                    layer.use_text(
                        to_pdf_text(text),
                        style.size_pt(),
                        Mm(*x),
                        Mm(geometry.height - *y),
                        font,
                    );
                }
                Mark::Rule { x1, x2, y } => {
                    let pdf_y = Mm(geometry.height - *y);
                    layer.set_outline_color(grey(RULE_GREY));
                    layer.set_outline_thickness(RULE_THICKNESS_PT);
                    layer.add_line(Line {
                        points: vec![
                            (Point::new(Mm(*x1), pdf_y), false),
                            (Point::new(Mm(*x2), pdf_y), false),
                        ],
                        is_closed: false,
                    });
                }
            }
        }
    }

    doc.save_to_bytes().map_err(pdf_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::cursor::{Block, DocumentCursor, PageGeometry};

    #[test]
    fn test_pdf_text_fits_winansi() {
        assert_eq!(to_pdf_text("• Rust — “fast”…"), "- Rust - \"fast\"...");
        assert_eq!(to_pdf_text("naïve José Muñoz, Köln"), "naïve José Muñoz, Köln");
        assert_eq!(to_pdf_text("Rust 🦀 ✓"), "Rust ? ?");
    }

    #[test]
    fn test_render_produces_pdf() {
        let mut cursor = DocumentCursor::new(PageGeometry::A4);
        cursor.emit(&Block::Title("Title"));
        cursor.emit(&Block::SectionHeader("Header"));
        cursor.emit(&Block::Spacer(300.0));
        cursor.emit(&Block::Paragraph("second page"));
        let layout = cursor.finish();
        assert_eq!(layout.page_count(), 2);

        let bytes = render(&layout, "test").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
