//! PDF rendering of label pages.
//!
//! Builds the document by hand with `lopdf`: a content stream of drawing
//! operations per page, built-in Type1 fonts (Helvetica / Helvetica-Bold),
//! then the page tree and catalog. Each placement becomes a dashed-outline
//! rectangle with the magazine name and the edition/year line inside it.
//!
//! Text is word-wrapped to the cell's inset width using an approximate
//! per-character width (the built-in fonts ship no metrics here); wrapped
//! lines that would fall below the bottom inset are dropped rather than
//! drawn over the next cell.

use crate::layout::{Font, LayoutConfig, PageGeometry, Placement, TextStyle, PT_PER_MM};
use crate::{Error, Result};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat};
use std::path::Path;

// Dash pattern for cell outlines: 3pt on, 3pt off
const DASH_ON_PT: i64 = 3;
const DASH_OFF_PT: i64 = 3;

// Average glyph width as a fraction of the font size. Close enough for
// Helvetica at label sizes; wrapping errs on the wide side.
const AVG_GLYPH_WIDTH: f32 = 0.52;
const AVG_GLYPH_WIDTH_BOLD: f32 = 0.56;

/// Estimated rendered width of `text` in points.
fn estimated_width(text: &str, style: TextStyle) -> f32 {
    let factor = match style.font {
        Font::Helvetica => AVG_GLYPH_WIDTH,
        Font::HelveticaBold => AVG_GLYPH_WIDTH_BOLD,
    };
    text.chars().count() as f32 * style.size * factor
}

/// Greedy word wrap of `text` into lines no wider than `max_width_pt`.
///
/// A single word wider than the limit gets a line of its own and may
/// overhang the inset slightly; it is never split mid-word.
fn wrap_text(text: &str, style: TextStyle, max_width_pt: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if estimated_width(&candidate, style) <= max_width_pt || current.is_empty() {
            current = candidate;
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Encodes text for a PDF literal string: Latin-1 bytes with `(`, `)` and
/// `\` escaped. Characters outside Latin-1 are replaced with `?`.
fn encode_text(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let byte = if (ch as u32) < 256 { ch as u32 as u8 } else { b'?' };
        if matches!(byte, b'(' | b')' | b'\\') {
            bytes.push(b'\\');
        }
        bytes.push(byte);
    }
    bytes
}

/// Drawing operations for one text line at a baseline position.
fn text_ops(ops: &mut Vec<(String, Vec<Object>)>, line: &str, style: TextStyle, x: f32, baseline: f32) {
    ops.push(("BT".to_string(), vec![]));
    ops.push((
        "Tf".to_string(),
        vec![
            Object::Name(style.font.resource_name().as_bytes().to_vec()),
            style.size.into(),
        ],
    ));
    ops.push(("Td".to_string(), vec![x.into(), baseline.into()]));
    ops.push((
        "Tj".to_string(),
        vec![Object::String(encode_text(line), StringFormat::Literal)],
    ));
    ops.push(("ET".to_string(), vec![]));
}

/// Drawing operations for one placement: dashed cell outline plus the two
/// wrapped text lines, stacked top-down inside the insets.
fn placement_ops(ops: &mut Vec<(String, Vec<Object>)>, placement: &Placement, config: &LayoutConfig) {
    let rect = placement.rect;

    // Dashed border of the exact cell size
    ops.push((
        "d".to_string(),
        vec![
            Object::Array(vec![DASH_ON_PT.into(), DASH_OFF_PT.into()]),
            0.into(),
        ],
    ));
    ops.push((
        "re".to_string(),
        vec![rect.x.into(), rect.y.into(), rect.w.into(), rect.h.into()],
    ));
    ops.push(("S".to_string(), vec![]));
    ops.push(("d".to_string(), vec![Object::Array(vec![]), 0.into()]));

    // Usable text area inside the insets
    let text_x = rect.x + config.inset_left_mm * PT_PER_MM;
    let text_w = rect.w - (config.inset_left_mm + config.inset_right_mm) * PT_PER_MM;
    let floor_y = rect.y + config.inset_bottom_mm * PT_PER_MM;

    // Cursor tracks the top of the next line, moving downward
    let mut cursor = rect.y + rect.h - config.inset_top_mm * PT_PER_MM;

    for line in wrap_text(&placement.heading, config.heading, text_w) {
        let baseline = cursor - config.heading.size;
        if baseline < floor_y {
            return;
        }
        text_ops(ops, &line, config.heading, text_x, baseline);
        cursor = baseline;
    }
    cursor -= config.line_gap_pt;

    for line in wrap_text(&placement.body, config.body, text_w) {
        let baseline = cursor - config.body.size;
        if baseline < floor_y {
            return;
        }
        text_ops(ops, &line, config.body, text_x, baseline);
        cursor = baseline;
    }
}

/// Serializes operations into a raw content stream, one operator per line.
fn encode_operations(operations: Vec<(String, Vec<Object>)>) -> Vec<u8> {
    let mut content_data = Vec::new();
    for (operator, operands) in operations {
        for operand in operands {
            encode_operand(&mut content_data, &operand);
            content_data.push(b' ');
        }
        content_data.extend_from_slice(operator.as_bytes());
        content_data.push(b'\n');
    }
    content_data
}

fn encode_operand(out: &mut Vec<u8>, operand: &Object) {
    match operand {
        Object::Integer(i) => out.extend_from_slice(i.to_string().as_bytes()),
        Object::Real(f) => out.extend_from_slice(f.to_string().as_bytes()),
        Object::Name(n) => {
            out.push(b'/');
            out.extend_from_slice(n);
        }
        Object::String(s, _) => {
            out.push(b'(');
            out.extend_from_slice(s);
            out.push(b')');
        }
        Object::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b' ');
                }
                encode_operand(out, item);
            }
            out.push(b']');
        }
        _ => {}
    }
}

/// Renders laid-out pages into a PDF document.
pub fn render(
    pages: &[Vec<Placement>],
    config: &LayoutConfig,
    page: &PageGeometry,
) -> Document {
    let mut doc = Document::with_version("1.5");

    // Built-in Type1 fonts, shared by all pages
    let mut font_ids = Vec::new();
    for font in [Font::Helvetica, Font::HelveticaBold] {
        let mut font_dict = Dictionary::new();
        font_dict.set("Type", Object::Name(b"Font".to_vec()));
        font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
        font_dict.set(
            "BaseFont",
            Object::Name(font.base_font().as_bytes().to_vec()),
        );
        font_ids.push((font, doc.add_object(font_dict)));
    }

    let page_width = page.width_pt();
    let page_height = page.height_pt();

    for page_placements in pages {
        let mut operations = Vec::new();
        for placement in page_placements {
            placement_ops(&mut operations, placement, config);
        }

        let content_id = doc.add_object(Stream::new(Dictionary::new(), encode_operations(operations)));

        let mut fonts = Dictionary::new();
        for (font, id) in &font_ids {
            fonts.set(font.resource_name(), Object::Reference(*id));
        }
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(fonts));

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set(
            "MediaBox",
            vec![0.into(), 0.into(), page_width.into(), page_height.into()],
        );
        page_dict.set("Contents", Object::Reference(content_id));
        page_dict.set("Resources", Object::Dictionary(resources));

        let _page_id = doc.add_object(page_dict);
    }

    // Build the page tree from the page objects added above
    let page_ids: Vec<_> = doc
        .objects
        .iter()
        .filter(|(_, obj)| {
            if let Object::Dictionary(dict) = obj {
                matches!(dict.get(b"Type"), Ok(Object::Name(name)) if name == b"Page")
            } else {
                false
            }
        })
        .map(|(id, _)| *id)
        .collect();

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set(
        "Kids",
        Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
    );
    pages_dict.set("Count", Object::Integer(page_ids.len() as i64));
    let pages_id = doc.add_object(pages_dict);

    for page_id in page_ids {
        if let Ok(Object::Dictionary(page_dict)) = doc.get_object_mut(page_id) {
            page_dict.set("Parent", Object::Reference(pages_id));
        }
    }

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc
}

/// Saves the document to `path`.
pub fn save(doc: &mut Document, path: &Path) -> Result<()> {
    doc.save(path).map_err(|e| Error::op("save_pdf", e))?;
    Ok(())
}
