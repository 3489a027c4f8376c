use super::{CapturedImage, encode_png};
use crate::config::TypedStyle;
use crate::types::*;
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use image::{Rgba, RgbaImage};
use rusttype::{Font, Scale, point};
use std::sync::OnceLock;

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        db
    })
}

/// Find the face used for typed signatures: configured families first, then
/// the generic cursive family, then any serif or sans-serif face
pub fn resolve_typed_font(style: &TypedStyle) -> Result<Font<'static>> {
    let mut families: Vec<Family<'_>> = style
        .font_families
        .iter()
        .map(|name| Family::Name(name.as_str()))
        .collect();
    families.extend([Family::Cursive, Family::Serif, Family::SansSerif]);

    let db = db();
    for family in &families {
        let query = Query {
            families: std::slice::from_ref(family),
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let Some(id) = db.query(&query) else {
            continue;
        };
        let font = db
            .with_face_data(id, |data, index| {
                Font::try_from_vec_and_index(data.to_vec(), index)
            })
            .flatten();
        if let Some(font) = font {
            log::debug!("Typed signature font resolved to {:?}", family);
            return Ok(font);
        }
    }

    Err(SignError::FontUnavailable(style.font_families.join(", ")))
}

/// Render `text` left-anchored on a transparent canvas
pub fn capture_typed(text: &str, style: &TypedStyle) -> Result<CapturedImage> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SignError::EmptyInput("signature text is blank"));
    }

    let font = resolve_typed_font(style)?;
    let image = render_text(&font, text, style);

    Ok(CapturedImage {
        source: SignatureSource::Type,
        image: encode_png(image)?,
        format: RasterFormat::Png,
        width: style.canvas_width,
        height: style.canvas_height,
    })
}

fn render_text(font: &Font<'_>, text: &str, style: &TypedStyle) -> RgbaImage {
    let (width, height) = (style.canvas_width, style.canvas_height);
    let mut canvas = RgbaImage::new(width, height);

    let scale = Scale::uniform(style.font_px);
    let v_metrics = font.v_metrics(scale);
    let text_height = v_metrics.ascent - v_metrics.descent;
    let baseline = (height as f32 - text_height) / 2.0 + v_metrics.ascent;

    let [r, g, b, a] = style.color;
    for glyph in font.layout(text, scale, point(style.padding_px, baseline)) {
        let Some(bounds) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let x = gx as i32 + bounds.min.x;
            let y = gy as i32 + bounds.min.y;
            if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                return;
            }
            let alpha = (coverage * a as f32).round().clamp(0.0, 255.0) as u8;
            let pixel = canvas.get_pixel_mut(x as u32, y as u32);
            // Overlapping glyphs keep the strongest coverage
            if alpha > pixel[3] {
                *pixel = Rgba([r, g, b, alpha]);
            }
        });
    }

    canvas
}
