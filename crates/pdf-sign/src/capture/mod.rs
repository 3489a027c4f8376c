//! Signature capture
//!
//! Each mode produces a raster image plus its intrinsic pixel size:
//! 1. Draw: free-hand strokes rasterised to PNG
//! 2. Type: text rendered with a cursive face to PNG
//! 3. Upload: a user-provided PNG or JPEG, passed through unchanged

mod draw;
mod typed;
mod upload;

pub use draw::{DrawPad, capture_drawing};
pub use typed::{capture_typed, resolve_typed_font};
pub use upload::{capture_upload, load_upload};

use crate::types::*;
use std::io::Cursor;

/// Raster output of one capture action, not yet registered with a session
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedImage {
    pub source: SignatureSource,
    pub image: Vec<u8>,
    pub format: RasterFormat,
    pub width: u32,
    pub height: u32,
}

impl CapturedImage {
    pub(crate) fn into_signature(self, id: SignatureId) -> Signature {
        Signature {
            id,
            source: self.source,
            image: self.image,
            format: self.format,
            intrinsic_width: self.width,
            intrinsic_height: self.height,
        }
    }
}

/// Encode an RGBA buffer as PNG
pub(crate) fn encode_png(image: image::RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}
