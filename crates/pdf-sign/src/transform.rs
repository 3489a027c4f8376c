//! Layout pixel ⇄ native point conversion
//!
//! Overlay geometry is kept in layout pixels relative to the page's outer
//! layout box. Native geometry is in PDF points relative to the lower-left
//! corner of the page box, y growing upward. The conversion runs only when
//! committing; interaction math never leaves layout pixels.

use crate::geometry::PageGeometry;
use crate::types::*;

/// Overlay geometry in native page space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativePlacement {
    /// Lower-left corner of the unrotated image box
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Counter-clockwise degrees, as PDF content streams expect
    pub rotation_degrees: f32,
}

impl NativePlacement {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Points per layout pixel along each axis of the rendered bitmap
pub fn scale_factors(page: &PageGeometry) -> (f32, f32) {
    (
        page.native_width / page.bitmap_rect.width,
        page.native_height / page.bitmap_rect.height,
    )
}

/// Convert page-relative layout geometry to native page space
pub fn to_native(rect: &OverlayRect, page: &PageGeometry) -> NativePlacement {
    let (scale_x, scale_y) = scale_factors(page);

    // The bitmap may sit inside padding of the outer box
    let offset = page.bitmap_offset();
    let rel_x = rect.x - offset.x;
    let rel_y = rect.y - offset.y;

    let native_x = rel_x * scale_x;
    let native_y = rel_y * scale_y;
    let width = rect.width * scale_x;
    let height = rect.height * scale_y;

    NativePlacement {
        x: native_x,
        y: page.native_height - native_y - height,
        width,
        height,
        // Screen rotation is clockwise-positive, PDF is counter-clockwise
        rotation_degrees: -rect.rotation_degrees,
    }
}

/// Convert native page geometry back to page-relative layout geometry
pub fn to_layout(placement: &NativePlacement, page: &PageGeometry) -> OverlayRect {
    let (scale_x, scale_y) = scale_factors(page);
    let offset = page.bitmap_offset();

    let native_y = page.native_height - placement.y - placement.height;

    OverlayRect {
        x: placement.x / scale_x + offset.x,
        y: native_y / scale_y + offset.y,
        width: placement.width / scale_x,
        height: placement.height / scale_y,
        rotation_degrees: normalize_degrees(-placement.rotation_degrees),
    }
}
