//! Shared constants for document signing
//!
//! This module centralizes magic numbers used across capture, interaction
//! and compositing.

use crate::types::Size;

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

// =============================================================================
// Placement
// =============================================================================

/// Initial size of a drawn signature (layout pixels)
pub const DRAW_DEFAULT_SIZE: Size = Size::new(150.0, 75.0);

/// Initial size of a typed signature (layout pixels)
pub const TYPE_DEFAULT_SIZE: Size = Size::new(220.0, 100.0);

/// Initial size of an uploaded signature (layout pixels)
pub const UPLOAD_DEFAULT_SIZE: Size = Size::new(200.0, 100.0);

/// Where new overlays land, relative to the first page's origin
pub const DEFAULT_PLACEMENT: (f32, f32) = (100.0, 100.0);

/// Delay before a freshly placed overlay is revealed (milliseconds)
pub const REVEAL_SETTLE_MS: u64 = 50;

/// Smallest overlay edge a resize may produce (layout pixels)
pub const MIN_OVERLAY_SIZE: f32 = 16.0;

/// Degrees added by one rotate action
pub const ROTATE_STEP_DEGREES: f32 = 15.0;

// =============================================================================
// Auto-scroll
// =============================================================================

/// Fraction of the viewport height, at each edge, that triggers auto-scroll
pub const HOT_ZONE_FRACTION: f32 = 0.10;

/// Scroll speed at the very edge of the viewport (layout pixels per frame)
pub const MAX_SCROLL_SPEED: f32 = 18.0;

// =============================================================================
// Capture Surfaces
// =============================================================================

/// Typed signature canvas (pixels)
pub const TYPED_CANVAS: (u32, u32) = (400, 120);

/// Typed signature font size (pixels)
pub const TYPED_FONT_PX: f32 = 70.0;

/// Left padding of typed text on its canvas (pixels)
pub const TYPED_PADDING_PX: f32 = 10.0;

/// Drawing pad surface (pixels)
pub const DRAW_PAD_SIZE: (u32, u32) = (500, 200);

/// Ink stroke width on the drawing pad (pixels)
pub const DRAW_STROKE_WIDTH: f32 = 3.0;

// =============================================================================
// Page Layout
// =============================================================================

/// Width pages are rasterised to for the signing surface (pixels)
pub const DEFAULT_RENDER_WIDTH: u32 = 800;

/// Vertical gap between stacked pages (layout pixels)
pub const PAGE_GAP: f32 = 16.0;

/// Padding above the first page (layout pixels)
pub const LAYOUT_TOP_PADDING: f32 = 16.0;
