use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignError {
    #[error("Failed to decode document: {0}")]
    Decode(String),
    #[error("Nothing to capture: {0}")]
    EmptyInput(&'static str),
    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),
    #[error("Failed to encode signature image: {0}")]
    Encode(String),
    #[error("No usable font found for typed signature (tried: {0})")]
    FontUnavailable(String),
    #[error("Page geometry unavailable for {overlay} on page {}", page + 1)]
    GeometryUnavailable { overlay: OverlayId, page: usize },
    #[error("Failed to embed {overlay}: {reason}")]
    Embed { overlay: OverlayId, reason: String },
    #[error("Unknown overlay: {0}")]
    UnknownOverlay(OverlayId),
    #[error("Unknown signature: {0}")]
    UnknownSignature(SignatureId),
    #[error("Document is not ready for geometry queries")]
    NotReady,
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, SignError>;

/// Identifier of a captured signature within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignatureId(pub u64);

impl fmt::Display for SignatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "signature #{}", self.0)
    }
}

/// Identifier of a placed overlay within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub u64);

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay #{}", self.0)
    }
}

/// A point in layout pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A size in layout pixels
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in layout pixels, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right() && p.y >= self.top && p.y < self.bottom()
    }
}

/// How a signature was captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignatureSource {
    Draw,
    Type,
    Upload,
}

/// Raster encodings a signature image may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Png,
    Jpeg,
}

/// A captured signature image. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub id: SignatureId,
    pub source: SignatureSource,
    pub image: Vec<u8>,
    pub format: RasterFormat,
    pub intrinsic_width: u32,
    pub intrinsic_height: u32,
}

/// Visibility state of a freshly placed overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    /// Placed but not yet shown, waiting for the surface to settle
    PendingReveal,
    Visible,
}

/// A signature instance placed on a page.
///
/// `x` and `y` are layout pixels relative to the page's outer layout box.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub id: OverlayId,
    pub signature: SignatureId,
    pub page_index: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation_degrees: f32,
    pub state: OverlayState,
}

impl Overlay {
    /// Geometry of this overlay, detached from its identity
    pub fn rect(&self) -> OverlayRect {
        OverlayRect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            rotation_degrees: self.rotation_degrees,
        }
    }
}

/// Page-relative overlay geometry in layout pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation_degrees: f32,
}

/// Wrap an angle in degrees into `[0, 360)`
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
