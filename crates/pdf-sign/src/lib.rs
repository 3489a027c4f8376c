pub mod autoscroll;
pub mod capture;
pub mod compose;
mod config;
pub mod constants;
mod document;
pub mod geometry;
pub mod interaction;
mod overlay;
mod render;
mod session;
pub mod transform;
mod types;

pub use autoscroll::{AutoScroll, Viewport};
pub use capture::{CapturedImage, DrawPad, capture_drawing, capture_typed, capture_upload};
pub use compose::{CommitRequest, compose, sign_to_bytes, sign_to_file, signed_file_name};
pub use config::*;
pub use document::{NativePageSize, SourceDocument};
pub use geometry::{LayoutSnapshot, PageGeometry, PageGeometryProvider, PageLayout};
pub use interaction::ResizeHandle;
pub use overlay::{OverlayPatch, OverlayStore};
pub use render::{RenderGate, RenderStatus, RenderTicket};
pub use session::SigningSession;
pub use transform::{NativePlacement, to_layout, to_native};
pub use types::*;
