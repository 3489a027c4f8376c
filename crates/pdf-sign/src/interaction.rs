//! Geometry of pointer gestures
//!
//! Pure helpers used by [`crate::SigningSession`]: hit-testing overlays,
//! re-targeting a dragged overlay to the page under its centre, and
//! anchored resizing. Everything here is in layout pixels.

use crate::geometry::{LayoutSnapshot, PageGeometryProvider};
use crate::overlay::OverlayStore;
use crate::types::*;

/// Handles on the overlay frame used for resizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::TopLeft,
        ResizeHandle::Top,
        ResizeHandle::TopRight,
        ResizeHandle::Right,
        ResizeHandle::BottomRight,
        ResizeHandle::Bottom,
        ResizeHandle::BottomLeft,
        ResizeHandle::Left,
    ];

    fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeHandle::TopLeft | ResizeHandle::Left | ResizeHandle::BottomLeft
        )
    }

    fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeHandle::TopRight | ResizeHandle::Right | ResizeHandle::BottomRight
        )
    }

    fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeHandle::TopLeft | ResizeHandle::Top | ResizeHandle::TopRight
        )
    }

    fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeHandle::BottomLeft | ResizeHandle::Bottom | ResizeHandle::BottomRight
        )
    }

    /// Where this handle sits on `rect`
    pub fn position(self, rect: &LayoutRect) -> Point {
        let x = if self.moves_left() {
            rect.left
        } else if self.moves_right() {
            rect.right()
        } else {
            rect.left + rect.width / 2.0
        };
        let y = if self.moves_top() {
            rect.top
        } else if self.moves_bottom() {
            rect.bottom()
        } else {
            rect.top + rect.height / 2.0
        };
        Point::new(x, y)
    }
}

/// An overlay's box in content space
pub fn overlay_content_rect(overlay: &Overlay, snapshot: &LayoutSnapshot) -> Option<LayoutRect> {
    let page = snapshot.page_geometry(overlay.page_index)?;
    let origin = page.to_content(Point::new(overlay.x, overlay.y));
    Some(LayoutRect::new(origin.x, origin.y, overlay.width, overlay.height))
}

/// Whether `at` falls on the overlay as drawn, i.e. inside `rect` turned
/// clockwise by `rotation_degrees` about its centre
fn contains_rotated(rect: &LayoutRect, rotation_degrees: f32, at: Point) -> bool {
    if rotation_degrees == 0.0 {
        return rect.contains(at);
    }
    let cx = rect.left + rect.width / 2.0;
    let cy = rect.top + rect.height / 2.0;
    let (sin, cos) = rotation_degrees.to_radians().sin_cos();
    let (dx, dy) = (at.x - cx, at.y - cy);
    // Undo the rotation to test against the upright box
    let local_x = cos * dx + sin * dy;
    let local_y = -sin * dx + cos * dy;
    local_x.abs() <= rect.width / 2.0 && local_y.abs() <= rect.height / 2.0
}

/// Topmost overlay drawn under a content-space point
pub fn hit_test(store: &OverlayStore, snapshot: &LayoutSnapshot, at: Point) -> Option<OverlayId> {
    store
        .list()
        .rev()
        .find(|overlay| {
            overlay_content_rect(overlay, snapshot)
                .is_some_and(|rect| contains_rotated(&rect, overlay.rotation_degrees, at))
        })
        .map(|overlay| overlay.id)
}

/// Page assignment of a dragged overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Retarget {
    pub page_index: usize,
    pub x: f32,
    pub y: f32,
}

/// Choose the page whose vertical span contains the box's vertical centre
/// (or the nearest page when the centre is between or beyond pages) and
/// express the box's top-left corner relative to that page.
pub fn retarget(snapshot: &LayoutSnapshot, top_left: Point, size: Size) -> Option<Retarget> {
    let center_y = top_left.y + size.height / 2.0;
    let page_index = snapshot.nearest_page(center_y)?;
    let page = snapshot.page_geometry(page_index)?;
    let local = page.to_page(top_left);
    Some(Retarget {
        page_index,
        x: local.x,
        y: local.y,
    })
}

/// Resize `rect` by moving `handle` to `pointer`, keeping the opposite
/// edges fixed. Both are in the same page-relative space.
pub fn resize_rect(
    rect: &LayoutRect,
    handle: ResizeHandle,
    pointer: Point,
    min_size: f32,
) -> LayoutRect {
    let mut left = rect.left;
    let mut right = rect.right();
    let mut top = rect.top;
    let mut bottom = rect.bottom();

    if handle.moves_left() {
        left = pointer.x.min(right - min_size);
    }
    if handle.moves_right() {
        right = pointer.x.max(left + min_size);
    }
    if handle.moves_top() {
        top = pointer.y.min(bottom - min_size);
    }
    if handle.moves_bottom() {
        bottom = pointer.y.max(top + min_size);
    }

    LayoutRect::new(left, top, right - left, bottom - top)
}
