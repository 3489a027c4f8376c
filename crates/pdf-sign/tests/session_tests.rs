use pdf_sign::geometry::bitmap_size_for_width;
use pdf_sign::*;
use std::io::Cursor;
use std::time::{Duration, Instant};

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([20, 20, 20, 255]));
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

/// Two letter pages rendered 800px wide: page 0 spans y 16..1051, page 1
/// spans y 1067..2102
fn two_page_snapshot() -> LayoutSnapshot {
    let native = NativePageSize::default();
    let bitmap = bitmap_size_for_width(&native, 800);
    PageLayout::new(800.0, &LayoutOptions::default()).arrange(&[(native, bitmap), (native, bitmap)])
}

fn placed_upload(session: &mut SigningSession, snapshot: &LayoutSnapshot) -> OverlayId {
    let captured = capture_upload(png_bytes(40, 20)).unwrap();
    session
        .add_signature(captured, snapshot, Instant::now())
        .unwrap()
}

#[test]
fn test_place_uses_defaults() {
    let snapshot = two_page_snapshot();
    let mut session = SigningSession::default();
    let id = placed_upload(&mut session, &snapshot);

    let overlay = session.overlays().get(id).unwrap();
    assert_eq!(overlay.page_index, 0);
    assert_eq!((overlay.x, overlay.y), (100.0, 100.0));
    assert_eq!((overlay.width, overlay.height), (200.0, 100.0));
    assert_eq!(overlay.rotation_degrees, 0.0);
    assert_eq!(overlay.state, OverlayState::PendingReveal);
    assert_eq!(session.active(), Some(id));
}

#[test]
fn test_place_before_render_is_not_ready() {
    let mut session = SigningSession::default();
    let captured = capture_upload(png_bytes(4, 4)).unwrap();
    let signature = session.register(captured);

    let result = session.place(signature, &LayoutSnapshot::default(), Instant::now());
    assert!(matches!(result, Err(SignError::NotReady)));
    assert!(session.overlays().is_empty());
}

#[test]
fn test_place_unknown_signature() {
    let mut session = SigningSession::default();
    let result = session.place(SignatureId(42), &two_page_snapshot(), Instant::now());
    assert!(matches!(result, Err(SignError::UnknownSignature(SignatureId(42)))));
}

#[test]
fn test_reveal_after_settle_delay() {
    let snapshot = two_page_snapshot();
    let mut session = SigningSession::default();
    let placed_at = Instant::now();
    let captured = capture_upload(png_bytes(4, 4)).unwrap();
    let id = session.add_signature(captured, &snapshot, placed_at).unwrap();

    assert!(session.tick(placed_at));
    assert_eq!(
        session.overlays().get(id).unwrap().state,
        OverlayState::PendingReveal
    );

    assert!(!session.tick(placed_at + Duration::from_millis(60)));
    assert_eq!(
        session.overlays().get(id).unwrap().state,
        OverlayState::Visible
    );
}

#[test]
fn test_rotate_wraps_at_full_turn() {
    let snapshot = two_page_snapshot();
    let mut session = SigningSession::default();
    let id = placed_upload(&mut session, &snapshot);

    assert_eq!(session.rotate(id).unwrap(), 15.0);
    for _ in 1..24 {
        session.rotate(id).unwrap();
    }
    assert_eq!(session.overlays().get(id).unwrap().rotation_degrees, 0.0);

    // 25 steps in total
    assert_eq!(session.rotate(id).unwrap(), 15.0);
}

#[test]
fn test_rotate_unknown_overlay() {
    let mut session = SigningSession::default();
    assert!(matches!(
        session.rotate(OverlayId(7)),
        Err(SignError::UnknownOverlay(OverlayId(7)))
    ));
    assert_eq!(session.rotate_active(), None);
}

#[test]
fn test_drag_across_page_boundary_reparents() {
    let snapshot = two_page_snapshot();
    let mut session = SigningSession::default();
    let id = placed_upload(&mut session, &snapshot);
    // Tall enough that the pointer never enters a hot zone
    let viewport = Viewport::new(0.0, 0.0, 2200.0, snapshot.content_height());

    // Grab the overlay 10px in from its top-left corner
    session
        .begin_drag(id, Point::new(110.0, 126.0), &viewport, &snapshot)
        .unwrap();
    assert!(session.is_dragging());

    // Top-left at content y 1100, centre at 1150: inside page 1
    session
        .drag_to(Point::new(110.0, 1110.0), &viewport, &snapshot)
        .unwrap();
    session.end_gesture();

    let overlay = session.overlays().get(id).unwrap();
    assert_eq!(overlay.page_index, 1);
    assert_eq!(overlay.x, 100.0);
    assert_eq!(overlay.y, 33.0);
    assert!(!session.is_dragging());
}

#[test]
fn test_drag_stays_on_page_while_centre_is_inside() {
    let snapshot = two_page_snapshot();
    let mut session = SigningSession::default();
    let id = placed_upload(&mut session, &snapshot);
    let viewport = Viewport::new(0.0, 0.0, 2200.0, snapshot.content_height());

    session
        .begin_drag(id, Point::new(110.0, 126.0), &viewport, &snapshot)
        .unwrap();
    // Centre at content y 1000, bottom edge hanging past page 0
    session
        .drag_to(Point::new(310.0, 960.0), &viewport, &snapshot)
        .unwrap();

    let overlay = session.overlays().get(id).unwrap();
    assert_eq!(overlay.page_index, 0);
    assert_eq!(overlay.x, 300.0);
    assert_eq!(overlay.y, 934.0);
}

#[test]
fn test_drag_past_last_page_snaps_to_last_page() {
    let snapshot = two_page_snapshot();
    let mut session = SigningSession::default();
    let id = placed_upload(&mut session, &snapshot);
    let viewport = Viewport::new(0.0, 0.0, 4000.0, snapshot.content_height());

    session
        .begin_drag(id, Point::new(110.0, 126.0), &viewport, &snapshot)
        .unwrap();
    session
        .drag_to(Point::new(110.0, 2600.0), &viewport, &snapshot)
        .unwrap();

    assert_eq!(session.overlays().get(id).unwrap().page_index, 1);
}

#[test]
fn test_resize_keeps_opposite_corner() {
    let snapshot = two_page_snapshot();
    let mut session = SigningSession::default();
    let id = placed_upload(&mut session, &snapshot);
    let viewport = Viewport::new(0.0, 0.0, 2200.0, snapshot.content_height());

    session
        .begin_resize(id, ResizeHandle::BottomRight, Point::new(300.0, 216.0))
        .unwrap();
    session
        .resize_to(Point::new(350.0, 266.0), &viewport, &snapshot)
        .unwrap();
    session.end_gesture();

    let overlay = session.overlays().get(id).unwrap();
    assert_eq!((overlay.x, overlay.y), (100.0, 100.0));
    assert_eq!((overlay.width, overlay.height), (250.0, 150.0));

    // Dragging the top-left handle past the anchor stops at the minimum size
    session
        .begin_resize(id, ResizeHandle::TopLeft, Point::new(100.0, 116.0))
        .unwrap();
    session
        .resize_to(Point::new(900.0, 900.0), &viewport, &snapshot)
        .unwrap();

    let overlay = session.overlays().get(id).unwrap();
    assert_eq!(overlay.width, 16.0);
    assert_eq!(overlay.height, 16.0);
    assert_eq!(overlay.x + overlay.width, 350.0);
    assert_eq!(overlay.y + overlay.height, 250.0);
}

#[test]
fn test_pointer_down_selects_and_deselects() {
    let snapshot = two_page_snapshot();
    let mut session = SigningSession::default();
    let first = placed_upload(&mut session, &snapshot);
    let second = placed_upload(&mut session, &snapshot);
    assert_eq!(session.active(), Some(second));

    // Both overlays overlap; the most recent one is on top
    assert_eq!(
        session.pointer_down(Point::new(150.0, 150.0), &snapshot),
        Some(second)
    );

    session.select(Some(first));
    assert_eq!(session.active(), Some(first));

    assert_eq!(session.pointer_down(Point::new(700.0, 900.0), &snapshot), None);
    assert_eq!(session.active(), None);
}

#[test]
fn test_remove_and_clear() {
    let snapshot = two_page_snapshot();
    let mut session = SigningSession::default();
    let first = placed_upload(&mut session, &snapshot);
    let second = placed_upload(&mut session, &snapshot);

    let removed = session.remove_active().unwrap();
    assert_eq!(removed.id, second);
    assert_eq!(session.active(), None);
    assert_eq!(session.overlays().len(), 1);
    assert!(session.overlays().get(first).is_some());

    placed_upload(&mut session, &snapshot);
    session.clear();
    assert!(session.overlays().is_empty());
    assert_eq!(session.active(), None);
    // Signatures survive a clear and can be placed again
    assert_eq!(session.signatures().len(), 3);

    session.close();
    assert!(session.signatures().is_empty());
}

#[test]
fn test_drag_near_bottom_edge_scrolls_content() {
    let snapshot = two_page_snapshot();
    let mut session = SigningSession::default();
    let id = placed_upload(&mut session, &snapshot);
    let mut viewport = Viewport::new(0.0, 0.0, 600.0, snapshot.content_height());

    session
        .begin_drag(id, Point::new(110.0, 126.0), &viewport, &snapshot)
        .unwrap();
    // 10px from the bottom of a 600px viewport with a 60px hot zone
    session
        .drag_to(Point::new(110.0, 590.0), &viewport, &snapshot)
        .unwrap();
    assert!(session.is_autoscrolling());
    let before = session.overlays().get(id).unwrap().y;

    assert!(session.autoscroll_frame(&mut viewport, &snapshot));
    assert!((viewport.scroll_offset - 15.0).abs() < 1e-4);
    let after = session.overlays().get(id).unwrap().y;
    assert!((after - before - 15.0).abs() < 1e-3);

    // Leaving the hot zone stops the loop on the next frame
    session
        .drag_to(Point::new(110.0, 300.0), &viewport, &snapshot)
        .unwrap();
    assert!(!session.autoscroll_frame(&mut viewport, &snapshot));
    assert!((viewport.scroll_offset - 15.0).abs() < 1e-4);
}

#[test]
fn test_end_gesture_stops_autoscroll() {
    let snapshot = two_page_snapshot();
    let mut session = SigningSession::default();
    let id = placed_upload(&mut session, &snapshot);
    let mut viewport = Viewport::new(0.0, 0.0, 600.0, snapshot.content_height());

    session
        .begin_drag(id, Point::new(110.0, 126.0), &viewport, &snapshot)
        .unwrap();
    session
        .drag_to(Point::new(110.0, 599.0), &viewport, &snapshot)
        .unwrap();
    assert!(session.is_autoscrolling());

    session.end_gesture();
    assert!(!session.is_autoscrolling());
    assert!(!session.autoscroll_frame(&mut viewport, &snapshot));
    assert_eq!(viewport.scroll_offset, 0.0);
}

#[test]
fn test_rotated_overlay_is_selected_by_its_drawn_shape() {
    let snapshot = two_page_snapshot();
    let mut session = SigningSession::default();
    let id = placed_upload(&mut session, &snapshot);
    // Content box is x 100..300, y 116..216 with centre (200, 166)
    for _ in 0..6 {
        session.rotate(id).unwrap();
    }

    // Inside the unrotated box but outside the quarter-turned one
    assert_eq!(session.pointer_down(Point::new(110.0, 166.0), &snapshot), None);
    assert_eq!(session.active(), None);

    // Outside the unrotated box but inside the quarter-turned one
    assert_eq!(
        session.pointer_down(Point::new(200.0, 80.0), &snapshot),
        Some(id)
    );
    assert_eq!(session.active(), Some(id));
}
