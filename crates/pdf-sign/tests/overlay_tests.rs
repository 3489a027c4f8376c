use pdf_sign::*;
use std::time::{Duration, Instant};

fn store_with(count: usize, now: Instant) -> (OverlayStore, Vec<OverlayId>) {
    let mut store = OverlayStore::new();
    let ids = (0..count)
        .map(|i| {
            store.create(
                SignatureId(0),
                i,
                Point::new(10.0 * i as f32, 20.0),
                Size::new(150.0, 75.0),
                now,
            )
        })
        .collect();
    (store, ids)
}

#[test]
fn test_create_starts_pending_with_unique_ids() {
    let now = Instant::now();
    let (store, ids) = store_with(3, now);

    assert_eq!(store.len(), 3);
    assert_ne!(ids[0], ids[1]);
    assert_ne!(ids[1], ids[2]);
    for overlay in store.list() {
        assert_eq!(overlay.state, OverlayState::PendingReveal);
        assert_eq!(overlay.rotation_degrees, 0.0);
    }
    let pages: Vec<usize> = store.list().map(|o| o.page_index).collect();
    assert_eq!(pages, vec![0, 1, 2]);
}

#[test]
fn test_update_normalises_rotation() {
    let (mut store, ids) = store_with(1, Instant::now());

    let overlay = store.update(ids[0], OverlayPatch::rotation(375.0)).unwrap();
    assert_eq!(overlay.rotation_degrees, 15.0);

    let overlay = store.update(ids[0], OverlayPatch::rotation(-30.0)).unwrap();
    assert_eq!(overlay.rotation_degrees, 330.0);

    let overlay = store.update(ids[0], OverlayPatch::rotation(360.0)).unwrap();
    assert_eq!(overlay.rotation_degrees, 0.0);
}

#[test]
fn test_update_applies_only_given_fields() {
    let (mut store, ids) = store_with(1, Instant::now());

    let overlay = store
        .update(ids[0], OverlayPatch::position(2, 40.0, 60.0))
        .unwrap();
    assert_eq!(overlay.page_index, 2);
    assert_eq!((overlay.x, overlay.y), (40.0, 60.0));
    assert_eq!((overlay.width, overlay.height), (150.0, 75.0));
}

#[test]
fn test_update_unknown_overlay_fails() {
    let (mut store, ids) = store_with(1, Instant::now());
    store.remove(ids[0]);

    assert!(matches!(
        store.update(ids[0], OverlayPatch::rotation(15.0)),
        Err(SignError::UnknownOverlay(_))
    ));
}

#[test]
fn test_remove_active_deselects() {
    let (mut store, ids) = store_with(2, Instant::now());
    store.set_active(Some(ids[1]));
    assert_eq!(store.active(), Some(ids[1]));

    store.remove(ids[0]);
    assert_eq!(store.active(), Some(ids[1]));

    store.remove(ids[1]);
    assert_eq!(store.active(), None);
    assert!(store.is_empty());
}

#[test]
fn test_set_active_ignores_unknown_id() {
    let (mut store, ids) = store_with(1, Instant::now());
    store.set_active(Some(ids[0]));
    store.set_active(Some(OverlayId(99)));
    assert_eq!(store.active(), None);
}

#[test]
fn test_reveal_after_delay() {
    let now = Instant::now();
    let (mut store, _) = store_with(2, now);
    let delay = Duration::from_millis(50);

    assert_eq!(store.reveal_settled(now + Duration::from_millis(10), delay), 0);
    assert!(store.has_pending());

    assert_eq!(store.reveal_settled(now + delay, delay), 2);
    assert!(!store.has_pending());
    assert!(store.list().all(|o| o.state == OverlayState::Visible));
}

#[test]
fn test_clear_removes_everything() {
    let (mut store, ids) = store_with(3, Instant::now());
    store.set_active(Some(ids[2]));
    store.clear();
    assert!(store.is_empty());
    assert_eq!(store.active(), None);
}
