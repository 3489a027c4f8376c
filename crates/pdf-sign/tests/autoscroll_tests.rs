use pdf_sign::*;

fn viewport() -> Viewport {
    // 500px tall window onto 3000px of content; hot zones are 50px
    Viewport::new(0.0, 100.0, 500.0, 3000.0)
}

#[test]
fn test_speed_is_zero_outside_hot_zones() {
    let scroll = AutoScroll::new(0.10, 18.0);
    let vp = viewport();
    assert_eq!(scroll.speed_for(350.0, &vp), 0.0);
    assert_eq!(scroll.speed_for(150.0, &vp), 0.0);
    assert_eq!(scroll.speed_for(550.0, &vp), 0.0);
}

#[test]
fn test_speed_ramps_towards_edges() {
    let scroll = AutoScroll::new(0.10, 18.0);
    let vp = viewport();

    let shallow = scroll.speed_for(575.0, &vp);
    let deep = scroll.speed_for(599.0, &vp);
    assert!(shallow > 0.0);
    assert!(deep > shallow);
    assert!(deep <= 18.0);
    assert!((scroll.speed_for(600.0, &vp) - 18.0).abs() < 1e-4);

    let up = scroll.speed_for(110.0, &vp);
    assert!(up < 0.0);
    assert!((up + 14.4).abs() < 1e-3);
}

#[test]
fn test_pointer_past_edge_scrolls_at_max_speed() {
    let scroll = AutoScroll::new(0.10, 18.0);
    let vp = viewport();
    assert_eq!(scroll.speed_for(900.0, &vp), 18.0);
    assert_eq!(scroll.speed_for(0.0, &vp), -18.0);
}

#[test]
fn test_loop_runs_only_in_hot_zone() {
    let mut scroll = AutoScroll::new(0.10, 18.0);
    let mut vp = viewport();

    assert!(!scroll.update_pointer(300.0, &vp));
    assert!(!scroll.frame(&mut vp));
    assert_eq!(vp.scroll_offset, 0.0);

    assert!(scroll.update_pointer(595.0, &vp));
    assert!(scroll.frame(&mut vp));
    assert!(scroll.frame(&mut vp));
    assert!(vp.scroll_offset > 0.0);
}

#[test]
fn test_loop_stops_within_one_frame_of_leaving() {
    let mut scroll = AutoScroll::new(0.10, 18.0);
    let mut vp = viewport();

    scroll.update_pointer(595.0, &vp);
    assert!(scroll.frame(&mut vp));
    let offset = vp.scroll_offset;

    scroll.update_pointer(350.0, &vp);
    assert!(!scroll.is_running());
    assert!(!scroll.frame(&mut vp));
    assert_eq!(vp.scroll_offset, offset);
}

#[test]
fn test_loop_stops_at_content_end() {
    let mut scroll = AutoScroll::new(0.10, 18.0);
    let mut vp = viewport();
    vp.scroll_offset = vp.max_scroll();

    scroll.update_pointer(599.0, &vp);
    assert!(!scroll.frame(&mut vp));
    assert!(!scroll.is_running());
    assert_eq!(vp.scroll_offset, 2500.0);
}

#[test]
fn test_cancel() {
    let mut scroll = AutoScroll::new(0.10, 18.0);
    let mut vp = viewport();
    scroll.update_pointer(105.0, &vp);
    vp.scroll_offset = 200.0;
    scroll.cancel();
    assert!(!scroll.frame(&mut vp));
    assert_eq!(vp.scroll_offset, 200.0);
}

#[test]
fn test_viewport_maps_screen_to_content() {
    let mut vp = viewport();
    vp.scroll_by(40.0);
    assert_eq!(vp.to_content(Point::new(30.0, 150.0)), Point::new(30.0, 90.0));
    assert_eq!(vp.scroll_by(-100.0), -40.0);
    assert_eq!(vp.scroll_offset, 0.0);
}
