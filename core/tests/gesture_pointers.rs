use squzzle_core::gesture::{Activity, GestureController, GestureEffect, PointerId};
use squzzle_core::registry::ClusterId;
use squzzle_core::viewport::{Viewport, ZoomLimits};

fn view() -> Viewport {
    Viewport::new(800.0, 600.0, ZoomLimits::default())
}

fn assert_close(actual: (f32, f32), expected: (f32, f32)) {
    assert!(
        (actual.0 - expected.0).abs() < 1e-3 && (actual.1 - expected.1).abs() < 1e-3,
        "{actual:?} != {expected:?}"
    );
}

#[test]
fn two_touches_drag_independently() {
    let view = view();
    let mut gestures = GestureController::new();
    let a = PointerId(1);
    let b = PointerId(2);

    let picked = gestures.press_piece(a, (10.0, 10.0), ClusterId(0), (0.0, 0.0), &view);
    assert_eq!(picked, vec![GestureEffect::PickedUp { pointer: a, cluster: ClusterId(0) }]);
    gestures.press_piece(b, (300.0, 300.0), ClusterId(3), (250.0, 260.0), &view);

    assert_eq!(
        gestures.pointer_move(a, (30.0, 40.0), &view),
        vec![GestureEffect::Moved { cluster: ClusterId(0), translate: (20.0, 30.0) }]
    );
    assert_eq!(
        gestures.pointer_move(b, (400.0, 400.0), &view),
        vec![GestureEffect::Moved { cluster: ClusterId(3), translate: (350.0, 360.0) }]
    );

    assert_eq!(
        gestures.release(a, &view),
        vec![GestureEffect::Dropped { pointer: a, cluster: ClusterId(0) }]
    );
    assert_eq!(
        gestures.activity(b),
        Some(&Activity::Dragging { cluster: ClusterId(3), offset: (50.0, 40.0) })
    );
    assert!(gestures.is_held(ClusterId(3)));
    assert!(!gestures.is_held(ClusterId(0)));
    assert_eq!(
        gestures.pointer_move(b, (310.0, 300.0), &view),
        vec![GestureEffect::Moved { cluster: ClusterId(3), translate: (260.0, 260.0) }]
    );
}

#[test]
fn a_held_cluster_cannot_be_grabbed_by_another_pointer() {
    let view = view();
    let mut gestures = GestureController::new();
    gestures.press_piece(PointerId(1), (0.0, 0.0), ClusterId(5), (0.0, 0.0), &view);
    let effects = gestures.press_piece(PointerId(2), (5.0, 5.0), ClusterId(5), (0.0, 0.0), &view);
    assert!(effects.is_empty());
    assert_eq!(gestures.activity(PointerId(2)), None);
    assert_eq!(gestures.holder(ClusterId(5)), Some(PointerId(1)));
}

#[test]
fn a_new_drag_on_the_same_pointer_drops_the_old_one_first() {
    let view = view();
    let mut gestures = GestureController::new();
    let mouse = PointerId::MOUSE;
    gestures.press_piece(mouse, (0.0, 0.0), ClusterId(1), (0.0, 0.0), &view);
    let effects = gestures.press_piece(mouse, (50.0, 50.0), ClusterId(2), (40.0, 40.0), &view);
    assert_eq!(
        effects,
        vec![
            GestureEffect::Dropped { pointer: mouse, cluster: ClusterId(1) },
            GestureEffect::PickedUp { pointer: mouse, cluster: ClusterId(2) },
        ]
    );
    assert_eq!(gestures.active_pointers(), 1);
}

#[test]
fn background_press_while_dragging_is_refused() {
    let view = view();
    let mut gestures = GestureController::new();
    let mouse = PointerId::MOUSE;
    gestures.press_piece(mouse, (0.0, 0.0), ClusterId(1), (0.0, 0.0), &view);
    assert!(gestures.press_background(mouse, (10.0, 10.0), &view).is_empty());
    assert!(matches!(gestures.activity(mouse), Some(Activity::Dragging { .. })));
}

#[test]
fn pan_scales_with_zoom() {
    let mut view = view();
    let mut gestures = GestureController::new();
    let mouse = PointerId::MOUSE;
    gestures.press_background(mouse, (100.0, 100.0), &view);
    assert_eq!(
        gestures.pointer_move(mouse, (130.0, 90.0), &view),
        vec![GestureEffect::Panned { pan: (-30.0, 10.0) }]
    );
    gestures.release(mouse, &view);

    assert!(view.set_zoom(2.0, false));
    assert_close(view.pan(), (-400.0, -300.0));
    gestures.press_background(mouse, (100.0, 100.0), &view);
    match gestures.pointer_move(mouse, (110.0, 100.0), &view).as_slice() {
        [GestureEffect::Panned { pan }] => assert_close(*pan, (-420.0, -300.0)),
        other => panic!("unexpected effects {other:?}"),
    }
}

#[test]
fn drag_offset_accounts_for_pan() {
    let mut view = view();
    view.pan_to(50.0, 20.0);
    let mut gestures = GestureController::new();
    let mouse = PointerId::MOUSE;
    // Model point under the cursor is (60, 40); cluster sits at (10, 10).
    gestures.press_piece(mouse, (10.0, 20.0), ClusterId(0), (10.0, 10.0), &view);
    match gestures.pointer_move(mouse, (20.0, 20.0), &view).as_slice() {
        [GestureEffect::Moved { translate, .. }] => assert_close(*translate, (20.0, 10.0)),
        other => panic!("unexpected effects {other:?}"),
    }
}

#[test]
fn two_panning_pointers_pinch_zoom() {
    let view = view();
    let mut gestures = GestureController::new();
    gestures.press_background(PointerId(1), (100.0, 100.0), &view);
    gestures.press_background(PointerId(2), (200.0, 100.0), &view);
    assert!(gestures.is_pinching());

    match gestures.pointer_move(PointerId(2), (300.0, 100.0), &view).as_slice() {
        [GestureEffect::Zoomed { level }] => assert!((level - 0.5).abs() < 1e-5),
        other => panic!("unexpected effects {other:?}"),
    }

    gestures.release(PointerId(2), &view);
    assert!(!gestures.is_pinching());
    // The remaining finger pans again, from where it is now.
    assert_eq!(
        gestures.pointer_move(PointerId(1), (100.0, 110.0), &view),
        vec![GestureEffect::Panned { pan: (0.0, -10.0) }]
    );
}

#[test]
fn unknown_pointers_are_ignored() {
    let view = view();
    let mut gestures = GestureController::new();
    assert!(gestures.pointer_move(PointerId(9), (1.0, 1.0), &view).is_empty());
    assert!(gestures.release(PointerId(9), &view).is_empty());
}

#[test]
fn zoom_is_clamped_and_frozen_during_drags() {
    let mut view = view();
    assert!(view.set_zoom(10.0, false));
    assert_eq!(view.zoom(), 4.0);
    assert!(!view.set_zoom(4.0, false));
    assert!(!view.set_zoom(1.0, true));
    assert_eq!(view.zoom(), 4.0);
    assert!(view.set_zoom(0.01, false));
    assert_eq!(view.zoom(), 0.1);
}

#[test]
fn zoom_keeps_the_viewport_centre_fixed() {
    let mut view = view();
    view.pan_to(30.0, -20.0);
    let centre = view.screen_to_model(400.0, 300.0);
    view.set_zoom(2.5, false);
    assert_close(view.screen_to_model(400.0, 300.0), centre);
    let rect = view.visible_rect();
    assert!((rect.width - 2000.0).abs() < 1e-3);
    assert!((rect.height - 1500.0).abs() < 1e-3);
}

#[test]
fn wheel_zoom_is_exponential() {
    let mut view = view();
    assert!(view.zoom_by_wheel(100.0, false));
    assert!((view.zoom() - (0.1f32).exp()).abs() < 1e-5);
    assert!(view.zoom_by_wheel(-100.0, false));
    assert!((view.zoom() - 1.0).abs() < 1e-5);
    assert!(!view.zoom_by_wheel(100.0, true));
}

#[test]
fn rebased_pans_continue_from_the_current_view() {
    let mut view = view();
    let mut gestures = GestureController::new();
    let mouse = PointerId::MOUSE;
    gestures.press_background(mouse, (100.0, 100.0), &view);
    gestures.pointer_move(mouse, (120.0, 100.0), &view);
    view.pan_to(-20.0, 0.0);
    assert!(view.set_zoom(2.0, false));
    gestures.rebase_pans(&view);

    let pan = view.pan();
    match gestures.pointer_move(mouse, (130.0, 100.0), &view).as_slice() {
        [GestureEffect::Panned { pan: next }] => assert_close(*next, (pan.0 - 20.0, pan.1)),
        other => panic!("unexpected effects {other:?}"),
    }
}
