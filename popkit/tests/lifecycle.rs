mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{content, ms, overlay_with_recorder, setup, setup_recording, Recorder};
use popkit::{
    dimmed, DismissVariant, Error, HorizontalLayout, Layout, MaskVariant, NotificationKind,
    Overlay, OverlayConfig, Point, PresentRequest, PresentationState, Rect, ShowVariant,
    VerticalLayout, ViewKind, WindowLevel,
};

const FULL_CYCLE: [&str; 4] = [
    "will_start_showing",
    "did_finish_showing",
    "will_start_dismissing",
    "did_finish_dismissing",
];

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_new_overlay_is_idle_and_detached() {
    let (ui, _window) = setup();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);

    assert_eq!(overlay.state(), PresentationState::Idle);
    assert_eq!(ui.tree().parent(overlay.view()), None);
    assert_eq!(ui.tree().parent(overlay.content()), Some(overlay.container()));
    assert_eq!(
        ui.tree().frame(overlay.container()).unwrap().size(),
        ui.tree().frame(overlay.content()).unwrap().size()
    );
    assert!(recorder.events().is_empty());
    assert_eq!(overlay.config(), OverlayConfig::default());
}

#[test]
fn test_default_config() {
    let config = OverlayConfig::default();
    assert_eq!(config.show, ShowVariant::ShrinkIn);
    assert_eq!(config.dismiss, DismissVariant::ShrinkOut);
    assert_eq!(config.mask, MaskVariant::Dimmed(0.5));
    assert!(config.dismiss_on_backdrop_touch);
    assert!(!config.dismiss_on_content_touch);
    assert!(!config.handles_keyboard);
}

#[test]
fn test_new_rejects_unknown_content() {
    let (ui, _window) = setup();
    let content = content(&ui, 10.0, 10.0);
    ui.tree_mut().remove(content);
    assert_eq!(Overlay::new(&ui, content).unwrap_err(), Error::UnknownView(content));
}

#[test]
fn test_new_rejects_overlay_as_content() {
    let (ui, _window) = setup();
    let (first, _) = overlay_with_recorder(&ui, 10.0, 10.0);
    assert_eq!(
        Overlay::new(&ui, first.view()).unwrap_err(),
        Error::ContentIsOverlay(first.view())
    );
}

#[test]
fn test_new_rejects_window_as_content() {
    let (ui, window) = setup();
    let err = Overlay::new(&ui, window).unwrap_err();
    assert!(matches!(err, Error::WouldCycle { child, .. } if child == window));
    // Nothing half-built is left behind.
    assert_eq!(ui.tree().len(), 1);
}

#[test]
fn test_dropping_idle_overlay_removes_its_views() {
    let (ui, _window) = setup();
    let (overlay, _recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    let (view, content) = (overlay.view(), overlay.content());
    drop(overlay);

    assert!(!ui.tree().contains(view));
    assert!(ui.overlay(view).is_none());
    // Content belongs to the caller.
    assert!(ui.tree().contains(content));
    assert_eq!(ui.tree().parent(content), None);
}

// ============================================================================
// Present
// ============================================================================

#[test]
fn test_present_defers_work_to_next_tick() {
    let (ui, window) = setup();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);

    assert!(overlay.show());
    assert_eq!(overlay.state(), PresentationState::Presenting);
    assert_eq!(recorder.events(), vec!["will_start_showing"]);
    assert_eq!(ui.tree().parent(overlay.view()), None);

    ui.tick();
    assert_eq!(ui.tree().parent(overlay.view()), Some(window));

    ui.settle();
    assert_eq!(overlay.state(), PresentationState::Presented);
    assert_eq!(recorder.events(), vec!["will_start_showing", "did_finish_showing"]);
}

#[test]
fn test_centered_container_frame() {
    let (ui, _window) = setup();
    let (overlay, _recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.show();
    ui.settle();

    let tree = ui.tree();
    assert_eq!(
        tree.frame(overlay.container()),
        Some(Rect::new(100.0, 350.0, 200.0, 100.0))
    );
    assert_eq!(tree.frame(overlay.content()), Some(Rect::new(0.0, 0.0, 200.0, 100.0)));
    assert_eq!(tree.alpha(overlay.container()), Some(1.0));
    assert!(tree.transform(overlay.container()).unwrap().is_identity());
    assert_eq!(tree.frame(overlay.view()), Some(Rect::new(0.0, 0.0, 400.0, 800.0)));
}

#[test]
fn test_present_twice_runs_one_cycle() {
    let (ui, _window) = setup();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);

    assert!(overlay.show());
    assert!(!overlay.show());
    ui.settle();
    assert!(!overlay.show_with_layout(Layout::Centered));

    assert_eq!(recorder.count("will_start_showing"), 1);
    assert_eq!(recorder.count("did_finish_showing"), 1);
    assert_eq!(overlay.state(), PresentationState::Presented);
}

#[test]
fn test_present_while_dismissing_is_ignored() {
    let (ui, _window) = setup();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.show();
    ui.settle();
    overlay.dismiss(true);

    assert!(!overlay.show());
    ui.settle();
    assert_eq!(recorder.events(), FULL_CYCLE);
    assert_eq!(overlay.state(), PresentationState::Idle);
}

#[test]
fn test_present_without_window_aborts() {
    let ui = popkit::Ui::new(common::SCREEN);
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);

    assert!(overlay.show());
    ui.settle();
    assert_eq!(overlay.state(), PresentationState::Idle);
    assert_eq!(recorder.events(), vec!["will_start_showing"]);

    // Works once a window exists.
    ui.add_window(WindowLevel::Normal);
    assert!(overlay.show());
    ui.settle();
    assert!(overlay.is_presented());
}

#[test]
fn test_present_uses_topmost_normal_window() {
    let (ui, _first) = setup();
    let second = ui.add_window(WindowLevel::Normal);
    let _alert = ui.add_window(WindowLevel::Alert);
    let (overlay, _recorder) = overlay_with_recorder(&ui, 50.0, 50.0);
    overlay.show();
    ui.settle();
    assert_eq!(ui.tree().parent(overlay.view()), Some(second));
}

#[test]
fn test_present_in_host_view() {
    let (ui, window) = setup();
    let host = ui.tree_mut().add_view(Rect::new(20.0, 40.0, 200.0, 300.0));
    ui.tree_mut().add_child(window, host).unwrap();
    let (overlay, _recorder) = overlay_with_recorder(&ui, 100.0, 100.0);

    overlay.show_in(
        Layout::new(HorizontalLayout::Right, VerticalLayout::Top),
        host,
    );
    ui.settle();

    let tree = ui.tree();
    assert_eq!(tree.parent(overlay.view()), Some(host));
    assert_eq!(tree.frame(overlay.view()), Some(Rect::new(0.0, 0.0, 200.0, 300.0)));
    assert_eq!(
        tree.frame(overlay.container()),
        Some(Rect::new(100.0, 0.0, 100.0, 100.0))
    );
}

#[test]
fn test_present_at_screen_point() {
    let (ui, _window) = setup();
    let (overlay, _recorder) = overlay_with_recorder(&ui, 50.0, 50.0);
    overlay.show_at(Point::new(100.0, 100.0), None);
    ui.settle();
    assert_eq!(
        ui.tree().frame(overlay.container()),
        Some(Rect::new(75.0, 75.0, 50.0, 50.0))
    );
}

#[test]
fn test_present_at_point_in_other_view() {
    let (ui, window) = setup();
    let anchor = ui.tree_mut().add_view(Rect::new(100.0, 200.0, 50.0, 50.0));
    ui.tree_mut().add_child(window, anchor).unwrap();
    let (overlay, _recorder) = overlay_with_recorder(&ui, 40.0, 20.0);

    overlay.show_at(Point::new(25.0, 25.0), Some(anchor));
    ui.settle();

    // The overlay covers the anchor, so the container sits in anchor space.
    let tree = ui.tree();
    assert_eq!(tree.parent(overlay.view()), Some(anchor));
    let center = tree.frame(overlay.container()).unwrap().center();
    assert_eq!(center, Point::new(25.0, 25.0));
    assert_eq!(
        tree.to_screen(overlay.view(), center),
        Some(Point::new(125.0, 225.0))
    );
}

#[test]
fn test_present_at_point_with_removed_host_uses_window() {
    let (ui, _window, _animator) = setup_recording();
    ui.set_orientation(popkit::Orientation::LandscapeLeft);
    let stale = ui.tree_mut().add_view(Rect::new(10.0, 10.0, 50.0, 50.0));
    ui.tree_mut().remove(stale);
    let (overlay, _recorder) = overlay_with_recorder(&ui, 100.0, 40.0);

    overlay.show_at(Point::new(200.0, 100.0), Some(stale));
    ui.settle();

    // Rotated overlay in the fallback window: the point still lands where
    // the window (here: the screen) says it is.
    let tree = ui.tree();
    let center = tree
        .to_screen(overlay.container(), Point::new(50.0, 20.0))
        .unwrap();
    assert!((center.x - 200.0).abs() < 1e-9, "{:?}", center);
    assert!((center.y - 100.0).abs() < 1e-9, "{:?}", center);
}

#[test]
fn test_show_none_skips_animator() {
    let (ui, _window, animator) = setup_recording();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.set_config(OverlayConfig::new().show(ShowVariant::None));

    overlay.show();
    ui.tick();

    assert_eq!(overlay.state(), PresentationState::Presented);
    assert!(animator.stages_for(overlay.container()).is_empty());
    assert_eq!(animator.completions(), 0);
    assert_eq!(recorder.events(), vec!["will_start_showing", "did_finish_showing"]);
    assert_eq!(ui.tree().alpha(overlay.container()), Some(1.0));
}

#[test]
fn test_show_variant_runs_through_animator() {
    let (ui, _window, animator) = setup_recording();
    let (overlay, _recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.set_config(OverlayConfig::new().show(ShowVariant::GrowIn));
    overlay.show();
    ui.tick();

    let stages = animator.stages_for(overlay.container());
    assert_eq!(stages.len(), 1);
    assert_eq!(stages[0].duration(), ms(150));
    // Start pose was applied without animation first.
    let start = animator.instant_for(overlay.container());
    assert_eq!(start.last().unwrap().transform, Some(popkit::Transform::uniform(0.85)));
    assert_eq!(overlay.state(), PresentationState::Presenting);

    ui.tick();
    assert_eq!(overlay.state(), PresentationState::Presented);
}

#[test]
fn test_bounce_in_completes_once_after_spring() {
    let (ui, _window) = setup();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.set_config(OverlayConfig::new().show(ShowVariant::BounceInFromLeft));
    overlay.show();

    ui.advance(ms(300));
    assert_eq!(overlay.state(), PresentationState::Presenting);
    assert_eq!(recorder.count("did_finish_showing"), 0);

    ui.settle();
    assert_eq!(recorder.count("did_finish_showing"), 1);
    assert!(ui.now() >= ms(600));
    assert_eq!(
        ui.tree().frame(overlay.container()),
        Some(Rect::new(100.0, 350.0, 200.0, 100.0))
    );
}

// ============================================================================
// Dismiss
// ============================================================================

#[test]
fn test_dismiss_never_presented_is_noop() {
    let (ui, _window) = setup();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);

    assert!(!overlay.dismiss(true));
    assert!(!overlay.dismiss(false));
    ui.settle();
    assert!(recorder.events().is_empty());
    assert_eq!(overlay.state(), PresentationState::Idle);
}

#[test]
fn test_dismiss_while_presenting_is_ignored() {
    let (ui, _window) = setup();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.show();
    assert!(!overlay.dismiss(true));
    ui.settle();
    assert!(overlay.is_presented());
    assert_eq!(recorder.count("will_start_dismissing"), 0);
}

#[test]
fn test_full_cycle_order() {
    let (ui, _window) = setup();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.show();
    ui.settle();

    assert!(overlay.dismiss(true));
    assert!(!overlay.dismiss(true));
    assert_eq!(overlay.state(), PresentationState::Dismissing);
    ui.settle();

    assert_eq!(recorder.events(), FULL_CYCLE);
    assert_eq!(overlay.state(), PresentationState::Idle);
    assert_eq!(ui.tree().parent(overlay.view()), None);
    // Content stays pinned inside the container for the next cycle.
    assert_eq!(ui.tree().parent(overlay.content()), Some(overlay.container()));
}

#[test]
fn test_overlay_presents_again_after_dismissal() {
    let (ui, window) = setup();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    for _ in 0..2 {
        overlay.show();
        ui.settle();
        overlay.dismiss(true);
        ui.settle();
    }
    assert_eq!(recorder.count("did_finish_dismissing"), 2);

    overlay.show();
    ui.settle();
    assert_eq!(ui.tree().parent(overlay.view()), Some(window));
    assert_eq!(ui.tree().alpha(overlay.backdrop()), Some(1.0));
}

#[test]
fn test_unanimated_dismiss_finishes_on_next_tick() {
    let (ui, _window, animator) = setup_recording();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.show();
    ui.settle();
    animator.clear();

    overlay.dismiss(false);
    ui.tick();
    assert_eq!(overlay.state(), PresentationState::Idle);
    assert!(animator.animated().is_empty());
    assert_eq!(ui.tree().alpha(overlay.container()), Some(0.0));
    assert_eq!(ui.tree().alpha(overlay.backdrop()), Some(0.0));
    assert_eq!(recorder.count("did_finish_dismissing"), 1);
}

#[test]
fn test_dismiss_none_skips_animator() {
    let (ui, _window, animator) = setup_recording();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.set_config(
        OverlayConfig::new()
            .show(ShowVariant::None)
            .dismiss(DismissVariant::None),
    );
    overlay.show();
    ui.settle();

    overlay.dismiss(true);
    ui.tick();
    assert_eq!(overlay.state(), PresentationState::Idle);
    assert!(animator.animated().is_empty());
    assert_eq!(animator.completions(), 0);
    assert_eq!(recorder.events(), FULL_CYCLE);
}

#[test]
fn test_animated_dismiss_fades_backdrop() {
    let (ui, _window, animator) = setup_recording();
    let (overlay, _recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.show();
    ui.settle();
    animator.clear();

    overlay.dismiss(true);
    ui.tick();
    let fades = animator.stages_for(overlay.backdrop());
    assert_eq!(fades.len(), 1);
    assert_eq!(fades[0].duration(), ms(150));
    assert_eq!(fades[0].easing(), popkit::Easing::Linear);
}

#[test]
fn test_bounce_out_completes_once_after_both_phases() {
    let (ui, _window, animator) = setup_recording();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.set_config(OverlayConfig::new().dismiss(DismissVariant::BounceOut));
    overlay.show();
    ui.settle();
    animator.clear();

    overlay.dismiss(true);
    ui.tick();
    assert_eq!(animator.stages_for(overlay.container()).len(), 1);
    ui.tick();
    assert_eq!(animator.stages_for(overlay.container()).len(), 2);
    assert_eq!(overlay.state(), PresentationState::Dismissing);
    assert_eq!(recorder.count("did_finish_dismissing"), 0);

    ui.tick();
    assert_eq!(overlay.state(), PresentationState::Idle);
    ui.settle();
    assert_eq!(recorder.count("did_finish_dismissing"), 1);
}

#[test]
fn test_bounce_out_timing_on_timeline() {
    let (ui, _window) = setup();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.set_config(OverlayConfig::new().dismiss(DismissVariant::BounceOutToBottom));
    overlay.show();
    ui.settle();

    let started = ui.now();
    overlay.dismiss(true);
    ui.advance(ms(200));
    assert_eq!(overlay.state(), PresentationState::Dismissing);

    ui.settle();
    assert_eq!(recorder.count("did_finish_dismissing"), 1);
    assert!(ui.now() - started >= ms(390));
}

// ============================================================================
// Callbacks
// ============================================================================

#[test]
fn test_hooks_fire_after_delegate() {
    let (ui, _window) = setup();
    let (overlay, _recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    let log = Rc::new(RefCell::new(Vec::new()));

    let delegate = Rc::new(LoggingDelegate(log.clone()));
    overlay.set_delegate(&delegate);
    let hook_log = log.clone();
    overlay.on_will_start_showing(move |_| hook_log.borrow_mut().push("hook"));

    overlay.show();
    assert_eq!(*log.borrow(), vec!["delegate", "hook"]);
}

struct LoggingDelegate(Rc<RefCell<Vec<&'static str>>>);

impl popkit::OverlayDelegate for LoggingDelegate {
    fn will_start_showing(&self, _overlay: &Overlay) {
        self.0.borrow_mut().push("delegate");
    }
}

#[test]
fn test_delegate_is_held_weakly() {
    let (ui, _window) = setup();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    let weak = Rc::downgrade(&recorder);
    drop(recorder);
    assert!(weak.upgrade().is_none());

    overlay.show();
    ui.settle();
    assert!(overlay.is_presented());
}

#[test]
fn test_dismiss_from_did_finish_showing() {
    let (ui, _window) = setup();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.on_did_finish_showing(|overlay| {
        overlay.dismiss(false);
    });

    overlay.show_for(ms(1000));
    ui.settle();
    assert_eq!(overlay.state(), PresentationState::Idle);
    assert_eq!(recorder.events(), FULL_CYCLE);
    // No auto-dismiss was left behind.
    assert_eq!(ui.run_loop().pending_timers(), 0);
}

#[test]
fn test_present_again_from_did_finish_dismissing() {
    let (ui, _window) = setup();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    let shown_again = Rc::new(RefCell::new(false));
    let flag = shown_again.clone();
    overlay.on_did_finish_dismissing(move |overlay| {
        if !*flag.borrow() {
            *flag.borrow_mut() = overlay.show();
        }
    });

    overlay.show();
    ui.settle();
    overlay.dismiss(true);
    ui.settle();

    assert!(*shown_again.borrow());
    assert!(overlay.is_presented());
    assert_eq!(recorder.count("will_start_showing"), 2);
}

// ============================================================================
// Auto-dismiss
// ============================================================================

#[test]
fn test_auto_dismiss_fires() {
    let (ui, _window) = setup();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.show_for(ms(1000));
    ui.settle();
    assert!(overlay.pending_auto_dismiss().is_some());

    ui.advance(ms(900));
    assert!(overlay.is_presented());
    ui.advance(ms(200));
    ui.settle();

    assert_eq!(overlay.state(), PresentationState::Idle);
    assert_eq!(recorder.events(), FULL_CYCLE);
}

#[test]
fn test_manual_dismiss_cancels_auto_dismiss() {
    let (ui, _window) = setup();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.present(PresentRequest::new().auto_dismiss(ms(2000)));
    ui.settle();
    ui.advance(ms(500).saturating_sub(ui.now()));

    assert!(overlay.dismiss(true));
    assert!(overlay.pending_auto_dismiss().is_none());
    ui.settle();
    assert_eq!(ui.run_loop().pending_timers(), 0);

    ui.advance(ms(3000));
    assert_eq!(recorder.count("will_start_dismissing"), 1);
    assert_eq!(recorder.count("did_finish_dismissing"), 1);
    assert_eq!(overlay.state(), PresentationState::Idle);
}

#[test]
fn test_zero_duration_means_no_auto_dismiss() {
    let (ui, _window) = setup();
    let (overlay, _recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.show_for(ms(0));
    ui.settle();
    assert!(overlay.pending_auto_dismiss().is_none());
    ui.advance(ms(1000));
    assert!(overlay.is_presented());
}

#[test]
fn test_dismiss_all_cancels_auto_dismiss() {
    let (ui, _window) = setup();
    let (overlay, _recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.show_for(ms(1000));
    ui.settle();
    let task = overlay.pending_auto_dismiss().unwrap();

    Overlay::dismiss_all(&ui);
    assert!(task.is_cancelled());
    ui.settle();
    assert_eq!(ui.run_loop().pending_timers(), 0);
}

// ============================================================================
// Ownership
// ============================================================================

#[test]
fn test_attached_overlay_keeps_itself_alive() {
    let (ui, _window) = setup();
    let (overlay, _recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    let view = overlay.view();
    overlay.show();
    drop(overlay);
    ui.settle();

    let overlay = ui.overlay(view).expect("retained while attached");
    assert!(overlay.is_presented());
    drop(overlay);

    assert_eq!(Overlay::dismiss_all(&ui), 1);
    ui.settle();
    assert!(ui.overlay(view).is_none());
    assert!(!ui.tree().contains(view));
}

#[test]
fn test_presenting_from_hook_keeps_overlay_alive() {
    let (ui, _window) = setup();
    let (overlay, _recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    let view = overlay.view();
    let again = Rc::new(std::cell::Cell::new(true));
    let flag = again.clone();
    overlay.on_did_finish_dismissing(move |overlay| {
        if flag.replace(false) {
            overlay.show();
        }
    });
    overlay.show();
    ui.settle();
    drop(overlay);

    assert_eq!(Overlay::dismiss_all(&ui), 1);
    ui.settle();
    let overlay = ui.overlay(view).expect("retained by the second presentation");
    assert!(overlay.is_presented());
}

// ============================================================================
// Backdrop
// ============================================================================

#[test]
fn test_dimmed_backdrop() {
    let (ui, _window, animator) = setup_recording();
    let (overlay, _recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.set_config(OverlayConfig::new().mask(MaskVariant::Dimmed(0.3)));
    overlay.show();
    ui.settle();

    let tree = ui.tree();
    let backdrop = tree.get(overlay.backdrop()).unwrap();
    assert_eq!(backdrop.background(), dimmed(0.3));
    assert_eq!(backdrop.alpha(), 1.0);
    assert!(animator.stages_for(overlay.backdrop()).is_empty());
}

#[test]
fn test_unmasked_backdrop_fades_in() {
    let (ui, _window, animator) = setup_recording();
    let (overlay, _recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.set_config(OverlayConfig::new().mask(MaskVariant::None));
    overlay.show();
    ui.settle();

    let fades = animator.stages_for(overlay.backdrop());
    assert_eq!(fades.len(), 1);
    assert_eq!(fades[0].duration(), ms(150));
    assert_eq!(fades[0].pose.alpha, Some(1.0));
}

#[test]
fn test_clear_backdrop_stays_transparent() {
    let (ui, _window) = setup();
    let (overlay, _recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.set_config(OverlayConfig::new().mask(MaskVariant::Clear));
    overlay.show();
    ui.settle();
    assert_eq!(ui.tree().alpha(overlay.backdrop()), Some(0.0));
}

#[test]
fn test_blur_layer_lifecycle() {
    let (ui, _window) = setup();
    let (overlay, _recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.set_config(OverlayConfig::new().mask(MaskVariant::DarkBlur));
    overlay.show();
    ui.settle();

    let blur = overlay.blur_view().expect("blur installed");
    {
        let tree = ui.tree();
        assert_eq!(
            tree.get(blur).map(|v| v.kind),
            Some(ViewKind::Blur(popkit::BlurStyle::Dark))
        );
        assert_eq!(tree.parent(overlay.backdrop()), Some(blur));
        assert_eq!(
            tree.children(overlay.view()),
            vec![blur, overlay.container()]
        );
    }

    overlay.dismiss(true);
    ui.settle();
    assert!(overlay.blur_view().is_none());
    let tree = ui.tree();
    assert!(!tree.contains(blur));
    assert_eq!(
        tree.children(overlay.view()),
        vec![overlay.backdrop(), overlay.container()]
    );
}

// ============================================================================
// Subscriptions
// ============================================================================

#[test]
fn test_subscriptions_follow_attachment() {
    let (ui, _window) = setup();
    let (overlay, _recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.set_config(OverlayConfig::new().handles_keyboard(true));
    let notifications = ui.notifications();
    assert_eq!(notifications.observer_count(NotificationKind::OrientationDidChange), 0);

    overlay.show();
    ui.settle();
    assert_eq!(notifications.observer_count(NotificationKind::OrientationDidChange), 1);
    assert_eq!(notifications.observer_count(NotificationKind::KeyboardDidShow), 1);
    assert_eq!(notifications.observer_count(NotificationKind::KeyboardWillShow), 1);

    overlay.dismiss(false);
    ui.settle();
    for kind in [
        NotificationKind::OrientationDidChange,
        NotificationKind::KeyboardWillShow,
        NotificationKind::KeyboardDidShow,
        NotificationKind::KeyboardWillHide,
        NotificationKind::KeyboardDidHide,
    ] {
        assert_eq!(notifications.observer_count(kind), 0, "{:?}", kind);
    }
}

#[test]
fn test_keyboard_avoidance_is_opt_in() {
    let (ui, _window) = setup();
    let (overlay, _recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.show();
    ui.settle();
    assert_eq!(
        ui.notifications()
            .observer_count(NotificationKind::KeyboardWillShow),
        0
    );
}

// ============================================================================
// Bulk Dismissal
// ============================================================================

#[test]
fn test_dismiss_all_nested_overlays() {
    let (ui, _window, animator) = setup_recording();

    let (outer, outer_rec) = overlay_with_recorder(&ui, 300.0, 300.0);
    outer.show();
    ui.settle();

    let (middle, middle_rec) = overlay_with_recorder(&ui, 200.0, 200.0);
    middle.show_in(Layout::Centered, outer.content());
    ui.settle();

    let (inner, inner_rec) = overlay_with_recorder(&ui, 100.0, 100.0);
    inner.show_in(Layout::Centered, middle.content());
    ui.settle();

    assert!(outer.is_presented() && middle.is_presented() && inner.is_presented());
    assert_eq!(ui.tree().parent(inner.view()), Some(middle.content()));
    animator.clear();

    assert_eq!(Overlay::dismiss_all(&ui), 3);
    ui.settle();

    for recorder in [&outer_rec, &middle_rec, &inner_rec] {
        assert_eq!(recorder.events(), FULL_CYCLE);
    }
    for overlay in [&outer, &middle, &inner] {
        assert_eq!(overlay.state(), PresentationState::Idle);
    }
    // Unanimated.
    assert!(animator.animated().is_empty());

    assert_eq!(Overlay::dismiss_all(&ui), 0);
}

#[test]
fn test_dismiss_all_ignores_overlays_mid_transition() {
    let (ui, _window) = setup();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    overlay.show();
    ui.tick();
    assert_eq!(Overlay::dismiss_all(&ui), 0);
    ui.settle();
    assert!(overlay.is_presented());
    assert_eq!(recorder.count("will_start_dismissing"), 0);
}

#[test]
fn test_dismiss_presenting_finds_enclosing_overlay() {
    let (ui, _window) = setup();
    let (overlay, recorder) = overlay_with_recorder(&ui, 200.0, 100.0);
    let button = ui.tree_mut().add_view(Rect::new(10.0, 10.0, 20.0, 20.0));
    ui.tree_mut().add_child(overlay.content(), button).unwrap();
    overlay.show();
    ui.settle();

    assert!(Overlay::dismiss_presenting(&ui, button));
    ui.settle();
    assert_eq!(recorder.events(), FULL_CYCLE);

    assert!(!Overlay::dismiss_presenting(&ui, button));
}

#[test]
fn test_recorder_counts_per_overlay() {
    let (ui, _window) = setup();
    let (a, a_rec) = overlay_with_recorder(&ui, 10.0, 10.0);
    let b = Overlay::new(&ui, content(&ui, 10.0, 10.0)).unwrap();
    let b_rec = Recorder::new();
    b.set_delegate(&b_rec);
    a.show();
    ui.settle();
    assert_eq!(a_rec.count("did_finish_showing"), 1);
    assert!(b_rec.events().is_empty());
}
