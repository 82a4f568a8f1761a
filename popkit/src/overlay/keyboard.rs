//! Orientation and keyboard observation for attached overlays.

use std::rc::Weak;

use super::{Overlay, OverlayInner};
use crate::animation::Stage;
use crate::layout::{Point, Rect};
use crate::notify::{KeyboardInfo, Notification, NotificationKind};
use crate::tree::Pose;
use crate::ui::Ui;

/// Adapt an overlay method into a notification handler that holds the
/// overlay weakly.
fn observer(
    weak: Weak<OverlayInner>,
    handle: impl Fn(&Overlay, &Ui, &Notification) + 'static,
) -> impl Fn(&Ui, &Notification) + 'static {
    move |ui, notification| {
        if let Some(overlay) = Overlay::upgrade(&weak) {
            handle(&overlay, ui, notification);
        }
    }
}

impl Overlay {
    /// Start observing system notifications. Subscriptions are dropped when
    /// dismissal finishes.
    pub(super) fn subscribe(&self, ui: &Ui) {
        let mut subscriptions = self.inner.subscriptions.borrow_mut();
        if !subscriptions.is_empty() {
            return;
        }
        let weak = self.downgrade();
        subscriptions.push(ui.subscribe(
            NotificationKind::OrientationDidChange,
            observer(weak.clone(), |overlay, ui, _| overlay.update_for_orientation(ui)),
        ));
        subscriptions.push(ui.subscribe(
            NotificationKind::KeyboardDidShow,
            observer(weak.clone(), |overlay, ui, notification| {
                if let Some(info) = notification.keyboard() {
                    overlay.keyboard_did_show(ui, info);
                }
            }),
        ));
        subscriptions.push(ui.subscribe(
            NotificationKind::KeyboardDidHide,
            observer(weak.clone(), |overlay, _, _| overlay.keyboard_did_hide()),
        ));

        if !self.config().handles_keyboard {
            return;
        }
        subscriptions.push(ui.subscribe(
            NotificationKind::KeyboardWillShow,
            observer(weak.clone(), |overlay, ui, notification| {
                if let Some(info) = notification.keyboard() {
                    overlay.avoid_keyboard(ui, info, true);
                }
            }),
        ));
        subscriptions.push(ui.subscribe(
            NotificationKind::KeyboardWillHide,
            observer(weak, |overlay, ui, notification| {
                if let Some(info) = notification.keyboard() {
                    overlay.avoid_keyboard(ui, info, false);
                }
            }),
        ));
    }

    /// Remember the keyboard frame, in overlay coordinates.
    fn keyboard_did_show(&self, ui: &Ui, info: &KeyboardInfo) {
        let rect = ui
            .tree()
            .convert_rect(info.end_frame, None, Some(self.view()))
            .unwrap_or(Rect::ZERO);
        self.inner.keyboard_rect.set(rect);
    }

    fn keyboard_did_hide(&self) {
        self.inner.keyboard_rect.set(Rect::ZERO);
    }

    /// Re-center the container, raised by half the keyboard height when
    /// the keyboard is coming up, using the keyboard's own timing.
    fn avoid_keyboard(&self, ui: &Ui, info: &KeyboardInfo, raise: bool) {
        let container = self.container();
        let frame = {
            let tree = ui.tree();
            let Some(parent) = tree.parent(container) else {
                return;
            };
            let Some(parent_bounds) = tree.bounds(parent) else {
                return;
            };
            let surface = tree
                .parent(parent)
                .and_then(|host| tree.bounds(host))
                .unwrap_or(parent_bounds);
            let Some(frame) = tree.frame(container) else {
                return;
            };
            let mut frame = frame.with_center(Point::new(
                parent_bounds.width / 2.0,
                surface.height / 2.0,
            ));
            if raise {
                frame.y -= info.end_frame.height / 2.0;
            }
            frame
        };
        log::debug!(
            "[overlay] {} keyboard {} -> {:?}",
            self.view(),
            if raise { "up" } else { "down" },
            frame
        );
        let stage = Stage::new(info.duration, info.curve, Pose::new().frame(frame));
        ui.animator().animate(ui, container, stage, None);
    }
}
