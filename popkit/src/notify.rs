//! System notifications (orientation, keyboard) with scoped subscriptions.
//!
//! Subscribing returns a [`Subscription`]; dropping it unsubscribes.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::layout::Rect;
use crate::transitions::Easing;
use crate::types::Orientation;
use crate::ui::Ui;

/// Keyboard animation payload. `end_frame` is in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyboardInfo {
    pub duration: Duration,
    pub curve: Easing,
    pub end_frame: Rect,
}

impl KeyboardInfo {
    pub fn new(duration: Duration, curve: Easing, end_frame: Rect) -> Self {
        Self {
            duration,
            curve,
            end_frame,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    OrientationDidChange(Orientation),
    KeyboardWillShow(KeyboardInfo),
    KeyboardDidShow(KeyboardInfo),
    KeyboardWillHide(KeyboardInfo),
    KeyboardDidHide(KeyboardInfo),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    OrientationDidChange,
    KeyboardWillShow,
    KeyboardDidShow,
    KeyboardWillHide,
    KeyboardDidHide,
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Notification::OrientationDidChange(_) => NotificationKind::OrientationDidChange,
            Notification::KeyboardWillShow(_) => NotificationKind::KeyboardWillShow,
            Notification::KeyboardDidShow(_) => NotificationKind::KeyboardDidShow,
            Notification::KeyboardWillHide(_) => NotificationKind::KeyboardWillHide,
            Notification::KeyboardDidHide(_) => NotificationKind::KeyboardDidHide,
        }
    }

    pub fn keyboard(&self) -> Option<&KeyboardInfo> {
        match self {
            Notification::KeyboardWillShow(info)
            | Notification::KeyboardDidShow(info)
            | Notification::KeyboardWillHide(info)
            | Notification::KeyboardDidHide(info) => Some(info),
            Notification::OrientationDidChange(_) => None,
        }
    }
}

type Handler = Rc<dyn Fn(&Ui, &Notification)>;

struct Observer {
    id: u64,
    kind: NotificationKind,
    handler: Handler,
}

type Observers = Rc<RefCell<Vec<Observer>>>;

#[derive(Default)]
pub struct NotificationCenter {
    observers: Observers,
    next_id: Cell<u64>,
}

impl fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("observers", &self.observers.borrow().len())
            .finish()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one kind of notification.
    pub fn subscribe(
        &self,
        kind: NotificationKind,
        handler: impl Fn(&Ui, &Notification) + 'static,
    ) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.observers.borrow_mut().push(Observer {
            id,
            kind,
            handler: Rc::new(handler),
        });
        Subscription {
            id,
            observers: Rc::downgrade(&self.observers),
        }
    }

    pub fn observer_count(&self, kind: NotificationKind) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|o| o.kind == kind)
            .count()
    }

    /// Deliver to every current observer of the notification's kind.
    /// Observers added or removed by a handler take effect on the next post.
    pub(crate) fn post(&self, ui: &Ui, notification: &Notification) {
        let kind = notification.kind();
        let handlers: Vec<Handler> = self
            .observers
            .borrow()
            .iter()
            .filter(|o| o.kind == kind)
            .map(|o| Rc::clone(&o.handler))
            .collect();
        log::debug!("[notify] {:?} -> {} observer(s)", kind, handlers.len());
        for handler in handlers {
            handler(ui, notification);
        }
    }
}

/// Live registration with a [`NotificationCenter`]. Unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    observers: Weak<RefCell<Vec<Observer>>>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(observers) = self.observers.upgrade() else {
            return;
        };
        match observers.try_borrow_mut() {
            Ok(mut observers) => observers.retain(|o| o.id != self.id),
            Err(_) => log::warn!("[notify] observer list busy, subscription {} leaked", self.id),
        };
    }
}
