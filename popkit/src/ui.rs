//! The host context: view tree, run loop, animator and notifications.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::animation::{Animator, Timeline};
use crate::layout::{Point, Rect, Size};
use crate::notify::{Notification, NotificationCenter, NotificationKind, Subscription};
use crate::overlay::{Overlay, OverlayInner};
use crate::runtime::{RunLoop, TaskHandle, FRAME};
use crate::tree::{ViewId, ViewTree};
use crate::types::{Orientation, WindowLevel};

/// Frames [`Ui::settle`] runs before giving up.
const SETTLE_LIMIT: usize = 10_000;

/// Registry entry for an overlay. The strong reference is only held from
/// the start of a presentation until its dismissal finishes.
struct OverlayEntry {
    overlay: Weak<OverlayInner>,
    retained: Option<Rc<OverlayInner>>,
}

pub struct Ui {
    screen: Size,
    tree: RefCell<ViewTree>,
    run_loop: RunLoop,
    animator: Rc<dyn Animator>,
    notifications: NotificationCenter,
    orientation: Cell<Orientation>,
    overlays: RefCell<HashMap<ViewId, OverlayEntry>>,
}

impl fmt::Debug for Ui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ui")
            .field("screen", &self.screen)
            .field("now", &self.run_loop.now())
            .field("views", &self.tree.borrow().len())
            .field("orientation", &self.orientation.get())
            .field("overlays", &self.overlays.borrow().len())
            .finish()
    }
}

impl Ui {
    /// New context with a [`Timeline`] animator.
    pub fn new(screen: Size) -> Rc<Self> {
        Self::with_animator(screen, Rc::new(Timeline::new()))
    }

    pub fn with_animator(screen: Size, animator: Rc<dyn Animator>) -> Rc<Self> {
        Rc::new(Self {
            screen,
            tree: RefCell::new(ViewTree::new()),
            run_loop: RunLoop::new(),
            animator,
            notifications: NotificationCenter::new(),
            orientation: Cell::new(Orientation::Portrait),
            overlays: RefCell::new(HashMap::new()),
        })
    }

    pub fn screen(&self) -> Size {
        self.screen
    }

    pub fn tree(&self) -> Ref<'_, ViewTree> {
        self.tree.borrow()
    }

    pub fn tree_mut(&self) -> RefMut<'_, ViewTree> {
        self.tree.borrow_mut()
    }

    pub(crate) fn try_tree_mut(&self) -> Option<RefMut<'_, ViewTree>> {
        self.tree.try_borrow_mut().ok()
    }

    pub fn animator(&self) -> &dyn Animator {
        &*self.animator
    }

    pub fn run_loop(&self) -> &RunLoop {
        &self.run_loop
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    // ------------------------------------------------------------------
    // Windows
    // ------------------------------------------------------------------

    /// Add a full-screen window on top of the existing ones.
    pub fn add_window(&self, level: WindowLevel) -> ViewId {
        self.tree_mut()
            .add_window(level, Rect::from_size(self.screen))
    }

    /// Topmost visible window at normal level.
    pub fn topmost_window(&self) -> Option<ViewId> {
        self.tree().topmost_window()
    }

    // ------------------------------------------------------------------
    // Run loop
    // ------------------------------------------------------------------

    pub fn now(&self) -> Duration {
        self.run_loop.now()
    }

    /// Run `task` on the next tick.
    pub fn defer(&self, task: impl FnOnce(&Ui) + 'static) {
        self.run_loop.defer(Box::new(task));
    }

    /// Run `task` once `delay` has elapsed.
    pub fn schedule(&self, delay: Duration, task: impl FnOnce(&Ui) + 'static) -> TaskHandle {
        self.run_loop.schedule(delay, Box::new(task))
    }

    /// Run queued tasks, then due timers, then one animation step.
    pub fn tick(&self) {
        for task in self.run_loop.take_queue() {
            task(self);
        }
        for (cancelled, task) in self.run_loop.take_due() {
            if !cancelled.get() {
                task(self);
            }
        }
        self.animator.step(self, self.now());
    }

    /// Advance the clock by `by`, ticking once per frame.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        self.tick();
        while self.now() < target {
            let next = (self.now() + FRAME).min(target);
            self.run_loop.set_now(next);
            self.tick();
        }
    }

    /// Tick until no task is queued and nothing is animating. Pending
    /// timers are not waited for, but fire if they come due meanwhile.
    pub fn settle(&self) {
        for _ in 0..SETTLE_LIMIT {
            if !self.run_loop.has_queued() && !self.animator.is_animating() {
                return;
            }
            self.tick();
            if self.animator.is_animating() {
                self.run_loop.set_now(self.now() + FRAME);
            }
        }
        log::warn!("[run_loop] settle gave up after {} frames", SETTLE_LIMIT);
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    pub fn subscribe(
        &self,
        kind: NotificationKind,
        handler: impl Fn(&Ui, &Notification) + 'static,
    ) -> Subscription {
        self.notifications.subscribe(kind, handler)
    }

    /// Deliver a notification to its observers synchronously.
    pub fn post(&self, notification: Notification) {
        self.notifications.post(self, &notification);
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation.get()
    }

    /// Change the interface orientation and notify observers.
    pub fn set_orientation(&self, orientation: Orientation) {
        if self.orientation.replace(orientation) == orientation {
            return;
        }
        log::debug!("[ui] orientation -> {:?}", orientation);
        self.post(Notification::OrientationDidChange(orientation));
    }

    // ------------------------------------------------------------------
    // Overlay registry
    // ------------------------------------------------------------------

    pub(crate) fn register_overlay(&self, view: ViewId, overlay: Weak<OverlayInner>) {
        self.overlays.borrow_mut().insert(
            view,
            OverlayEntry {
                overlay,
                retained: None,
            },
        );
    }

    /// Keep the overlay alive until [`Ui::release_overlay`].
    pub(crate) fn retain_overlay(&self, view: ViewId) {
        let mut overlays = self.overlays.borrow_mut();
        if let Some(entry) = overlays.get_mut(&view) {
            if entry.retained.is_none() {
                entry.retained = entry.overlay.upgrade();
            }
        }
    }

    pub(crate) fn release_overlay(&self, view: ViewId) {
        let released = {
            let mut overlays = self.overlays.borrow_mut();
            overlays.get_mut(&view).and_then(|entry| entry.retained.take())
        };
        // May run the overlay's destructor, which touches the registry.
        drop(released);
    }

    pub(crate) fn unregister_overlay(&self, view: ViewId) {
        let removed = match self.overlays.try_borrow_mut() {
            Ok(mut overlays) => overlays.remove(&view),
            Err(_) => {
                log::warn!("[ui] overlay registry busy, {} left registered", view);
                None
            }
        };
        drop(removed);
    }

    /// The overlay rooted at `view`, if it is still alive.
    pub fn overlay(&self, view: ViewId) -> Option<Overlay> {
        self.overlays
            .borrow()
            .get(&view)
            .and_then(|entry| entry.overlay.upgrade())
            .map(Overlay::from_inner)
    }

    /// Every live overlay, in no particular order.
    pub fn overlays(&self) -> Vec<Overlay> {
        self.overlays
            .borrow()
            .values()
            .filter_map(|entry| entry.overlay.upgrade())
            .map(Overlay::from_inner)
            .collect()
    }

    // ------------------------------------------------------------------
    // Hit testing
    // ------------------------------------------------------------------

    /// Route a touch at a screen point to the view that receives it.
    /// Overlays on the way get to decide (and may dismiss themselves).
    pub fn hit_test(&self, point: Point) -> Option<ViewId> {
        let windows = self.tree().windows().to_vec();
        for window in windows.into_iter().rev() {
            let local = self.tree().from_parent(window, point);
            if let Some(hit) = local.and_then(|local| self.route_hit(window, local)) {
                return Some(hit);
            }
        }
        None
    }

    fn route_hit(&self, view: ViewId, point: Point) -> Option<ViewId> {
        if let Some(overlay) = self.overlay(view) {
            return overlay.hit_test(point);
        }
        let children = {
            let tree = self.tree();
            let bounds = tree.bounds(view)?;
            if !tree.accepts_hits(view) || !bounds.contains(point) {
                return None;
            }
            tree.children(view)
        };
        self.route_children(children, point).or(Some(view))
    }

    /// Route a point given in the parent's space to the topmost of
    /// `children` that takes it. Overlays among them, at any depth, decide
    /// for themselves.
    pub(crate) fn route_children(&self, children: Vec<ViewId>, point: Point) -> Option<ViewId> {
        for child in children.into_iter().rev() {
            let local = self.tree().from_parent(child, point);
            if let Some(hit) = local.and_then(|local| self.route_hit(child, local)) {
                return Some(hit);
            }
        }
        None
    }
}
