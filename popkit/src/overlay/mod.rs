//! Modal overlay presentation.
//!
//! An [`Overlay`] wraps a caller-owned content view in three views of its
//! own: the overlay root (covers the host), a backdrop, and a container the
//! content is pinned into. Presenting attaches the root to a host, lays out
//! the container and runs the show animation; dismissing runs the reverse
//! and detaches everything again.
//!
//! Lifecycle: `Idle -> Presenting -> Presented -> Dismissing -> Idle`.
//! Calls that don't fit the current state are ignored.

mod config;
mod keyboard;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

pub use config::{OverlayConfig, Placement, PresentRequest};

use crate::animation::{Completion, Stage};
use crate::error::{Error, Result};
use crate::layout::{resolve_frame, resolve_resize_mask, Point, Rect, Size};
use crate::notify::Subscription;
use crate::policy::{backdrop_fade, run_stages};
use crate::runtime::TaskHandle;
use crate::tree::{Pose, ViewId, ViewKind, ViewTree};
use crate::types::{
    dimmed, BlurStyle, Layout, MaskVariant, ResizeMask, ShowVariant, Transform, CLEAR,
};
use crate::ui::Ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PresentationState {
    #[default]
    Idle,
    Presenting,
    Presented,
    Dismissing,
}

/// Lifecycle observer. Held weakly; every method defaults to a no-op.
pub trait OverlayDelegate {
    fn will_start_showing(&self, _overlay: &Overlay) {}
    fn did_finish_showing(&self, _overlay: &Overlay) {}
    fn will_start_dismissing(&self, _overlay: &Overlay) {}
    fn did_finish_dismissing(&self, _overlay: &Overlay) {}
}

#[derive(Debug, Clone, Copy)]
enum Lifecycle {
    WillStartShowing,
    DidFinishShowing,
    WillStartDismissing,
    DidFinishDismissing,
}

type Hook = Rc<dyn Fn(&Overlay)>;

#[derive(Default)]
struct Hooks {
    will_start_showing: Option<Hook>,
    did_finish_showing: Option<Hook>,
    will_start_dismissing: Option<Hook>,
    did_finish_dismissing: Option<Hook>,
}

impl Hooks {
    fn get(&self, event: Lifecycle) -> Option<Hook> {
        match event {
            Lifecycle::WillStartShowing => self.will_start_showing.clone(),
            Lifecycle::DidFinishShowing => self.did_finish_showing.clone(),
            Lifecycle::WillStartDismissing => self.will_start_dismissing.clone(),
            Lifecycle::DidFinishDismissing => self.did_finish_dismissing.clone(),
        }
    }
}

pub(crate) struct OverlayInner {
    ui: Weak<Ui>,
    view: ViewId,
    backdrop: ViewId,
    container: ViewId,
    content: ViewId,
    config: Cell<OverlayConfig>,
    state: Cell<PresentationState>,
    auto_dismiss: RefCell<Option<TaskHandle>>,
    blur: Cell<Option<ViewId>>,
    keyboard_rect: Cell<Rect>,
    subscriptions: RefCell<Vec<Subscription>>,
    delegate: RefCell<Option<Weak<dyn OverlayDelegate>>>,
    hooks: RefCell<Hooks>,
}

impl Drop for OverlayInner {
    fn drop(&mut self) {
        if let Some(task) = self.auto_dismiss.get_mut().take() {
            task.cancel();
        }
        self.subscriptions.get_mut().clear();
        let Some(ui) = self.ui.upgrade() else {
            return;
        };
        ui.unregister_overlay(self.view);
        let Some(mut tree) = ui.try_tree_mut() else {
            log::warn!("[overlay] {} dropped while the view tree was busy", self.view);
            return;
        };
        if tree.parent(self.content) == Some(self.container) {
            tree.remove_from_parent(self.content);
        }
        if let Some(blur) = self.blur.get() {
            tree.remove(blur);
        }
        tree.remove(self.view);
        log::debug!("[overlay] {} dropped", self.view);
    }
}

/// Handle to a modal overlay. Clones share the same overlay.
///
/// From `present` until dismissal finishes the overlay keeps itself alive,
/// so dropping every handle mid-presentation is fine.
#[derive(Clone)]
pub struct Overlay {
    inner: Rc<OverlayInner>,
}

impl fmt::Debug for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("view", &self.inner.view)
            .field("content", &self.inner.content)
            .field("state", &self.inner.state.get())
            .field("config", &self.inner.config.get())
            .finish()
    }
}

impl PartialEq for Overlay {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Overlay {}

impl Overlay {
    /// Wrap `content` in a new, idle overlay with the default configuration.
    pub fn new(ui: &Rc<Ui>, content: ViewId) -> Result<Self> {
        let (view, backdrop, container) = {
            let mut tree = ui.tree_mut();
            match tree.get(content).map(|v| v.kind) {
                None => return Err(Error::UnknownView(content)),
                Some(ViewKind::Overlay) => return Err(Error::ContentIsOverlay(content)),
                Some(_) => {}
            }
            let surface = Rect::from_size(ui.screen());
            let view = tree.create(ViewKind::Overlay, surface);
            let backdrop = tree.create(ViewKind::Backdrop, surface);
            let container = tree.create(ViewKind::Container, Rect::ZERO);
            if let Err(err) = assemble(&mut tree, view, backdrop, container, content) {
                tree.remove(view);
                tree.remove(backdrop);
                tree.remove(container);
                return Err(err);
            }
            (view, backdrop, container)
        };

        let inner = Rc::new(OverlayInner {
            ui: Rc::downgrade(ui),
            view,
            backdrop,
            container,
            content,
            config: Cell::new(OverlayConfig::default()),
            state: Cell::new(PresentationState::Idle),
            auto_dismiss: RefCell::new(None),
            blur: Cell::new(None),
            keyboard_rect: Cell::new(Rect::ZERO),
            subscriptions: RefCell::new(Vec::new()),
            delegate: RefCell::new(None),
            hooks: RefCell::new(Hooks::default()),
        });
        ui.register_overlay(view, Rc::downgrade(&inner));
        log::debug!("[overlay] {} created for content {}", view, content);
        Ok(Self { inner })
    }

    pub(crate) fn from_inner(inner: Rc<OverlayInner>) -> Self {
        Self { inner }
    }

    fn downgrade(&self) -> Weak<OverlayInner> {
        Rc::downgrade(&self.inner)
    }

    fn upgrade(weak: &Weak<OverlayInner>) -> Option<Self> {
        weak.upgrade().map(Self::from_inner)
    }

    pub fn with_config(self, config: OverlayConfig) -> Self {
        self.set_config(config);
        self
    }

    pub fn config(&self) -> OverlayConfig {
        self.inner.config.get()
    }

    pub fn set_config(&self, config: OverlayConfig) {
        self.inner.config.set(config);
    }

    /// Root view of the overlay.
    pub fn view(&self) -> ViewId {
        self.inner.view
    }

    pub fn backdrop(&self) -> ViewId {
        self.inner.backdrop
    }

    pub fn container(&self) -> ViewId {
        self.inner.container
    }

    pub fn content(&self) -> ViewId {
        self.inner.content
    }

    /// Blur layer, present only while a blur mask is shown.
    pub fn blur_view(&self) -> Option<ViewId> {
        self.inner.blur.get()
    }

    /// Last reported keyboard frame in overlay coordinates; zero when hidden.
    pub fn keyboard_rect(&self) -> Rect {
        self.inner.keyboard_rect.get()
    }

    pub fn state(&self) -> PresentationState {
        self.inner.state.get()
    }

    pub fn is_being_presented(&self) -> bool {
        self.state() == PresentationState::Presenting
    }

    pub fn is_presented(&self) -> bool {
        self.state() == PresentationState::Presented
    }

    pub fn is_being_dismissed(&self) -> bool {
        self.state() == PresentationState::Dismissing
    }

    /// Only a fully presented overlay can start dismissing.
    pub fn can_dismiss(&self) -> bool {
        self.is_presented()
    }

    /// Auto-dismiss task waiting to fire.
    pub fn pending_auto_dismiss(&self) -> Option<TaskHandle> {
        self.inner
            .auto_dismiss
            .borrow()
            .as_ref()
            .filter(|task| !task.is_cancelled())
            .cloned()
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    /// Set the delegate. Only a weak reference is kept.
    pub fn set_delegate<D: OverlayDelegate + 'static>(&self, delegate: &Rc<D>) {
        let weak = Rc::downgrade(delegate);
        let weak: Weak<dyn OverlayDelegate> = weak;
        *self.inner.delegate.borrow_mut() = Some(weak);
    }

    pub fn clear_delegate(&self) {
        *self.inner.delegate.borrow_mut() = None;
    }

    pub fn on_will_start_showing(&self, hook: impl Fn(&Overlay) + 'static) {
        self.inner.hooks.borrow_mut().will_start_showing = Some(Rc::new(hook));
    }

    pub fn on_did_finish_showing(&self, hook: impl Fn(&Overlay) + 'static) {
        self.inner.hooks.borrow_mut().did_finish_showing = Some(Rc::new(hook));
    }

    pub fn on_will_start_dismissing(&self, hook: impl Fn(&Overlay) + 'static) {
        self.inner.hooks.borrow_mut().will_start_dismissing = Some(Rc::new(hook));
    }

    pub fn on_did_finish_dismissing(&self, hook: impl Fn(&Overlay) + 'static) {
        self.inner.hooks.borrow_mut().did_finish_dismissing = Some(Rc::new(hook));
    }

    /// Delegate first, then the closure hook.
    fn notify(&self, event: Lifecycle) {
        let delegate = self
            .inner
            .delegate
            .borrow()
            .as_ref()
            .and_then(Weak::upgrade);
        if let Some(delegate) = delegate {
            match event {
                Lifecycle::WillStartShowing => delegate.will_start_showing(self),
                Lifecycle::DidFinishShowing => delegate.did_finish_showing(self),
                Lifecycle::WillStartDismissing => delegate.will_start_dismissing(self),
                Lifecycle::DidFinishDismissing => delegate.did_finish_dismissing(self),
            }
        }
        let hook = self.inner.hooks.borrow().get(event);
        if let Some(hook) = hook {
            hook(self);
        }
    }

    // ------------------------------------------------------------------
    // Presenting
    // ------------------------------------------------------------------

    /// Centered in the topmost window.
    pub fn show(&self) -> bool {
        self.present(PresentRequest::new())
    }

    pub fn show_with_layout(&self, layout: Layout) -> bool {
        self.present(PresentRequest::layout(layout))
    }

    pub fn show_in(&self, layout: Layout, host: ViewId) -> bool {
        self.present(PresentRequest::layout(layout).host(host))
    }

    /// Centered, dismissed automatically `duration` after showing.
    pub fn show_for(&self, duration: Duration) -> bool {
        self.present(PresentRequest::new().auto_dismiss(duration))
    }

    pub fn show_with_layout_for(&self, layout: Layout, duration: Duration) -> bool {
        self.present(PresentRequest::layout(layout).auto_dismiss(duration))
    }

    /// Container centered on `center`, given in `host` coordinates (screen
    /// coordinates when `host` is `None`).
    pub fn show_at(&self, center: Point, host: Option<ViewId>) -> bool {
        let mut request = PresentRequest::at(center);
        request.host = host;
        self.present(request)
    }

    pub fn show_at_for(&self, center: Point, host: Option<ViewId>, duration: Duration) -> bool {
        let mut request = PresentRequest::at(center).auto_dismiss(duration);
        request.host = host;
        self.present(request)
    }

    /// Start presenting. Returns false (and does nothing) unless idle.
    ///
    /// `will_start_showing` fires before this returns; attaching, layout
    /// and the show animation happen on the next tick.
    pub fn present(&self, request: PresentRequest) -> bool {
        let state = self.state();
        if state != PresentationState::Idle {
            log::debug!("[overlay] {} present ignored while {:?}", self.view(), state);
            return false;
        }
        let Some(ui) = self.inner.ui.upgrade() else {
            return false;
        };
        self.cancel_auto_dismiss();
        self.inner.state.set(PresentationState::Presenting);
        ui.retain_overlay(self.view());
        log::debug!("[overlay] {} presenting {:?}", self.view(), request);
        self.notify(Lifecycle::WillStartShowing);

        let weak = self.downgrade();
        ui.defer(move |ui| {
            if let Some(overlay) = Overlay::upgrade(&weak) {
                overlay.begin_showing(ui, request);
            }
        });
        true
    }

    fn begin_showing(&self, ui: &Ui, request: PresentRequest) {
        if !self.is_being_presented() {
            return;
        }
        let Some(host) = self.attach(ui, request.host) else {
            self.inner.state.set(PresentationState::Idle);
            ui.release_overlay(self.view());
            return;
        };
        // A center without a host is in screen coordinates.
        let point_space = request.host.map(|_| host);

        let config = self.config();
        let (view, backdrop, container) = (self.view(), self.backdrop(), self.container());
        self.update_for_orientation(ui);
        {
            let mut tree = ui.tree_mut();
            tree.set_hidden(view, false);
            tree.set_alpha(view, 1.0);
        }
        ui.animator()
            .perform_without_animation(ui, backdrop, &Pose::new().alpha(0.0));
        self.configure_backdrop(ui, config.mask);

        let final_frame = self.layout_container(ui, request.placement, point_space);
        let bounds = ui
            .tree()
            .bounds(view)
            .map_or(ui.screen(), |b| b.size());
        let auto_dismiss = request.auto_dismiss;

        match config.show.plan(final_frame, bounds) {
            None => {
                let rest = Pose::new()
                    .frame(final_frame)
                    .transform(Transform::IDENTITY)
                    .alpha(1.0);
                ui.animator().perform_without_animation(ui, container, &rest);
                self.finish_showing(ui, auto_dismiss);
            }
            Some(plan) => {
                ui.animator()
                    .perform_without_animation(ui, container, &plan.start);
                let weak = self.downgrade();
                let completion: Completion = Box::new(move |ui, _finished| {
                    if let Some(overlay) = Overlay::upgrade(&weak) {
                        overlay.finish_showing(ui, auto_dismiss);
                    }
                });
                ui.animator()
                    .animate(ui, container, plan.stage, Some(completion));
            }
        }
    }

    /// Attach to the host (or topmost window) if not attached yet. Returns
    /// the view the overlay ends up in.
    fn attach(&self, ui: &Ui, host: Option<ViewId>) -> Option<ViewId> {
        let view = self.view();
        let current = ui.tree().parent(view);
        let host = match current {
            Some(parent) => parent,
            None => {
                let host = host
                    .filter(|h| ui.tree().contains(*h))
                    .or_else(|| ui.topmost_window());
                let Some(host) = host else {
                    log::warn!("[overlay] {} has no host view or window to attach to", view);
                    return None;
                };
                let mut tree = ui.tree_mut();
                if let Err(err) = tree.add_child(host, view) {
                    log::warn!("[overlay] {} attach failed: {}", view, err);
                    return None;
                }
                tree.bring_to_front(view);
                log::debug!("[overlay] {} attached to {}", view, host);
                host
            }
        };
        self.subscribe(ui);
        Some(host)
    }

    fn configure_backdrop(&self, ui: &Ui, mask: MaskVariant) {
        let backdrop = self.backdrop();
        match mask {
            MaskVariant::None => {
                ui.tree_mut().set_background(backdrop, CLEAR);
                let stage = Stage {
                    timing: backdrop_fade(),
                    pose: Pose::new().alpha(1.0),
                };
                ui.animator().animate(ui, backdrop, stage, None);
            }
            MaskVariant::Clear => {
                ui.tree_mut().set_background(backdrop, CLEAR);
            }
            MaskVariant::Dimmed(alpha) => {
                ui.tree_mut().set_background(backdrop, dimmed(alpha));
                ui.animator()
                    .perform_without_animation(ui, backdrop, &Pose::new().alpha(1.0));
            }
            MaskVariant::LightBlur => self.install_blur(ui, BlurStyle::Light),
            MaskVariant::DarkBlur => self.install_blur(ui, BlurStyle::Dark),
        }
    }

    /// Put a blur layer below the container and move the backdrop into it.
    fn install_blur(&self, ui: &Ui, style: BlurStyle) {
        let mut tree = ui.tree_mut();
        self.remove_blur(&mut tree);
        let (view, backdrop, container) = (self.view(), self.backdrop(), self.container());
        let surface = tree.bounds(view).unwrap_or(Rect::ZERO);
        let blur = tree.create(ViewKind::Blur(style), surface);
        tree.set_resize_mask(blur, ResizeMask::FLEXIBLE_SIZE);
        tree.set_background(backdrop, CLEAR);
        let installed = tree
            .insert_below(view, blur, container)
            .and_then(|()| tree.add_child(blur, backdrop));
        match installed {
            Ok(()) => {
                tree.set_frame(backdrop, Rect::from_size(surface.size()));
                self.inner.blur.set(Some(blur));
            }
            Err(err) => {
                log::warn!("[overlay] {} blur setup failed: {}", view, err);
                tree.remove(blur);
            }
        }
    }

    /// Tear down the blur layer, returning the backdrop to the overlay root.
    fn remove_blur(&self, tree: &mut ViewTree) {
        let Some(blur) = self.inner.blur.take() else {
            return;
        };
        let (view, backdrop, container) = (self.view(), self.backdrop(), self.container());
        if let Err(err) = tree.insert_below(view, backdrop, container) {
            log::warn!("[overlay] {} could not restore backdrop: {}", view, err);
        }
        tree.remove(blur);
    }

    /// Size the container to the content, pin the content inside it, and
    /// return the container's target frame.
    fn layout_container(&self, ui: &Ui, placement: Placement, point_space: Option<ViewId>) -> Rect {
        let (view, container, content) = (self.view(), self.container(), self.content());
        let mut tree = ui.tree_mut();
        if tree.parent(content) != Some(container) {
            if let Err(err) = tree.add_child(container, content) {
                log::warn!("[overlay] {} could not reclaim content: {}", view, err);
            }
        }
        let content_size = pin_content(&mut tree, container, content);
        let bounds = tree.bounds(view).map_or(Size::ZERO, |b| b.size());

        let (frame, mask) = match placement {
            Placement::Layout(layout) => (
                resolve_frame(layout, bounds, content_size),
                resolve_resize_mask(layout),
            ),
            Placement::Center(center) => {
                let local = tree
                    .convert_point(center, point_space, Some(view))
                    .unwrap_or(center);
                (
                    Rect::from_size(content_size).with_center(local),
                    ResizeMask::FLEXIBLE_MARGINS,
                )
            }
        };
        tree.set_resize_mask(container, mask);
        frame
    }

    fn finish_showing(&self, ui: &Ui, auto_dismiss: Option<Duration>) {
        if !self.is_being_presented() {
            return;
        }
        self.inner.state.set(PresentationState::Presented);
        log::debug!("[overlay] {} presented", self.view());
        self.notify(Lifecycle::DidFinishShowing);

        let Some(delay) = auto_dismiss.filter(|d| !d.is_zero()) else {
            return;
        };
        // A lifecycle callback may already have dismissed us.
        if !self.is_presented() {
            return;
        }
        let weak = self.downgrade();
        let task = ui.schedule(delay, move |_ui| {
            if let Some(overlay) = Overlay::upgrade(&weak) {
                log::debug!("[overlay] {} auto-dismiss fired", overlay.view());
                overlay.dismiss(true);
            }
        });
        *self.inner.auto_dismiss.borrow_mut() = Some(task);
    }

    fn cancel_auto_dismiss(&self) {
        if let Some(task) = self.inner.auto_dismiss.borrow_mut().take() {
            task.cancel();
        }
    }

    // ------------------------------------------------------------------
    // Dismissing
    // ------------------------------------------------------------------

    /// Start dismissing. Returns false (and does nothing) unless presented.
    ///
    /// `will_start_dismissing` fires before this returns; the dismiss
    /// animation starts on the next tick.
    pub fn dismiss(&self, animated: bool) -> bool {
        if !self.can_dismiss() {
            log::debug!("[overlay] {} dismiss ignored while {:?}", self.view(), self.state());
            return false;
        }
        let Some(ui) = self.inner.ui.upgrade() else {
            return false;
        };
        self.cancel_auto_dismiss();
        self.inner.state.set(PresentationState::Dismissing);
        log::debug!("[overlay] {} dismissing (animated: {})", self.view(), animated);
        self.notify(Lifecycle::WillStartDismissing);

        let weak = self.downgrade();
        ui.defer(move |ui| {
            if let Some(overlay) = Overlay::upgrade(&weak) {
                overlay.begin_dismissing(ui, animated);
            }
        });
        true
    }

    fn begin_dismissing(&self, ui: &Ui, animated: bool) {
        if !self.is_being_dismissed() {
            return;
        }
        let config = self.config();
        let (view, backdrop, container) = (self.view(), self.backdrop(), self.container());

        let faded = Pose::new().alpha(0.0);
        if animated && config.show != ShowVariant::None {
            let stage = Stage {
                timing: backdrop_fade(),
                pose: faded,
            };
            ui.animator().animate(ui, backdrop, stage, None);
        } else {
            ui.animator().perform_without_animation(ui, backdrop, &faded);
        }

        let plan = if animated {
            let (frame, bounds) = {
                let tree = ui.tree();
                (
                    tree.frame(container).unwrap_or(Rect::ZERO),
                    tree.bounds(view).map_or(ui.screen(), |b| b.size()),
                )
            };
            config.dismiss.plan(frame, bounds)
        } else {
            None
        };

        match plan {
            None => {
                ui.animator().perform_without_animation(ui, container, &faded);
                self.finish_dismissing(ui);
            }
            Some(plan) => {
                let weak = self.downgrade();
                run_stages(
                    ui,
                    container,
                    plan.stages(),
                    Box::new(move |ui, _finished| {
                        if let Some(overlay) = Overlay::upgrade(&weak) {
                            overlay.finish_dismissing(ui);
                        }
                    }),
                );
            }
        }
    }

    fn finish_dismissing(&self, ui: &Ui) {
        if !self.is_being_dismissed() {
            return;
        }
        let view = self.view();
        {
            let mut tree = ui.tree_mut();
            self.remove_blur(&mut tree);
            tree.remove_from_parent(view);
        }
        self.inner.subscriptions.borrow_mut().clear();
        self.inner.keyboard_rect.set(Rect::ZERO);
        self.inner.state.set(PresentationState::Idle);
        log::debug!("[overlay] {} dismissed", view);
        // Released first so a callback that presents again is retained anew.
        ui.release_overlay(view);
        self.notify(Lifecycle::DidFinishDismissing);
    }

    /// Dismiss, without animation, every overlay attached anywhere in the
    /// window hierarchy (including overlays nested in other overlays).
    /// Returns how many started dismissing.
    pub fn dismiss_all(ui: &Ui) -> usize {
        let overlays: Vec<Overlay> = {
            let tree = ui.tree();
            tree.windows()
                .iter()
                .flat_map(|window| tree.descendants(*window))
                .filter(|v| matches!(tree.get(*v).map(|v| v.kind), Some(ViewKind::Overlay)))
                .filter_map(|v| ui.overlay(v))
                .collect()
        };
        let dismissed = overlays.iter().filter(|o| o.dismiss(false)).count();
        log::debug!("[overlay] dismiss_all: {} of {} dismissing", dismissed, overlays.len());
        dismissed
    }

    /// Dismiss the nearest overlay containing `view` (or rooted at it).
    pub fn dismiss_presenting(ui: &Ui, view: ViewId) -> bool {
        let candidates = {
            let tree = ui.tree();
            let mut chain = vec![view];
            chain.extend(tree.ancestors(view));
            chain
        };
        candidates
            .into_iter()
            .find_map(|v| ui.overlay(v))
            .is_some_and(|overlay| overlay.dismiss(true))
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Fit the overlay root to its parent. Directly in a window, it is also
    /// rotated to the interface orientation, with width and height swapped
    /// in landscape.
    pub fn update_for_orientation(&self, ui: &Ui) {
        let view = self.view();
        let mut tree = ui.tree_mut();
        let Some(parent) = tree.parent(view) else {
            return;
        };
        let Some(parent_bounds) = tree.bounds(parent) else {
            return;
        };
        let in_window = matches!(tree.get(parent).map(|v| v.kind), Some(ViewKind::Window(_)));
        let (transform, size) = if in_window {
            let orientation = ui.orientation();
            let size = if orientation.is_landscape() {
                parent_bounds.size().transposed()
            } else {
                parent_bounds.size()
            };
            (Transform::rotation(orientation.angle()), size)
        } else {
            (Transform::IDENTITY, parent_bounds.size())
        };
        tree.set_transform(view, transform);
        tree.set_frame(view, Rect::from_size(size).with_center(parent_bounds.center()));
    }

    /// Decide where a touch at `point` (overlay coordinates) goes.
    ///
    /// Detached overlays claim nothing, and neither do touches on the
    /// keyboard. Backdrop touches dismiss when configured and fall through
    /// entirely without a mask. Content touches dismiss when configured but
    /// are still delivered.
    pub fn hit_test(&self, point: Point) -> Option<ViewId> {
        let ui = self.inner.ui.upgrade()?;
        if self.keyboard_rect().contains(point) {
            return None;
        }
        let view = self.view();
        let children = {
            let tree = ui.tree();
            tree.parent(view)?;
            let bounds = tree.bounds(view)?;
            if !tree.accepts_hits(view) || !bounds.contains(point) {
                return None;
            }
            tree.children(view)
        };
        // Overlays nested in the content get their own say.
        let hit = ui.route_children(children, point).unwrap_or(view);
        let in_content = ui.tree().is_descendant(hit, self.container());
        let config = self.config();
        if hit == view || Some(hit) == self.blur_view() {
            if config.dismiss_on_backdrop_touch {
                self.dismiss(true);
            }
            if config.mask == MaskVariant::None {
                return None;
            }
        } else if in_content && config.dismiss_on_content_touch {
            self.dismiss(true);
        }
        Some(hit)
    }
}

/// Wire up the overlay's own views around `content`.
fn assemble(
    tree: &mut ViewTree,
    view: ViewId,
    backdrop: ViewId,
    container: ViewId,
    content: ViewId,
) -> Result<()> {
    tree.set_resize_mask(view, ResizeMask::FLEXIBLE_SIZE);
    tree.set_resize_mask(backdrop, ResizeMask::FLEXIBLE_SIZE);
    tree.set_interactive(backdrop, false);
    tree.set_alpha(backdrop, 0.0);
    tree.add_child(view, backdrop)?;
    tree.add_child(view, container)?;
    tree.add_child(container, content)?;
    pin_content(tree, container, content);
    Ok(())
}

/// Match the container's size to the content and pin the content to the
/// container's edges. Returns the content size.
fn pin_content(tree: &mut ViewTree, container: ViewId, content: ViewId) -> Size {
    let size = tree.frame(content).map_or(Size::ZERO, |f| f.size());
    let origin = tree.frame(container).map_or(Point::ZERO, |f| f.origin());
    tree.set_frame(container, Rect::from_origin_size(origin, size));
    tree.set_frame(content, Rect::from_size(size));
    tree.set_resize_mask(content, ResizeMask::FLEXIBLE_SIZE);
    size
}
