//! Retained view tree hosting overlays.
//!
//! Views live in an arena keyed by [`ViewId`]. Windows are the roots and are
//! positioned in screen space; every other view is positioned in its
//! parent's coordinate space. A view's `frame` is its untransformed layout
//! rect; its `transform` is applied around the frame's center.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::layout::{Point, Rect, Size};
use crate::types::{BlurStyle, Color, ResizeMask, Transform, WindowLevel, CLEAR};

/// Views with an alpha below this are invisible to hit testing.
pub const MIN_HIT_ALPHA: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Window(WindowLevel),
    Plain,
    /// Root of an overlay: full-surface view holding backdrop and container.
    Overlay,
    Backdrop,
    Container,
    /// Blur layer a blurred backdrop is composited into.
    Blur(BlurStyle),
}

#[derive(Debug, Clone)]
pub struct View {
    pub kind: ViewKind,
    frame: Rect,
    transform: Transform,
    alpha: f64,
    hidden: bool,
    interactive: bool,
    background: Color,
    resize_mask: ResizeMask,
    autoresizes_subviews: bool,
    parent: Option<ViewId>,
    children: Vec<ViewId>,
}

impl View {
    fn new(kind: ViewKind, frame: Rect) -> Self {
        Self {
            kind,
            frame,
            transform: Transform::IDENTITY,
            alpha: 1.0,
            hidden: false,
            interactive: true,
            background: CLEAR,
            resize_mask: ResizeMask::empty(),
            autoresizes_subviews: true,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.frame.size())
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn resize_mask(&self) -> ResizeMask {
        self.resize_mask
    }

    pub fn parent(&self) -> Option<ViewId> {
        self.parent
    }

    pub fn children(&self) -> &[ViewId] {
        &self.children
    }

    /// Whether hit testing may land on this view or its children.
    fn accepts_hits(&self) -> bool {
        !self.hidden && self.interactive && self.alpha >= MIN_HIT_ALPHA
    }

    fn to_parent(&self, p: Point) -> Point {
        let local_center = self.bounds().center();
        self.transform.apply(p - local_center) + self.frame.center()
    }

    fn from_parent(&self, p: Point) -> Option<Point> {
        let inverse = self.transform.invert()?;
        Some(inverse.apply(p - self.frame.center()) + self.bounds().center())
    }
}

/// Target values for a view's animatable properties. Unset fields are left
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub frame: Option<Rect>,
    pub alpha: Option<f64>,
    pub transform: Option<Transform>,
}

impl Pose {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(mut self, frame: Rect) -> Self {
        self.frame = Some(frame);
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_none() && self.alpha.is_none() && self.transform.is_none()
    }

    /// True if both poses set any of the same properties.
    pub fn overlaps(&self, other: &Pose) -> bool {
        (self.frame.is_some() && other.frame.is_some())
            || (self.alpha.is_some() && other.alpha.is_some())
            || (self.transform.is_some() && other.transform.is_some())
    }
}

/// Arena of views plus the ordered list of windows.
#[derive(Debug, Default)]
pub struct ViewTree {
    views: HashMap<ViewId, View>,
    windows: Vec<ViewId>,
    next_id: u64,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ViewId) -> Option<&View> {
        self.views.get(&id)
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.views.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    fn view_mut(&mut self, id: ViewId) -> Result<&mut View> {
        self.views.get_mut(&id).ok_or(Error::UnknownView(id))
    }

    /// Create a detached view.
    pub fn create(&mut self, kind: ViewKind, frame: Rect) -> ViewId {
        let id = ViewId(self.next_id);
        self.next_id += 1;
        self.views.insert(id, View::new(kind, frame));
        id
    }

    /// Create a detached plain view.
    pub fn add_view(&mut self, frame: Rect) -> ViewId {
        self.create(ViewKind::Plain, frame)
    }

    /// Create a window. Windows stack in creation order, last on top.
    pub fn add_window(&mut self, level: WindowLevel, frame: Rect) -> ViewId {
        let id = self.create(ViewKind::Window(level), frame);
        self.windows.push(id);
        id
    }

    pub fn windows(&self) -> &[ViewId] {
        &self.windows
    }

    /// Topmost visible window at `Normal` level.
    pub fn topmost_window(&self) -> Option<ViewId> {
        self.windows.iter().rev().copied().find(|id| {
            self.views.get(id).is_some_and(|v| {
                v.kind == ViewKind::Window(WindowLevel::Normal) && !v.hidden
            })
        })
    }

    /// Remove a view and its whole subtree.
    pub fn remove(&mut self, id: ViewId) {
        self.remove_from_parent(id);
        self.windows.retain(|w| *w != id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(view) = self.views.remove(&current) {
                stack.extend(view.children);
            }
        }
    }

    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.views.get(&id)?.parent
    }

    pub fn children(&self, id: ViewId) -> Vec<ViewId> {
        self.views
            .get(&id)
            .map(|v| v.children.clone())
            .unwrap_or_default()
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self, id: ViewId) -> Vec<ViewId> {
        let mut result = Vec::new();
        let mut current = self.parent(id);
        while let Some(p) = current {
            result.push(p);
            current = self.parent(p);
        }
        result
    }

    /// True if `id` is `ancestor` or lies below it.
    pub fn is_descendant(&self, id: ViewId, ancestor: ViewId) -> bool {
        id == ancestor || self.ancestors(id).contains(&ancestor)
    }

    /// The window a view is (transitively) attached to.
    pub fn window_of(&self, id: ViewId) -> Option<ViewId> {
        let root = self.ancestors(id).last().copied().unwrap_or(id);
        self.windows.contains(&root).then_some(root)
    }

    /// Pre-order depth-first walk, children in back-to-front order.
    pub fn descendants(&self, root: ViewId) -> Vec<ViewId> {
        let mut result = Vec::new();
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let Some(view) = self.views.get(&current) else {
                continue;
            };
            result.push(current);
            stack.extend(view.children.iter().rev().copied());
        }
        result
    }

    /// Append `child` to `parent`'s children (on top), detaching it from any
    /// previous parent first.
    pub fn add_child(&mut self, parent: ViewId, child: ViewId) -> Result<()> {
        self.check_attach(parent, child)?;
        self.remove_from_parent(child);
        self.view_mut(parent)?.children.push(child);
        self.view_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Insert `child` into `parent` directly below `sibling`. Falls back to
    /// the bottom of the stack when `sibling` is not a child of `parent`.
    pub fn insert_below(&mut self, parent: ViewId, child: ViewId, sibling: ViewId) -> Result<()> {
        self.check_attach(parent, child)?;
        self.remove_from_parent(child);
        let parent_view = self.view_mut(parent)?;
        let index = parent_view
            .children
            .iter()
            .position(|c| *c == sibling)
            .unwrap_or(0);
        parent_view.children.insert(index, child);
        self.view_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn check_attach(&self, parent: ViewId, child: ViewId) -> Result<()> {
        if !self.contains(parent) {
            return Err(Error::UnknownView(parent));
        }
        if !self.contains(child) {
            return Err(Error::UnknownView(child));
        }
        if self.is_descendant(parent, child) || self.windows.contains(&child) {
            return Err(Error::WouldCycle { parent, child });
        }
        Ok(())
    }

    /// Detach a view from its parent. Returns true if it had one.
    pub fn remove_from_parent(&mut self, id: ViewId) -> bool {
        let Some(parent) = self.views.get_mut(&id).and_then(|v| v.parent.take()) else {
            return false;
        };
        if let Some(parent_view) = self.views.get_mut(&parent) {
            parent_view.children.retain(|c| *c != id);
        }
        true
    }

    /// Move a view to the top of its parent's children.
    pub fn bring_to_front(&mut self, id: ViewId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(parent_view) = self.views.get_mut(&parent) {
            parent_view.children.retain(|c| *c != id);
            parent_view.children.push(id);
        }
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    pub fn frame(&self, id: ViewId) -> Option<Rect> {
        self.views.get(&id).map(View::frame)
    }

    pub fn bounds(&self, id: ViewId) -> Option<Rect> {
        self.views.get(&id).map(View::bounds)
    }

    /// Set a view's frame. When the size changes, children are resized
    /// according to their resize masks.
    pub fn set_frame(&mut self, id: ViewId, frame: Rect) {
        let Some(view) = self.views.get_mut(&id) else {
            return;
        };
        let old_size = view.frame.size();
        view.frame = frame;
        if old_size == frame.size() || !view.autoresizes_subviews {
            return;
        }
        for child in view.children.clone() {
            self.autoresize(child, old_size, frame.size());
        }
    }

    fn autoresize(&mut self, id: ViewId, old_parent: Size, new_parent: Size) {
        let Some(view) = self.views.get(&id) else {
            return;
        };
        let mask = view.resize_mask;
        if mask.is_empty() {
            return;
        }
        let frame = view.frame;
        let (x, width) = resize_axis(
            frame.x,
            frame.width,
            old_parent.width,
            new_parent.width,
            [
                mask.contains(ResizeMask::FLEXIBLE_LEFT_MARGIN),
                mask.contains(ResizeMask::FLEXIBLE_WIDTH),
                mask.contains(ResizeMask::FLEXIBLE_RIGHT_MARGIN),
            ],
        );
        let (y, height) = resize_axis(
            frame.y,
            frame.height,
            old_parent.height,
            new_parent.height,
            [
                mask.contains(ResizeMask::FLEXIBLE_TOP_MARGIN),
                mask.contains(ResizeMask::FLEXIBLE_HEIGHT),
                mask.contains(ResizeMask::FLEXIBLE_BOTTOM_MARGIN),
            ],
        );
        self.set_frame(id, Rect::new(x, y, width, height));
    }

    pub fn transform(&self, id: ViewId) -> Option<Transform> {
        self.views.get(&id).map(View::transform)
    }

    pub fn set_transform(&mut self, id: ViewId, transform: Transform) {
        if let Ok(view) = self.view_mut(id) {
            view.transform = transform;
        }
    }

    pub fn alpha(&self, id: ViewId) -> Option<f64> {
        self.views.get(&id).map(View::alpha)
    }

    pub fn set_alpha(&mut self, id: ViewId, alpha: f64) {
        if let Ok(view) = self.view_mut(id) {
            view.alpha = alpha.clamp(0.0, 1.0);
        }
    }

    pub fn set_hidden(&mut self, id: ViewId, hidden: bool) {
        if let Ok(view) = self.view_mut(id) {
            view.hidden = hidden;
        }
    }

    pub fn set_interactive(&mut self, id: ViewId, interactive: bool) {
        if let Ok(view) = self.view_mut(id) {
            view.interactive = interactive;
        }
    }

    pub fn set_background(&mut self, id: ViewId, color: Color) {
        if let Ok(view) = self.view_mut(id) {
            view.background = color;
        }
    }

    pub fn set_resize_mask(&mut self, id: ViewId, mask: ResizeMask) {
        if let Ok(view) = self.view_mut(id) {
            view.resize_mask = mask;
        }
    }

    pub fn set_autoresizes_subviews(&mut self, id: ViewId, enabled: bool) {
        if let Ok(view) = self.view_mut(id) {
            view.autoresizes_subviews = enabled;
        }
    }

    /// Current values of every animatable property.
    pub fn pose(&self, id: ViewId) -> Option<Pose> {
        let view = self.views.get(&id)?;
        Some(
            Pose::new()
                .frame(view.frame)
                .alpha(view.alpha)
                .transform(view.transform),
        )
    }

    /// Apply a pose. The frame is set before the transform so a scaled view
    /// keeps its resting frame.
    pub fn apply_pose(&mut self, id: ViewId, pose: &Pose) {
        if let Some(frame) = pose.frame {
            self.set_frame(id, frame);
        }
        if let Some(transform) = pose.transform {
            self.set_transform(id, transform);
        }
        if let Some(alpha) = pose.alpha {
            self.set_alpha(id, alpha);
        }
    }

    /// Bounding box of the transformed view in its parent's coordinates.
    pub fn visual_frame(&self, id: ViewId) -> Option<Rect> {
        let view = self.views.get(&id)?;
        let corners = view.bounds().corners().map(|p| view.to_parent(p));
        Some(Rect::bounding(&corners))
    }

    // ------------------------------------------------------------------
    // Coordinate conversion
    // ------------------------------------------------------------------

    /// Convert a point from `id`'s local space to screen space.
    pub fn to_screen(&self, id: ViewId, point: Point) -> Option<Point> {
        let mut current = Some(id);
        let mut p = point;
        while let Some(v) = current {
            let view = self.views.get(&v)?;
            p = view.to_parent(p);
            current = view.parent;
        }
        Some(p)
    }

    /// Convert a point from screen space to `id`'s local space.
    pub fn from_screen(&self, id: ViewId, point: Point) -> Option<Point> {
        let mut path = self.ancestors(id);
        path.reverse();
        path.push(id);
        let mut p = point;
        for v in path {
            p = self.views.get(&v)?.from_parent(p)?;
        }
        Some(p)
    }

    /// Convert a point between two views. `None` stands for screen space.
    pub fn convert_point(
        &self,
        point: Point,
        from: Option<ViewId>,
        to: Option<ViewId>,
    ) -> Option<Point> {
        let screen = match from {
            Some(from) => self.to_screen(from, point)?,
            None => point,
        };
        match to {
            Some(to) => self.from_screen(to, screen),
            None => Some(screen),
        }
    }

    /// Convert a rect between two views as the bounding box of its corners.
    pub fn convert_rect(
        &self,
        rect: Rect,
        from: Option<ViewId>,
        to: Option<ViewId>,
    ) -> Option<Rect> {
        let mut corners = Vec::with_capacity(4);
        for corner in rect.corners() {
            corners.push(self.convert_point(corner, from, to)?);
        }
        Some(Rect::bounding(&corners))
    }

    // ------------------------------------------------------------------
    // Hit testing
    // ------------------------------------------------------------------

    /// Find the deepest view under `point`, given in `root`'s local space.
    /// Children are checked in reverse order (last added = on top).
    pub fn hit_test(&self, root: ViewId, point: Point) -> Option<ViewId> {
        let view = self.views.get(&root)?;
        if !view.accepts_hits() || !view.bounds().contains(point) {
            return None;
        }
        for child in view.children.iter().rev() {
            let Some(child_view) = self.views.get(child) else {
                continue;
            };
            let Some(local) = child_view.from_parent(point) else {
                continue;
            };
            if let Some(hit) = self.hit_test(*child, local) {
                return Some(hit);
            }
        }
        Some(root)
    }

    /// Whether hit testing could land on `id` at all (it and its ancestors
    /// are visible and interactive).
    pub(crate) fn accepts_hits(&self, id: ViewId) -> bool {
        self.views.get(&id).is_some_and(View::accepts_hits)
    }

    pub(crate) fn from_parent(&self, id: ViewId, point: Point) -> Option<Point> {
        self.views.get(&id)?.from_parent(point)
    }
}

/// Redistribute a parent's size change along one axis between the flexible
/// parts (leading margin, extent, trailing margin), proportionally to their
/// current sizes.
fn resize_axis(
    origin: f64,
    extent: f64,
    old_parent: f64,
    new_parent: f64,
    flexible: [bool; 3],
) -> (f64, f64) {
    let delta = new_parent - old_parent;
    let parts = [origin, extent, old_parent - origin - extent];
    let count = flexible.iter().filter(|f| **f).count();
    if count == 0 || delta == 0.0 {
        return (origin, extent);
    }
    let total: f64 = parts
        .iter()
        .zip(flexible)
        .filter(|(_, f)| *f)
        .map(|(p, _)| p.max(0.0))
        .sum();
    let share = |i: usize| -> f64 {
        if !flexible[i] {
            0.0
        } else if total <= 0.0 {
            delta / count as f64
        } else {
            delta * parts[i].max(0.0) / total
        }
    };
    (origin + share(0), extent + share(1))
}
