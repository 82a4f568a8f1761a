//! Resting position of an overlay's container inside the overlay bounds.

use super::{Point, Rect, Size};
use crate::types::{HorizontalLayout, Layout, ResizeMask, VerticalLayout};

/// Position along one axis, shared by the horizontal and vertical layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Start,
    FirstThird,
    Middle,
    SecondThird,
    End,
}

impl From<HorizontalLayout> for Slot {
    fn from(value: HorizontalLayout) -> Self {
        match value {
            HorizontalLayout::Left => Slot::Start,
            HorizontalLayout::LeftOfCenter => Slot::FirstThird,
            HorizontalLayout::Center => Slot::Middle,
            HorizontalLayout::RightOfCenter => Slot::SecondThird,
            HorizontalLayout::Right => Slot::End,
        }
    }
}

impl From<VerticalLayout> for Slot {
    fn from(value: VerticalLayout) -> Self {
        match value {
            VerticalLayout::Top => Slot::Start,
            VerticalLayout::AboveCenter => Slot::FirstThird,
            VerticalLayout::Center => Slot::Middle,
            VerticalLayout::BelowCenter => Slot::SecondThird,
            VerticalLayout::Bottom => Slot::End,
        }
    }
}

impl Slot {
    /// Offset of `content` inside `parent`. The result is floored and kept
    /// within `[0, parent - content]`; oversized content pins to 0.
    fn origin(self, parent: f64, content: f64) -> f64 {
        let raw = match self {
            Slot::Start => 0.0,
            Slot::FirstThird => (parent / 3.0 - content / 2.0).floor(),
            Slot::Middle => ((parent - content) / 2.0).floor(),
            Slot::SecondThird => (parent * 2.0 / 3.0 - content / 2.0).floor(),
            Slot::End => parent - content,
        };
        raw.clamp(0.0, (parent - content).max(0.0))
    }

    /// (leading margin, trailing margin) flexibility.
    fn flexible_margins(self) -> (bool, bool) {
        match self {
            Slot::Start => (false, true),
            Slot::FirstThird | Slot::Middle | Slot::SecondThird => (true, true),
            Slot::End => (true, false),
        }
    }
}

pub fn horizontal_origin(layout: HorizontalLayout, parent_width: f64, content_width: f64) -> f64 {
    Slot::from(layout).origin(parent_width, content_width)
}

pub fn vertical_origin(layout: VerticalLayout, parent_height: f64, content_height: f64) -> f64 {
    Slot::from(layout).origin(parent_height, content_height)
}

/// Origin of a `content`-sized container laid out inside `parent`.
pub fn resolve_origin(layout: Layout, parent: Size, content: Size) -> Point {
    Point::new(
        horizontal_origin(layout.horizontal(), parent.width, content.width),
        vertical_origin(layout.vertical(), parent.height, content.height),
    )
}

/// Full resting frame of a `content`-sized container.
pub fn resolve_frame(layout: Layout, parent: Size, content: Size) -> Rect {
    Rect::from_origin_size(resolve_origin(layout, parent, content), content)
}

pub fn horizontal_resize_mask(layout: HorizontalLayout) -> ResizeMask {
    let (leading, trailing) = Slot::from(layout).flexible_margins();
    let mut mask = ResizeMask::empty();
    mask.set(ResizeMask::FLEXIBLE_LEFT_MARGIN, leading);
    mask.set(ResizeMask::FLEXIBLE_RIGHT_MARGIN, trailing);
    mask
}

pub fn vertical_resize_mask(layout: VerticalLayout) -> ResizeMask {
    let (leading, trailing) = Slot::from(layout).flexible_margins();
    let mut mask = ResizeMask::empty();
    mask.set(ResizeMask::FLEXIBLE_TOP_MARGIN, leading);
    mask.set(ResizeMask::FLEXIBLE_BOTTOM_MARGIN, trailing);
    mask
}

/// Margins that should stretch when the overlay is resized, so the
/// container keeps its relative position.
pub fn resolve_resize_mask(layout: Layout) -> ResizeMask {
    horizontal_resize_mask(layout.horizontal()) | vertical_resize_mask(layout.vertical())
}
