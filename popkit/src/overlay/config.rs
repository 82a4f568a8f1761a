use std::time::Duration;

use crate::layout::Point;
use crate::tree::ViewId;
use crate::types::{DismissVariant, Layout, MaskVariant, ShowVariant};

/// Behavior of an overlay. Read at the start of each presentation and
/// dismissal, so changes apply from the next transition on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayConfig {
    pub show: ShowVariant,
    pub dismiss: DismissVariant,
    pub mask: MaskVariant,
    /// Dismiss when a touch lands on the backdrop.
    pub dismiss_on_backdrop_touch: bool,
    /// Dismiss when a touch lands inside the content.
    pub dismiss_on_content_touch: bool,
    /// Move the container out of the keyboard's way.
    pub handles_keyboard: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            show: ShowVariant::default(),
            dismiss: DismissVariant::default(),
            mask: MaskVariant::default(),
            dismiss_on_backdrop_touch: true,
            dismiss_on_content_touch: false,
            handles_keyboard: false,
        }
    }
}

impl OverlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(mut self, show: ShowVariant) -> Self {
        self.show = show;
        self
    }

    pub fn dismiss(mut self, dismiss: DismissVariant) -> Self {
        self.dismiss = dismiss;
        self
    }

    pub fn mask(mut self, mask: MaskVariant) -> Self {
        self.mask = mask;
        self
    }

    pub fn dismiss_on_backdrop_touch(mut self, enabled: bool) -> Self {
        self.dismiss_on_backdrop_touch = enabled;
        self
    }

    pub fn dismiss_on_content_touch(mut self, enabled: bool) -> Self {
        self.dismiss_on_content_touch = enabled;
        self
    }

    pub fn handles_keyboard(mut self, enabled: bool) -> Self {
        self.handles_keyboard = enabled;
        self
    }
}

/// Where the container goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Resolved against the overlay's bounds.
    Layout(Layout),
    /// Container centered on a point in the request's host coordinates
    /// (screen coordinates without a host).
    Center(Point),
}

impl Default for Placement {
    fn default() -> Self {
        Placement::Layout(Layout::Centered)
    }
}

/// Parameters of one presentation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PresentRequest {
    pub placement: Placement,
    /// View to attach to. Defaults to the topmost normal-level window.
    pub host: Option<ViewId>,
    /// Dismiss automatically this long after showing finishes.
    pub auto_dismiss: Option<Duration>,
}

impl PresentRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(layout: Layout) -> Self {
        Self {
            placement: Placement::Layout(layout),
            ..Self::default()
        }
    }

    pub fn at(center: Point) -> Self {
        Self {
            placement: Placement::Center(center),
            ..Self::default()
        }
    }

    pub fn host(mut self, host: ViewId) -> Self {
        self.host = Some(host);
        self
    }

    pub fn auto_dismiss(mut self, after: Duration) -> Self {
        self.auto_dismiss = Some(after);
        self
    }
}
