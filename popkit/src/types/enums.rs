use std::f64::consts::{FRAC_PI_2, PI};

/// Horizontal resting position of the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalLayout {
    Left,
    LeftOfCenter,
    #[default]
    Center,
    RightOfCenter,
    Right,
}

/// Vertical resting position of the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalLayout {
    Top,
    AboveCenter,
    #[default]
    Center,
    BelowCenter,
    Bottom,
}

/// Resolved horizontal + vertical resting position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Layout {
    #[default]
    Centered,
    Custom(HorizontalLayout, VerticalLayout),
}

impl Layout {
    pub const fn new(horizontal: HorizontalLayout, vertical: VerticalLayout) -> Self {
        Self::Custom(horizontal, vertical)
    }

    pub const fn horizontal(self) -> HorizontalLayout {
        match self {
            Self::Centered => HorizontalLayout::Center,
            Self::Custom(h, _) => h,
        }
    }

    pub const fn vertical(self) -> VerticalLayout {
        match self {
            Self::Centered => VerticalLayout::Center,
            Self::Custom(_, v) => v,
        }
    }
}

/// Transition used to bring the container on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShowVariant {
    None,
    FadeIn,
    GrowIn,
    #[default]
    ShrinkIn,
    SlideInFromTop,
    SlideInFromBottom,
    SlideInFromLeft,
    SlideInFromRight,
    BounceIn,
    BounceInFromTop,
    BounceInFromBottom,
    BounceInFromLeft,
    BounceInFromRight,
}

impl ShowVariant {
    pub const ALL: [ShowVariant; 13] = [
        Self::None,
        Self::FadeIn,
        Self::GrowIn,
        Self::ShrinkIn,
        Self::SlideInFromTop,
        Self::SlideInFromBottom,
        Self::SlideInFromLeft,
        Self::SlideInFromRight,
        Self::BounceIn,
        Self::BounceInFromTop,
        Self::BounceInFromBottom,
        Self::BounceInFromLeft,
        Self::BounceInFromRight,
    ];
}

/// Transition used to take the container off screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DismissVariant {
    None,
    FadeOut,
    GrowOut,
    #[default]
    ShrinkOut,
    SlideOutToTop,
    SlideOutToBottom,
    SlideOutToLeft,
    SlideOutToRight,
    BounceOut,
    BounceOutToTop,
    BounceOutToBottom,
    BounceOutToLeft,
    BounceOutToRight,
}

impl DismissVariant {
    pub const ALL: [DismissVariant; 13] = [
        Self::None,
        Self::FadeOut,
        Self::GrowOut,
        Self::ShrinkOut,
        Self::SlideOutToTop,
        Self::SlideOutToBottom,
        Self::SlideOutToLeft,
        Self::SlideOutToRight,
        Self::BounceOut,
        Self::BounceOutToTop,
        Self::BounceOutToBottom,
        Self::BounceOutToLeft,
        Self::BounceOutToRight,
    ];
}

/// Backdrop compositing mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaskVariant {
    /// No backdrop; touches outside the content pass through.
    None,
    /// Transparent backdrop that still swallows touches.
    Clear,
    /// Solid black backdrop at the given alpha.
    Dimmed(f32),
    LightBlur,
    DarkBlur,
}

impl Default for MaskVariant {
    fn default() -> Self {
        Self::Dimmed(DEFAULT_DIMMED_ALPHA)
    }
}

pub const DEFAULT_DIMMED_ALPHA: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlurStyle {
    Light,
    Dark,
}

/// Window stacking level. Overlays attach to the topmost `Normal` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum WindowLevel {
    #[default]
    Normal,
    StatusBar,
    Alert,
}

/// Interface orientation of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

impl Orientation {
    /// Rotation an overlay applies to follow this orientation.
    pub fn angle(self) -> f64 {
        match self {
            Self::Portrait => 0.0,
            Self::PortraitUpsideDown => PI,
            Self::LandscapeLeft => -FRAC_PI_2,
            Self::LandscapeRight => FRAC_PI_2,
        }
    }

    pub const fn is_landscape(self) -> bool {
        matches!(self, Self::LandscapeLeft | Self::LandscapeRight)
    }
}
