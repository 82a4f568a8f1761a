use bitflags::bitflags;

bitflags! {
    /// Which of a view's margins and extents may stretch when its parent
    /// is resized.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ResizeMask: u8 {
        const FLEXIBLE_LEFT_MARGIN = 1 << 0;
        const FLEXIBLE_WIDTH = 1 << 1;
        const FLEXIBLE_RIGHT_MARGIN = 1 << 2;
        const FLEXIBLE_TOP_MARGIN = 1 << 3;
        const FLEXIBLE_HEIGHT = 1 << 4;
        const FLEXIBLE_BOTTOM_MARGIN = 1 << 5;

        const FLEXIBLE_SIZE = Self::FLEXIBLE_WIDTH.bits() | Self::FLEXIBLE_HEIGHT.bits();
        const FLEXIBLE_MARGINS = Self::FLEXIBLE_LEFT_MARGIN.bits()
            | Self::FLEXIBLE_RIGHT_MARGIN.bits()
            | Self::FLEXIBLE_TOP_MARGIN.bits()
            | Self::FLEXIBLE_BOTTOM_MARGIN.bits();
    }
}
