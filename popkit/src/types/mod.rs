mod color;
mod enums;
mod mask;
mod transform;

pub use color::{dimmed, Color, CLEAR};
pub use enums::{
    BlurStyle, DismissVariant, HorizontalLayout, Layout, MaskVariant, Orientation, ShowVariant,
    VerticalLayout, WindowLevel, DEFAULT_DIMMED_ALPHA,
};
pub use mask::ResizeMask;
pub use transform::Transform;
