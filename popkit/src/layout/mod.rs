mod rect;
mod resolve;

pub use rect::{Point, Rect, Size};
pub(crate) use rect::lerp;
pub use resolve::{
    horizontal_origin, horizontal_resize_mask, resolve_frame, resolve_origin,
    resolve_resize_mask, vertical_origin, vertical_resize_mask,
};
