pub mod animation;
pub mod error;
pub mod layout;
pub mod notify;
pub mod overlay;
pub mod policy;
pub mod runtime;
pub mod transitions;
pub mod tree;
pub mod types;
pub mod ui;

pub use animation::{Animator, Completion, Immediate, Stage, Timeline};
pub use error::{Error, Result};
pub use layout::{Point, Rect, Size};
pub use notify::{KeyboardInfo, Notification, NotificationKind, Subscription};
pub use overlay::{
    Overlay, OverlayConfig, OverlayDelegate, Placement, PresentRequest, PresentationState,
};
pub use policy::{DismissPlan, ShowPlan};
pub use runtime::{TaskHandle, FRAME};
pub use transitions::{Easing, TransitionConfig};
pub use tree::{Pose, ViewId, ViewKind, ViewTree};
pub use types::*;
pub use ui::Ui;
