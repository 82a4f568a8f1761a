use thiserror::Error;

use crate::tree::ViewId;

/// Errors raised by view-tree edits and overlay construction.
///
/// Lifecycle misuse (presenting twice, dismissing while idle) is not an
/// error; those calls are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The id does not name a live view.
    #[error("view {0} does not exist")]
    UnknownView(ViewId),

    /// An overlay cannot host another overlay's root as its content.
    #[error("view {0} is an overlay and cannot be used as overlay content")]
    ContentIsOverlay(ViewId),

    /// Attaching would make a view its own ancestor.
    #[error("attaching view {child} to {parent} would create a cycle")]
    WouldCycle {
        /// The intended parent.
        parent: ViewId,
        /// The view being attached.
        child: ViewId,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
