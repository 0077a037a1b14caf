//! Playlist extraction error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaylistError {
    /// No class markers configured, so no element could ever match.
    #[error("no item classes configured")]
    NoItemClasses,
    /// A class marker that cannot be used as a CSS class selector.
    #[error("invalid item class {0:?}: expected [A-Za-z0-9_-] not starting with a digit")]
    InvalidClass(String),
    /// The key attribute name is empty or not a valid dataset name.
    #[error("invalid key attribute {0:?}")]
    InvalidAttribute(String),
    /// The document tree rejected the built selector.
    #[error("selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },
    /// The ready-state signal went away before the document finished loading.
    #[error("document load signal closed before the page completed loading")]
    LoadAborted,
}
