//! Duplicate key finder error type.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DupKeysError {
    /// Containers nest deeper than the configured limit.
    #[error("nesting exceeds {limit} levels at {}", display_path(.path))]
    DepthExceeded { path: String, limit: usize },
    #[error("max depth {limit} is above the supported {max}")]
    LimitTooHigh { limit: usize, max: usize },
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}
