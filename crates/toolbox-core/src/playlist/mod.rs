//! Playlist extractor: turns the items of a video playlist page into
//! download command lines, one per item.
//!
//! Items are the elements carrying every configured class marker; each one
//! contributes `prefix + key` where `key` is its `data-key` attribute.

mod document;
mod error;
mod gate;

pub use document::{data_attribute_name, ElementTree, HtmlDocument, StaticElement, StaticTree};
pub use error::PlaylistError;
pub use gate::{run_when_loaded, ReadyState};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Command prepended to each item key.
pub const DEFAULT_PREFIX: &str = "you-get -c cookies.sqlite https://www.bilibili.com/video/";

/// Wait after load before extracting, for client-side rendering to finish.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(10);

/// Stands in for the key of an item that has none.
pub const MISSING_KEY_MARKER: &str = "N/A";

/// What to emit for an item whose key attribute is absent or empty.
///
/// An attribute that is present but empty (`data-key=""`) counts as missing
/// and is handled the same way as one that is not there at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingKeyPolicy {
    /// Emit `prefix + "N/A"` so the line count still matches the item count.
    #[default]
    Placeholder,
    /// Leave the item out of the report.
    Skip,
}

#[derive(Debug, Clone)]
pub struct PlaylistOptions {
    pub prefix: String,
    pub item_classes: Vec<String>,
    /// Dataset key of the item identifier (`key` reads `data-key`).
    pub key_attribute: String,
    pub missing_key: MissingKeyPolicy,
}

impl Default for PlaylistOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            item_classes: vec![
                "pod-item".to_string(),
                "video-pod__item".to_string(),
                "simple".to_string(),
            ],
            key_attribute: "key".to_string(),
            missing_key: MissingKeyPolicy::Placeholder,
        }
    }
}

/// Extracted command lines in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistReport {
    pub lines: Vec<String>,
    /// Matched items without a usable key (whether or not a line was emitted).
    pub missing: usize,
}

impl PlaylistReport {
    /// Lines joined with `\n`, no trailing newline. Empty when nothing matched.
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

/// Extracts one command line per playlist item of `tree`.
pub fn extract_playlist<T>(tree: &T, opts: &PlaylistOptions) -> Result<PlaylistReport, PlaylistError>
where
    T: ElementTree + ?Sized,
{
    let keys = tree.data_attribute_values(&opts.item_classes, &opts.key_attribute)?;
    let matched = keys.len();

    let mut report = PlaylistReport::default();
    for key in keys {
        match key.filter(|k| !k.is_empty()) {
            Some(key) => report.lines.push(format!("{}{}", opts.prefix, key)),
            None => {
                report.missing += 1;
                if opts.missing_key == MissingKeyPolicy::Placeholder {
                    report
                        .lines
                        .push(format!("{}{}", opts.prefix, MISSING_KEY_MARKER));
                }
            }
        }
    }

    if report.missing > 0 {
        tracing::warn!(
            missing = report.missing,
            policy = ?opts.missing_key,
            "playlist items without a key"
        );
    }
    tracing::info!(items = matched, lines = report.lines.len(), "playlist extracted");
    Ok(report)
}
