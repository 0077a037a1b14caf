//! Duplicate key finder: reports every object key that occurs at more than
//! one place in a JSON document, with the path of each occurrence.
//!
//! Paths use `.key` for object members and `[index]` for array elements;
//! a key at the root is written bare, e.g. `items[0].id`.

mod error;
mod load;

pub use error::DupKeysError;
pub use load::{read_json, read_json_from};

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::HashMap;

/// Nesting limit used by [`find_duplicate_keys`].
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Largest accepted `max_depth`; keeps both the parse and the walk well inside
/// a thread's stack.
pub const MAX_DEPTH_LIMIT: usize = 1024;

/// Keys seen at two or more paths, in order of first occurrence.
/// Serializes as a JSON object `{ key: [path, ...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateKeys {
    entries: Vec<(String, Vec<String>)>,
}

impl DuplicateKeys {
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, paths)| paths.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, paths)| (k.as_str(), paths.as_slice()))
    }
}

impl Serialize for DuplicateKeys {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, paths) in &self.entries {
            map.serialize_entry(key, paths)?;
        }
        map.end()
    }
}

/// Finds duplicate keys in `data`, failing past [`DEFAULT_MAX_DEPTH`] levels of nesting.
pub fn find_duplicate_keys(data: &Value) -> Result<DuplicateKeys, DupKeysError> {
    find_duplicate_keys_with_limit(data, DEFAULT_MAX_DEPTH)
}

/// Finds duplicate keys in `data`, allowing at most `max_depth` nested arrays/objects.
///
/// Scalars and `null` (including a scalar root) contribute nothing.
pub fn find_duplicate_keys_with_limit(
    data: &Value,
    max_depth: usize,
) -> Result<DuplicateKeys, DupKeysError> {
    check_limit(max_depth)?;
    let mut walker = Walker {
        max_depth,
        index: HashMap::new(),
        seen: Vec::new(),
    };
    walker.walk(data, "", 0)?;

    let total_keys = walker.seen.len();
    let entries: Vec<_> = walker
        .seen
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .collect();
    tracing::debug!(
        distinct_keys = total_keys,
        duplicated = entries.len(),
        "duplicate key scan finished"
    );
    Ok(DuplicateKeys { entries })
}

fn check_limit(max_depth: usize) -> Result<(), DupKeysError> {
    if max_depth > MAX_DEPTH_LIMIT {
        return Err(DupKeysError::LimitTooHigh {
            limit: max_depth,
            max: MAX_DEPTH_LIMIT,
        });
    }
    Ok(())
}

/// Accumulates key → paths during one traversal.
struct Walker {
    max_depth: usize,
    index: HashMap<String, usize>,
    seen: Vec<(String, Vec<String>)>,
}

impl Walker {
    fn walk(&mut self, value: &Value, path: &str, depth: usize) -> Result<(), DupKeysError> {
        match value {
            Value::Array(items) => {
                self.enter(path, depth)?;
                for (i, item) in items.iter().enumerate() {
                    self.walk(item, &format!("{path}[{i}]"), depth + 1)?;
                }
            }
            Value::Object(map) => {
                self.enter(path, depth)?;
                for (key, child) in map {
                    let child_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{path}.{key}")
                    };
                    self.record(key, child_path.clone());
                    self.walk(child, &child_path, depth + 1)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn enter(&self, path: &str, depth: usize) -> Result<(), DupKeysError> {
        if depth >= self.max_depth {
            return Err(DupKeysError::DepthExceeded {
                path: path.to_string(),
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn record(&mut self, key: &str, path: String) {
        match self.index.get(key) {
            Some(&i) => self.seen[i].1.push(path),
            None => {
                self.index.insert(key.to_string(), self.seen.len());
                self.seen.push((key.to_string(), vec![path]));
            }
        }
    }
}
