//! Reading JSON input for the duplicate key finder.
//!
//! serde_json's parser refuses documents nested past 128 levels, well below
//! the configurable limit. Input is therefore scanned for its nesting first:
//! past `max_depth` it fails with [`DupKeysError::DepthExceeded`] and the path
//! of the offending container, otherwise it is parsed without serde_json's own
//! recursion limit (the scan already bounds the depth).

use super::{check_limit, DupKeysError};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Write as _;
use std::io::Read;
use std::path::Path;

/// Reads and parses a JSON document from disk, nested at most `max_depth` levels.
pub fn read_json(path: &Path, max_depth: usize) -> Result<Value> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read JSON file: {}", path.display()))?;
    check_nesting(&bytes, max_depth)?;
    parse_unbounded(&bytes).with_context(|| format!("parse JSON: {}", path.display()))
}

/// Reads and parses a JSON document from any reader (e.g. stdin).
pub fn read_json_from<R: Read>(mut reader: R, max_depth: usize) -> Result<Value> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .context("read JSON input")?;
    check_nesting(&bytes, max_depth)?;
    parse_unbounded(&bytes).context("parse JSON input")
}

fn parse_unbounded(bytes: &[u8]) -> serde_json::Result<Value> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    de.disable_recursion_limit();
    let value = Value::deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}

/// Position inside one open container.
enum Frame {
    Array(usize),
    Object { key: Option<String>, expect_key: bool },
}

/// Fails if any container opens at depth `max_depth` or deeper (root = 0).
///
/// Malformed input is scanned on a best-effort basis; reporting syntax errors
/// is left to the parser.
fn check_nesting(bytes: &[u8], max_depth: usize) -> Result<(), DupKeysError> {
    check_limit(max_depth)?;
    let mut stack: Vec<Frame> = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let end = string_end(bytes, i);
                if let Some(Frame::Object { key, expect_key }) = stack.last_mut() {
                    if *expect_key {
                        *key = Some(decode_key(&bytes[i..(end + 1).min(bytes.len())]));
                        *expect_key = false;
                    }
                }
                i = end;
            }
            open @ (b'[' | b'{') => {
                if stack.len() >= max_depth {
                    return Err(DupKeysError::DepthExceeded {
                        path: frame_path(&stack),
                        limit: max_depth,
                    });
                }
                stack.push(if open == b'[' {
                    Frame::Array(0)
                } else {
                    Frame::Object {
                        key: None,
                        expect_key: true,
                    }
                });
            }
            b']' | b'}' => {
                stack.pop();
            }
            b',' => match stack.last_mut() {
                Some(Frame::Array(index)) => *index += 1,
                Some(Frame::Object { expect_key, .. }) => *expect_key = true,
                None => {}
            },
            _ => {}
        }
        i += 1;
    }
    Ok(())
}

/// Index of the quote closing the string opened at `start`, or `bytes.len()`.
fn string_end(bytes: &[u8], start: usize) -> usize {
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'"' => return j,
            _ => j += 1,
        }
    }
    bytes.len()
}

fn decode_key(raw: &[u8]) -> String {
    serde_json::from_slice::<String>(raw).unwrap_or_else(|_| {
        let inner = raw.get(1..).unwrap_or_default();
        let inner = inner.strip_suffix(b"\"").unwrap_or(inner);
        String::from_utf8_lossy(inner).into_owned()
    })
}

/// Path of the value the innermost open container is positioned at.
fn frame_path(stack: &[Frame]) -> String {
    let mut path = String::new();
    for frame in stack {
        match frame {
            Frame::Array(index) => {
                let _ = write!(path, "[{index}]");
            }
            Frame::Object { key, .. } => {
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(key.as_deref().unwrap_or_default());
            }
        }
    }
    path
}
