//! `toolbox dup-keys [path]` – report keys found at more than one path.

use anyhow::Result;
use serde_json::Value;
use std::io;
use std::path::PathBuf;
use toolbox_core::dupkeys::{self, DuplicateKeys};

/// Loads the document and returns its duplicate keys.
pub fn find_in_input(path: Option<PathBuf>, max_depth: usize) -> Result<DuplicateKeys> {
    let value: Value = match &path {
        Some(path) => dupkeys::read_json(path, max_depth)?,
        None => dupkeys::read_json_from(io::stdin().lock(), max_depth)?,
    };
    Ok(dupkeys::find_duplicate_keys_with_limit(&value, max_depth)?)
}

pub fn run_dup_keys(path: Option<PathBuf>, max_depth: usize, compact: bool) -> Result<()> {
    let dups = find_in_input(path, max_depth)?;
    let out = if compact {
        serde_json::to_string(&dups)?
    } else {
        serde_json::to_string_pretty(&dups)?
    };
    println!("{out}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn finds_duplicates_in_file() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(br#"{"items":[{"id":1},{"id":2}],"meta":{"count":2}}"#)
            .unwrap();
        f.flush().unwrap();
        let dups = find_in_input(Some(f.path().to_path_buf()), 64).unwrap();
        assert_eq!(
            serde_json::to_string(&dups).unwrap(),
            r#"{"id":["items[0].id","items[1].id"]}"#
        );
    }

    #[test]
    fn depth_error_surfaces_through_anyhow() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(br#"{"a":{"b":{}}}"#).unwrap();
        f.flush().unwrap();
        let err = find_in_input(Some(f.path().to_path_buf()), 2).unwrap_err();
        assert_eq!(format!("{err:#}"), "nesting exceeds 2 levels at a.b");
    }

    #[test]
    fn deep_file_reports_depth_not_parse_error() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{}1{}", "[".repeat(200), "]".repeat(200)).unwrap();
        f.flush().unwrap();
        let err = find_in_input(Some(f.path().to_path_buf()), 128).unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            format!("nesting exceeds 128 levels at {}", "[0]".repeat(128))
        );
        assert!(find_in_input(Some(f.path().to_path_buf()), 512)
            .unwrap()
            .is_empty());
    }
}
