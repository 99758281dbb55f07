//! # File-Backed Storage
//!
//! JSON flat-file persistence for the Gradebook stores.
//!
//! All writes are atomic: the serialized document goes to a sibling `.tmp`
//! file which is then renamed over the original, so a reader never observes
//! a partially-written file even if the process dies mid-write. A missing
//! file reads as "no document yet" rather than an error.

mod collection;

pub use collection::CollectionFile;

use crate::types::GradebookError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Read and parse a JSON document, `None` when the file does not exist.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, GradebookError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(GradebookError::Io(format!(
                "cannot read {}: {e}",
                path.display()
            )));
        }
    };

    let value = serde_json::from_str(&raw).map_err(|e| {
        GradebookError::Serialization(format!("cannot parse {}: {e}", path.display()))
    })?;
    Ok(Some(value))
}

/// Serialize a document and atomically replace the file at `path`.
///
/// Creates the parent directory on first write. The temp file lives in the
/// same directory so the final rename stays on one filesystem.
pub(crate) fn write_json_atomic<T: Serialize>(
    path: &Path,
    value: &T,
) -> Result<(), GradebookError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                GradebookError::Io(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
    }

    let serialized = serde_json::to_string_pretty(value).map_err(|e| {
        GradebookError::Serialization(format!("cannot encode {}: {e}", path.display()))
    })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serialized)
        .map_err(|e| GradebookError::Io(format!("cannot write {}: {e}", tmp.display())))?;
    fs::rename(&tmp, path)
        .map_err(|e| GradebookError::Io(format!("cannot replace {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.json");
        let read: Option<BTreeMap<String, u64>> = read_json(&path).expect("read");
        assert!(read.is_none());
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/tokens.json");

        let mut doc = BTreeMap::new();
        doc.insert("abc".to_string(), 42u64);
        write_json_atomic(&path, &doc).expect("write");

        let read: Option<BTreeMap<String, u64>> = read_json(&path).expect("read");
        assert_eq!(read, Some(doc));
        // No temp file left behind
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").expect("write");

        let read: Result<Option<BTreeMap<String, u64>>, _> = read_json(&path);
        assert!(matches!(read, Err(GradebookError::Serialization(_))));
    }
}
