//! # Student Collection File
//!
//! The student collection lives in a single JSON document wrapped in a
//! revision envelope:
//!
//! ```json
//! { "revision": 7, "students": [ ... ] }
//! ```
//!
//! A bare top-level array (the pre-envelope layout) still loads, as
//! revision 0. Every write bumps the revision and re-checks the on-disk
//! revision against the one it loaded; a mismatch means a foreign writer
//! interleaved and the write fails with a conflict instead of silently
//! discarding the other writer's change. Writers inside one process are
//! additionally serialized by a mutex, so the check only ever trips for
//! writers outside this process.

use super::{read_json, write_json_atomic};
use crate::types::{GradebookError, Student};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Versioned on-disk layout of the student collection.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    revision: u64,
    students: Vec<Student>,
}

/// Accepts both the enveloped layout and the legacy bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredCollection {
    Versioned(Envelope),
    Legacy(Vec<Student>),
}

/// Handle on the student collection file.
///
/// Constructed with an explicit path so tests can point each instance at
/// isolated temporary storage. There is no in-memory cache across calls:
/// every operation re-reads the file, so it always observes the latest
/// durable state.
#[derive(Debug)]
pub struct CollectionFile {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CollectionFile {
    /// Bind a handle to a collection file path. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full collection. A missing file is an empty collection.
    pub fn load(&self) -> Result<Vec<Student>, GradebookError> {
        Ok(self.load_versioned()?.1)
    }

    fn load_versioned(&self) -> Result<(u64, Vec<Student>), GradebookError> {
        match read_json::<StoredCollection>(&self.path)? {
            None => Ok((0, Vec::new())),
            Some(StoredCollection::Versioned(env)) => Ok((env.revision, env.students)),
            Some(StoredCollection::Legacy(students)) => Ok((0, students)),
        }
    }

    /// Create an empty enveloped collection if no file exists yet.
    pub fn ensure_initialized(&self) -> Result<(), GradebookError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.path.exists() {
            return Ok(());
        }
        write_json_atomic(
            &self.path,
            &Envelope {
                revision: 0,
                students: Vec::new(),
            },
        )
    }

    /// Run one load-all, mutate-one, save-all cycle.
    ///
    /// The mutation closure gets the freshly loaded collection; if it
    /// fails, nothing is written. On success the collection is persisted
    /// atomically with the revision bumped, after verifying the on-disk
    /// revision still matches the loaded one (optimistic check against
    /// foreign writers).
    pub fn with_write<T>(
        &self,
        mutate: impl FnOnce(&mut Vec<Student>) -> Result<T, GradebookError>,
    ) -> Result<T, GradebookError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let (loaded_revision, mut students) = self.load_versioned()?;
        let outcome = mutate(&mut students)?;

        let (current_revision, _) = self.load_versioned()?;
        if current_revision != loaded_revision {
            return Err(GradebookError::Conflict(format!(
                "student collection changed underneath this write (revision {current_revision}, expected {loaded_revision})"
            )));
        }

        write_json_atomic(
            &self.path,
            &Envelope {
                revision: loaded_revision + 1,
                students,
            },
        )?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IdType, StudentId};

    fn sample(name: &str) -> Student {
        Student {
            id: StudentId::generate(),
            name: name.to_string(),
            id_type: IdType::NationalId,
            identifier: name.to_lowercase(),
            registration_date: crate::dates::today(),
            subjects: Vec::new(),
        }
    }

    #[test]
    fn missing_file_is_empty_collection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = CollectionFile::new(dir.path().join("students.json"));
        assert!(file.load().expect("load").is_empty());
    }

    #[test]
    fn write_persists_and_bumps_revision() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = CollectionFile::new(dir.path().join("students.json"));

        file.with_write(|students| {
            students.push(sample("Ana"));
            Ok(())
        })
        .expect("first write");
        file.with_write(|students| {
            students.push(sample("Bruno"));
            Ok(())
        })
        .expect("second write");

        let (revision, students) = file.load_versioned().expect("load");
        assert_eq!(revision, 2);
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].name, "Ana");
    }

    #[test]
    fn failed_mutation_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = CollectionFile::new(dir.path().join("students.json"));
        file.with_write(|students| {
            students.push(sample("Ana"));
            Ok(())
        })
        .expect("seed");

        let result: Result<(), _> = file.with_write(|students| {
            students.clear();
            Err(GradebookError::Validation("nope".into()))
        });
        assert!(result.is_err());

        assert_eq!(file.load().expect("load").len(), 1);
    }

    #[test]
    fn legacy_bare_array_loads_as_revision_zero() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("students.json");
        let legacy = serde_json::to_string(&vec![sample("Ana")]).expect("encode");
        std::fs::write(&path, legacy).expect("write");

        let file = CollectionFile::new(&path);
        let (revision, students) = file.load_versioned().expect("load");
        assert_eq!(revision, 0);
        assert_eq!(students.len(), 1);

        // First write migrates to the enveloped layout
        file.with_write(|_| Ok(())).expect("migrate");
        let (revision, _) = file.load_versioned().expect("reload");
        assert_eq!(revision, 1);
    }

    #[test]
    fn foreign_revision_bump_is_a_conflict() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("students.json");
        let file = CollectionFile::new(&path);
        file.ensure_initialized().expect("init");

        let result: Result<(), _> = file.with_write(|students| {
            // Simulate a foreign writer landing between load and save
            let foreign = CollectionFile::new(&path);
            foreign
                .with_write(|s| {
                    s.push(sample("Intruso"));
                    Ok(())
                })
                .expect("foreign write");

            students.push(sample("Ana"));
            Ok(())
        });

        assert!(matches!(result, Err(GradebookError::Conflict(_))));
        // The foreign write survives untouched
        let students = file.load().expect("load");
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].name, "Intruso");
    }

    #[test]
    fn ensure_initialized_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = CollectionFile::new(dir.path().join("students.json"));
        file.ensure_initialized().expect("first");
        file.with_write(|students| {
            students.push(sample("Ana"));
            Ok(())
        })
        .expect("write");
        file.ensure_initialized().expect("second");
        assert_eq!(file.load().expect("load").len(), 1);
    }
}
