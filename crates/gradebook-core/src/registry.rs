//! # Student Registry
//!
//! Durable CRUD over students and their subjects, plus grade recording and
//! filtered listing. This is the record store: every mutating operation is
//! one load-all, mutate-one, save-all cycle over the collection file, with
//! all validation performed before the write so a failed operation never
//! persists a partial mutation.

use crate::dates;
use crate::primitives::{GRADE_MAX, GRADE_MIN};
use crate::query::StudentFilter;
use crate::storage::CollectionFile;
use crate::types::{
    GradebookError, Grades, IdType, Stage, Student, StudentId, StudentPatch, Subject, SubjectId,
    SubjectPatch, round_grade,
};
use std::path::Path;

/// The file-backed student record store.
///
/// Constructed with an injected file path; holds no in-memory state across
/// calls beyond the write lock, so every operation observes the latest
/// durable state.
#[derive(Debug)]
pub struct StudentRegistry {
    file: CollectionFile,
}

impl StudentRegistry {
    /// Bind a registry to its collection file. The file need not exist yet.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: CollectionFile::new(path.as_ref()),
        }
    }

    /// Create an empty collection file if none exists. Idempotent.
    pub fn ensure_initialized(&self) -> Result<(), GradebookError> {
        self.file.ensure_initialized()
    }

    // =========================================================================
    // STUDENT OPERATIONS
    // =========================================================================

    /// Create a student with a fresh id.
    ///
    /// Fails with `Conflict` when the `(id_type, identifier)` pair already
    /// exists, and with `Validation` on an empty name/identifier or a
    /// malformed date. The registration date defaults to today.
    pub fn create_student(
        &self,
        name: &str,
        id_type: IdType,
        identifier: &str,
        registration_date: Option<&str>,
    ) -> Result<Student, GradebookError> {
        let name = required_text("student name", name)?;
        let identifier = required_text("student identifier", identifier)?;
        let registration_date = dates::parse_or_today(registration_date)?;

        self.file.with_write(|students| {
            if students
                .iter()
                .any(|s| s.id_type == id_type && s.identifier == identifier)
            {
                return Err(GradebookError::Conflict(format!(
                    "a student with {id_type} '{identifier}' already exists"
                )));
            }

            let student = Student {
                id: StudentId::generate(),
                name,
                id_type,
                identifier,
                registration_date,
                subjects: Vec::new(),
            };
            students.push(student.clone());
            Ok(student)
        })
    }

    /// Apply a structured patch to a student.
    ///
    /// Absent fields stay untouched; present fields replace, with empty
    /// strings rejected and the date revalidated. Changing the identity
    /// pair re-checks uniqueness against the rest of the store.
    pub fn update_student(
        &self,
        id: StudentId,
        patch: &StudentPatch,
    ) -> Result<Student, GradebookError> {
        let name = patch
            .name
            .as_deref()
            .map(|n| required_text("student name", n))
            .transpose()?;
        let identifier = patch
            .identifier
            .as_deref()
            .map(|i| required_text("student identifier", i))
            .transpose()?;
        let registration_date = patch
            .registration_date
            .as_deref()
            .map(dates::parse)
            .transpose()?;

        self.file.with_write(|students| {
            let current = find_student(students, id)?;
            let next_id_type = patch.id_type.unwrap_or(current.id_type);
            let next_identifier = identifier
                .clone()
                .unwrap_or_else(|| current.identifier.clone());

            let identity_changed =
                next_id_type != current.id_type || next_identifier != current.identifier;
            if identity_changed
                && students.iter().any(|s| {
                    s.id != id && s.id_type == next_id_type && s.identifier == next_identifier
                })
            {
                return Err(GradebookError::Conflict(format!(
                    "a student with {next_id_type} '{next_identifier}' already exists"
                )));
            }

            let student = find_student_mut(students, id)?;
            if let Some(name) = name.clone() {
                student.name = name;
            }
            student.id_type = next_id_type;
            student.identifier = next_identifier;
            if let Some(date) = registration_date {
                student.registration_date = date;
            }
            Ok(student.clone())
        })
    }

    /// Remove a student and every subject it owns.
    pub fn delete_student(&self, id: StudentId) -> Result<(), GradebookError> {
        self.file.with_write(|students| {
            let before = students.len();
            students.retain(|s| s.id != id);
            if students.len() == before {
                return Err(unknown_student(id));
            }
            Ok(())
        })
    }

    /// Look up a single student by id.
    pub fn get_student(&self, id: StudentId) -> Result<Student, GradebookError> {
        let students = self.file.load()?;
        students
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| unknown_student(id))
    }

    /// List students matching the filter, preserving insertion order.
    pub fn list_students(&self, filter: &StudentFilter) -> Result<Vec<Student>, GradebookError> {
        let mut students = self.file.load()?;
        students.retain(|s| filter.matches(s));
        Ok(students)
    }

    // =========================================================================
    // SUBJECT OPERATIONS
    // =========================================================================

    /// Enroll a student in a new subject, with all stages ungraded.
    pub fn add_subject(
        &self,
        student_id: StudentId,
        name: &str,
        registration_date: Option<&str>,
    ) -> Result<Subject, GradebookError> {
        let name = required_text("subject name", name)?;
        let registration_date = dates::parse_or_today(registration_date)?;

        self.file.with_write(|students| {
            let student = find_student_mut(students, student_id)?;
            let subject = Subject {
                id: SubjectId::generate(),
                name,
                registration_date,
                grades: Grades::ungraded(),
            };
            student.subjects.push(subject.clone());
            Ok(subject)
        })
    }

    /// Apply a structured patch to a subject. Same partial-update
    /// semantics as [`Self::update_student`].
    pub fn update_subject(
        &self,
        student_id: StudentId,
        subject_id: SubjectId,
        patch: &SubjectPatch,
    ) -> Result<Subject, GradebookError> {
        let name = patch
            .name
            .as_deref()
            .map(|n| required_text("subject name", n))
            .transpose()?;
        let registration_date = patch
            .registration_date
            .as_deref()
            .map(dates::parse)
            .transpose()?;

        self.file.with_write(|students| {
            let student = find_student_mut(students, student_id)?;
            let subject = find_subject_mut(student, subject_id)?;
            if let Some(name) = name.clone() {
                subject.name = name;
            }
            if let Some(date) = registration_date {
                subject.registration_date = date;
            }
            Ok(subject.clone())
        })
    }

    /// Remove a subject from a student.
    pub fn delete_subject(
        &self,
        student_id: StudentId,
        subject_id: SubjectId,
    ) -> Result<(), GradebookError> {
        self.file.with_write(|students| {
            let student = find_student_mut(students, student_id)?;
            let before = student.subjects.len();
            student.subjects.retain(|s| s.id != subject_id);
            if student.subjects.len() == before {
                return Err(unknown_subject(subject_id));
            }
            Ok(())
        })
    }

    /// Record a grade for one stage of a subject, overwriting any prior
    /// value. The value must lie in `[0, 10]` and is stored rounded to two
    /// decimals.
    pub fn set_grade(
        &self,
        student_id: StudentId,
        subject_id: SubjectId,
        stage: Stage,
        value: f64,
    ) -> Result<Subject, GradebookError> {
        if !(GRADE_MIN..=GRADE_MAX).contains(&value) {
            return Err(GradebookError::Validation(format!(
                "grade {value} is outside [{GRADE_MIN}, {GRADE_MAX}]"
            )));
        }

        self.file.with_write(|students| {
            let student = find_student_mut(students, student_id)?;
            let subject = find_subject_mut(student, subject_id)?;
            subject.grades.set(stage, round_grade(value));
            Ok(subject.clone())
        })
    }
}

// =============================================================================
// LOOKUP & VALIDATION HELPERS
// =============================================================================

fn unknown_student(id: StudentId) -> GradebookError {
    GradebookError::NotFound(format!("student {id}"))
}

fn unknown_subject(id: SubjectId) -> GradebookError {
    GradebookError::NotFound(format!("subject {id}"))
}

fn find_student(students: &[Student], id: StudentId) -> Result<&Student, GradebookError> {
    students
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| unknown_student(id))
}

fn find_student_mut(
    students: &mut [Student],
    id: StudentId,
) -> Result<&mut Student, GradebookError> {
    students
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| unknown_student(id))
}

fn find_subject_mut(
    student: &mut Student,
    id: SubjectId,
) -> Result<&mut Subject, GradebookError> {
    student
        .subjects
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| unknown_subject(id))
}

/// Reject empty or whitespace-only required text.
fn required_text(field: &str, value: &str) -> Result<String, GradebookError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GradebookError::Validation(format!(
            "{field} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}
