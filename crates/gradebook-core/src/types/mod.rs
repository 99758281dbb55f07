//! # Core Type Definitions
//!
//! This module contains all core types for the Gradebook record store:
//! - Record identifiers (`StudentId`, `SubjectId`)
//! - The persisted data model (`Student`, `Subject`, `Grades`)
//! - Enumerated tags (`IdType`, `Stage`, `Status`)
//! - Structured patch types (`StudentPatch`, `SubjectPatch`)
//! - Error types (`GradebookError`)
//!
//! ## Derivation Guarantees
//!
//! `average` and `status` are computed from the stored grades at read time
//! and are never persisted. A subject has an average only once all three
//! stage grades are set; until then it is in progress.

use crate::primitives::{PASSING_AVERAGE, STAGE_1_WEIGHT, STAGE_2_WEIGHT, STAGE_3_WEIGHT};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// =============================================================================
// RECORD IDENTIFIERS
// =============================================================================

/// Unique identifier for a student record.
///
/// Generated at creation, never reused or mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub Uuid);

impl StudentId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a subject owned by a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(pub Uuid);

impl SubjectId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// ENUMERATED TAGS
// =============================================================================

/// Kind of identifier a student registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IdType {
    /// Institution-issued enrollment number.
    #[serde(rename = "ENROLLMENT_NUMBER")]
    EnrollmentNumber,
    /// Government-issued national identity number.
    #[serde(rename = "NATIONAL_ID")]
    NationalId,
}

impl IdType {
    /// Wire tag for this identifier kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnrollmentNumber => "ENROLLMENT_NUMBER",
            Self::NationalId => "NATIONAL_ID",
        }
    }
}

impl std::fmt::Display for IdType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grading stage of a subject. Every subject carries exactly these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "STAGE_1")]
    Stage1,
    #[serde(rename = "STAGE_2")]
    Stage2,
    #[serde(rename = "STAGE_3")]
    Stage3,
}

impl Stage {
    /// All stages in grading order.
    pub const ALL: [Self; 3] = [Self::Stage1, Self::Stage2, Self::Stage3];

    /// Weight of this stage in the subject average.
    #[must_use]
    pub const fn weight(self) -> f64 {
        match self {
            Self::Stage1 => STAGE_1_WEIGHT,
            Self::Stage2 => STAGE_2_WEIGHT,
            Self::Stage3 => STAGE_3_WEIGHT,
        }
    }

    /// Wire tag for this stage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stage1 => "STAGE_1",
            Self::Stage2 => "STAGE_2",
            Self::Stage3 => "STAGE_3",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived standing of a subject, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// At least one stage is still ungraded.
    #[serde(rename = "IN_PROGRESS")]
    InProgress,
    /// All stages graded and the weighted average reached the passing mark.
    #[serde(rename = "APPROVED")]
    Approved,
    /// All stages graded and the weighted average fell short.
    #[serde(rename = "FAILED")]
    Failed,
}

// =============================================================================
// GRADES
// =============================================================================

/// Round a grade or average to two decimal places.
#[must_use]
pub fn round_grade(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The fixed three-stage grade mapping of a subject.
///
/// All three keys are always present; an unset stage is `None` (ungraded).
/// Values, once set, lie in `[GRADE_MIN, GRADE_MAX]` and are stored rounded
/// to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Grades {
    #[serde(rename = "STAGE_1")]
    pub stage_1: Option<f64>,
    #[serde(rename = "STAGE_2")]
    pub stage_2: Option<f64>,
    #[serde(rename = "STAGE_3")]
    pub stage_3: Option<f64>,
}

impl Grades {
    /// A fresh all-ungraded mapping.
    #[must_use]
    pub fn ungraded() -> Self {
        Self::default()
    }

    /// Grade recorded for a stage, if any.
    #[must_use]
    pub const fn get(&self, stage: Stage) -> Option<f64> {
        match stage {
            Stage::Stage1 => self.stage_1,
            Stage::Stage2 => self.stage_2,
            Stage::Stage3 => self.stage_3,
        }
    }

    /// Overwrite the grade for a stage. The caller validates the range.
    pub fn set(&mut self, stage: Stage, value: f64) {
        match stage {
            Stage::Stage1 => self.stage_1 = Some(value),
            Stage::Stage2 => self.stage_2 = Some(value),
            Stage::Stage3 => self.stage_3 = Some(value),
        }
    }

    /// Weighted average over the three stages, rounded to two decimals.
    ///
    /// Defined only when every stage has been graded; `None` means the
    /// subject is still in progress.
    #[must_use]
    pub fn average(&self) -> Option<f64> {
        let (g1, g2, g3) = (self.stage_1?, self.stage_2?, self.stage_3?);
        let weighted = g1 * Stage::Stage1.weight() + g2 * Stage::Stage2.weight() + g3 * Stage::Stage3.weight();
        Some(round_grade(weighted))
    }

    /// Derived standing: in progress until fully graded, then approved or
    /// failed against the passing threshold.
    #[must_use]
    pub fn status(&self) -> Status {
        match self.average() {
            None => Status::InProgress,
            Some(avg) if avg >= PASSING_AVERAGE => Status::Approved,
            Some(_) => Status::Failed,
        }
    }
}

// =============================================================================
// PERSISTED RECORDS
// =============================================================================

/// A subject enrolled by a student, owning its three stage grades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub registration_date: NaiveDate,
    pub grades: Grades,
}

impl Subject {
    /// Derived weighted average, when fully graded.
    #[must_use]
    pub fn average(&self) -> Option<f64> {
        self.grades.average()
    }

    /// Derived standing.
    #[must_use]
    pub fn status(&self) -> Status {
        self.grades.status()
    }
}

/// A student record, exclusively owning its subjects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub id_type: IdType,
    pub identifier: String,
    pub registration_date: NaiveDate,
    pub subjects: Vec<Subject>,
}

// =============================================================================
// STRUCTURED PATCHES
// =============================================================================

/// Partial update for a student's mutable attributes.
///
/// An absent field leaves the attribute unchanged. A present but empty
/// string is rejected with [`GradebookError::Validation`] — a caller that
/// wants to keep a field must omit it, not blank it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub id_type: Option<IdType>,
    pub identifier: Option<String>,
    /// Replacement registration date, revalidated against the fixed format.
    pub registration_date: Option<String>,
}

impl StudentPatch {
    /// True when no field is present (the update is a no-op).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.id_type.is_none()
            && self.identifier.is_none()
            && self.registration_date.is_none()
    }
}

/// Partial update for a subject's mutable attributes.
///
/// Same present/absent semantics as [`StudentPatch`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubjectPatch {
    pub name: Option<String>,
    pub registration_date: Option<String>,
}

impl SubjectPatch {
    /// True when no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.registration_date.is_none()
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by the Gradebook core.
///
/// - No silent failures
/// - Validation happens before any write, so a failed operation never
///   leaves a partial mutation on disk
/// - The core never panics; all errors are recoverable
#[derive(Debug, Error)]
pub enum GradebookError {
    /// Malformed date, out-of-range grade, or empty required text field.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Duplicate `(id_type, identifier)` pair, or a write raced a foreign
    /// writer and lost the revision check.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Unknown student or subject id.
    #[error("not found: {0}")]
    NotFound(String),

    /// Failed credential verification.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Underlying file I/O failure.
    #[error("I/O error: {0}")]
    Io(String),

    /// A persisted file could not be parsed or a record could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn graded(g1: f64, g2: f64, g3: f64) -> Grades {
        Grades {
            stage_1: Some(g1),
            stage_2: Some(g2),
            stage_3: Some(g3),
        }
    }

    #[test]
    fn average_weights_stages() {
        // 0.3*6 + 0.3*7 + 0.4*8 = 7.10
        assert_eq!(graded(6.0, 7.0, 8.0).average(), Some(7.1));
    }

    #[test]
    fn average_rounds_to_two_decimals() {
        // 0.3*7.77 + 0.3*8.33 + 0.4*9.99 = 8.826 -> 8.83
        assert_eq!(graded(7.77, 8.33, 9.99).average(), Some(8.83));
    }

    #[test]
    fn average_undefined_until_fully_graded() {
        let mut grades = Grades::ungraded();
        assert_eq!(grades.average(), None);
        assert_eq!(grades.status(), Status::InProgress);

        grades.set(Stage::Stage1, 9.0);
        grades.set(Stage::Stage3, 9.0);
        assert_eq!(grades.average(), None);
        assert_eq!(grades.status(), Status::InProgress);
    }

    #[test]
    fn status_threshold_is_inclusive() {
        assert_eq!(graded(7.0, 7.0, 7.0).status(), Status::Approved);
        assert_eq!(graded(6.9, 7.0, 7.0).status(), Status::Failed);
    }

    #[test]
    fn grades_wire_tags_are_stage_names() {
        let json = serde_json::to_value(graded(1.0, 2.0, 3.0)).expect("serialize");
        assert_eq!(json["STAGE_1"], 1.0);
        assert_eq!(json["STAGE_2"], 2.0);
        assert_eq!(json["STAGE_3"], 3.0);
    }

    #[test]
    fn status_wire_tags() {
        assert_eq!(
            serde_json::to_value(Status::InProgress).expect("serialize"),
            "IN_PROGRESS"
        );
        assert_eq!(
            serde_json::to_value(Status::Approved).expect("serialize"),
            "APPROVED"
        );
        assert_eq!(
            serde_json::to_value(Status::Failed).expect("serialize"),
            "FAILED"
        );
    }

    #[test]
    fn id_type_round_trips_wire_tags() {
        for (tag, id_type) in [
            ("ENROLLMENT_NUMBER", IdType::EnrollmentNumber),
            ("NATIONAL_ID", IdType::NationalId),
        ] {
            let parsed: IdType =
                serde_json::from_value(serde_json::Value::String(tag.into())).expect("parse");
            assert_eq!(parsed, id_type);
            assert_eq!(id_type.as_str(), tag);
        }
    }

    #[test]
    fn unknown_stage_tag_rejected() {
        let result: Result<Stage, _> = serde_json::from_str("\"STAGE_4\"");
        assert!(result.is_err());
    }

    #[test]
    fn patch_emptiness() {
        assert!(StudentPatch::default().is_empty());
        let patch = StudentPatch {
            name: Some("Ana".into()),
            ..StudentPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
