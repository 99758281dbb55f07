//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API, including the
//! boundary validation that runs before a payload reaches the core:
//! length caps on free-text fields, the minimum new-password length, and
//! enum tags for id types and grading stages (unknown tags are rejected
//! during deserialization).

use gradebook_core::{
    GradebookError, Grades, IdType, Stage, Status, Student, StudentFilter, StudentPatch, Subject,
    SubjectPatch,
    primitives::{MAX_IDENTIFIER_LENGTH, MAX_NAME_LENGTH, MIN_PASSWORD_LENGTH},
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Error payload returned alongside non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

// =============================================================================
// AUTH PAYLOADS
// =============================================================================

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Password rotation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

impl ChangePasswordRequest {
    /// Boundary validation: the new password must meet the minimum length.
    pub fn validate(&self) -> Result<(), GradebookError> {
        if self.new_password.len() < MIN_PASSWORD_LENGTH {
            return Err(GradebookError::Validation(format!(
                "new password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

// =============================================================================
// STUDENT PAYLOADS
// =============================================================================

/// Student creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    pub name: String,
    pub id_type: IdType,
    pub identifier: String,
    pub registration_date: Option<String>,
}

impl CreateStudentRequest {
    /// Boundary validation: cap free-text lengths before they reach the
    /// store. Emptiness and date validity are the core's responsibility.
    pub fn validate(&self) -> Result<(), GradebookError> {
        check_length("name", &self.name, MAX_NAME_LENGTH)?;
        check_length("identifier", &self.identifier, MAX_IDENTIFIER_LENGTH)
    }
}

/// Student partial-update request. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub id_type: Option<IdType>,
    pub identifier: Option<String>,
    pub registration_date: Option<String>,
}

impl UpdateStudentRequest {
    pub fn validate(&self) -> Result<(), GradebookError> {
        if let Some(name) = &self.name {
            check_length("name", name, MAX_NAME_LENGTH)?;
        }
        if let Some(identifier) = &self.identifier {
            check_length("identifier", identifier, MAX_IDENTIFIER_LENGTH)?;
        }
        Ok(())
    }

    /// Convert into the core's structured patch.
    pub fn into_patch(self) -> StudentPatch {
        StudentPatch {
            name: self.name,
            id_type: self.id_type,
            identifier: self.identifier,
            registration_date: self.registration_date,
        }
    }
}

/// Query-string filters for listing students.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentQuery {
    pub name: Option<String>,
    pub id_type: Option<IdType>,
    pub identifier: Option<String>,
    pub registered_from: Option<String>,
    pub registered_to: Option<String>,
}

impl StudentQuery {
    /// Parse the date bounds and build the core filter.
    pub fn into_filter(self) -> Result<StudentFilter, GradebookError> {
        Ok(StudentFilter {
            name: self.name,
            id_type: self.id_type,
            identifier: self.identifier,
            registered_from: self
                .registered_from
                .as_deref()
                .map(gradebook_core::dates::parse)
                .transpose()?,
            registered_to: self
                .registered_to
                .as_deref()
                .map(gradebook_core::dates::parse)
                .transpose()?,
        })
    }
}

// =============================================================================
// SUBJECT PAYLOADS
// =============================================================================

/// Subject creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubjectRequest {
    pub name: String,
    pub registration_date: Option<String>,
}

impl CreateSubjectRequest {
    pub fn validate(&self) -> Result<(), GradebookError> {
        check_length("name", &self.name, MAX_NAME_LENGTH)
    }
}

/// Subject partial-update request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
    pub registration_date: Option<String>,
}

impl UpdateSubjectRequest {
    pub fn validate(&self) -> Result<(), GradebookError> {
        if let Some(name) = &self.name {
            check_length("name", name, MAX_NAME_LENGTH)?;
        }
        Ok(())
    }

    pub fn into_patch(self) -> SubjectPatch {
        SubjectPatch {
            name: self.name,
            registration_date: self.registration_date,
        }
    }
}

/// Grade recording request for one stage of a subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetGradeRequest {
    pub stage: Stage,
    pub grade: f64,
}

// =============================================================================
// VIEWS (derived fields computed at read time)
// =============================================================================

/// Subject as returned by the API: stored fields plus derived
/// `average`/`status`, computed on the way out and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectView {
    pub id: gradebook_core::SubjectId,
    pub name: String,
    pub registration_date: String,
    pub grades: Grades,
    pub average: Option<f64>,
    pub status: Status,
}

impl From<&Subject> for SubjectView {
    fn from(subject: &Subject) -> Self {
        Self {
            id: subject.id,
            name: subject.name.clone(),
            registration_date: subject.registration_date.to_string(),
            grades: subject.grades,
            average: subject.average(),
            status: subject.status(),
        }
    }
}

/// Student as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentView {
    pub id: gradebook_core::StudentId,
    pub name: String,
    pub id_type: IdType,
    pub identifier: String,
    pub registration_date: String,
    pub subjects: Vec<SubjectView>,
}

impl From<&Student> for StudentView {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id,
            name: student.name.clone(),
            id_type: student.id_type,
            identifier: student.identifier.clone(),
            registration_date: student.registration_date.to_string(),
            subjects: student.subjects.iter().map(SubjectView::from).collect(),
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn check_length(field: &str, value: &str, max: usize) -> Result<(), GradebookError> {
    if value.len() > max {
        return Err(GradebookError::Validation(format!(
            "{field} length {} exceeds maximum {max} bytes",
            value.len()
        )));
    }
    Ok(())
}
