//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers, translating
//! core error kinds into status codes:
//!
//! | Core error       | Status |
//! |------------------|--------|
//! | `Validation`     | 400    |
//! | `Auth`           | 401    |
//! | `NotFound`       | 404    |
//! | `Conflict`       | 409    |
//! | `Io`/`Serialization` | 500 |

use super::{
    AppState, auth,
    types::{
        ChangePasswordRequest, CreateStudentRequest, CreateSubjectRequest, ErrorResponse,
        HealthResponse, LoginRequest, SetGradeRequest, StudentQuery, StudentView, SubjectView,
        TokenResponse, UpdateStudentRequest, UpdateSubjectRequest,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use gradebook_core::{GradebookError, StudentId, SubjectId};

/// Map a core error to its HTTP status.
fn error_status(err: &GradebookError) -> StatusCode {
    match err {
        GradebookError::Validation(_) => StatusCode::BAD_REQUEST,
        GradebookError::Auth(_) => StatusCode::UNAUTHORIZED,
        GradebookError::NotFound(_) => StatusCode::NOT_FOUND,
        GradebookError::Conflict(_) => StatusCode::CONFLICT,
        GradebookError::Io(_) | GradebookError::Serialization(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Error payload + status for a core error.
fn error_response(err: &GradebookError) -> (StatusCode, Json<ErrorResponse>) {
    let status = error_status(err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "internal failure");
    }
    (status, Json(ErrorResponse::new(err.to_string())))
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// AUTH HANDLERS
// =============================================================================

/// Log in with the admin credentials and receive a session token.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    match state
        .credentials
        .verify_user(&request.username, &request.password)
    {
        Ok(true) => match state.tokens.issue_default() {
            Ok(token) => (StatusCode::OK, Json(TokenResponse { token })).into_response(),
            Err(e) => error_response(&e).into_response(),
        },
        Ok(false) => {
            tracing::warn!(
                event = "auth_failure",
                reason = "bad_credentials",
                username = %request.username,
                "Login failed"
            );
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("invalid username or password")),
            )
                .into_response()
        }
        Err(e) => error_response(&e).into_response(),
    }
}

/// Revoke the session token this request authenticated with.
pub async fn logout_handler(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    // The middleware already validated the token, so it is present here.
    let Some(token) = auth::bearer_token(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    match state.tokens.revoke(token) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

/// Rotate the admin password.
pub async fn change_password_handler(
    State(state): State<AppState>,
    Json(request): Json<ChangePasswordRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return error_response(&e).into_response();
    }
    match state
        .credentials
        .change_password(&request.old_password, &request.new_password)
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

// =============================================================================
// STUDENT HANDLERS
// =============================================================================

/// List students, with optional query-string filters.
pub async fn list_students_handler(
    State(state): State<AppState>,
    Query(query): Query<StudentQuery>,
) -> impl IntoResponse {
    let filter = match query.into_filter() {
        Ok(filter) => filter,
        Err(e) => return error_response(&e).into_response(),
    };
    match state.registry.list_students(&filter) {
        Ok(students) => {
            let views: Vec<StudentView> = students.iter().map(StudentView::from).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(e) => error_response(&e).into_response(),
    }
}

/// Create a student.
pub async fn create_student_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateStudentRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return error_response(&e).into_response();
    }
    match state.registry.create_student(
        &request.name,
        request.id_type,
        &request.identifier,
        request.registration_date.as_deref(),
    ) {
        Ok(student) => {
            tracing::info!(student = %student.id, "student created");
            (StatusCode::CREATED, Json(StudentView::from(&student))).into_response()
        }
        Err(e) => error_response(&e).into_response(),
    }
}

/// Fetch one student.
pub async fn get_student_handler(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
) -> impl IntoResponse {
    match state.registry.get_student(id) {
        Ok(student) => (StatusCode::OK, Json(StudentView::from(&student))).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

/// Partially update a student.
pub async fn update_student_handler(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
    Json(request): Json<UpdateStudentRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return error_response(&e).into_response();
    }
    match state.registry.update_student(id, &request.into_patch()) {
        Ok(student) => (StatusCode::OK, Json(StudentView::from(&student))).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

/// Delete a student and all of its subjects.
pub async fn delete_student_handler(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
) -> impl IntoResponse {
    match state.registry.delete_student(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

// =============================================================================
// SUBJECT HANDLERS
// =============================================================================

/// Enroll a student in a subject.
pub async fn add_subject_handler(
    State(state): State<AppState>,
    Path(student_id): Path<StudentId>,
    Json(request): Json<CreateSubjectRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return error_response(&e).into_response();
    }
    match state.registry.add_subject(
        student_id,
        &request.name,
        request.registration_date.as_deref(),
    ) {
        Ok(subject) => (StatusCode::CREATED, Json(SubjectView::from(&subject))).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

/// Partially update a subject.
pub async fn update_subject_handler(
    State(state): State<AppState>,
    Path((student_id, subject_id)): Path<(StudentId, SubjectId)>,
    Json(request): Json<UpdateSubjectRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return error_response(&e).into_response();
    }
    match state
        .registry
        .update_subject(student_id, subject_id, &request.into_patch())
    {
        Ok(subject) => (StatusCode::OK, Json(SubjectView::from(&subject))).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

/// Remove a subject from a student.
pub async fn delete_subject_handler(
    State(state): State<AppState>,
    Path((student_id, subject_id)): Path<(StudentId, SubjectId)>,
) -> impl IntoResponse {
    match state.registry.delete_subject(student_id, subject_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

/// Record a grade for one stage of a subject.
pub async fn set_grade_handler(
    State(state): State<AppState>,
    Path((student_id, subject_id)): Path<(StudentId, SubjectId)>,
    Json(request): Json<SetGradeRequest>,
) -> impl IntoResponse {
    match state
        .registry
        .set_grade(student_id, subject_id, request.stage, request.grade)
    {
        Ok(subject) => (StatusCode::OK, Json(SubjectView::from(&subject))).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}
