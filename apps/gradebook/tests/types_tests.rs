//! Serialization and boundary-validation tests for the API types.

#![allow(clippy::unwrap_used, clippy::panic)]

use gradebook::api::{
    ChangePasswordRequest, CreateStudentRequest, SetGradeRequest, StudentQuery, StudentView,
    SubjectView, UpdateStudentRequest,
};
use gradebook_core::{
    Grades, IdType, Stage, Status, Student, StudentId, Subject, SubjectId,
};
use serde_json::json;

fn subject(grades: Grades) -> Subject {
    Subject {
        id: SubjectId::generate(),
        name: "Math".to_string(),
        registration_date: gradebook_core::dates::parse("2025-02-01").unwrap(),
        grades,
    }
}

// =============================================================================
// REQUEST DESERIALIZATION
// =============================================================================

#[test]
fn create_student_request_parses_wire_tags() {
    let request: CreateStudentRequest = serde_json::from_value(json!({
        "name": "Ana",
        "id_type": "NATIONAL_ID",
        "identifier": "123"
    }))
    .unwrap();

    assert_eq!(request.id_type, IdType::NationalId);
    assert_eq!(request.registration_date, None);
    assert!(request.validate().is_ok());
}

#[test]
fn create_student_request_rejects_unknown_id_type() {
    let result: Result<CreateStudentRequest, _> = serde_json::from_value(json!({
        "name": "Ana",
        "id_type": "PASSPORT",
        "identifier": "123"
    }));
    assert!(result.is_err());
}

#[test]
fn create_student_request_caps_field_lengths() {
    let request = CreateStudentRequest {
        name: "x".repeat(257),
        id_type: IdType::NationalId,
        identifier: "123".to_string(),
        registration_date: None,
    };
    assert!(request.validate().is_err());

    let request = CreateStudentRequest {
        name: "Ana".to_string(),
        id_type: IdType::NationalId,
        identifier: "9".repeat(65),
        registration_date: None,
    };
    assert!(request.validate().is_err());
}

#[test]
fn update_request_distinguishes_absent_fields() {
    let request: UpdateStudentRequest = serde_json::from_value(json!({
        "name": "Ana Beatriz"
    }))
    .unwrap();
    let patch = request.into_patch();

    assert_eq!(patch.name.as_deref(), Some("Ana Beatriz"));
    assert!(patch.id_type.is_none());
    assert!(patch.identifier.is_none());
    assert!(patch.registration_date.is_none());
}

#[test]
fn set_grade_request_parses_stage_tags() {
    let request: SetGradeRequest = serde_json::from_value(json!({
        "stage": "STAGE_2",
        "grade": 7.5
    }))
    .unwrap();
    assert_eq!(request.stage, Stage::Stage2);

    let bad: Result<SetGradeRequest, _> = serde_json::from_value(json!({
        "stage": "STAGE_4",
        "grade": 7.5
    }));
    assert!(bad.is_err());
}

#[test]
fn change_password_request_enforces_minimum_length() {
    let short = ChangePasswordRequest {
        old_password: "1234".to_string(),
        new_password: "abc".to_string(),
    };
    assert!(short.validate().is_err());

    let ok = ChangePasswordRequest {
        old_password: "1234".to_string(),
        new_password: "abcd".to_string(),
    };
    assert!(ok.validate().is_ok());
}

#[test]
fn student_query_builds_core_filter() {
    let query = StudentQuery {
        name: Some("ana".into()),
        registered_from: Some("2025-01-01".into()),
        ..StudentQuery::default()
    };
    let filter = query.into_filter().unwrap();
    assert_eq!(filter.name.as_deref(), Some("ana"));
    assert!(filter.registered_from.is_some());
    assert!(filter.registered_to.is_none());

    let bad = StudentQuery {
        registered_from: Some("01/01/2025".into()),
        ..StudentQuery::default()
    };
    assert!(bad.into_filter().is_err());
}

// =============================================================================
// VIEW SERIALIZATION
// =============================================================================

#[test]
fn subject_view_computes_derived_fields() {
    let graded = subject(Grades {
        stage_1: Some(6.0),
        stage_2: Some(7.0),
        stage_3: Some(8.0),
    });
    let view = SubjectView::from(&graded);
    assert_eq!(view.average, Some(7.1));
    assert_eq!(view.status, Status::Approved);

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["average"], 7.1);
    assert_eq!(json["status"], "APPROVED");
    assert_eq!(json["grades"]["STAGE_1"], 6.0);
    assert_eq!(json["registration_date"], "2025-02-01");
}

#[test]
fn ungraded_subject_view_is_in_progress() {
    let view = SubjectView::from(&subject(Grades::ungraded()));
    assert_eq!(view.average, None);
    assert_eq!(view.status, Status::InProgress);

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["status"], "IN_PROGRESS");
    assert!(json["average"].is_null());
}

#[test]
fn student_view_nests_subject_views() {
    let student = Student {
        id: StudentId::generate(),
        name: "Ana".to_string(),
        id_type: IdType::NationalId,
        identifier: "123".to_string(),
        registration_date: gradebook_core::dates::parse("2025-01-15").unwrap(),
        subjects: vec![subject(Grades::ungraded())],
    };
    let view = StudentView::from(&student);

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["name"], "Ana");
    assert_eq!(json["id_type"], "NATIONAL_ID");
    assert_eq!(json["subjects"][0]["status"], "IN_PROGRESS");
    // Ids serialize as plain strings
    assert!(json["id"].is_string());
}
