//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api::{self, AppState};
use gradebook_core::{
    GradebookError, StudentFilter, primitives::MIN_PASSWORD_LENGTH,
};
use std::path::Path;

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_serve(data_dir: &Path, host: &str, port: u16) -> Result<(), GradebookError> {
    let state = AppState::new(data_dir);
    state.bootstrap()?;

    println!("Gradebook Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", host);
    println!("  Port:     {}", port);
    println!("  Data dir: {:?}", data_dir);
    println!();
    println!("Endpoints:");
    println!("  POST /auth/login            - Obtain a session token");
    println!("  POST /auth/change-password  - Rotate the admin password");
    println!("  GET  /students              - List students (filterable)");
    println!("  POST /students              - Create a student");
    println!("  POST /students/{{id}}/subjects - Enroll a subject");
    println!("  PUT  /students/{{id}}/subjects/{{sid}}/grade - Record a grade");
    println!("  GET  /health                - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, state).await
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Create the data directory and bootstrap records.
pub fn cmd_init(data_dir: &Path) -> Result<(), GradebookError> {
    let state = AppState::new(data_dir);
    state.bootstrap()?;

    println!("Initialized store in {:?}", data_dir);
    println!("  admin.json    - bootstrap admin credential (rotate it!)");
    println!("  tokens.json   - empty session token set");
    println!("  students.json - empty student collection");
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show student and subject counts.
pub fn cmd_status(data_dir: &Path, json_mode: bool) -> Result<(), GradebookError> {
    let state = AppState::new(data_dir);
    let students = state.registry.list_students(&StudentFilter::all())?;
    let subject_count: usize = students.iter().map(|s| s.subjects.len()).sum();

    if json_mode {
        let status = serde_json::json!({
            "students": students.len(),
            "subjects": subject_count,
        });
        println!("{}", status);
    } else {
        println!("Store: {:?}", data_dir);
        println!("  Students: {}", students.len());
        println!("  Subjects: {}", subject_count);
    }
    Ok(())
}

// =============================================================================
// CHANGE-PASSWORD COMMAND
// =============================================================================

/// Rotate the admin password.
pub fn cmd_change_password(data_dir: &Path, old: &str, new: &str) -> Result<(), GradebookError> {
    if new.len() < MIN_PASSWORD_LENGTH {
        return Err(GradebookError::Validation(format!(
            "new password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let state = AppState::new(data_dir);
    state.bootstrap()?;
    state.credentials.change_password(old, new)?;

    println!("Admin password updated.");
    Ok(())
}
