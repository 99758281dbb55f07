//! # gradebook-core
//!
//! The flat-file student records engine for Gradebook - THE LOGIC.
//!
//! This crate implements the record store and grade-computation engine:
//! students, their enrolled subjects, per-stage grades with derived
//! average/status, and the single-admin credential and session-token
//! stores that gate mutating operations.
//!
//! ## Architectural Constraints
//!
//! - Pure synchronous Rust: no async, no network dependencies
//! - Every store is constructed with an injected file path, never a
//!   module-level singleton, so tests run against isolated temp storage
//! - Every mutation is load-all, mutate-one, save-all over a JSON file
//!   replaced atomically (temp file + rename); validation happens before
//!   the write, so failures never persist partial mutations
//! - Writers are serialized in-process and cross-process interleavings
//!   are caught by an optimistic revision check

// =============================================================================
// MODULES
// =============================================================================

pub mod credentials;
pub mod dates;
pub mod primitives;
pub mod query;
pub mod registry;
pub mod storage;
pub mod tokens;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    GradebookError, Grades, IdType, Stage, Status, Student, StudentId, StudentPatch, Subject,
    SubjectId, SubjectPatch, round_grade,
};

// =============================================================================
// RE-EXPORTS: Stores & Queries
// =============================================================================

pub use credentials::{AdminRecord, CredentialStore};
pub use query::StudentFilter;
pub use registry::StudentRegistry;
pub use storage::CollectionFile;
pub use tokens::TokenStore;
