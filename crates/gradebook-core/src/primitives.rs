//! # Fixed Constants
//!
//! Hardcoded runtime constants for the Gradebook core.
//!
//! The store starts with zero data but fixed rules: grade bounds, stage
//! weights, the passing threshold, and the credential/token parameters are
//! compiled into the binary and are immutable at runtime.

/// Lowest grade a subject stage can receive.
pub const GRADE_MIN: f64 = 0.0;

/// Highest grade a subject stage can receive.
pub const GRADE_MAX: f64 = 10.0;

/// Weighted average at or above this value means the subject is approved.
pub const PASSING_AVERAGE: f64 = 7.0;

/// Weight of the first stage grade in the subject average.
pub const STAGE_1_WEIGHT: f64 = 0.3;

/// Weight of the second stage grade in the subject average.
pub const STAGE_2_WEIGHT: f64 = 0.3;

/// Weight of the third stage grade in the subject average.
///
/// The three weights must sum to 1.0.
pub const STAGE_3_WEIGHT: f64 = 0.4;

/// Calendar date format used everywhere a date is read or written.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// CREDENTIAL / TOKEN PARAMETERS
// =============================================================================

/// Username of the bootstrap admin record created on first run.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Password of the bootstrap admin record created on first run.
///
/// Deliberately weak: it exists so the store is usable immediately and is
/// expected to be rotated via `change_password` right away.
pub const DEFAULT_ADMIN_PASSWORD: &str = "1234";

/// Tag recorded in the credential file identifying the derivation scheme.
pub const PASSWORD_SCHEME: &str = "pbkdf2_sha256";

/// PBKDF2-HMAC-SHA256 iteration count for password derivation.
pub const PBKDF2_ITERATIONS: u32 = 120_000;

/// Length in bytes of the random salt generated per password.
pub const SALT_LENGTH: usize = 16;

/// Length in bytes of entropy behind each session token.
pub const TOKEN_LENGTH: usize = 32;

/// Default session token lifetime: four hours.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 4 * 60 * 60;

/// Minimum accepted length for a new admin password.
///
/// Enforced at the adapter boundary (HTTP payloads, CLI arguments) before
/// a password change reaches the credential store.
pub const MIN_PASSWORD_LENGTH: usize = 4;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for student and subject names.
///
/// Longer names are rejected at the adapter boundary to keep persisted
/// records bounded.
pub const MAX_NAME_LENGTH: usize = 256;

/// Maximum length for a student identifier (enrollment number or national id).
pub const MAX_IDENTIFIER_LENGTH: usize = 64;
