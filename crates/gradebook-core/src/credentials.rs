//! # Credential Store
//!
//! Single-admin credential verification and password rotation, backed by
//! one JSON record file.
//!
//! Passwords are never stored: the record holds a scheme tag, an iteration
//! count, a random salt, and the PBKDF2-HMAC-SHA256 output, all of which
//! are regenerated wholesale on every password change. Verification
//! recomputes the derivation and compares with a constant-time equality
//! check so the comparison time does not leak where a forgery diverges.

use crate::primitives::{
    DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME, PASSWORD_SCHEME, PBKDF2_ITERATIONS,
    SALT_LENGTH,
};
use crate::storage;
use crate::types::GradebookError;
use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::path::{Path, PathBuf};
use subtle::ConstantTimeEq;

/// PBKDF2-HMAC-SHA256 output size in bytes.
const HASH_LENGTH: usize = 32;

// =============================================================================
// ADMIN RECORD
// =============================================================================

/// The persisted admin credential record.
///
/// `salt` and `password_hash` are lowercase hex. The record is replaced
/// wholesale (fresh salt included) whenever the password changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRecord {
    pub username: String,
    pub scheme: String,
    pub iterations: u32,
    pub salt: String,
    pub password_hash: String,
}

impl AdminRecord {
    /// Build a record for `username`/`password` with a fresh random salt.
    fn generate(username: &str, password: &str) -> Result<Self, GradebookError> {
        let mut salt = [0u8; SALT_LENGTH];
        getrandom::getrandom(&mut salt)
            .map_err(|e| GradebookError::Io(format!("cannot gather salt entropy: {e}")))?;

        let hash = derive_hash(password, &salt, PBKDF2_ITERATIONS);
        Ok(Self {
            username: username.to_string(),
            scheme: PASSWORD_SCHEME.to_string(),
            iterations: PBKDF2_ITERATIONS,
            salt: encode_hex(&salt),
            password_hash: encode_hex(&hash),
        })
    }
}

// =============================================================================
// CREDENTIAL STORE
// =============================================================================

/// File-backed store for the single admin credential.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Bind the store to its record file. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the bootstrap admin record on first run. Idempotent.
    ///
    /// The bootstrap credentials are fixed and deliberately weak; they are
    /// meant to be rotated immediately via [`Self::change_password`].
    pub fn ensure_initialized(&self) -> Result<(), GradebookError> {
        if self.path.exists() {
            return Ok(());
        }
        let record = AdminRecord::generate(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)?;
        storage::write_json_atomic(&self.path, &record)
    }

    /// Load the admin record, bootstrapping it first if missing.
    pub fn load(&self) -> Result<AdminRecord, GradebookError> {
        self.ensure_initialized()?;
        storage::read_json(&self.path)?.ok_or_else(|| {
            GradebookError::Io(format!("credential file {} vanished", self.path.display()))
        })
    }

    /// Whether `password` matches the stored credential.
    ///
    /// Recomputes the derivation with the stored salt and iteration count
    /// and compares in constant time.
    pub fn verify_password(&self, password: &str) -> Result<bool, GradebookError> {
        let record = self.load()?;
        let salt = decode_hex(&record.salt)?;
        let expected = decode_hex(&record.password_hash)?;
        let derived = derive_hash(password, &salt, record.iterations);
        Ok(constant_time_eq(&derived, &expected))
    }

    /// Whether the username matches exactly AND the password verifies.
    pub fn verify_user(&self, username: &str, password: &str) -> Result<bool, GradebookError> {
        let record = self.load()?;
        if username != record.username {
            return Ok(false);
        }
        self.verify_password(password)
    }

    /// Rotate the admin password, regenerating salt and hash.
    ///
    /// Fails with `Auth` when the current password does not verify; the
    /// record on disk is untouched in that case.
    pub fn change_password(&self, old: &str, new: &str) -> Result<(), GradebookError> {
        if !self.verify_password(old)? {
            return Err(GradebookError::Auth(
                "current password is incorrect".to_string(),
            ));
        }
        let username = self.load()?.username;
        let record = AdminRecord::generate(&username, new)?;
        storage::write_json_atomic(&self.path, &record)
    }
}

// =============================================================================
// DERIVATION & ENCODING HELPERS
// =============================================================================

fn derive_hash(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LENGTH] {
    let mut out = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

/// Constant-time equality over possibly different-length inputs.
///
/// Pads both sides to the same length so `ct_eq` always runs over the same
/// number of bytes, then folds the length check in at the end.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let max_len = a.len().max(b.len());
    let mut padded_a = vec![0u8; max_len];
    let mut padded_b = vec![0u8; max_len];
    padded_a[..a.len()].copy_from_slice(a);
    padded_b[..b.len()].copy_from_slice(b);

    let bytes_match: bool = padded_a.ct_eq(&padded_b).into();
    bytes_match && a.len() == b.len()
}

fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::new(), |mut acc, b| {
        acc.push_str(&format!("{b:02x}"));
        acc
    })
}

fn decode_hex(input: &str) -> Result<Vec<u8>, GradebookError> {
    if input.len() % 2 != 0 {
        return Err(GradebookError::Serialization(
            "hex field has odd length".to_string(),
        ));
    }
    (0..input.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&input[i..i + 2], 16).map_err(|_| {
                GradebookError::Serialization("hex field has non-hex characters".to_string())
            })
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
