//! # Token Store
//!
//! Short-lived session token issuance and validation, backed by one JSON
//! file mapping token strings to expiry timestamps (epoch seconds).
//!
//! Tokens move through `ISSUED -> VALID -> EXPIRED/REVOKED`; the terminal
//! states are removal from the store. Expired tokens are deleted lazily
//! when a validation encounters them — note that this makes `validate` a
//! read with an observable write side effect.

use crate::primitives::{DEFAULT_TOKEN_TTL_SECS, TOKEN_LENGTH};
use crate::storage;
use crate::types::GradebookError;
use base64::Engine;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Token string mapped to its expiry in epoch seconds.
type TokenMap = BTreeMap<String, u64>;

/// File-backed store of active session tokens.
///
/// A mutex serializes the load-modify-save cycles of writers within this
/// process; the file itself is replaced atomically.
#[derive(Debug)]
pub struct TokenStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl TokenStore {
    /// Bind the store to its token file. The file need not exist yet.
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

    /// Create an empty token set on first run. Idempotent.
    pub fn ensure_initialized(&self) -> Result<(), GradebookError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.path.exists() {
            return Ok(());
        }
        storage::write_json_atomic(&self.path, &TokenMap::new())
    }

    fn load(&self) -> Result<TokenMap, GradebookError> {
        Ok(storage::read_json(&self.path)?.unwrap_or_default())
    }

    /// Issue a fresh random URL-safe token expiring `ttl_seconds` from now.
    pub fn issue(&self, ttl_seconds: u64) -> Result<String, GradebookError> {
        let token = generate_token()?;
        let expiry = now_epoch().saturating_add(ttl_seconds);

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut tokens = self.load()?;
        tokens.insert(token.clone(), expiry);
        storage::write_json_atomic(&self.path, &tokens)?;
        Ok(token)
    }

    /// Issue a token with the default four-hour lifetime.
    pub fn issue_default(&self) -> Result<String, GradebookError> {
        self.issue(DEFAULT_TOKEN_TTL_SECS)
    }

    /// Whether a token exists and has not expired.
    ///
    /// An expired token is deleted as a side effect of the check, so a
    /// later `revoke` of the same token is a no-op.
    pub fn validate(&self, token: &str) -> Result<bool, GradebookError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut tokens = self.load()?;

        match tokens.get(token) {
            None => Ok(false),
            Some(&expiry) if now_epoch() < expiry => Ok(true),
            Some(_) => {
                tokens.remove(token);
                storage::write_json_atomic(&self.path, &tokens)?;
                Ok(false)
            }
        }
    }

    /// Remove a token. Idempotent: an absent token is not an error.
    pub fn revoke(&self, token: &str) -> Result<(), GradebookError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut tokens = self.load()?;
        if tokens.remove(token).is_some() {
            storage::write_json_atomic(&self.path, &tokens)?;
        }
        Ok(())
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn now_epoch() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Generate a URL-safe random token (base64url, no padding).
fn generate_token() -> Result<String, GradebookError> {
    let mut buf = [0u8; TOKEN_LENGTH];
    getrandom::getrandom(&mut buf)
        .map_err(|e| GradebookError::Io(format!("cannot gather token entropy: {e}")))?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, TokenStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TokenStore::new(dir.path().join("tokens.json"));
        (dir, store)
    }

    #[test]
    fn issued_token_validates_until_revoked() {
        let (_dir, store) = store();
        let token = store.issue_default().expect("issue");
        assert!(store.validate(&token).expect("validate"));

        store.revoke(&token).expect("revoke");
        assert!(!store.validate(&token).expect("validate"));
    }

    #[test]
    fn tokens_are_url_safe_and_distinct() {
        let (_dir, store) = store();
        let a = store.issue_default().expect("issue");
        let b = store.issue_default().expect("issue");
        assert_ne!(a, b);
        for token in [&a, &b] {
            assert!(
                token
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
                "token {token:?} is not URL-safe"
            );
        }
    }

    #[test]
    fn zero_ttl_token_is_immediately_invalid_and_removed() {
        let (_dir, store) = store();
        let token = store.issue(0).expect("issue");

        // First validation sees the expired token and removes it
        assert!(!store.validate(&token).expect("validate"));
        // Removal already happened, so revoking is a no-op, not an error
        store.revoke(&token).expect("revoke");
        assert!(!store.validate(&token).expect("validate"));
    }

    #[test]
    fn unknown_token_is_invalid_without_touching_the_file() {
        let (_dir, store) = store();
        let seeded = store.issue_default().expect("issue");
        assert!(!store.validate("no-such-token").expect("validate"));
        // The seeded token survives
        assert!(store.validate(&seeded).expect("validate"));
    }

    #[test]
    fn tokens_persist_across_store_instances() {
        let (_dir, store) = store();
        let token = store.issue_default().expect("issue");

        let reopened = TokenStore::new(store.path());
        assert!(reopened.validate(&token).expect("validate"));
    }

    #[test]
    fn revoke_absent_token_is_a_no_op() {
        let (_dir, store) = store();
        store.ensure_initialized().expect("init");
        store.revoke("never-issued").expect("revoke");
    }
}
