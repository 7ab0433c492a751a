//! Account directory and credential hashing.
//!
//! Credentials are never stored in the clear: each account carries a
//! random salt and the SHA-256 digest of `salt || credential`. Lookup
//! failures and digest mismatches are distinguished internally but both
//! surface with terse messages.

use crate::domain::errors::AuthError;
use shared_types::User;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use uuid::Uuid;

/// A registered account: the user profile plus its credential digest.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub user: User,
    salt: [u8; 16],
    digest: [u8; 32],
}

impl CredentialRecord {
    /// Creates a record for `user`, hashing `credential` under a fresh salt.
    pub fn new(user: User, credential: &str) -> Self {
        let salt = fresh_salt();
        let digest = credential_digest(&salt, credential);
        Self { user, salt, digest }
    }

    /// Verifies `credential` against the stored digest in constant time.
    pub fn verify(&self, credential: &str) -> bool {
        let candidate = credential_digest(&self.salt, credential);
        digests_match(&candidate, &self.digest)
    }
}

/// Directory of registered accounts keyed by email.
///
/// Demo scope: accounts are registered at boot; there is no self-service
/// signup surface.
#[derive(Debug, Default)]
pub struct AccountDirectory {
    by_email: HashMap<String, CredentialRecord>,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account. A later registration under the same email
    /// replaces the earlier one.
    pub fn register(&mut self, user: User, credential: &str) {
        self.by_email
            .insert(user.email.clone(), CredentialRecord::new(user, credential));
    }

    /// Resolves an email + credential pair to the account's user.
    ///
    /// # Errors
    /// - `UnknownAccount` if no account exists under `email`
    /// - `InvalidCredential` if the digest does not match
    pub fn authenticate(&self, email: &str, credential: &str) -> Result<&User, AuthError> {
        let record = self.by_email.get(email).ok_or(AuthError::UnknownAccount)?;
        if !record.verify(credential) {
            return Err(AuthError::InvalidCredential);
        }
        Ok(&record.user)
    }

    /// Looks up a user profile by email without authenticating.
    pub fn find(&self, email: &str) -> Option<&User> {
        self.by_email.get(email).map(|r| &r.user)
    }

    /// Number of registered accounts.
    pub fn len(&self) -> usize {
        self.by_email.len()
    }

    /// Returns true if no accounts are registered.
    pub fn is_empty(&self) -> bool {
        self.by_email.is_empty()
    }
}

fn fresh_salt() -> [u8; 16] {
    // Uuid v4 is backed by the OS RNG; two of them give 16 random bytes
    // without pulling a dedicated RNG dependency into this crate.
    *Uuid::new_v4().as_bytes()
}

fn credential_digest(salt: &[u8; 16], credential: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(credential.as_bytes());
    hasher.finalize().into()
}

/// Constant-time digest comparison.
///
/// Both inputs are fixed-length digests, so comparison time depends only
/// on the digest width, not on where the first mismatch occurs.
fn digests_match(a: &[u8; 32], b: &[u8; 32]) -> bool {
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
