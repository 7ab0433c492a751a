//! # Inbound Port - IdentityApi
//!
//! Primary driving port for login, logout, and session queries.

use crate::domain::AuthError;
use shared_types::Session;

/// Primary API for the Identity subsystem.
pub trait IdentityApi: Send + Sync {
    /// Resolves an email + credential pair to a fresh session and
    /// persists it, replacing any stored session.
    ///
    /// # Errors
    /// - `UnknownAccount`: no account under `email`
    /// - `InvalidCredential`: digest mismatch
    /// - `Store`: the session blob could not be written
    fn login(&self, email: &str, credential: &str) -> Result<Session, AuthError>;

    /// Removes the stored session unconditionally.
    fn logout(&self) -> Result<(), AuthError>;

    /// Returns the stored session if present and not expired.
    ///
    /// An expired blob is discarded and reported as `None`.
    fn current_session(&self) -> Result<Option<Session>, AuthError>;
}
