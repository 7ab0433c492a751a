//! Identity error types.

use shared_store::StoreError;
use thiserror::Error;

/// Identity & Session error type.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No account is registered under the given email.
    #[error("unknown account")]
    UnknownAccount,

    /// The credential did not match the stored digest.
    #[error("invalid credential")]
    InvalidCredential,

    /// The session blob could not be read or written.
    #[error("session storage failure")]
    Store(#[from] StoreError),
}
