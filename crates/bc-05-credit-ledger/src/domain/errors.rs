//! Ledger error types.

use shared_types::{AuthorizationError, StateConflictError, TokenId, VerificationId};
use thiserror::Error;

/// Carbon Credit Ledger error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// The caller is not authorized for this ledger mutation.
    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),

    /// Amounts must be positive.
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// The mint's upstream verification record is not in a verified state.
    #[error("verification record {verification} is not verified")]
    UnverifiedSource { verification: VerificationId },

    /// No token with the given id.
    #[error("token not found: {0}")]
    TokenNotFound(TokenId),

    /// The token's state forbids this operation (e.g. already retired).
    #[error(transparent)]
    StateConflict(#[from] StateConflictError),

    /// The holder's balance on this token is below the requested amount.
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: u64, available: u64 },

    /// Partial retirement is disabled; the full balance must be retired.
    #[error("partial retirement unsupported: requested {requested} of {balance}")]
    PartialRetirementUnsupported { requested: u64, balance: u64 },

    /// The registry refused the paired counter update.
    #[error("registry rejected credit update: {0}")]
    Registry(String),
}
