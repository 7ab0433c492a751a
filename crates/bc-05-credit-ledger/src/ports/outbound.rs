//! Outbound (Driven) ports for the Carbon Credit Ledger.

use shared_types::{ProjectId, VerificationId};
use thiserror::Error;

/// The registry refused a paired counter update.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct AccountsError(pub String);

/// The registry's project credit counters, updated in lockstep with
/// token state.
pub trait ProjectAccounts: Send + Sync {
    /// Raises `total_credits_issued` and `available_credits` for a mint.
    fn apply_mint(&self, project_id: ProjectId, amount: u64) -> Result<(), AccountsError>;

    /// Lowers `available_credits` when credits leave the issuing pool.
    fn consume_available(&self, project_id: ProjectId, amount: u64) -> Result<(), AccountsError>;
}

/// Upstream check that a mint's verification record is really verified.
pub trait VerificationGate: Send + Sync {
    /// Returns true if the record exists and concluded as verified.
    fn is_verified(&self, id: VerificationId) -> bool;
}
