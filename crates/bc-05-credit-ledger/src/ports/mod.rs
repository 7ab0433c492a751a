//! Ports for the Carbon Credit Ledger subsystem.

pub mod inbound;
pub mod outbound;

pub use inbound::LedgerApi;
pub use outbound::{AccountsError, ProjectAccounts, VerificationGate};
