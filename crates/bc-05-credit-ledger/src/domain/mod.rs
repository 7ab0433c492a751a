//! Domain layer: token ledger and errors.

pub mod errors;
pub mod ledger;

pub use errors::LedgerError;
pub use ledger::{LedgerConfig, MintOrder, TokenLedger, TransferOutcome};
