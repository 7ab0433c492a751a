//! # Inbound Port - LedgerApi
//!
//! Primary driving port for the credit ledger. Mutations suspend the
//! caller; reads are immediate.

use crate::domain::{LedgerError, MintOrder, TransferOutcome};
use async_trait::async_trait;
use shared_types::{AccountRef, Authority, CarbonCreditToken, ProjectId, TokenId};

/// Primary API for the Carbon Credit Ledger subsystem.
#[async_trait]
pub trait LedgerApi: Send + Sync {
    /// Mints a token for an approved verification record.
    ///
    /// # Security
    /// Only the Verification subsystem (via the mint-request
    /// choreography) is authorized to call this.
    ///
    /// # Errors
    /// - `Unauthorized`, `InvalidAmount`, `UnverifiedSource`
    /// - `Registry` if the paired counter update is refused
    async fn mint(
        &self,
        authority: &Authority,
        order: MintOrder,
    ) -> Result<CarbonCreditToken, LedgerError>;

    /// Moves `amount` from `from` to `to` on a token. Splits the token
    /// when the amount is partial.
    async fn transfer(
        &self,
        token_id: TokenId,
        from: &AccountRef,
        to: AccountRef,
        amount: u64,
    ) -> Result<TransferOutcome, LedgerError>;

    /// Permanently removes `amount` from circulation.
    async fn retire(
        &self,
        token_id: TokenId,
        amount: u64,
        reason: String,
    ) -> Result<TransferOutcome, LedgerError>;

    /// Live balance held by an account.
    fn balance_of(&self, owner: &AccountRef) -> u64;

    /// All tokens held by an account, retired ones included.
    fn tokens_of(&self, owner: &AccountRef) -> Vec<CarbonCreditToken>;

    /// All tokens minted for a project.
    fn tokens_for_project(&self, project_id: ProjectId) -> Vec<CarbonCreditToken>;

    /// Credits still circulating for a project.
    fn circulating_supply(&self, project_id: ProjectId) -> u64;

    /// Gets a token by id.
    fn get_token(&self, id: TokenId) -> Option<CarbonCreditToken>;
}
