//! Token ledger: the single store of credit token state.
//!
//! Mutations are two-step: a read-only preflight validates and returns
//! the plan (including how much leaves the issuing pool), the service
//! clears the registry counter update, then the commit applies. Commit
//! re-validates, so a plan can never be applied stale under the
//! per-project serialization the service provides.

use crate::domain::errors::LedgerError;
use shared_types::{
    AccountRef, CarbonCreditToken, LedgerEntry, LedgerEntryKind, ProjectId, SerialNumber,
    StateConflictError, Timestamp, TokenId, TokenMetadata, TokenStatus, VerificationId,
};
use std::collections::HashMap;
use tracing::{debug, info};

/// Ledger configuration.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// When false, retiring less than a token's full balance fails with
    /// `PartialRetirementUnsupported` instead of splitting.
    pub allow_partial_retirement: bool,
    /// Serial number prefix, e.g. `BC-2026-000001`.
    pub serial_prefix: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            allow_partial_retirement: true,
            serial_prefix: "BC".into(),
        }
    }
}

/// Instruction to mint credits for an approved verification record.
#[derive(Debug, Clone, PartialEq)]
pub struct MintOrder {
    pub verification_id: VerificationId,
    pub project_id: ProjectId,
    pub amount: u64,
    pub vintage: u16,
    pub metadata: TokenMetadata,
    pub issuer: AccountRef,
}

/// Validated plan for a transfer or retirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationPlan {
    pub project_id: ProjectId,
    /// Credits leaving the issuing pool with this mutation.
    pub pool_consumed: u64,
    /// True when the full token balance moves.
    pub full: bool,
}

/// Result of a committed transfer or retirement.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferOutcome {
    /// The history entry appended to the source token.
    pub entry: LedgerEntry,
    /// The token now holding the moved (or retired) amount.
    pub moved_token: TokenId,
    /// The source token when a split left a remainder with the holder.
    pub remainder: Option<TokenId>,
    /// Credits consumed from the issuing pool.
    pub pool_consumed: u64,
}

/// The credit token store.
#[derive(Debug, Default)]
pub struct TokenLedger {
    config: LedgerConfig,
    tokens: HashMap<TokenId, CarbonCreditToken>,
    serial_seq: u64,
    minted: HashMap<ProjectId, u64>,
    retired: HashMap<ProjectId, u64>,
}

impl TokenLedger {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(LedgerConfig::default())
    }

    /// Number of tokens ever created, splits included.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if nothing was ever minted.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Gets a token by id.
    pub fn get(&self, id: TokenId) -> Option<&CarbonCreditToken> {
        self.tokens.get(&id)
    }

    fn allocate_serial(&mut self, vintage: u16) -> SerialNumber {
        self.serial_seq += 1;
        SerialNumber(format!(
            "{}-{}-{:06}",
            self.config.serial_prefix, vintage, self.serial_seq
        ))
    }

    /// Mints a new token. The registry counters must already have been
    /// raised; this insert cannot fail after validation.
    pub fn mint(
        &mut self,
        order: MintOrder,
        now: Timestamp,
    ) -> Result<&CarbonCreditToken, LedgerError> {
        if order.amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let serial = self.allocate_serial(order.vintage);
        let token = CarbonCreditToken {
            id: TokenId::generate(),
            project_id: order.project_id,
            amount: order.amount,
            vintage: order.vintage,
            serial,
            status: TokenStatus::Active,
            owner: order.issuer.clone(),
            issued_at: now,
            metadata: order.metadata,
            history: vec![LedgerEntry {
                at: now,
                kind: LedgerEntryKind::Mint,
                from: None,
                to: Some(order.issuer),
                amount: order.amount,
                note: format!("minted against verification {}", order.verification_id),
            }],
            issuer_pool: true,
        };
        *self.minted.entry(order.project_id).or_default() += order.amount;

        let id = token.id;
        info!(token = %id, project = %order.project_id, amount = order.amount, "credits minted");
        Ok(self.tokens.entry(id).or_insert(token))
    }

    fn live_token(&self, id: TokenId) -> Result<&CarbonCreditToken, LedgerError> {
        let token = self.tokens.get(&id).ok_or(LedgerError::TokenNotFound(id))?;
        if !token.is_live() {
            return Err(StateConflictError::new("active | transferred", "retired").into());
        }
        Ok(token)
    }

    /// Validates a transfer without mutating.
    pub fn transfer_preflight(
        &self,
        id: TokenId,
        from: &AccountRef,
        amount: u64,
    ) -> Result<MutationPlan, LedgerError> {
        let token = self.live_token(id)?;
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        let available = if &token.owner == from { token.amount } else { 0 };
        if amount > available {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available,
            });
        }
        Ok(MutationPlan {
            project_id: token.project_id,
            pool_consumed: if token.issuer_pool { amount } else { 0 },
            full: amount == token.amount,
        })
    }

    /// Applies a validated transfer.
    pub fn commit_transfer(
        &mut self,
        id: TokenId,
        from: &AccountRef,
        to: AccountRef,
        amount: u64,
        now: Timestamp,
    ) -> Result<TransferOutcome, LedgerError> {
        let plan = self.transfer_preflight(id, from, amount)?;

        let entry = LedgerEntry {
            at: now,
            kind: LedgerEntryKind::Transfer,
            from: Some(from.clone()),
            to: Some(to.clone()),
            amount,
            note: String::new(),
        };

        let outcome = if plan.full {
            let Some(token) = self.tokens.get_mut(&id) else {
                return Err(LedgerError::TokenNotFound(id));
            };
            token.owner = to;
            token.status = TokenStatus::Transferred;
            token.issuer_pool = false;
            token.history.push(entry.clone());
            TransferOutcome {
                entry,
                moved_token: id,
                remainder: None,
                pool_consumed: plan.pool_consumed,
            }
        } else {
            // Split: the moved portion becomes a new token under a
            // fresh serial, the remainder stays with the holder.
            let (vintage, split) = {
                let Some(token) = self.tokens.get_mut(&id) else {
                    return Err(LedgerError::TokenNotFound(id));
                };
                token.amount -= amount;
                token.history.push(entry.clone());
                (token.vintage, token.clone())
            };
            let serial = self.allocate_serial(vintage);
            let moved = CarbonCreditToken {
                id: TokenId::generate(),
                amount,
                serial,
                status: TokenStatus::Transferred,
                owner: to,
                history: vec![entry.clone()],
                issuer_pool: false,
                ..split
            };
            let moved_id = moved.id;
            self.tokens.insert(moved_id, moved);
            TransferOutcome {
                entry,
                moved_token: moved_id,
                remainder: Some(id),
                pool_consumed: plan.pool_consumed,
            }
        };

        debug!(token = %id, amount, full = plan.full, "transfer committed");
        debug_assert!(self.conservation_holds(plan.project_id));
        Ok(outcome)
    }

    /// Validates a retirement without mutating.
    pub fn retire_preflight(&self, id: TokenId, amount: u64) -> Result<MutationPlan, LedgerError> {
        let token = self.live_token(id)?;
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        if amount > token.amount {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available: token.amount,
            });
        }
        if amount < token.amount && !self.config.allow_partial_retirement {
            return Err(LedgerError::PartialRetirementUnsupported {
                requested: amount,
                balance: token.amount,
            });
        }
        Ok(MutationPlan {
            project_id: token.project_id,
            pool_consumed: if token.issuer_pool { amount } else { 0 },
            full: amount == token.amount,
        })
    }

    /// Applies a validated retirement.
    pub fn commit_retire(
        &mut self,
        id: TokenId,
        amount: u64,
        reason: String,
        now: Timestamp,
    ) -> Result<TransferOutcome, LedgerError> {
        let plan = self.retire_preflight(id, amount)?;

        let entry = {
            let Some(token) = self.tokens.get(&id) else {
                return Err(LedgerError::TokenNotFound(id));
            };
            LedgerEntry {
                at: now,
                kind: LedgerEntryKind::Retire,
                from: Some(token.owner.clone()),
                to: None,
                amount,
                note: reason,
            }
        };

        let outcome = if plan.full {
            let Some(token) = self.tokens.get_mut(&id) else {
                return Err(LedgerError::TokenNotFound(id));
            };
            token.status = TokenStatus::Retired;
            token.issuer_pool = false;
            token.history.push(entry.clone());
            TransferOutcome {
                entry,
                moved_token: id,
                remainder: None,
                pool_consumed: plan.pool_consumed,
            }
        } else {
            let (vintage, split) = {
                let Some(token) = self.tokens.get_mut(&id) else {
                    return Err(LedgerError::TokenNotFound(id));
                };
                token.amount -= amount;
                token.history.push(entry.clone());
                (token.vintage, token.clone())
            };
            let serial = self.allocate_serial(vintage);
            let retired = CarbonCreditToken {
                id: TokenId::generate(),
                amount,
                serial,
                status: TokenStatus::Retired,
                history: vec![entry.clone()],
                issuer_pool: false,
                ..split
            };
            let retired_id = retired.id;
            self.tokens.insert(retired_id, retired);
            TransferOutcome {
                entry,
                moved_token: retired_id,
                remainder: Some(id),
                pool_consumed: plan.pool_consumed,
            }
        };

        *self.retired.entry(plan.project_id).or_default() += amount;
        info!(token = %id, amount, "credits retired");
        debug_assert!(self.conservation_holds(plan.project_id));
        Ok(outcome)
    }

    /// Live (unretired) balance held by `owner` across all tokens.
    pub fn balance_of(&self, owner: &AccountRef) -> u64 {
        self.tokens
            .values()
            .filter(|t| t.is_live() && &t.owner == owner)
            .map(|t| t.amount)
            .sum()
    }

    /// All tokens held by `owner`, retired ones included.
    pub fn tokens_of(&self, owner: &AccountRef) -> Vec<&CarbonCreditToken> {
        self.tokens.values().filter(|t| &t.owner == owner).collect()
    }

    /// All tokens minted for a project.
    pub fn tokens_for_project(&self, project_id: ProjectId) -> Vec<&CarbonCreditToken> {
        self.tokens
            .values()
            .filter(|t| t.project_id == project_id)
            .collect()
    }

    /// Credits still circulating for a project.
    pub fn circulating_supply(&self, project_id: ProjectId) -> u64 {
        self.minted.get(&project_id).copied().unwrap_or(0)
            - self.retired.get(&project_id).copied().unwrap_or(0)
    }

    /// Credits permanently retired for a project.
    pub fn retired_total(&self, project_id: ProjectId) -> u64 {
        self.retired.get(&project_id).copied().unwrap_or(0)
    }

    /// Conservation: the live token balances of a project always equal
    /// minted minus retired.
    pub fn conservation_holds(&self, project_id: ProjectId) -> bool {
        let live: u64 = self
            .tokens
            .values()
            .filter(|t| t.project_id == project_id && t.is_live())
            .map(|t| t.amount)
            .sum();
        live == self.circulating_supply(project_id)
    }
}
