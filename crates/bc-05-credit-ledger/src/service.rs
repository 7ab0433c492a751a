//! Ledger service: per-project serialization, registry coordination,
//! and event publishing around the token ledger.

use crate::domain::{LedgerError, MintOrder, TokenLedger, TransferOutcome};
use crate::ports::{LedgerApi, ProjectAccounts, VerificationGate};
use async_trait::async_trait;
use shared_bus::{EventPublisher, PlatformEvent};
use shared_types::{
    AccountRef, Authority, AuthorizationError, Capability, CarbonCreditToken, ProjectId,
    SubsystemId, TimeSource, TokenId,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, RwLock};
use tokio::sync::Mutex;
use tracing::debug;

/// Carbon Credit Ledger service.
///
/// Every mutation for a project runs under that project's async mutex:
/// a strict total order per project, so the conservation invariant can
/// never be corrupted by interleaved mints and transfers. The paired
/// registry counter update happens inside the same critical section.
pub struct LedgerService {
    ledger: RwLock<TokenLedger>,
    project_locks: StdMutex<HashMap<ProjectId, Arc<Mutex<()>>>>,
    accounts: Arc<dyn ProjectAccounts>,
    verifications: Arc<dyn VerificationGate>,
    bus: Arc<dyn EventPublisher>,
    clock: Arc<dyn TimeSource>,
}

impl LedgerService {
    pub fn new(
        ledger: TokenLedger,
        accounts: Arc<dyn ProjectAccounts>,
        verifications: Arc<dyn VerificationGate>,
        bus: Arc<dyn EventPublisher>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            ledger: RwLock::new(ledger),
            project_locks: StdMutex::new(HashMap::new()),
            accounts,
            verifications,
            bus,
            clock,
        }
    }

    fn project_lock(&self, project_id: ProjectId) -> Arc<Mutex<()>> {
        let mut locks = self.project_locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(project_id).or_default().clone()
    }

    fn read<R>(&self, f: impl FnOnce(&TokenLedger) -> R) -> R {
        let guard = self.ledger.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    fn write<R>(&self, f: impl FnOnce(&mut TokenLedger) -> R) -> R {
        let mut guard = self.ledger.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    fn token_project(&self, id: TokenId) -> Result<ProjectId, LedgerError> {
        self.read(|l| l.get(id).map(|t| t.project_id))
            .ok_or(LedgerError::TokenNotFound(id))
    }
}

#[async_trait]
impl LedgerApi for LedgerService {
    async fn mint(
        &self,
        authority: &Authority,
        order: MintOrder,
    ) -> Result<CarbonCreditToken, LedgerError> {
        if authority.subsystem() != Some(SubsystemId::Verification) {
            return Err(AuthorizationError::new(Capability::MutateCredits).into());
        }
        if order.amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        if !self.verifications.is_verified(order.verification_id) {
            return Err(LedgerError::UnverifiedSource {
                verification: order.verification_id,
            });
        }

        let lock = self.project_lock(order.project_id);
        let _guard = lock.lock().await;

        // Registry counters first; the token insert after cannot fail,
        // so both move or neither does.
        self.accounts
            .apply_mint(order.project_id, order.amount)
            .map_err(|e| LedgerError::Registry(e.to_string()))?;

        let now = self.clock.now();
        let token = self.write(|l| l.mint(order, now).cloned())?;

        self.bus
            .publish(PlatformEvent::CreditsMinted {
                token_id: token.id,
                project_id: token.project_id,
                amount: token.amount,
                serial: token.serial.0.clone(),
            })
            .await;
        Ok(token)
    }

    async fn transfer(
        &self,
        token_id: TokenId,
        from: &AccountRef,
        to: AccountRef,
        amount: u64,
    ) -> Result<TransferOutcome, LedgerError> {
        let project_id = self.token_project(token_id)?;
        let lock = self.project_lock(project_id);
        let _guard = lock.lock().await;

        let plan = self.read(|l| l.transfer_preflight(token_id, from, amount))?;
        if plan.pool_consumed > 0 {
            self.accounts
                .consume_available(project_id, plan.pool_consumed)
                .map_err(|e| LedgerError::Registry(e.to_string()))?;
            debug!(project = %project_id, amount = plan.pool_consumed, "issuing pool consumed");
        }

        let now = self.clock.now();
        let outcome =
            self.write(|l| l.commit_transfer(token_id, from, to.clone(), amount, now))?;

        self.bus
            .publish(PlatformEvent::CreditsTransferred {
                token_id: outcome.moved_token,
                project_id,
                from: from.clone(),
                to,
                amount,
            })
            .await;
        Ok(outcome)
    }

    async fn retire(
        &self,
        token_id: TokenId,
        amount: u64,
        reason: String,
    ) -> Result<TransferOutcome, LedgerError> {
        let project_id = self.token_project(token_id)?;
        let lock = self.project_lock(project_id);
        let _guard = lock.lock().await;

        let plan = self.read(|l| l.retire_preflight(token_id, amount))?;
        if plan.pool_consumed > 0 {
            // Retiring straight out of the issuing pool also removes
            // the credits from what the project can still sell.
            self.accounts
                .consume_available(project_id, plan.pool_consumed)
                .map_err(|e| LedgerError::Registry(e.to_string()))?;
        }

        let now = self.clock.now();
        let outcome =
            self.write(|l| l.commit_retire(token_id, amount, reason.clone(), now))?;

        self.bus
            .publish(PlatformEvent::CreditsRetired {
                token_id: outcome.moved_token,
                project_id,
                amount,
                reason,
            })
            .await;
        Ok(outcome)
    }

    fn balance_of(&self, owner: &AccountRef) -> u64 {
        self.read(|l| l.balance_of(owner))
    }

    fn tokens_of(&self, owner: &AccountRef) -> Vec<CarbonCreditToken> {
        self.read(|l| l.tokens_of(owner).into_iter().cloned().collect())
    }

    fn tokens_for_project(&self, project_id: ProjectId) -> Vec<CarbonCreditToken> {
        self.read(|l| l.tokens_for_project(project_id).into_iter().cloned().collect())
    }

    fn circulating_supply(&self, project_id: ProjectId) -> u64 {
        self.read(|l| l.circulating_supply(project_id))
    }

    fn get_token(&self, id: TokenId) -> Option<CarbonCreditToken> {
        self.read(|l| l.get(id).cloned())
    }
}
