//! Identity service: authentication against the account directory plus
//! session persistence through the local key-value store.

use crate::domain::{AccountDirectory, AuthError, OrganizationDirectory};
use crate::ports::IdentityApi;
use shared_store::{KvStore, KvStoreExt};
use shared_types::{Session, TimeSource};
use std::sync::Arc;
use tracing::{debug, info};

/// Storage key for the persisted session blob.
const SESSION_KEY: &str = "session";

/// Configuration for the Identity subsystem.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Session lifetime in milliseconds.
    pub session_ttl_ms: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            // 8 hours
            session_ttl_ms: 8 * 60 * 60 * 1000,
        }
    }
}

/// Identity & Session service.
pub struct IdentityService {
    accounts: AccountDirectory,
    organizations: OrganizationDirectory,
    store: Arc<dyn KvStore>,
    clock: Arc<dyn TimeSource>,
    config: IdentityConfig,
}

impl IdentityService {
    pub fn new(
        accounts: AccountDirectory,
        organizations: OrganizationDirectory,
        store: Arc<dyn KvStore>,
        clock: Arc<dyn TimeSource>,
        config: IdentityConfig,
    ) -> Self {
        Self {
            accounts,
            organizations,
            store,
            clock,
            config,
        }
    }

    /// The organization directory, for access-scoping queries.
    pub fn organizations(&self) -> &OrganizationDirectory {
        &self.organizations
    }

    /// The account directory (read-only lookups).
    pub fn accounts(&self) -> &AccountDirectory {
        &self.accounts
    }
}

impl IdentityApi for IdentityService {
    fn login(&self, email: &str, credential: &str) -> Result<Session, AuthError> {
        let user = self.accounts.authenticate(email, credential)?;
        let now = self.clock.now();
        let session = Session {
            user: user.clone(),
            issued_at: now,
            expires_at: now + self.config.session_ttl_ms,
        };
        self.store.save(SESSION_KEY, &session)?;
        info!(user = %session.user.id, role = ?session.user.role, "login");
        Ok(session)
    }

    fn logout(&self) -> Result<(), AuthError> {
        self.store.remove(SESSION_KEY)?;
        debug!("session cleared");
        Ok(())
    }

    fn current_session(&self) -> Result<Option<Session>, AuthError> {
        let Some(session) = self.store.load::<Session>(SESSION_KEY)? else {
            return Ok(None);
        };
        if !session.is_valid_at(self.clock.now()) {
            // Expired blobs are discarded, not surfaced as errors.
            self.store.remove(SESSION_KEY)?;
            debug!(user = %session.user.id, "expired session discarded");
            return Ok(None);
        }
        Ok(Some(session))
    }
}
