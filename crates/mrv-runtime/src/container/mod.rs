//! # Service Container
//!
//! Builds every subsystem with explicit dependency injection and hands
//! back the [`Platform`] facade. No globals: all state lives in the
//! services owned here, and all cross-subsystem links go through the
//! adapter-implemented ports.

pub mod config;

pub use config::PlatformConfig;

use crate::adapters::{
    ArchiveEvidenceSource, RegistryProjectAccounts, RegistryProjectGate, WorkflowVerificationGate,
};
use crate::demo;
use crate::wiring::{self, RoutingHandles};
use bc_01_identity::{AccountDirectory, IdentityService, OrganizationDirectory};
use bc_01_identity::service::IdentityConfig;
use bc_02_project_registry::RegistryService;
use bc_03_field_records::{
    FieldRecordService, InMemoryUplink, MonitoringArchive, SyncError,
};
use bc_04_verification::VerificationService;
use bc_05_credit_ledger::{LedgerConfig, LedgerService, TokenLedger};
use shared_bus::InMemoryEventBus;
use shared_store::{JsonFileStore, KvStore, KvStoreExt, MemoryStore, StoreError};
use shared_types::{DeviceId, SystemTimeSource, TimeSource};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Storage key for this installation's device identity.
const DEVICE_KEY: &str = "device-id";

/// Errors raised while booting the platform.
#[derive(Debug, Error)]
pub enum BootError {
    #[error("local store unavailable")]
    Store(#[from] StoreError),

    #[error("offline queue could not be loaded")]
    Queue(#[from] SyncError),
}

/// The assembled platform: every subsystem service plus the bus.
pub struct Platform {
    pub config: PlatformConfig,
    pub bus: Arc<InMemoryEventBus>,
    pub identity: Arc<IdentityService>,
    pub registry: Arc<RegistryService>,
    pub field_records: Arc<FieldRecordService>,
    pub verification: Arc<VerificationService>,
    pub ledger: Arc<LedgerService>,
    pub archive: Arc<MonitoringArchive>,
}

impl Platform {
    /// Builds the platform with the system clock.
    pub fn build(config: PlatformConfig) -> Result<Self, BootError> {
        Self::build_with_clock(config, Arc::new(SystemTimeSource))
    }

    /// Builds the platform with an injected clock (deterministic tests).
    pub fn build_with_clock(
        config: PlatformConfig,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, BootError> {
        let store: Arc<dyn KvStore> = if config.ephemeral {
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(JsonFileStore::open(&config.storage_root)?)
        };

        let bus = Arc::new(InMemoryEventBus::with_capacity(config.bus_capacity));

        // Identity, with demo accounts when configured.
        let mut accounts = AccountDirectory::new();
        let mut organizations = OrganizationDirectory::new();
        if config.demo_seed {
            demo::seed_directories(&mut accounts, &mut organizations);
        }
        let identity = Arc::new(IdentityService::new(
            accounts,
            organizations,
            store.clone(),
            clock.clone(),
            IdentityConfig {
                session_ttl_ms: config.session_ttl_ms,
            },
        ));

        let registry = Arc::new(RegistryService::new());

        // Field records: stable device identity, archive, uplink.
        let device = match store.load::<DeviceId>(DEVICE_KEY)? {
            Some(device) => device,
            None => {
                let device = DeviceId::generate();
                store.save(DEVICE_KEY, &device)?;
                device
            }
        };
        let archive = Arc::new(MonitoringArchive::new());
        let uplink = Arc::new(InMemoryUplink::new(archive.clone(), bus.clone()));
        let field_records = Arc::new(FieldRecordService::load(
            device,
            store.clone(),
            uplink,
            clock.clone(),
        )?);

        let verification = Arc::new(VerificationService::new(
            Arc::new(RegistryProjectGate::new(registry.clone())),
            Arc::new(ArchiveEvidenceSource::new(archive.clone())),
            bus.clone(),
            clock.clone(),
        ));

        let ledger = Arc::new(LedgerService::new(
            TokenLedger::new(LedgerConfig {
                allow_partial_retirement: config.allow_partial_retirement,
                ..LedgerConfig::default()
            }),
            Arc::new(RegistryProjectAccounts::new(registry.clone())),
            Arc::new(WorkflowVerificationGate::new(verification.clone())),
            bus.clone(),
            clock,
        ));

        info!(device = %device, ephemeral = config.ephemeral, "platform assembled");
        Ok(Self {
            config,
            bus,
            identity,
            registry,
            field_records,
            verification,
            ledger,
            archive,
        })
    }

    /// Starts the choreography routing tasks. Must be called from a
    /// tokio runtime before commands are issued; without it synced
    /// measurements never activate projects and mint requests never
    /// reach the ledger.
    pub fn start(&self) -> RoutingHandles {
        wiring::start_event_routing(self)
    }
}
