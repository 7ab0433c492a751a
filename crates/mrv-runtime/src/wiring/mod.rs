//! # Event Routing
//!
//! Subscribes the registry and the ledger to the choreography events
//! they react to:
//!
//! ```text
//! MeasurementSynced ──→ Registry.mark_active (first record only)
//! MintRequested ──────→ Ledger.mint (+ registry counters)
//! ```
//!
//! Failures that break the choreography are routed to the dead-letter
//! topic for operator attention; expected no-ops (a measurement for an
//! already-active project) are logged and dropped.

use crate::container::Platform;
use bc_02_project_registry::{ProjectRegistryApi, RegistryError};
use bc_05_credit_ledger::{LedgerApi, MintOrder};
use shared_bus::{EventFilter, EventPublisher, EventTopic, PlatformEvent};
use shared_types::{Authority, ProjectStatus, SubsystemId};
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Handles for the spawned routing tasks. Aborted on drop so tests and
/// shutdown paths do not leak listeners.
pub struct RoutingHandles {
    activation: JoinHandle<()>,
    minting: JoinHandle<()>,
}

impl Drop for RoutingHandles {
    fn drop(&mut self) {
        self.activation.abort();
        self.minting.abort();
    }
}

/// Subscribes and spawns the routing tasks.
pub fn start_event_routing(platform: &Platform) -> RoutingHandles {
    // Subscriptions are created before spawning so no event published
    // after this call can be missed.
    let mut measurement_sub = platform
        .bus
        .subscribe(EventFilter::topics(vec![EventTopic::FieldRecords]));
    let mut verification_sub = platform
        .bus
        .subscribe(EventFilter::topics(vec![EventTopic::Verification]));

    let registry = platform.registry.clone();
    let bus = platform.bus.clone();
    let activation = tokio::spawn(async move {
        while let Some(event) = measurement_sub.recv().await {
            let PlatformEvent::MeasurementSynced { project_id, .. } = event else {
                continue;
            };
            // Only the first record moves the lifecycle.
            let is_pending = registry
                .get_project(project_id)
                .map(|p| p.status == ProjectStatus::Pending)
                .unwrap_or(false);
            if !is_pending {
                debug!(project = %project_id, "measurement for non-pending project");
                continue;
            }
            let authority = Authority::Subsystem(SubsystemId::FieldRecords);
            match registry.mark_active(&authority, project_id) {
                Ok(_) => {
                    bus.publish(PlatformEvent::ProjectActivated { project_id }).await;
                }
                Err(RegistryError::StateConflict(_)) => {
                    debug!(project = %project_id, "project already past pending");
                }
                Err(e) => {
                    error!(project = %project_id, error = %e, "activation failed");
                    bus.publish(PlatformEvent::CriticalError {
                        subsystem: SubsystemId::Registry,
                        detail: format!("activation of {project_id} failed: {e}"),
                    })
                    .await;
                }
            }
        }
    });

    let ledger = platform.ledger.clone();
    let bus = platform.bus.clone();
    let minting = tokio::spawn(async move {
        while let Some(event) = verification_sub.recv().await {
            let PlatformEvent::MintRequested {
                verification_id,
                project_id,
                amount,
                vintage,
                metadata,
                issuer,
            } = event
            else {
                continue;
            };
            let order = MintOrder {
                verification_id,
                project_id,
                amount,
                vintage,
                metadata,
                issuer,
            };
            let authority = Authority::Subsystem(SubsystemId::Verification);
            if let Err(e) = ledger.mint(&authority, order).await {
                error!(project = %project_id, error = %e, "mint request failed");
                bus.publish(PlatformEvent::CriticalError {
                    subsystem: SubsystemId::Ledger,
                    detail: format!("mint for {project_id} failed: {e}"),
                })
                .await;
            }
        }
    });

    RoutingHandles { activation, minting }
}
