//! In-memory uplink adapter.
//!
//! Stands in for the remote ingestion endpoint: accepted measurements
//! land in the [`MonitoringArchive`] and a `MeasurementSynced` event is
//! published for the registry choreography. The idempotency cache keyed
//! on the measurement id makes replays acknowledge without a second
//! archive insert or a second event.

use crate::domain::{IdempotencyCache, MonitoringArchive, TransientSyncError};
use crate::ports::RecordUplink;
use async_trait::async_trait;
use shared_bus::{EventPublisher, PlatformEvent};
use shared_types::FieldMeasurement;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Uplink backed by the in-process archive and event bus.
pub struct InMemoryUplink {
    archive: Arc<MonitoringArchive>,
    bus: Arc<dyn EventPublisher>,
    dedupe: IdempotencyCache,
    /// Number of upcoming submissions to fail with a transient error.
    /// Used to exercise retry paths.
    fail_next: AtomicU32,
}

impl InMemoryUplink {
    pub fn new(archive: Arc<MonitoringArchive>, bus: Arc<dyn EventPublisher>) -> Self {
        Self {
            archive,
            bus,
            dedupe: IdempotencyCache::new(),
            fail_next: AtomicU32::new(0),
        }
    }

    /// Makes the next `n` submissions fail with a transient error.
    pub fn fail_next(&self, n: u32) {
        self.fail_next.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordUplink for InMemoryUplink {
    async fn submit(&self, measurement: FieldMeasurement) -> Result<(), TransientSyncError> {
        let remaining = self.fail_next.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_next.store(remaining - 1, Ordering::SeqCst);
            return Err(TransientSyncError::new("simulated connectivity loss"));
        }

        let id = measurement.id;
        if !self.dedupe.check_and_insert(id) {
            debug!(measurement = %id, "replayed submission acknowledged");
            return Ok(());
        }

        let event = PlatformEvent::MeasurementSynced {
            measurement_id: id,
            project_id: measurement.project_id,
            kind: measurement.kind(),
        };
        self.archive.insert(measurement);
        self.bus.publish(event).await;
        Ok(())
    }
}
