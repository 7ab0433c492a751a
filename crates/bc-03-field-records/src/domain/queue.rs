//! Durable per-device offline queue.
//!
//! The queue is a FIFO of measurements awaiting sync, persisted as one
//! JSON blob per device through the local key-value store. Every
//! mutation writes the blob back before returning, so a crash never
//! loses an accepted measurement.

use crate::domain::errors::SyncError;
use shared_store::{KvStore, KvStoreExt};
use shared_types::{
    DeviceId, EvidencePhoto, FieldMeasurement, GpsFix, MeasurementId, MeasurementPayload, OrgId,
    ProjectId, SyncStatus, Timestamp, UserId,
};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, warn};

/// Input captured on the field device for `save_offline`.
#[derive(Debug, Clone)]
pub struct MeasurementDraft {
    pub project_id: ProjectId,
    pub gps: GpsFix,
    pub payload: MeasurementPayload,
    pub photos: Vec<EvidencePhoto>,
    pub field_officer: UserId,
    pub organization: OrgId,
}

/// Result of one `sync_pending` run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Records accepted by the uplink this run, in queue order.
    pub synced: Vec<MeasurementId>,
    /// Records that hit a transient failure and remain queued.
    pub failed: Vec<MeasurementId>,
}

/// FIFO queue of measurements awaiting sync, durable per device.
pub struct OfflineQueue {
    device: DeviceId,
    records: VecDeque<FieldMeasurement>,
    store: Arc<dyn KvStore>,
}

impl OfflineQueue {
    /// Loads the queue for `device`, recovering any records left behind
    /// by a previous process.
    ///
    /// Records found in `Syncing` state are from a crashed sync run;
    /// they are normalized to `Error` so the next sync retries them
    /// (the uplink dedupe makes the retry safe).
    pub fn load(device: DeviceId, store: Arc<dyn KvStore>) -> Result<Self, SyncError> {
        let mut records: VecDeque<FieldMeasurement> =
            store.load(&Self::key(device))?.unwrap_or_default();

        let mut recovered = 0usize;
        for record in &mut records {
            if record.sync_status == SyncStatus::Syncing {
                record.sync_status = SyncStatus::Error;
                recovered += 1;
            }
        }
        if recovered > 0 {
            warn!(device = %device, recovered, "recovered in-flight records from crashed sync");
        }

        let queue = Self {
            device,
            records,
            store,
        };
        if recovered > 0 {
            queue.persist()?;
        }
        Ok(queue)
    }

    fn key(device: DeviceId) -> String {
        format!("offline-queue.{device}")
    }

    fn persist(&self) -> Result<(), SyncError> {
        self.store
            .save(&Self::key(self.device), &self.records)
            .map_err(SyncError::from)
    }

    /// Appends a draft as an `Offline` measurement and persists the
    /// queue. Always succeeds locally apart from storage failures.
    pub fn enqueue(
        &mut self,
        draft: MeasurementDraft,
        recorded_at: Timestamp,
    ) -> Result<MeasurementId, SyncError> {
        let measurement = FieldMeasurement {
            id: MeasurementId::generate(),
            project_id: draft.project_id,
            recorded_at,
            gps: draft.gps,
            payload: draft.payload,
            photos: draft.photos,
            field_officer: draft.field_officer,
            organization: draft.organization,
            sync_status: SyncStatus::Offline,
        };
        let id = measurement.id;
        self.records.push_back(measurement);
        self.persist()?;
        debug!(device = %self.device, measurement = %id, "measurement queued offline");
        Ok(id)
    }

    /// Ids currently queued, oldest first.
    pub fn snapshot(&self) -> Vec<MeasurementId> {
        self.records.iter().map(|r| r.id).collect()
    }

    /// The queued record with the given id.
    pub fn get(&self, id: MeasurementId) -> Option<&FieldMeasurement> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Number of records awaiting sync.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sets the sync status of a queued record and persists.
    pub fn mark(&mut self, id: MeasurementId, status: SyncStatus) -> Result<(), SyncError> {
        if let Some(record) = self.records.iter_mut().find(|r| r.id == id) {
            record.sync_status = status;
            self.persist()?;
        }
        Ok(())
    }

    /// Removes a record that the uplink accepted, preserving the order
    /// of the remainder, and persists.
    pub fn remove(&mut self, id: MeasurementId) -> Result<Option<FieldMeasurement>, SyncError> {
        let position = self.records.iter().position(|r| r.id == id);
        let removed = position.and_then(|at| self.records.remove(at));
        if removed.is_some() {
            self.persist()?;
        }
        Ok(removed)
    }
}
