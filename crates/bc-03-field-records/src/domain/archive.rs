//! Append-only archive of synced measurements.
//!
//! Once a measurement syncs it is evidentiary: the archive accepts
//! inserts and serves reads, nothing is ever updated or deleted.

use shared_types::{FieldMeasurement, MeasurementId, MeasurementKind, ProjectId, SyncStatus};
use std::collections::HashMap;
use std::sync::RwLock;

/// Store of synced measurements, append-only.
#[derive(Debug, Default)]
pub struct MonitoringArchive {
    inner: RwLock<ArchiveInner>,
}

#[derive(Debug, Default)]
struct ArchiveInner {
    by_id: HashMap<MeasurementId, FieldMeasurement>,
    by_project: HashMap<ProjectId, Vec<MeasurementId>>,
}

impl MonitoringArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a synced measurement. Returns false if the id was
    /// already archived (replayed submission, nothing changes).
    pub fn insert(&self, mut measurement: FieldMeasurement) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if inner.by_id.contains_key(&measurement.id) {
            return false;
        }
        measurement.sync_status = SyncStatus::Synced;
        inner
            .by_project
            .entry(measurement.project_id)
            .or_default()
            .push(measurement.id);
        inner.by_id.insert(measurement.id, measurement);
        true
    }

    /// The archived measurement with the given id.
    pub fn get(&self, id: MeasurementId) -> Option<FieldMeasurement> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.by_id.get(&id).cloned()
    }

    /// All synced measurements for a project, in arrival order.
    pub fn records_for_project(&self, project_id: ProjectId) -> Vec<FieldMeasurement> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner
            .by_project
            .get(&project_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| inner.by_id.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns true if the project has at least one synced record of
    /// the given kind.
    pub fn has_record_of_kind(&self, project_id: ProjectId, kind: MeasurementKind) -> bool {
        self.records_for_project(project_id)
            .iter()
            .any(|r| r.kind() == kind)
    }

    /// Total number of archived measurements.
    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.by_id.len()
    }

    /// Returns true if nothing has been archived.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
