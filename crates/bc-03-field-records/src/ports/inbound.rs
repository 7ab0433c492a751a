//! # Inbound Port - FieldRecordsApi
//!
//! Primary driving port for offline capture and sync.

use crate::domain::{MeasurementDraft, SyncError, SyncReport};
use async_trait::async_trait;
use shared_types::{FieldMeasurement, MeasurementId, Session};

/// Primary API for the Field Record Store subsystem.
#[async_trait]
pub trait FieldRecordsApi: Send + Sync {
    /// Captures a measurement locally. Always succeeds apart from
    /// storage failures; no connectivity is required.
    fn save_offline(&self, draft: MeasurementDraft) -> Result<MeasurementId, SyncError>;

    /// Drains the offline queue FIFO, at-least-once.
    ///
    /// # Errors
    /// - `SyncInFlight`: another sync for this device is running
    async fn sync_pending(&self, session: &Session) -> Result<SyncReport, SyncError>;

    /// Requests cooperative cancellation of a sync in progress. Records
    /// already accepted stay synced; the rest stay queued.
    fn cancel_sync(&self);

    /// Number of records awaiting sync.
    fn pending_count(&self) -> usize;

    /// A queued (not yet synced) record, if present.
    fn pending_record(&self, id: MeasurementId) -> Option<FieldMeasurement>;
}
