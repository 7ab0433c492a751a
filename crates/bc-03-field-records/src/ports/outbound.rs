//! Outbound (Driven) ports for the Field Record Store.

use crate::domain::TransientSyncError;
use async_trait::async_trait;
use shared_types::FieldMeasurement;

/// Remote submission endpoint for field measurements.
///
/// Implementations must be idempotent on the measurement id: accepting
/// the same record twice acknowledges without duplicating it. The
/// in-memory adapter backs this with an [`crate::domain::IdempotencyCache`];
/// a networked backend would key on the same id server-side.
#[async_trait]
pub trait RecordUplink: Send + Sync {
    /// Submits one measurement.
    ///
    /// # Errors
    /// - `TransientSyncError`: connectivity failure; the caller keeps
    ///   the record queued and retries on the next sync
    async fn submit(&self, measurement: FieldMeasurement) -> Result<(), TransientSyncError>;
}
