//! Sync error types.

use shared_store::StoreError;
use thiserror::Error;

/// Connectivity failure while submitting a record to the uplink.
///
/// The only retryable error in the platform: the record stays queued
/// and the next `sync_pending` call re-attempts it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transient sync failure: {detail}")]
pub struct TransientSyncError {
    pub detail: String,
}

impl TransientSyncError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Field Record Store error type.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Another sync for this device is already in flight. The caller
    /// observes the pending state; it must not start a second sync.
    #[error("sync already in flight for this device")]
    SyncInFlight,

    /// The durable queue could not be read or written.
    #[error("queue storage failure")]
    Store(#[from] StoreError),
}
