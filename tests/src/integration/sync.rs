//! # Offline Sync Semantics
//!
//! FIFO drain order, at-least-once retry, idempotent replay after a
//! simulated crash, single-flight per device, and cancellation
//! atomicity.

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use bc_03_field_records::{
        FieldRecordService, FieldRecordsApi, InMemoryUplink, MeasurementDraft, MonitoringArchive,
        RecordUplink, SyncError, TransientSyncError,
    };
    use shared_bus::InMemoryEventBus;
    use shared_store::{KvStore, MemoryStore};
    use shared_types::{
        DeviceId, FieldMeasurement, GeoPoint, GpsFix, ManualTimeSource, MeasurementPayload, OrgId,
        ProjectId, Role, Session, SyncStatus, User, UserId,
    };
    use std::sync::Arc;
    use std::time::Duration;

    fn session() -> Session {
        Session {
            user: User {
                id: UserId::generate(),
                name: "Ravi".into(),
                email: "ravi@ngo.org".into(),
                role: Role::Ngo,
                organization: OrgId::generate(),
            },
            issued_at: 0,
            expires_at: u64::MAX,
        }
    }

    fn draft(project_id: ProjectId) -> MeasurementDraft {
        MeasurementDraft {
            project_id,
            gps: GpsFix {
                point: GeoPoint { lat: 21.9, lng: 88.8 },
                accuracy_m: 5.0,
            },
            payload: MeasurementPayload::Plantation {
                species: "Avicennia marina".into(),
                saplings_planted: 1_200,
                survival_rate_pct: 84.0,
            },
            photos: vec![],
            field_officer: UserId::generate(),
            organization: OrgId::generate(),
        }
    }

    fn build(
        store: Arc<dyn KvStore>,
        device: DeviceId,
        uplink: Arc<dyn RecordUplink>,
    ) -> FieldRecordService {
        FieldRecordService::load(device, store, uplink, Arc::new(ManualTimeSource::new(1_000)))
            .unwrap()
    }

    #[tokio::test]
    async fn test_fifo_order_and_at_least_once_retry() {
        let archive = Arc::new(MonitoringArchive::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let uplink = Arc::new(InMemoryUplink::new(archive.clone(), bus));
        let service = build(
            Arc::new(MemoryStore::new()),
            DeviceId::generate(),
            uplink.clone(),
        );

        let project = ProjectId::generate();
        let first = service.save_offline(draft(project)).unwrap();
        let second = service.save_offline(draft(project)).unwrap();
        let third = service.save_offline(draft(project)).unwrap();

        // First submission fails transiently; the rest succeed.
        uplink.fail_next(1);
        let report = service.sync_pending(&session()).await.unwrap();
        assert_eq!(report.failed, vec![first]);
        assert_eq!(report.synced, vec![second, third]);

        // The errored record is still queued and retries in order.
        assert_eq!(service.pending_count(), 1);
        let report = service.sync_pending(&session()).await.unwrap();
        assert_eq!(report.synced, vec![first]);
        assert_eq!(archive.records_for_project(project).len(), 3);
    }

    /// Crash simulation: the uplink accepts a record but the device
    /// dies before persisting the dequeue. The reloaded queue replays
    /// the record; the uplink acknowledges without a second copy.
    #[tokio::test]
    async fn test_crash_replay_is_idempotent() {
        let archive = Arc::new(MonitoringArchive::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let uplink = Arc::new(InMemoryUplink::new(archive.clone(), bus));
        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let device = DeviceId::generate();
        let project = ProjectId::generate();

        let id = {
            let service = build(store.clone(), device, uplink.clone());
            let id = service.save_offline(draft(project)).unwrap();
            // The uplink accepts directly, as if the device crashed
            // after the submit but before the queue persisted removal.
            let record = service.pending_record(id).unwrap();
            uplink.submit(record).await.unwrap();
            id
        };
        assert_eq!(archive.records_for_project(project).len(), 1);

        // Reload the queue from the durable blob and sync again.
        let service = build(store, device, uplink);
        assert_eq!(service.pending_count(), 1);
        let report = service.sync_pending(&session()).await.unwrap();
        assert_eq!(report.synced, vec![id]);

        // Exactly one synced copy, not two.
        assert_eq!(archive.records_for_project(project).len(), 1);
    }

    /// Uplink that parks every submission until released, to hold a
    /// sync open across another call.
    struct ParkedUplink {
        release: tokio::sync::Notify,
    }

    #[async_trait]
    impl RecordUplink for ParkedUplink {
        async fn submit(&self, _m: FieldMeasurement) -> Result<(), TransientSyncError> {
            self.release.notified().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_second_sync_observes_in_flight() {
        let uplink = Arc::new(ParkedUplink {
            release: tokio::sync::Notify::new(),
        });
        let service = Arc::new(build(
            Arc::new(MemoryStore::new()),
            DeviceId::generate(),
            uplink.clone(),
        ));
        service.save_offline(draft(ProjectId::generate())).unwrap();

        let background = {
            let service = service.clone();
            tokio::spawn(async move { service.sync_pending(&session()).await })
        };
        // Let the background sync reach the parked uplink.
        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = service.sync_pending(&session()).await.unwrap_err();
        assert!(matches!(err, SyncError::SyncInFlight));

        uplink.release.notify_waiters();
        let report = background.await.unwrap().unwrap();
        assert_eq!(report.synced.len(), 1);
    }

    #[tokio::test]
    async fn test_cancellation_leaves_no_half_applied_record() {
        let uplink = Arc::new(ParkedUplink {
            release: tokio::sync::Notify::new(),
        });
        let service = Arc::new(build(
            Arc::new(MemoryStore::new()),
            DeviceId::generate(),
            uplink.clone(),
        ));
        let project = ProjectId::generate();
        let first = service.save_offline(draft(project)).unwrap();
        let second = service.save_offline(draft(project)).unwrap();

        let background = {
            let service = service.clone();
            tokio::spawn(async move { service.sync_pending(&session()).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Cancel mid-flight, then release the parked first record.
        service.cancel_sync();
        uplink.release.notify_waiters();
        let report = background.await.unwrap().unwrap();

        // The in-flight record completed; the second was never started.
        assert_eq!(report.synced, vec![first]);
        assert_eq!(service.pending_count(), 1);
        assert_eq!(
            service.pending_record(second).unwrap().sync_status,
            SyncStatus::Offline
        );
    }
}
