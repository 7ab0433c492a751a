//! Verification service: authorization, registry coordination, and
//! event publishing around the review store.

use crate::domain::workflow::{recommended_credits, MS_PER_YEAR};
use crate::domain::{MintRequest, ReviewFilter, ReviewStore, VerificationError};
use crate::ports::{EvidenceSource, ProjectGate, ReviewConclusion, VerificationApi};
use async_trait::async_trait;
use shared_bus::{EventPublisher, PlatformEvent};
use shared_types::{
    AccountRef, EvidenceItem, Findings, MeasurementId, Project, ProjectId, ProjectStatus, Role,
    AuthorizationError, Capability, StateConflictError, TimeSource, User, VerificationId,
    VerificationMethod, VerificationRecord, VerificationStatus,
};
use std::sync::{Arc, RwLock};
use tracing::warn;

/// Verification Workflow service.
pub struct VerificationService {
    store: RwLock<ReviewStore>,
    gate: Arc<dyn ProjectGate>,
    evidence: Arc<dyn EvidenceSource>,
    bus: Arc<dyn EventPublisher>,
    clock: Arc<dyn TimeSource>,
}

impl VerificationService {
    pub fn new(
        gate: Arc<dyn ProjectGate>,
        evidence: Arc<dyn EvidenceSource>,
        bus: Arc<dyn EventPublisher>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            store: RwLock::new(ReviewStore::new()),
            gate,
            evidence,
            bus,
            clock,
        }
    }

    fn require_verifier(actor: &User) -> Result<(), VerificationError> {
        if actor.role != Role::Verifier {
            return Err(AuthorizationError::new(Capability::ReviewVerification).into());
        }
        Ok(())
    }

    /// The reviewer who opened a record is the only user who may touch it.
    fn require_owner(
        actor: &User,
        record: &VerificationRecord,
    ) -> Result<(), VerificationError> {
        if record.verifier != actor.id {
            return Err(AuthorizationError::new(Capability::ReviewVerification).into());
        }
        Ok(())
    }

    fn reviewable_project(&self, project_id: ProjectId) -> Result<Project, VerificationError> {
        let project = self
            .gate
            .project(project_id)
            .ok_or(VerificationError::ProjectNotFound(project_id))?;
        if !matches!(
            project.status,
            ProjectStatus::Active | ProjectStatus::RequiresAdditionalData
        ) {
            return Err(StateConflictError::new(
                "active | requires_additional_data",
                format!("{:?}", project.status).to_lowercase(),
            )
            .into());
        }
        if !self.evidence.has_monitoring_record(project_id) {
            return Err(VerificationError::NoMonitoringRecords(project_id));
        }
        Ok(project)
    }

    /// Years of monitoring between the project start and `now`, floored
    /// at one so young projects still earn their first vintage.
    fn monitoring_years(project: &Project, now: u64) -> u64 {
        (now.saturating_sub(project.start_date) / MS_PER_YEAR).max(1)
    }

    fn vintage(now: u64) -> u16 {
        1970 + (now / MS_PER_YEAR) as u16
    }

    fn write<R>(&self, f: impl FnOnce(&mut ReviewStore) -> R) -> R {
        let mut guard = self.store.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    fn read<R>(&self, f: impl FnOnce(&ReviewStore) -> R) -> R {
        let guard = self.store.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    fn owned_open_record(
        store: &ReviewStore,
        actor: &User,
        id: VerificationId,
    ) -> Result<VerificationRecord, VerificationError> {
        let record = store.get(id).ok_or(VerificationError::NotFound(id))?;
        Self::require_owner(actor, record)?;
        if !matches!(
            record.status,
            VerificationStatus::Pending | VerificationStatus::InProgress
        ) {
            return Err(StateConflictError::new(
                "pending | in_progress",
                format!("{:?}", record.status).to_lowercase(),
            )
            .into());
        }
        Ok(record.clone())
    }
}

#[async_trait]
impl VerificationApi for VerificationService {
    async fn open_review(
        &self,
        actor: &User,
        project_id: ProjectId,
        method: VerificationMethod,
        evidence: Vec<EvidenceItem>,
    ) -> Result<VerificationRecord, VerificationError> {
        Self::require_verifier(actor)?;
        self.reviewable_project(project_id)?;

        let now = self.clock.now();
        let record =
            self.write(|store| store.open(actor.id, project_id, method, evidence, now).clone());

        self.bus
            .publish(PlatformEvent::ReviewOpened {
                verification_id: record.id,
                project_id,
                method,
            })
            .await;
        Ok(record)
    }

    fn record_findings(
        &self,
        actor: &User,
        id: VerificationId,
        findings: Findings,
    ) -> Result<VerificationRecord, VerificationError> {
        Self::require_verifier(actor)?;
        self.write(|store| {
            Self::owned_open_record(store, actor, id)?;
            store.record_findings(id, findings).cloned()
        })
    }

    fn set_evidence_verified(
        &self,
        actor: &User,
        id: VerificationId,
        evidence_id: MeasurementId,
        verified: bool,
    ) -> Result<VerificationRecord, VerificationError> {
        Self::require_verifier(actor)?;
        self.write(|store| {
            Self::owned_open_record(store, actor, id)?;
            store.set_evidence_verified(id, evidence_id, verified).cloned()
        })
    }

    async fn approve(
        &self,
        actor: &User,
        id: VerificationId,
    ) -> Result<(VerificationRecord, Option<MintRequest>), VerificationError> {
        Self::require_verifier(actor)?;
        let now = self.clock.now();

        // Conclude under the write lock so nothing interleaves between
        // the registry transition and the frozen record.
        let (record, mint) = {
            let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
            let open = Self::owned_open_record(&store, actor, id)?;

            let project = self
                .gate
                .project(open.project_id)
                .ok_or(VerificationError::ProjectNotFound(open.project_id))?;
            let years = Self::monitoring_years(&project, now);
            let credits = recommended_credits(&open.findings, years);

            // Evidence and compliance preconditions fail before the
            // registry hears anything, and before the record freezes.
            let unverified: Vec<MeasurementId> = open
                .evidence
                .iter()
                .filter(|e| !e.verified)
                .map(|e| e.id)
                .collect();
            if !unverified.is_empty() {
                return Err(VerificationError::IncompleteEvidence { unverified });
            }
            if !open.findings.compliance_issues.is_empty() {
                return Err(VerificationError::OutstandingCompliance {
                    issues: open.findings.compliance_issues.clone(),
                });
            }

            self.gate
                .report_conclusion(open.project_id, ReviewConclusion::Approved)
                .map_err(|e| VerificationError::Registry(e.to_string()))?;

            let record = store.approve(id, credits)?;

            let mint = (credits > 0).then(|| MintRequest {
                verification_id: record.id,
                project_id: record.project_id,
                amount: credits,
                vintage: Self::vintage(now),
                metadata: shared_types::TokenMetadata {
                    ecosystem: project.ecosystem,
                    methodology: project.methodology.clone(),
                    verifier: actor.id,
                    gps: project.location.point,
                    evidence_hash: record.record_hash.clone(),
                },
                issuer: AccountRef::Organization(project.organization),
            });
            (record.clone(), mint)
        };

        self.bus
            .publish(PlatformEvent::VerificationApproved {
                verification_id: record.id,
                project_id: record.project_id,
                credits_recommended: record.credits_recommended,
            })
            .await;
        if let Some(request) = &mint {
            self.bus
                .publish(PlatformEvent::MintRequested {
                    verification_id: request.verification_id,
                    project_id: request.project_id,
                    amount: request.amount,
                    vintage: request.vintage,
                    metadata: request.metadata.clone(),
                    issuer: request.issuer.clone(),
                })
                .await;
        }
        Ok((record, mint))
    }

    async fn reject(
        &self,
        actor: &User,
        id: VerificationId,
        reason: String,
    ) -> Result<VerificationRecord, VerificationError> {
        Self::require_verifier(actor)?;

        let record = {
            let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
            let open = Self::owned_open_record(&store, actor, id)?;

            self.gate
                .report_conclusion(open.project_id, ReviewConclusion::Rejected)
                .map_err(|e| VerificationError::Registry(e.to_string()))?;

            store.reject(id, reason.clone())?.clone()
        };

        self.bus
            .publish(PlatformEvent::VerificationRejected {
                verification_id: record.id,
                project_id: record.project_id,
                reason,
            })
            .await;
        Ok(record)
    }

    fn request_additional_data(
        &self,
        actor: &User,
        id: VerificationId,
    ) -> Result<VerificationRecord, VerificationError> {
        Self::require_verifier(actor)?;
        self.write(|store| {
            let open = Self::owned_open_record(store, actor, id)?;

            if let Err(e) = self
                .gate
                .report_conclusion(open.project_id, ReviewConclusion::RequiresAdditionalData)
            {
                warn!(review = %id, error = %e, "registry refused additional-data outcome");
                return Err(VerificationError::Registry(e.to_string()));
            }
            store.request_additional_data(id).cloned()
        })
    }

    fn resume_review(
        &self,
        actor: &User,
        id: VerificationId,
        extra_evidence: Vec<EvidenceItem>,
    ) -> Result<VerificationRecord, VerificationError> {
        Self::require_verifier(actor)?;
        self.write(|store| {
            let record = store.get(id).ok_or(VerificationError::NotFound(id))?;
            Self::require_owner(actor, record)?;
            store.resume(id, extra_evidence).cloned()
        })
    }

    fn verification_queue(&self, filter: &ReviewFilter) -> Vec<VerificationRecord> {
        self.read(|store| store.queue(filter).into_iter().cloned().collect())
    }

    fn get_review(&self, id: VerificationId) -> Option<VerificationRecord> {
        self.read(|store| store.get(id).cloned())
    }
}
