//! # Inbound Port - VerificationApi
//!
//! Primary driving port for the review workflow. Verifier-role users
//! only; the reviewer who opened a record is the only user who may
//! mutate or conclude it.

use crate::domain::{MintRequest, ReviewFilter, VerificationError};
use async_trait::async_trait;
use shared_types::{
    EvidenceItem, Findings, MeasurementId, ProjectId, User, VerificationId, VerificationMethod,
    VerificationRecord,
};

/// Primary API for the Verification Workflow subsystem.
#[async_trait]
pub trait VerificationApi: Send + Sync {
    /// Opens a review for a project with synced monitoring evidence.
    ///
    /// # Errors
    /// - `Unauthorized`: actor is not a verifier
    /// - `ProjectNotFound`, `NoMonitoringRecords`
    /// - `StateConflict`: the project is not reviewable from its state
    async fn open_review(
        &self,
        actor: &User,
        project_id: ProjectId,
        method: VerificationMethod,
        evidence: Vec<EvidenceItem>,
    ) -> Result<VerificationRecord, VerificationError>;

    /// Records or replaces the reviewer's findings.
    fn record_findings(
        &self,
        actor: &User,
        id: VerificationId,
        findings: Findings,
    ) -> Result<VerificationRecord, VerificationError>;

    /// Flags one evidence item as checked (or unchecked).
    fn set_evidence_verified(
        &self,
        actor: &User,
        id: VerificationId,
        evidence_id: MeasurementId,
        verified: bool,
    ) -> Result<VerificationRecord, VerificationError>;

    /// Concludes the review as verified; freezes the record, reports
    /// the outcome to the registry, and emits a mint request when the
    /// recommendation is positive.
    ///
    /// # Errors
    /// - `IncompleteEvidence` iff any evidence item is unverified
    /// - `OutstandingCompliance` iff compliance issues remain open
    async fn approve(
        &self,
        actor: &User,
        id: VerificationId,
    ) -> Result<(VerificationRecord, Option<MintRequest>), VerificationError>;

    /// Concludes the review as rejected and freezes it for audit.
    async fn reject(
        &self,
        actor: &User,
        id: VerificationId,
        reason: String,
    ) -> Result<VerificationRecord, VerificationError>;

    /// Parks the review until more evidence arrives.
    fn request_additional_data(
        &self,
        actor: &User,
        id: VerificationId,
    ) -> Result<VerificationRecord, VerificationError>;

    /// Resumes a parked review with new evidence.
    fn resume_review(
        &self,
        actor: &User,
        id: VerificationId,
        extra_evidence: Vec<EvidenceItem>,
    ) -> Result<VerificationRecord, VerificationError>;

    /// Records matching the filter, most recently opened first.
    fn verification_queue(&self, filter: &ReviewFilter) -> Vec<VerificationRecord>;

    /// Gets a record by id.
    fn get_review(&self, id: VerificationId) -> Option<VerificationRecord>;
}
