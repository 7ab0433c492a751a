//! Review store and state machine.
//!
//! All transitions are validated here; the service layer adds
//! authorization, project lookups, and event publishing. Concluding a
//! review freezes it: `immutable_record` flips on, the record hash is
//! computed over the frozen content, and every later mutation attempt
//! is a state conflict.

use crate::domain::confidence::compute_confidence;
use crate::domain::errors::VerificationError;
use sha2::{Digest, Sha256};
use shared_types::{
    AccountRef, EvidenceItem, Findings, MeasurementId, ProjectId, StateConflictError, Timestamp,
    TokenMetadata, UserId, VerificationId, VerificationMethod, VerificationRecord,
    VerificationStatus,
};
use std::collections::HashMap;
use tracing::{debug, info};

/// Milliseconds per year (365.25 days), for vintage and duration math.
pub const MS_PER_YEAR: u64 = 31_557_600_000;

/// Mint instruction produced by an approval with a positive
/// recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct MintRequest {
    pub verification_id: VerificationId,
    pub project_id: ProjectId,
    pub amount: u64,
    pub vintage: u16,
    pub metadata: TokenMetadata,
    pub issuer: AccountRef,
}

/// Filter for the verification queue query.
#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub status: Option<VerificationStatus>,
    pub project: Option<ProjectId>,
    pub method: Option<VerificationMethod>,
}

impl ReviewFilter {
    fn matches(&self, record: &VerificationRecord) -> bool {
        self.status.map_or(true, |s| record.status == s)
            && self.project.map_or(true, |p| record.project_id == p)
            && self.method.map_or(true, |m| record.method == m)
    }
}

/// The credit recommendation formula.
///
/// `floor(area_verified_hectares × carbon_sequestration_rate × years)`,
/// clamped at zero for degenerate findings.
pub fn recommended_credits(findings: &Findings, monitoring_years: u64) -> u64 {
    let raw = findings.area_verified_hectares
        * findings.carbon_sequestration_rate
        * monitoring_years as f64;
    if raw.is_finite() && raw > 0.0 {
        raw.floor() as u64
    } else {
        0
    }
}

/// Store of verification records for the workflow.
#[derive(Debug, Default)]
pub struct ReviewStore {
    by_id: HashMap<VerificationId, VerificationRecord>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records, concluded ones included.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if no review was ever opened.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Gets a record by id.
    pub fn get(&self, id: VerificationId) -> Option<&VerificationRecord> {
        self.by_id.get(&id)
    }

    /// Records matching the filter, most recently opened first.
    pub fn queue(&self, filter: &ReviewFilter) -> Vec<&VerificationRecord> {
        let mut records: Vec<_> = self
            .by_id
            .values()
            .filter(|r| filter.matches(r))
            .collect();
        records.sort_by_key(|r| std::cmp::Reverse(r.opened_at));
        records
    }

    /// Opens a review. Starts `Pending` with no evidence attached yet,
    /// `InProgress` otherwise.
    pub fn open(
        &mut self,
        verifier: UserId,
        project_id: ProjectId,
        method: VerificationMethod,
        evidence: Vec<EvidenceItem>,
        now: Timestamp,
    ) -> &VerificationRecord {
        let status = if evidence.is_empty() {
            VerificationStatus::Pending
        } else {
            VerificationStatus::InProgress
        };
        let record = VerificationRecord {
            id: VerificationId::generate(),
            project_id,
            verifier,
            method,
            evidence,
            status,
            confidence_score: 0,
            findings: Findings::default(),
            credits_recommended: 0,
            immutable_record: false,
            record_hash: String::new(),
            opened_at: now,
        };
        let id = record.id;
        info!(review = %id, project = %project_id, method = ?method, "review opened");
        self.by_id.entry(id).or_insert(record)
    }

    fn open_record_mut(
        &mut self,
        id: VerificationId,
    ) -> Result<&mut VerificationRecord, VerificationError> {
        let record = self.by_id.get_mut(&id).ok_or(VerificationError::NotFound(id))?;
        if !matches!(
            record.status,
            VerificationStatus::Pending | VerificationStatus::InProgress
        ) {
            return Err(StateConflictError::new(
                "pending | in_progress",
                status_name(record.status),
            )
            .into());
        }
        Ok(record)
    }

    /// Records or replaces the verifier's findings.
    pub fn record_findings(
        &mut self,
        id: VerificationId,
        findings: Findings,
    ) -> Result<&VerificationRecord, VerificationError> {
        let record = self.open_record_mut(id)?;
        record.findings = findings;
        record.status = VerificationStatus::InProgress;
        debug!(review = %id, "findings recorded");
        Ok(record)
    }

    /// Flags one evidence item as checked (or unchecked).
    pub fn set_evidence_verified(
        &mut self,
        id: VerificationId,
        evidence_id: MeasurementId,
        verified: bool,
    ) -> Result<&VerificationRecord, VerificationError> {
        let record = self.open_record_mut(id)?;
        if let Some(item) = record.evidence.iter_mut().find(|e| e.id == evidence_id) {
            item.verified = verified;
        }
        record.status = VerificationStatus::InProgress;
        Ok(record)
    }

    /// Parks the review awaiting more evidence.
    pub fn request_additional_data(
        &mut self,
        id: VerificationId,
    ) -> Result<&VerificationRecord, VerificationError> {
        let record = self.open_record_mut(id)?;
        record.status = VerificationStatus::RequiresAdditionalData;
        info!(review = %id, "additional data requested");
        Ok(record)
    }

    /// Resumes a parked review with new evidence. The only backward
    /// edge in the state machine.
    pub fn resume(
        &mut self,
        id: VerificationId,
        extra_evidence: Vec<EvidenceItem>,
    ) -> Result<&VerificationRecord, VerificationError> {
        let record = self.by_id.get_mut(&id).ok_or(VerificationError::NotFound(id))?;
        if record.status != VerificationStatus::RequiresAdditionalData {
            return Err(StateConflictError::new(
                "requires_additional_data",
                status_name(record.status),
            )
            .into());
        }
        record.evidence.extend(extra_evidence);
        record.status = VerificationStatus::InProgress;
        info!(review = %id, "review resumed");
        Ok(record)
    }

    /// Concludes the review as verified and freezes it.
    ///
    /// # Errors
    /// - `IncompleteEvidence` listing every unverified item
    /// - `OutstandingCompliance` listing the open issues
    pub fn approve(
        &mut self,
        id: VerificationId,
        credits_recommended: u64,
    ) -> Result<&VerificationRecord, VerificationError> {
        let record = self.open_record_mut(id)?;

        let unverified: Vec<MeasurementId> = record
            .evidence
            .iter()
            .filter(|e| !e.verified)
            .map(|e| e.id)
            .collect();
        if !unverified.is_empty() {
            return Err(VerificationError::IncompleteEvidence { unverified });
        }
        if !record.findings.compliance_issues.is_empty() {
            return Err(VerificationError::OutstandingCompliance {
                issues: record.findings.compliance_issues.clone(),
            });
        }

        record.confidence_score = compute_confidence(
            record.method,
            &record.evidence,
            record.findings.compliance_issues.len(),
        );
        record.credits_recommended = credits_recommended;
        record.status = VerificationStatus::Verified;
        freeze(record);
        info!(
            review = %id,
            confidence = record.confidence_score,
            credits = credits_recommended,
            "review approved"
        );
        Ok(record)
    }

    /// Concludes the review as rejected, appending the reason to the
    /// compliance issues, and freezes it for audit.
    pub fn reject(
        &mut self,
        id: VerificationId,
        reason: String,
    ) -> Result<&VerificationRecord, VerificationError> {
        let record = self.open_record_mut(id)?;
        record.findings.compliance_issues.push(reason);
        record.confidence_score = compute_confidence(
            record.method,
            &record.evidence,
            record.findings.compliance_issues.len(),
        );
        record.status = VerificationStatus::Rejected;
        freeze(record);
        info!(review = %id, "review rejected");
        Ok(record)
    }
}

/// Freezes a concluded record: immutable flag plus content hash.
fn freeze(record: &mut VerificationRecord) {
    record.immutable_record = true;
    record.record_hash = hash_record(record);
}

/// SHA-256 over the canonical JSON of the record with the hash field
/// empty. Struct field order is fixed, so the encoding is stable.
fn hash_record(record: &VerificationRecord) -> String {
    let mut canonical = record.clone();
    canonical.record_hash = String::new();
    let bytes = serde_json::to_vec(&canonical).unwrap_or_default();
    let digest = Sha256::digest(&bytes);
    hex::encode(digest)
}

fn status_name(status: VerificationStatus) -> &'static str {
    match status {
        VerificationStatus::Pending => "pending",
        VerificationStatus::InProgress => "in_progress",
        VerificationStatus::Verified => "verified",
        VerificationStatus::Rejected => "rejected",
        VerificationStatus::RequiresAdditionalData => "requires_additional_data",
    }
}
