//! Port implementations connecting subsystems.
//!
//! Each subsystem declares what it needs as an outbound trait; the
//! runtime satisfies those traits against the real services, passing
//! the right subsystem authority on every privileged call.

use bc_02_project_registry::{ProjectRegistryApi, RegistryService, VerificationOutcome};
use bc_03_field_records::MonitoringArchive;
use bc_04_verification::ports::{EvidenceSource, GateError, ProjectGate, ReviewConclusion};
use bc_04_verification::VerificationService;
use bc_04_verification::ports::VerificationApi;
use bc_05_credit_ledger::ports::{AccountsError, ProjectAccounts, VerificationGate};
use shared_types::{Authority, Project, ProjectId, SubsystemId, VerificationId, VerificationStatus};
use std::sync::Arc;

/// Registry access for the Verification Workflow.
pub struct RegistryProjectGate {
    registry: Arc<RegistryService>,
}

impl RegistryProjectGate {
    pub fn new(registry: Arc<RegistryService>) -> Self {
        Self { registry }
    }
}

impl ProjectGate for RegistryProjectGate {
    fn project(&self, id: ProjectId) -> Option<Project> {
        self.registry.get_project(id)
    }

    fn report_conclusion(
        &self,
        id: ProjectId,
        conclusion: ReviewConclusion,
    ) -> Result<(), GateError> {
        let outcome = match conclusion {
            ReviewConclusion::Approved => VerificationOutcome::Approved,
            ReviewConclusion::Rejected => VerificationOutcome::Rejected,
            ReviewConclusion::RequiresAdditionalData => {
                VerificationOutcome::RequiresAdditionalData
            }
        };
        self.registry
            .apply_verification_outcome(
                &Authority::Subsystem(SubsystemId::Verification),
                id,
                outcome,
            )
            .map(|_| ())
            .map_err(|e| GateError(e.to_string()))
    }
}

/// Archive access for the Verification Workflow.
pub struct ArchiveEvidenceSource {
    archive: Arc<MonitoringArchive>,
}

impl ArchiveEvidenceSource {
    pub fn new(archive: Arc<MonitoringArchive>) -> Self {
        Self { archive }
    }
}

impl EvidenceSource for ArchiveEvidenceSource {
    fn has_monitoring_record(&self, id: ProjectId) -> bool {
        // Any synced field record counts as monitoring evidence.
        !self.archive.records_for_project(id).is_empty()
    }
}

/// Registry credit counters for the Ledger.
pub struct RegistryProjectAccounts {
    registry: Arc<RegistryService>,
}

impl RegistryProjectAccounts {
    pub fn new(registry: Arc<RegistryService>) -> Self {
        Self { registry }
    }
}

impl ProjectAccounts for RegistryProjectAccounts {
    fn apply_mint(&self, project_id: ProjectId, amount: u64) -> Result<(), AccountsError> {
        self.registry
            .apply_mint(&Authority::Subsystem(SubsystemId::Ledger), project_id, amount)
            .map(|_| ())
            .map_err(|e| AccountsError(e.to_string()))
    }

    fn consume_available(&self, project_id: ProjectId, amount: u64) -> Result<(), AccountsError> {
        self.registry
            .consume_available(&Authority::Subsystem(SubsystemId::Ledger), project_id, amount)
            .map(|_| ())
            .map_err(|e| AccountsError(e.to_string()))
    }
}

/// Workflow lookups for the Ledger's mint gate.
pub struct WorkflowVerificationGate {
    verification: Arc<VerificationService>,
}

impl WorkflowVerificationGate {
    pub fn new(verification: Arc<VerificationService>) -> Self {
        Self { verification }
    }
}

impl VerificationGate for WorkflowVerificationGate {
    fn is_verified(&self, id: VerificationId) -> bool {
        self.verification
            .get_review(id)
            .map(|r| r.status == VerificationStatus::Verified)
            .unwrap_or(false)
    }
}
