//! Outbound (Driven) ports for the Verification Workflow.
//!
//! These traits define what the workflow needs from the registry and
//! the record archive; the runtime wires the real subsystems behind
//! them.

use shared_types::{Project, ProjectId};
use thiserror::Error;

/// How a concluded review resolves, as reported to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewConclusion {
    Approved,
    Rejected,
    RequiresAdditionalData,
}

/// The registry refused a reported conclusion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct GateError(pub String);

/// Project lookups and lifecycle reporting against the registry.
pub trait ProjectGate: Send + Sync {
    /// The project under review, if registered.
    fn project(&self, id: ProjectId) -> Option<Project>;

    /// Reports a review conclusion for the project's lifecycle.
    fn report_conclusion(&self, id: ProjectId, conclusion: ReviewConclusion)
        -> Result<(), GateError>;
}

/// Read access to the synced measurement archive.
pub trait EvidenceSource: Send + Sync {
    /// Returns true if the project has at least one synced monitoring
    /// record.
    fn has_monitoring_record(&self, id: ProjectId) -> bool;
}
