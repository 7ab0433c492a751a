//! Verification error types.

use shared_types::{
    AuthorizationError, MeasurementId, ProjectId, StateConflictError, VerificationId,
};
use thiserror::Error;

/// Verification Workflow error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VerificationError {
    /// The caller is not an accredited verifier (or not the reviewer
    /// who owns the record).
    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),

    /// No review with the given id.
    #[error("verification record not found: {0}")]
    NotFound(VerificationId),

    /// No project with the given id.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The project has no synced monitoring record to review.
    #[error("project {0} has no synced monitoring records")]
    NoMonitoringRecords(ProjectId),

    /// The operation is not valid from the record's current state.
    #[error(transparent)]
    StateConflict(#[from] StateConflictError),

    /// Approval attempted with unverified evidence items.
    #[error("incomplete evidence: {} item(s) unverified", unverified.len())]
    IncompleteEvidence { unverified: Vec<MeasurementId> },

    /// Approval attempted with outstanding compliance issues.
    #[error("outstanding compliance: {} issue(s) open", issues.len())]
    OutstandingCompliance { issues: Vec<String> },

    /// The registry refused the reported outcome.
    #[error("registry rejected outcome: {0}")]
    Registry(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_evidence_counts_items() {
        let err = VerificationError::IncompleteEvidence {
            unverified: vec![MeasurementId::generate(), MeasurementId::generate()],
        };
        assert!(err.to_string().contains("2 item(s)"));
    }
}
