//! Registry error types.

use shared_types::{AuthorizationError, ProjectId, StateConflictError, ValidationFailure};
use thiserror::Error;

/// Project Registry error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// One or more input constraints were violated. Every violation is
    /// reported, not just the first.
    #[error("validation failed: {}", format_failures(.0))]
    Validation(Vec<ValidationFailure>),

    /// The caller lacks the capability for this operation.
    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),

    /// No project with the given id.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// The requested transition is not valid from the project's state.
    #[error(transparent)]
    StateConflict(#[from] StateConflictError),

    /// A credit mutation would leave `available > issued`.
    #[error("conservation violation: available {available} would exceed issued {issued}")]
    ConservationViolation { issued: u64, available: u64 },

    /// The issuing pool does not hold the requested amount.
    #[error("insufficient available credits: requested {requested}, available {available}")]
    InsufficientAvailable { requested: u64, available: u64 },
}

fn format_failures(failures: &[ValidationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
