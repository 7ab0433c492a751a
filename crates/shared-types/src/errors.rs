//! # Error Taxonomy
//!
//! Cross-subsystem error building blocks. Each subsystem wraps these in
//! its own error enum; the variants here are the complete shared
//! vocabulary, and no subsystem introduces implicit failure modes
//! beyond its documented set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single violated input constraint.
///
/// Create-style operations collect every violation and report them
/// together rather than failing on the first.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{field}: {reason}")]
pub struct ValidationFailure {
    /// The offending input field.
    pub field: String,
    /// Human-readable constraint description.
    pub reason: String,
}

impl ValidationFailure {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// The capability an actor lacked for an attempted mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    CreateProject,
    EditProjectMetadata,
    MutateLifecycle,
    MutateCredits,
    SubmitFieldRecord,
    ReviewVerification,
    ViewAllProjects,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CreateProject => "create_project",
            Self::EditProjectMetadata => "edit_project_metadata",
            Self::MutateLifecycle => "mutate_lifecycle",
            Self::MutateCredits => "mutate_credits",
            Self::SubmitFieldRecord => "submit_field_record",
            Self::ReviewVerification => "review_verification",
            Self::ViewAllProjects => "view_all_projects",
        };
        write!(f, "{name}")
    }
}

/// Actor lacks permission for the attempted operation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("missing capability: {capability}")]
pub struct AuthorizationError {
    pub capability: Capability,
}

impl AuthorizationError {
    pub fn new(capability: Capability) -> Self {
        Self { capability }
    }
}

/// A transition was attempted that is not valid from the entity's
/// current state.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("invalid state: expected {expected}, actual {actual}")]
pub struct StateConflictError {
    /// The state(s) the operation is valid from.
    pub expected: String,
    /// The state the entity was actually in.
    pub actual: String,
}

impl StateConflictError {
    pub fn new(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failure_display() {
        let failure = ValidationFailure::new("area_hectares", "must be greater than zero");
        assert_eq!(
            failure.to_string(),
            "area_hectares: must be greater than zero"
        );
    }

    #[test]
    fn test_state_conflict_display() {
        let err = StateConflictError::new("active", "retired");
        assert!(err.to_string().contains("expected active"));
        assert!(err.to_string().contains("actual retired"));
    }

    #[test]
    fn test_authorization_error_names_capability() {
        let err = AuthorizationError::new(Capability::MutateCredits);
        assert!(err.to_string().contains("mutate_credits"));
    }
}
