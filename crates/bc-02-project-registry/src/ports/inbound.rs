//! # Inbound Port - ProjectRegistryApi
//!
//! Shared-reference API over the registry; the service adds locking so
//! callers on any task can hold `&self`.

use crate::domain::{NewProject, ProjectPatch, RegistryError, VerificationOutcome};
use shared_types::{Authority, Project, ProjectId, User};

/// Primary API for the Project Registry subsystem.
pub trait ProjectRegistryApi: Send + Sync {
    /// Creates a project in `Pending` with zeroed credit counters.
    fn create_project(&self, actor: &User, input: NewProject) -> Result<Project, RegistryError>;

    /// Applies a metadata patch (name, description, methodology).
    fn update_project(
        &self,
        actor: &User,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> Result<Project, RegistryError>;

    /// Field Records authority: first synced monitoring record arrived.
    fn mark_active(&self, authority: &Authority, id: ProjectId) -> Result<Project, RegistryError>;

    /// Verification authority: a review concluded.
    fn apply_verification_outcome(
        &self,
        authority: &Authority,
        id: ProjectId,
        outcome: VerificationOutcome,
    ) -> Result<Project, RegistryError>;

    /// Ledger authority: credits were minted.
    fn apply_mint(
        &self,
        authority: &Authority,
        id: ProjectId,
        amount: u64,
    ) -> Result<Project, RegistryError>;

    /// Ledger authority: credits left the issuing pool.
    fn consume_available(
        &self,
        authority: &Authority,
        id: ProjectId,
        amount: u64,
    ) -> Result<Project, RegistryError>;

    /// The role-scoped visibility filter.
    fn projects_visible_to(&self, user: &User) -> Vec<Project>;

    /// Gets a project by id.
    fn get_project(&self, id: ProjectId) -> Option<Project>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn ProjectRegistryApi) {}
}
