//! Registry service: lock-guarded wrapper over the domain store.

use crate::domain::{NewProject, ProjectPatch, ProjectRegistry, RegistryError, VerificationOutcome};
use crate::ports::ProjectRegistryApi;
use shared_types::{Authority, Project, ProjectId, User};
use std::sync::RwLock;

/// Thread-safe Project Registry service.
///
/// Interior `RwLock` keeps the domain store single-writer while read
/// queries proceed concurrently.
#[derive(Debug, Default)]
pub struct RegistryService {
    inner: RwLock<ProjectRegistry>,
}

impl RegistryService {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<R>(&self, f: impl FnOnce(&ProjectRegistry) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    fn write<R>(&self, f: impl FnOnce(&mut ProjectRegistry) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

impl ProjectRegistryApi for RegistryService {
    fn create_project(&self, actor: &User, input: NewProject) -> Result<Project, RegistryError> {
        self.write(|r| r.create_project(actor, input).cloned())
    }

    fn update_project(
        &self,
        actor: &User,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> Result<Project, RegistryError> {
        self.write(|r| r.update_project(actor, id, patch).cloned())
    }

    fn mark_active(&self, authority: &Authority, id: ProjectId) -> Result<Project, RegistryError> {
        self.write(|r| r.mark_active(authority, id).cloned())
    }

    fn apply_verification_outcome(
        &self,
        authority: &Authority,
        id: ProjectId,
        outcome: VerificationOutcome,
    ) -> Result<Project, RegistryError> {
        self.write(|r| r.apply_verification_outcome(authority, id, outcome).cloned())
    }

    fn apply_mint(
        &self,
        authority: &Authority,
        id: ProjectId,
        amount: u64,
    ) -> Result<Project, RegistryError> {
        self.write(|r| r.apply_mint(authority, id, amount).cloned())
    }

    fn consume_available(
        &self,
        authority: &Authority,
        id: ProjectId,
        amount: u64,
    ) -> Result<Project, RegistryError> {
        self.write(|r| r.consume_available(authority, id, amount).cloned())
    }

    fn projects_visible_to(&self, user: &User) -> Vec<Project> {
        self.read(|r| r.projects_visible_to(user).into_iter().cloned().collect())
    }

    fn get_project(&self, id: ProjectId) -> Option<Project> {
        self.read(|r| r.get(id).cloned())
    }
}
