//! Project store and lifecycle transitions.
//!
//! Every mutation lands here; the service layer only adds locking. The
//! credit counters are mutated exclusively by the ledger-authority
//! operations and re-checked against the conservation invariant after
//! every change.

use crate::domain::errors::RegistryError;
use crate::domain::validation::NewProject;
use shared_types::{
    Authority, AuthorizationError, Capability, Project, ProjectId, ProjectStatus, Role,
    StateConflictError, SubsystemId, User,
};
use std::collections::HashMap;
use tracing::{debug, info};

/// Patch for the freely mutable project fields.
///
/// Lifecycle and credit fields are deliberately absent; they move only
/// through the authority-gated operations below.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub methodology: Option<String>,
}

/// Outcome of a verification run, as reported by Subsystem 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Approved,
    Rejected,
    RequiresAdditionalData,
}

/// The authoritative project store.
#[derive(Debug, Default)]
pub struct ProjectRegistry {
    by_id: HashMap<ProjectId, Project>,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered projects.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if no projects are registered.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Gets a project by id.
    pub fn get(&self, id: ProjectId) -> Option<&Project> {
        self.by_id.get(&id)
    }

    /// All projects, unordered. Subsystem-internal; dashboards go
    /// through `projects_visible_to`.
    pub fn all(&self) -> Vec<&Project> {
        self.by_id.values().collect()
    }

    /// Creates a project in `Pending` with zeroed credit counters.
    ///
    /// # Errors
    /// - `Unauthorized` if the actor's role cannot create projects
    /// - `Validation` with every violated constraint
    pub fn create_project(
        &mut self,
        actor: &User,
        input: NewProject,
    ) -> Result<&Project, RegistryError> {
        if !matches!(actor.role, Role::Ngo | Role::Panchayat | Role::Government) {
            return Err(AuthorizationError::new(Capability::CreateProject).into());
        }

        let failures = input.validate();
        if !failures.is_empty() {
            return Err(RegistryError::Validation(failures));
        }

        let project = Project {
            id: ProjectId::generate(),
            name: input.name,
            description: input.description,
            ecosystem: input.ecosystem,
            location: input.location,
            area_hectares: input.area_hectares,
            methodology: input.methodology,
            start_date: input.start_date,
            status: ProjectStatus::Pending,
            total_credits_issued: 0,
            available_credits: 0,
            created_by: actor.id,
            organization: actor.organization,
        };
        let id = project.id;
        info!(project = %id, ecosystem = ?project.ecosystem, "project created");
        Ok(self.by_id.entry(id).or_insert(project))
    }

    /// Applies a metadata patch.
    ///
    /// # Errors
    /// - `NotFound` if the project does not exist
    /// - `Unauthorized` unless the actor is Admin or belongs to the
    ///   owning organization
    pub fn update_project(
        &mut self,
        actor: &User,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> Result<&Project, RegistryError> {
        let project = self.by_id.get_mut(&id).ok_or(RegistryError::NotFound(id))?;

        let owns = actor.organization == project.organization;
        if actor.role != Role::Admin && !owns {
            return Err(AuthorizationError::new(Capability::EditProjectMetadata).into());
        }

        if let Some(name) = patch.name {
            project.name = name;
        }
        if let Some(description) = patch.description {
            project.description = description;
        }
        if let Some(methodology) = patch.methodology {
            project.methodology = methodology;
        }
        debug!(project = %id, "metadata patched");
        Ok(project)
    }

    /// Marks a pending project active once its first monitoring record
    /// has synced. Idempotent for already-active projects.
    ///
    /// # Errors
    /// - `Unauthorized` unless called under Field Records authority
    /// - `StateConflict` from `Verified`/`Rejected`/`RequiresAdditionalData`
    pub fn mark_active(
        &mut self,
        authority: &Authority,
        id: ProjectId,
    ) -> Result<&Project, RegistryError> {
        require_subsystem(authority, SubsystemId::FieldRecords, Capability::MutateLifecycle)?;
        let project = self.by_id.get_mut(&id).ok_or(RegistryError::NotFound(id))?;

        match project.status {
            ProjectStatus::Pending => {
                project.status = ProjectStatus::Active;
                info!(project = %id, "project activated");
                Ok(project)
            }
            ProjectStatus::Active => Ok(project),
            other => Err(StateConflictError::new("pending | active", status_name(other)).into()),
        }
    }

    /// Applies a verification outcome reported by Subsystem 4.
    ///
    /// Valid from `Active` and `RequiresAdditionalData` only; `Verified`
    /// and `Rejected` are terminal, and a `Pending` project has no
    /// monitoring record to verify.
    pub fn apply_verification_outcome(
        &mut self,
        authority: &Authority,
        id: ProjectId,
        outcome: VerificationOutcome,
    ) -> Result<&Project, RegistryError> {
        require_subsystem(authority, SubsystemId::Verification, Capability::MutateLifecycle)?;
        let project = self.by_id.get_mut(&id).ok_or(RegistryError::NotFound(id))?;

        if !matches!(
            project.status,
            ProjectStatus::Active | ProjectStatus::RequiresAdditionalData
        ) {
            return Err(StateConflictError::new(
                "active | requires_additional_data",
                status_name(project.status),
            )
            .into());
        }

        project.status = match outcome {
            VerificationOutcome::Approved => ProjectStatus::Verified,
            VerificationOutcome::Rejected => ProjectStatus::Rejected,
            VerificationOutcome::RequiresAdditionalData => ProjectStatus::RequiresAdditionalData,
        };
        info!(project = %id, status = ?project.status, "verification outcome applied");
        Ok(project)
    }

    /// Credits minted: raises both counters. Ledger authority only.
    ///
    /// # Errors
    /// - `StateConflict` unless the project is `Verified`
    /// - `ConservationViolation` if the counters would diverge
    pub fn apply_mint(
        &mut self,
        authority: &Authority,
        id: ProjectId,
        amount: u64,
    ) -> Result<&Project, RegistryError> {
        require_subsystem(authority, SubsystemId::Ledger, Capability::MutateCredits)?;
        let project = self.by_id.get_mut(&id).ok_or(RegistryError::NotFound(id))?;

        if project.status != ProjectStatus::Verified {
            return Err(
                StateConflictError::new("verified", status_name(project.status)).into(),
            );
        }

        let issued = project
            .total_credits_issued
            .checked_add(amount)
            .ok_or(RegistryError::ConservationViolation {
                issued: project.total_credits_issued,
                available: project.available_credits,
            })?;
        let available = project.available_credits + amount;
        if available > issued {
            return Err(RegistryError::ConservationViolation { issued, available });
        }

        project.total_credits_issued = issued;
        project.available_credits = available;
        info!(project = %id, amount, issued, "credits issued");
        Ok(project)
    }

    /// Credits left the issuing pool (first transfer out). Ledger
    /// authority only.
    pub fn consume_available(
        &mut self,
        authority: &Authority,
        id: ProjectId,
        amount: u64,
    ) -> Result<&Project, RegistryError> {
        require_subsystem(authority, SubsystemId::Ledger, Capability::MutateCredits)?;
        let project = self.by_id.get_mut(&id).ok_or(RegistryError::NotFound(id))?;

        if amount > project.available_credits {
            return Err(RegistryError::InsufficientAvailable {
                requested: amount,
                available: project.available_credits,
            });
        }
        project.available_credits -= amount;
        debug!(project = %id, amount, remaining = project.available_credits, "pool consumed");
        Ok(project)
    }

    /// The single authorization filter every dashboard consumes.
    ///
    /// Admin, Government, and Verifier see all projects; Ngo and
    /// Panchayat see only their organization's projects or ones they
    /// created themselves.
    pub fn projects_visible_to(&self, user: &User) -> Vec<&Project> {
        match user.role {
            Role::Admin | Role::Government | Role::Verifier => self.by_id.values().collect(),
            Role::Ngo | Role::Panchayat => self
                .by_id
                .values()
                .filter(|p| p.organization == user.organization || p.created_by == user.id)
                .collect(),
        }
    }
}

fn require_subsystem(
    authority: &Authority,
    expected: SubsystemId,
    capability: Capability,
) -> Result<(), RegistryError> {
    if authority.subsystem() != Some(expected) {
        return Err(AuthorizationError::new(capability).into());
    }
    Ok(())
}

fn status_name(status: ProjectStatus) -> &'static str {
    match status {
        ProjectStatus::Pending => "pending",
        ProjectStatus::Active => "active",
        ProjectStatus::Verified => "verified",
        ProjectStatus::Rejected => "rejected",
        ProjectStatus::RequiresAdditionalData => "requires_additional_data",
    }
}
