//! # Dashboard Query Layer
//!
//! Role-polymorphic view models, one query per role. Pure reads over
//! the subsystem services: serializable, side-effect free, and built
//! entirely on `projects_visible_to`, so the authorization filter is
//! enforced in exactly one place.

use crate::container::Platform;
use bc_02_project_registry::ProjectRegistryApi;
use bc_04_verification::ports::VerificationApi;
use bc_04_verification::{ReviewFilter};
use bc_05_credit_ledger::LedgerApi;
use serde::Serialize;
use shared_types::{
    AccountRef, EcosystemType, Project, ProjectId, ProjectStatus, Role, User, VerificationMethod,
    VerificationStatus,
};
use std::collections::BTreeMap;

/// Compact project summary rendered on every dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectCard {
    pub id: ProjectId,
    pub name: String,
    pub ecosystem: EcosystemType,
    pub status: ProjectStatus,
    pub area_hectares: f64,
    pub state: String,
    pub district: String,
    pub credits_issued: u64,
    pub credits_available: u64,
}

impl From<&Project> for ProjectCard {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            ecosystem: project.ecosystem,
            status: project.status,
            area_hectares: project.area_hectares,
            state: project.location.state.clone(),
            district: project.location.district.clone(),
            credits_issued: project.total_credits_issued,
            credits_available: project.available_credits,
        }
    }
}

/// Compact review summary for the verifier queue.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewCard {
    pub id: shared_types::VerificationId,
    pub project_id: ProjectId,
    pub method: VerificationMethod,
    pub status: VerificationStatus,
    pub confidence_score: u8,
    pub credits_recommended: u64,
}

/// Platform-wide rollup for the admin view.
#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub total_projects: usize,
    pub projects_by_status: BTreeMap<String, usize>,
    pub total_credits_issued: u64,
    pub total_credits_available: u64,
    pub projects: Vec<ProjectCard>,
}

/// Organization-scoped view for NGO and panchayat users.
#[derive(Debug, Clone, Serialize)]
pub struct OrgDashboard {
    pub projects: Vec<ProjectCard>,
    pub credit_balance: u64,
    pub pending_sync: usize,
}

/// Oversight view for government users.
#[derive(Debug, Clone, Serialize)]
pub struct GovernmentDashboard {
    pub projects: Vec<ProjectCard>,
    pub total_area_hectares: f64,
    pub verified_projects: usize,
    pub total_credits_issued: u64,
}

/// Work queue for verifier users.
#[derive(Debug, Clone, Serialize)]
pub struct VerifierDashboard {
    pub open_reviews: Vec<ReviewCard>,
    pub reviewable_projects: Vec<ProjectCard>,
}

/// The per-role dashboard view model.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DashboardView {
    Admin(AdminDashboard),
    Ngo(OrgDashboard),
    Panchayat(OrgDashboard),
    Government(GovernmentDashboard),
    Verifier(VerifierDashboard),
}

impl Platform {
    /// Builds the dashboard for a user in a single query.
    pub fn dashboard_for(&self, user: &User) -> DashboardView {
        let visible = self.registry.projects_visible_to(user);
        match user.role {
            Role::Admin => DashboardView::Admin(self.admin_dashboard(&visible)),
            Role::Ngo => DashboardView::Ngo(self.org_dashboard(user, &visible)),
            Role::Panchayat => DashboardView::Panchayat(self.org_dashboard(user, &visible)),
            Role::Government => DashboardView::Government(self.government_dashboard(&visible)),
            Role::Verifier => DashboardView::Verifier(self.verifier_dashboard(&visible)),
        }
    }

    /// Review queue passthrough for dashboard consumers.
    pub fn verification_queue(&self, filter: &ReviewFilter) -> Vec<ReviewCard> {
        self.verification
            .verification_queue(filter)
            .iter()
            .map(|r| ReviewCard {
                id: r.id,
                project_id: r.project_id,
                method: r.method,
                status: r.status,
                confidence_score: r.confidence_score,
                credits_recommended: r.credits_recommended,
            })
            .collect()
    }

    /// Live credit balance of an account.
    pub fn credit_balance(&self, owner: &AccountRef) -> u64 {
        self.ledger.balance_of(owner)
    }

    fn admin_dashboard(&self, visible: &[Project]) -> AdminDashboard {
        let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
        for project in visible {
            *by_status
                .entry(format!("{:?}", project.status).to_lowercase())
                .or_default() += 1;
        }
        AdminDashboard {
            total_projects: visible.len(),
            projects_by_status: by_status,
            total_credits_issued: visible.iter().map(|p| p.total_credits_issued).sum(),
            total_credits_available: visible.iter().map(|p| p.available_credits).sum(),
            projects: visible.iter().map(ProjectCard::from).collect(),
        }
    }

    fn org_dashboard(&self, user: &User, visible: &[Project]) -> OrgDashboard {
        OrgDashboard {
            projects: visible.iter().map(ProjectCard::from).collect(),
            credit_balance: self
                .ledger
                .balance_of(&AccountRef::Organization(user.organization)),
            pending_sync: self.field_records_pending(),
        }
    }

    fn government_dashboard(&self, visible: &[Project]) -> GovernmentDashboard {
        GovernmentDashboard {
            projects: visible.iter().map(ProjectCard::from).collect(),
            total_area_hectares: visible.iter().map(|p| p.area_hectares).sum(),
            verified_projects: visible
                .iter()
                .filter(|p| p.status == ProjectStatus::Verified)
                .count(),
            total_credits_issued: visible.iter().map(|p| p.total_credits_issued).sum(),
        }
    }

    fn verifier_dashboard(&self, visible: &[Project]) -> VerifierDashboard {
        let open_reviews = self.verification_queue(&ReviewFilter::default());
        let open_reviews: Vec<ReviewCard> = open_reviews
            .into_iter()
            .filter(|r| {
                matches!(
                    r.status,
                    VerificationStatus::Pending | VerificationStatus::InProgress
                )
            })
            .collect();
        let reviewable_projects = visible
            .iter()
            .filter(|p| {
                matches!(
                    p.status,
                    ProjectStatus::Active | ProjectStatus::RequiresAdditionalData
                )
            })
            .map(ProjectCard::from)
            .collect();
        VerifierDashboard {
            open_reviews,
            reviewable_projects,
        }
    }

    fn field_records_pending(&self) -> usize {
        use bc_03_field_records::FieldRecordsApi;
        self.field_records.pending_count()
    }
}
