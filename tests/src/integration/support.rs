//! Shared fixtures for the integration suite.

use bc_01_identity::IdentityApi;
use bc_02_project_registry::{NewProject, ProjectRegistryApi};
use mrv_runtime::demo::{DEMO_CREDENTIAL, DEMO_LOGINS};
use mrv_runtime::{Platform, PlatformConfig};
use shared_bus::{PlatformEvent, Subscription};
use shared_types::{
    EcosystemType, GeoPoint, GpsFix, ManualTimeSource, MeasurementPayload, Project,
    ProjectLocation, Role, Session,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Project start date used throughout the suite (2023-01-01 UTC, ms).
pub const PROJECT_START: u64 = 1_672_531_200_000;

/// Boots an ephemeral platform with the demo directory and a clock
/// pinned one monitoring year after the project start, so credit
/// recommendations are deterministic.
pub fn demo_platform() -> Platform {
    let config = PlatformConfig {
        demo_seed: true,
        ..PlatformConfig::ephemeral()
    };
    let clock = Arc::new(ManualTimeSource::new(
        PROJECT_START + bc_04_verification::domain::workflow::MS_PER_YEAR,
    ));
    Platform::build_with_clock(config, clock).expect("platform boot")
}

/// Logs in the seeded demo account for `role`.
pub fn login(platform: &Platform, role: Role) -> Session {
    let (email, _) = DEMO_LOGINS
        .iter()
        .find(|(_, r)| *r == role)
        .expect("role seeded");
    platform.identity.login(email, DEMO_CREDENTIAL).expect("demo login")
}

/// A valid mangrove project input matching the demo scenario.
pub fn mangrove_input() -> NewProject {
    NewProject {
        name: "Sundarbans Channel Replanting".into(),
        description: "Community replanting across degraded delta channels".into(),
        ecosystem: EcosystemType::Mangrove,
        location: ProjectLocation {
            point: GeoPoint { lat: 21.95, lng: 88.85 },
            state: "West Bengal".into(),
            district: "South 24 Parganas".into(),
        },
        area_hectares: 450.2,
        methodology: "VM0033 v2.1".into(),
        start_date: PROJECT_START,
    }
}

/// Creates a project owned by the given session's user.
pub fn create_project(platform: &Platform, session: &Session) -> Project {
    platform
        .registry
        .create_project(&session.user, mangrove_input())
        .expect("project creation")
}

/// A monitoring draft for the project.
pub fn monitoring_draft(
    project: &Project,
    session: &Session,
) -> bc_03_field_records::MeasurementDraft {
    bc_03_field_records::MeasurementDraft {
        project_id: project.id,
        gps: GpsFix {
            point: GeoPoint { lat: 21.951, lng: 88.849 },
            accuracy_m: 4.0,
        },
        payload: MeasurementPayload::Monitoring {
            canopy_cover_pct: 58.5,
            water_salinity_ppt: 27.4,
            sediment_carbon_density: 108.0,
            ndvi: 0.69,
        },
        photos: vec![],
        field_officer: session.user.id,
        organization: session.user.organization,
    }
}

/// Waits for the next event matching `predicate`, failing the test on
/// timeout.
pub async fn wait_for_event<F>(sub: &mut Subscription, predicate: F) -> PlatformEvent
where
    F: Fn(&PlatformEvent) -> bool,
{
    loop {
        let event = timeout(Duration::from_secs(2), sub.recv())
            .await
            .expect("timed out waiting for event")
            .expect("bus closed");
        if predicate(&event) {
            return event;
        }
    }
}
