//! # MRV Node
//!
//! Boots the platform, seeds the demo directory, and walks one full
//! measurement → verification → mint → retirement flow so an operator
//! can watch the choreography end to end in the logs.

use anyhow::{Context, Result};
use bc_01_identity::IdentityApi;
use bc_02_project_registry::{NewProject, ProjectRegistryApi};
use bc_03_field_records::{FieldRecordsApi, MeasurementDraft};
use bc_04_verification::ports::VerificationApi;
use bc_05_credit_ledger::LedgerApi;
use mrv_runtime::demo::{DEMO_CREDENTIAL, DEMO_LOGINS};
use mrv_runtime::{Platform, PlatformConfig};
use shared_bus::{EventFilter, EventTopic, PlatformEvent};
use shared_types::{
    AccountRef, EcosystemType, EvidenceItem, Findings, GeoPoint, GpsFix, MeasurementPayload,
    ProjectLocation, Role, Session, VerificationMethod,
};
use std::time::Duration;
use tokio::time::timeout;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = PlatformConfig::from_env();
    let platform = Platform::build(config).context("platform boot failed")?;
    let _routing = platform.start();

    run_demo_flow(&platform).await?;

    info!("demo flow complete");
    Ok(())
}

fn demo_session(platform: &Platform, role: Role) -> Result<Session> {
    let (email, _) = DEMO_LOGINS
        .iter()
        .find(|(_, r)| *r == role)
        .context("role missing from demo seed")?;
    platform
        .identity
        .login(email, DEMO_CREDENTIAL)
        .with_context(|| format!("demo login failed for {email}"))
}

async fn run_demo_flow(platform: &Platform) -> Result<()> {
    // 1. An NGO field coordinator registers a mangrove project.
    let ngo = demo_session(platform, Role::Ngo)?;
    let project = platform.registry.create_project(
        &ngo.user,
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
            start_date: 1_672_531_200_000,
        },
    )?;
    info!(project = %project.id, "project registered");

    // 2. A monitoring batch is captured offline and synced; the first
    //    synced record activates the project.
    let mut registry_events = platform
        .bus
        .subscribe(EventFilter::topics(vec![EventTopic::Registry]));
    let measurement = platform.field_records.save_offline(MeasurementDraft {
        project_id: project.id,
        gps: GpsFix {
            point: GeoPoint { lat: 21.951, lng: 88.849 },
            accuracy_m: 3.8,
        },
        payload: MeasurementPayload::Monitoring {
            canopy_cover_pct: 58.5,
            water_salinity_ppt: 27.4,
            sediment_carbon_density: 108.0,
            ndvi: 0.69,
        },
        photos: vec![],
        field_officer: ngo.user.id,
        organization: ngo.user.organization,
    })?;
    let report = platform.field_records.sync_pending(&ngo).await?;
    info!(synced = report.synced.len(), "offline queue drained");

    timeout(Duration::from_secs(2), registry_events.recv())
        .await
        .context("project activation timed out")?;

    // 3. A verifier reviews the evidence and approves.
    let verifier = demo_session(platform, Role::Verifier)?;
    let mut ledger_events = platform
        .bus
        .subscribe(EventFilter::topics(vec![EventTopic::Ledger]));
    let review = platform
        .verification
        .open_review(
            &verifier.user,
            project.id,
            VerificationMethod::Hybrid,
            vec![
                EvidenceItem {
                    id: measurement,
                    description: "synced monitoring batch".into(),
                    verified: true,
                },
                EvidenceItem {
                    id: shared_types::MeasurementId::generate(),
                    description: "drone orthomosaic, northern channel".into(),
                    verified: true,
                },
                EvidenceItem {
                    id: shared_types::MeasurementId::generate(),
                    description: "sediment core lab report".into(),
                    verified: true,
                },
            ],
        )
        .await?;
    platform.verification.record_findings(
        &verifier.user,
        review.id,
        Findings {
            carbon_sequestration_rate: 4.5,
            area_verified_hectares: 450.2,
            biomass_estimate: 3_950.0,
            compliance_issues: vec![],
        },
    )?;
    let (approved, mint) = platform.verification.approve(&verifier.user, review.id).await?;
    info!(
        review = %approved.id,
        confidence = approved.confidence_score,
        credits = approved.credits_recommended,
        "review approved"
    );

    // 4. The mint request lands in the ledger via the bus.
    let minted = loop {
        let event = timeout(Duration::from_secs(2), ledger_events.recv())
            .await
            .context("mint timed out")?
            .context("bus closed")?;
        if let PlatformEvent::CreditsMinted { token_id, .. } = event {
            break token_id;
        }
    };
    let token = platform
        .ledger
        .get_token(minted)
        .context("minted token missing")?;
    info!(token = %token.id, serial = %token.serial, amount = token.amount, "credits minted");
    if let Some(request) = mint {
        debug_assert_eq!(request.amount, token.amount);
    }

    // 5. Marketplace: part of the pool is sold, part retired.
    let issuer = AccountRef::Organization(ngo.user.organization);
    let buyer = AccountRef::External("green-steel-works".into());
    platform
        .ledger
        .transfer(token.id, &issuer, buyer.clone(), 500)
        .await?;
    platform
        .ledger
        .retire(token.id, 100, "2026 voluntary offset claim".into())
        .await?;
    info!(
        issuer_balance = platform.credit_balance(&issuer),
        buyer_balance = platform.credit_balance(&buyer),
        "marketplace flow settled"
    );

    // 6. Every role gets its dashboard from one query.
    for (_, role) in DEMO_LOGINS {
        let session = demo_session(platform, role)?;
        let view = platform.dashboard_for(&session.user);
        info!(role = ?role, dashboard = %serde_json::to_string(&view)?, "dashboard");
    }
    platform.identity.logout()?;
    Ok(())
}
