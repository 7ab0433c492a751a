//! # End-to-End Flows
//!
//! The full measurement → verification → mint → marketplace
//! choreography across the real wired services and the shared bus.

#[cfg(test)]
mod tests {
    use crate::integration::support::*;
    use bc_02_project_registry::ProjectRegistryApi;
    use bc_03_field_records::FieldRecordsApi;
    use bc_04_verification::ports::VerificationApi;
    use bc_04_verification::VerificationError;
    use bc_05_credit_ledger::{LedgerApi, LedgerError};
    use shared_bus::{EventFilter, EventTopic, PlatformEvent};
    use shared_types::{
        AccountRef, EvidenceItem, Findings, MeasurementId, ProjectStatus, Role, TokenStatus,
        VerificationMethod, VerificationStatus,
    };

    fn clean_findings() -> Findings {
        Findings {
            carbon_sequestration_rate: 4.5,
            area_verified_hectares: 450.2,
            biomass_estimate: 3_950.0,
            compliance_issues: vec![],
        }
    }

    fn verified_evidence(first: MeasurementId) -> Vec<EvidenceItem> {
        vec![
            EvidenceItem {
                id: first,
                description: "synced monitoring batch".into(),
                verified: true,
            },
            EvidenceItem {
                id: MeasurementId::generate(),
                description: "drone orthomosaic".into(),
                verified: true,
            },
            EvidenceItem {
                id: MeasurementId::generate(),
                description: "sediment core lab report".into(),
                verified: true,
            },
        ]
    }

    /// Scenario: mangrove project, one monitoring record, hybrid review
    /// with three verified items and no compliance issues, approval.
    /// Expect a verified project and a token matching the
    /// recommendation, with the registry counters raised by the same
    /// amount.
    #[tokio::test]
    async fn test_full_approval_mints_recommended_credits() {
        let platform = demo_platform();
        let _routing = platform.start();

        let ngo = login(&platform, Role::Ngo);
        let project = create_project(&platform, &ngo);
        assert_eq!(project.status, ProjectStatus::Pending);
        assert_eq!(project.available_credits, 0);

        // Sync one monitoring record; the choreography activates the
        // project.
        let mut registry_events = platform
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Registry]));
        let measurement = platform
            .field_records
            .save_offline(monitoring_draft(&project, &ngo))
            .unwrap();
        let report = platform.field_records.sync_pending(&ngo).await.unwrap();
        assert_eq!(report.synced, vec![measurement]);

        wait_for_event(&mut registry_events, |e| {
            matches!(e, PlatformEvent::ProjectActivated { project_id } if *project_id == project.id)
        })
        .await;
        assert_eq!(
            platform.registry.get_project(project.id).unwrap().status,
            ProjectStatus::Active
        );

        // Review and approve.
        let verifier = login(&platform, Role::Verifier);
        let mut ledger_events = platform
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Ledger]));
        let review = platform
            .verification
            .open_review(
                &verifier.user,
                project.id,
                VerificationMethod::Hybrid,
                verified_evidence(measurement),
            )
            .await
            .unwrap();
        platform
            .verification
            .record_findings(&verifier.user, review.id, clean_findings())
            .unwrap();

        let (approved, mint) = platform
            .verification
            .approve(&verifier.user, review.id)
            .await
            .unwrap();
        assert_eq!(approved.status, VerificationStatus::Verified);
        assert!(approved.immutable_record);
        assert!(!approved.record_hash.is_empty());
        // One monitoring year at 4.5 tCO2e/ha over 450.2 ha.
        assert_eq!(approved.credits_recommended, 2025);
        assert_eq!(mint.unwrap().amount, 2025);

        // The mint lands through the bus.
        let event = wait_for_event(&mut ledger_events, |e| {
            matches!(e, PlatformEvent::CreditsMinted { .. })
        })
        .await;
        let PlatformEvent::CreditsMinted { token_id, amount, .. } = event else {
            unreachable!()
        };
        assert_eq!(amount, 2025);

        let token = platform.ledger.get_token(token_id).unwrap();
        assert_eq!(token.amount, 2025);
        assert_eq!(
            token.owner,
            AccountRef::Organization(ngo.user.organization)
        );

        let project = platform.registry.get_project(project.id).unwrap();
        assert_eq!(project.status, ProjectStatus::Verified);
        assert_eq!(project.total_credits_issued, 2025);
        assert_eq!(project.available_credits, 2025);
    }

    /// Scenario: one unverified evidence item. Approval fails with
    /// `IncompleteEvidence` and the counters never move.
    #[tokio::test]
    async fn test_unverified_evidence_blocks_mint() {
        let platform = demo_platform();
        let _routing = platform.start();

        let ngo = login(&platform, Role::Ngo);
        let project = create_project(&platform, &ngo);

        let mut registry_events = platform
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Registry]));
        let measurement = platform
            .field_records
            .save_offline(monitoring_draft(&project, &ngo))
            .unwrap();
        platform.field_records.sync_pending(&ngo).await.unwrap();
        wait_for_event(&mut registry_events, |e| {
            matches!(e, PlatformEvent::ProjectActivated { .. })
        })
        .await;

        let verifier = login(&platform, Role::Verifier);
        let mut evidence = verified_evidence(measurement);
        evidence[2].verified = false;
        let review = platform
            .verification
            .open_review(
                &verifier.user,
                project.id,
                VerificationMethod::Hybrid,
                evidence,
            )
            .await
            .unwrap();
        platform
            .verification
            .record_findings(&verifier.user, review.id, clean_findings())
            .unwrap();

        let err = platform
            .verification
            .approve(&verifier.user, review.id)
            .await
            .unwrap_err();
        assert!(matches!(err, VerificationError::IncompleteEvidence { .. }));

        let project = platform.registry.get_project(project.id).unwrap();
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.total_credits_issued, 0);
        assert!(platform.ledger.tokens_for_project(project.id).is_empty());
    }

    /// Scenario: retiring a token's full balance, then attempting a
    /// transfer. The transfer fails with a state conflict.
    #[tokio::test]
    async fn test_retired_token_never_moves_again() {
        let platform = demo_platform();
        let _routing = platform.start();

        let token = mint_demo_token(&platform).await;
        let issuer = token.owner.clone();

        platform
            .ledger
            .retire(token.id, token.amount, "offset claim".into())
            .await
            .unwrap();
        assert_eq!(
            platform.ledger.get_token(token.id).unwrap().status,
            TokenStatus::Retired
        );

        let err = platform
            .ledger
            .transfer(token.id, &issuer, AccountRef::External("late".into()), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::StateConflict(_)));
    }

    /// Scenario: rejection freezes the record, marks the project
    /// terminally, and mints nothing; no further review can open.
    #[tokio::test]
    async fn test_rejection_then_resubmission() {
        let platform = demo_platform();
        let _routing = platform.start();

        let ngo = login(&platform, Role::Ngo);
        let project = create_project(&platform, &ngo);

        let mut registry_events = platform
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Registry]));
        let measurement = platform
            .field_records
            .save_offline(monitoring_draft(&project, &ngo))
            .unwrap();
        platform.field_records.sync_pending(&ngo).await.unwrap();
        wait_for_event(&mut registry_events, |e| {
            matches!(e, PlatformEvent::ProjectActivated { .. })
        })
        .await;

        let verifier = login(&platform, Role::Verifier);
        let review = platform
            .verification
            .open_review(
                &verifier.user,
                project.id,
                VerificationMethod::DroneSurvey,
                verified_evidence(measurement),
            )
            .await
            .unwrap();
        let rejected = platform
            .verification
            .reject(&verifier.user, review.id, "canopy claims unsupported".into())
            .await
            .unwrap();
        assert!(rejected.immutable_record);
        assert_eq!(
            platform.registry.get_project(project.id).unwrap().status,
            ProjectStatus::Rejected
        );
        assert!(platform.ledger.tokens_for_project(project.id).is_empty());

        // The terminal record stays frozen; a new review is the only
        // path forward, and a rejected project does not re-enter.
        let err = platform
            .verification
            .open_review(
                &verifier.user,
                project.id,
                VerificationMethod::Hybrid,
                verified_evidence(measurement),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, VerificationError::StateConflict(_)));
    }

    /// Drives the full approval flow and returns the minted token.
    async fn mint_demo_token(platform: &mrv_runtime::Platform) -> shared_types::CarbonCreditToken {
        let ngo = login(platform, Role::Ngo);
        let project = create_project(platform, &ngo);

        let mut registry_events = platform
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Registry]));
        let measurement = platform
            .field_records
            .save_offline(monitoring_draft(&project, &ngo))
            .unwrap();
        platform.field_records.sync_pending(&ngo).await.unwrap();
        wait_for_event(&mut registry_events, |e| {
            matches!(e, PlatformEvent::ProjectActivated { project_id } if *project_id == project.id)
        })
        .await;

        let verifier = login(platform, Role::Verifier);
        let mut ledger_events = platform
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Ledger]));
        let review = platform
            .verification
            .open_review(
                &verifier.user,
                project.id,
                VerificationMethod::Hybrid,
                verified_evidence(measurement),
            )
            .await
            .unwrap();
        platform
            .verification
            .record_findings(&verifier.user, review.id, clean_findings())
            .unwrap();
        platform
            .verification
            .approve(&verifier.user, review.id)
            .await
            .unwrap();

        let event = wait_for_event(&mut ledger_events, |e| {
            matches!(e, PlatformEvent::CreditsMinted { .. })
        })
        .await;
        let PlatformEvent::CreditsMinted { token_id, .. } = event else {
            unreachable!()
        };
        platform.ledger.get_token(token_id).unwrap()
    }
}
