//! # Confidence Scoring Properties
//!
//! Purity, method ordering, and boundary behavior of the review
//! confidence function, exercised through the public API.

#[cfg(test)]
mod tests {
    use bc_04_verification::compute_confidence;
    use shared_types::{EvidenceItem, MeasurementId, VerificationMethod};

    fn items(verified: usize, unverified: usize) -> Vec<EvidenceItem> {
        let mut all = Vec::new();
        for i in 0..verified {
            all.push(EvidenceItem {
                id: MeasurementId::generate(),
                description: format!("verified item {i}"),
                verified: true,
            });
        }
        for i in 0..unverified {
            all.push(EvidenceItem {
                id: MeasurementId::generate(),
                description: format!("unverified item {i}"),
                verified: false,
            });
        }
        all
    }

    #[test]
    fn test_identical_input_identical_score() {
        let evidence = items(4, 2);
        for method in [
            VerificationMethod::FieldVisit,
            VerificationMethod::DroneSurvey,
            VerificationMethod::SatelliteImagery,
            VerificationMethod::MobileData,
            VerificationMethod::Hybrid,
        ] {
            let first = compute_confidence(method, &evidence, 3);
            let second = compute_confidence(method, &evidence, 3);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_method_reliability_ordering() {
        let evidence = items(3, 0);
        let score = |m| compute_confidence(m, &evidence, 0);

        assert!(score(VerificationMethod::Hybrid) > score(VerificationMethod::DroneSurvey));
        assert!(
            score(VerificationMethod::SatelliteImagery) > score(VerificationMethod::FieldVisit)
        );
        assert_eq!(
            score(VerificationMethod::DroneSurvey),
            score(VerificationMethod::SatelliteImagery)
        );
        assert_eq!(
            score(VerificationMethod::FieldVisit),
            score(VerificationMethod::MobileData)
        );
    }

    #[test]
    fn test_evidence_completeness_threshold() {
        let score = |n| compute_confidence(VerificationMethod::Hybrid, &items(n, 0), 0);

        // Monotonic up to the threshold, flat after it.
        assert!(score(1) > score(0));
        assert!(score(2) > score(1));
        assert!(score(3) > score(2));
        assert_eq!(score(3), score(4));
        assert_eq!(score(3), score(10));
    }

    #[test]
    fn test_compliance_issues_subtract_fixed_penalty() {
        let evidence = items(3, 0);
        let clean = compute_confidence(VerificationMethod::Hybrid, &evidence, 0);
        let one = compute_confidence(VerificationMethod::Hybrid, &evidence, 1);
        let two = compute_confidence(VerificationMethod::Hybrid, &evidence, 2);

        assert_eq!(clean - one, one - two);
        assert!(one < clean);
    }

    #[test]
    fn test_score_bounds() {
        for verified in 0..6 {
            for issues in 0..8 {
                let score =
                    compute_confidence(VerificationMethod::Hybrid, &items(verified, 0), issues);
                assert!(score <= 100);
            }
        }
        // Heavy penalties floor at zero instead of wrapping.
        assert_eq!(
            compute_confidence(VerificationMethod::MobileData, &items(0, 5), 20),
            0
        );
    }
}
