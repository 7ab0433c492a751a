//! Confidence scoring.
//!
//! A pure function of the review inputs: the same method, evidence set,
//! and compliance count always yield the same score. Components:
//!
//! - method reliability: hybrid surveys outrank single-source remote
//!   sensing, which outranks ground-only collection
//! - evidence completeness: three or more verified items earn the full
//!   completeness weight
//! - each open compliance issue subtracts a fixed penalty
//!
//! The result saturates into [0, 100].

use shared_types::{EvidenceItem, VerificationMethod};

/// Base weight for the verification method.
const METHOD_WEIGHT_HYBRID: u32 = 40;
const METHOD_WEIGHT_REMOTE: u32 = 32;
const METHOD_WEIGHT_GROUND: u32 = 25;

/// Full completeness weight, earned at three verified items.
const EVIDENCE_FULL_WEIGHT: u32 = 50;
/// Weight per verified item below the completeness threshold.
const EVIDENCE_ITEM_WEIGHT: u32 = 12;
/// Verified items needed for the full completeness weight.
const EVIDENCE_THRESHOLD: usize = 3;

/// Penalty per open compliance issue.
const COMPLIANCE_PENALTY: u32 = 15;

/// Scores a review in [0, 100].
pub fn compute_confidence(
    method: VerificationMethod,
    evidence: &[EvidenceItem],
    compliance_issue_count: usize,
) -> u8 {
    let method_weight = match method {
        VerificationMethod::Hybrid => METHOD_WEIGHT_HYBRID,
        VerificationMethod::DroneSurvey | VerificationMethod::SatelliteImagery => {
            METHOD_WEIGHT_REMOTE
        }
        VerificationMethod::FieldVisit | VerificationMethod::MobileData => METHOD_WEIGHT_GROUND,
    };

    let verified_count = evidence.iter().filter(|e| e.verified).count();
    let evidence_weight = if verified_count >= EVIDENCE_THRESHOLD {
        EVIDENCE_FULL_WEIGHT
    } else {
        verified_count as u32 * EVIDENCE_ITEM_WEIGHT
    };

    let penalty = compliance_issue_count as u32 * COMPLIANCE_PENALTY;

    (method_weight + evidence_weight)
        .saturating_sub(penalty)
        .min(100) as u8
}
