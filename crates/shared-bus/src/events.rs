//! # Platform Events
//!
//! Defines all event types that flow through the shared bus. These are
//! the choreography events driving the measurement → verification →
//! mint flow.

use serde::{Deserialize, Serialize};
use shared_types::{
    AccountRef, MeasurementId, MeasurementKind, ProjectId, SubsystemId, TokenId, TokenMetadata,
    VerificationId, VerificationMethod,
};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlatformEvent {
    // =========================================================================
    // SUBSYSTEM 3: FIELD RECORDS
    // =========================================================================
    /// A field measurement was accepted by the uplink and archived.
    /// **CHOREOGRAPHY:** The first monitoring record for a pending
    /// project triggers the registry to activate it.
    MeasurementSynced {
        measurement_id: MeasurementId,
        project_id: ProjectId,
        kind: MeasurementKind,
    },

    // =========================================================================
    // SUBSYSTEM 2: PROJECT REGISTRY
    // =========================================================================
    /// A project left `Pending` after its first synced monitoring record.
    ProjectActivated { project_id: ProjectId },

    // =========================================================================
    // SUBSYSTEM 4: VERIFICATION WORKFLOW
    // =========================================================================
    /// A verifier opened a review for a project.
    ReviewOpened {
        verification_id: VerificationId,
        project_id: ProjectId,
        method: VerificationMethod,
    },

    /// A review was approved and its record frozen.
    VerificationApproved {
        verification_id: VerificationId,
        project_id: ProjectId,
        credits_recommended: u64,
    },

    /// A review was rejected.
    VerificationRejected {
        verification_id: VerificationId,
        project_id: ProjectId,
        reason: String,
    },

    /// Credits should be minted for an approved review.
    /// **CHOREOGRAPHY:** Consumed by the ledger; this is the only path
    /// that creates tokens.
    MintRequested {
        verification_id: VerificationId,
        project_id: ProjectId,
        amount: u64,
        vintage: u16,
        metadata: TokenMetadata,
        issuer: AccountRef,
    },

    // =========================================================================
    // SUBSYSTEM 5: CREDIT LEDGER
    // =========================================================================
    /// A token was minted.
    CreditsMinted {
        token_id: TokenId,
        project_id: ProjectId,
        amount: u64,
        serial: String,
    },

    /// Token balance moved between holders.
    CreditsTransferred {
        token_id: TokenId,
        project_id: ProjectId,
        from: AccountRef,
        to: AccountRef,
        amount: u64,
    },

    /// Token balance was permanently retired.
    CreditsRetired {
        token_id: TokenId,
        project_id: ProjectId,
        amount: u64,
        reason: String,
    },

    // =========================================================================
    // CRITICAL EVENTS (DLQ)
    // =========================================================================
    /// A choreography step failed and needs operator attention.
    CriticalError {
        subsystem: SubsystemId,
        detail: String,
    },
}

impl PlatformEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::MeasurementSynced { .. } => EventTopic::FieldRecords,
            Self::ProjectActivated { .. } => EventTopic::Registry,
            Self::ReviewOpened { .. }
            | Self::VerificationApproved { .. }
            | Self::VerificationRejected { .. }
            | Self::MintRequested { .. } => EventTopic::Verification,
            Self::CreditsMinted { .. }
            | Self::CreditsTransferred { .. }
            | Self::CreditsRetired { .. } => EventTopic::Ledger,
            Self::CriticalError { .. } => EventTopic::DeadLetterQueue,
        }
    }

    /// Get the originating subsystem.
    #[must_use]
    pub fn source_subsystem(&self) -> SubsystemId {
        match self {
            Self::MeasurementSynced { .. } => SubsystemId::FieldRecords,
            Self::ProjectActivated { .. } => SubsystemId::Registry,
            Self::ReviewOpened { .. }
            | Self::VerificationApproved { .. }
            | Self::VerificationRejected { .. }
            | Self::MintRequested { .. } => SubsystemId::Verification,
            Self::CreditsMinted { .. }
            | Self::CreditsTransferred { .. }
            | Self::CreditsRetired { .. } => SubsystemId::Ledger,
            Self::CriticalError { subsystem, .. } => *subsystem,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Subsystem 1 events (sessions; currently none cross the bus).
    Identity,
    /// Subsystem 2 events.
    Registry,
    /// Subsystem 3 events.
    FieldRecords,
    /// Subsystem 4 events.
    Verification,
    /// Subsystem 5 events.
    Ledger,
    /// Critical errors routed for operator attention.
    DeadLetterQueue,
}

/// Filter describing which events a subscription receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    /// Topics to receive. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Filter that matches every event.
    #[must_use]
    pub fn all() -> Self {
        Self { topics: Vec::new() }
    }

    /// Filter that matches only the given topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Returns true if `event` passes this filter.
    #[must_use]
    pub fn matches(&self, event: &PlatformEvent) -> bool {
        self.topics.is_empty() || self.topics.contains(&event.topic())
    }
}
