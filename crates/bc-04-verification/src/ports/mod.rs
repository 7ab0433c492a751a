//! Ports for the Verification Workflow subsystem.

pub mod inbound;
pub mod outbound;

pub use inbound::VerificationApi;
pub use outbound::{EvidenceSource, GateError, ProjectGate, ReviewConclusion};
