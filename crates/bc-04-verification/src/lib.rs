//! # Verification Workflow Subsystem
//!
//! **Subsystem ID:** 4
//!
//! ## Purpose
//!
//! Consumes synced monitoring evidence, runs the review state machine,
//! scores confidence, and recommends credits for minting. Approval is
//! the only path that produces a mint request.
//!
//! ## Review State Machine
//!
//! ```text
//! [Pending] ──→ [InProgress] ──approve──→ [Verified] (frozen, hashed)
//!                    │
//!                    ├──reject──→ [Rejected] (frozen, hashed)
//!                    │
//!                    └──→ [RequiresAdditionalData] ──resume──→ [InProgress]
//! ```
//!
//! `RequiresAdditionalData → InProgress` is the only backward edge. A
//! rejected review is never edited; resubmission opens a new record for
//! the same project.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | `immutable_record` and a non-empty hash appear together, only on conclusion | `domain/workflow.rs` - `freeze()` |
//! | A frozen record refuses every mutation | `domain/workflow.rs` - open-state checks |
//! | Approval requires all evidence verified and zero compliance issues | `domain/workflow.rs` - `approve()` |
//! | Confidence scoring is pure and deterministic | `domain/confidence.rs` |
//! | Mint requests are emitted only on approval with a positive recommendation | `service.rs` |

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::*;
pub use service::VerificationService;
