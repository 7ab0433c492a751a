//! # Project Registry Subsystem
//!
//! **Subsystem ID:** 2
//!
//! ## Purpose
//!
//! The authoritative list of blue-carbon restoration projects. Single
//! writer for every `Project` field; lifecycle and credit fields move
//! only through authority-gated operations.
//!
//! ## Lifecycle
//!
//! ```text
//! [Pending] ──first synced monitoring record──→ [Active]
//!     [Active] ──approval──→ [Verified]
//!     [Active] ──failure──→ [Rejected] | [RequiresAdditionalData]
//!     [RequiresAdditionalData] ──new review──→ [Verified]/[Rejected]/...
//! ```
//!
//! No transition leaves `Verified` or `Rejected`, and nothing returns
//! to `Pending`.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | `available_credits <= total_credits_issued` | `domain/registry.rs` - checked after every credit mutation |
//! | `total_credits_issued` is monotonic | `domain/registry.rs` - only `apply_mint` touches it |
//! | Lifecycle fields move only under subsystem authority | `domain/registry.rs` - authorization matrix |
//! | Create validation reports every violation together | `domain/validation.rs` |
//!
//! ## Authorization Matrix
//!
//! | Operation | Authorized Caller(s) |
//! |-----------|----------------------|
//! | `create_project` | Ngo, Panchayat, Government users |
//! | `update_project` | Owning organization's users, Admin |
//! | `mark_active` | Subsystem 3 (Field Records) |
//! | `apply_verification_outcome` | Subsystem 4 (Verification) |
//! | `apply_mint`, `consume_available` | Subsystem 5 (Ledger) |

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::ProjectRegistryApi;
pub use service::RegistryService;
