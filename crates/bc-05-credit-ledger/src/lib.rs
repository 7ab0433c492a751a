//! # Carbon Credit Ledger Subsystem
//!
//! **Subsystem ID:** 5
//!
//! ## Purpose
//!
//! The only component that creates or mutates credit token state.
//! Tokens are minted against an approved verification record,
//! transferred between holders, and retired out of circulation.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Minted − retired equals the live balance per project, always | `domain/ledger.rs` - `conservation_holds()` |
//! | Serial numbers are unique and never reused | `domain/ledger.rs` - monotonic allocator |
//! | A retired token never moves again | `domain/ledger.rs` - live checks |
//! | Mint is atomic with the registry counter update | `service.rs` - registry first, infallible insert after |
//! | `available_credits` drops only when credits leave the issuing pool | `domain/ledger.rs` - `issuer_pool` provenance |
//! | All mutations for one project apply in a strict total order | `service.rs` - per-project async mutex |
//!
//! ## Token Splitting
//!
//! Partial transfers and partial retirements split a token: the moved or
//! retired portion becomes a new token under a fresh serial, the
//! remainder stays on the original. A ledger configured without partial
//! retirement rejects partial amounts instead of rounding.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::*;
pub use service::LedgerService;
