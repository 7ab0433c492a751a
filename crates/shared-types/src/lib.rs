//! # Shared Types Crate
//!
//! This crate contains all cross-subsystem domain entities, typed
//! identifiers, the error taxonomy, and the subsystem authority model.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Errors Are Values**: Every failure mode is a typed enum variant;
//!   no subsystem uses panics for control flow.
//! - **Authority-Gated Mutation**: Lifecycle and credit fields move only
//!   through operations that present a checked [`Authority`].

pub mod authority;
pub mod entities;
pub mod errors;
pub mod ids;
pub mod time;

pub use authority::*;
pub use entities::*;
pub use errors::*;
pub use ids::*;
pub use time::*;
