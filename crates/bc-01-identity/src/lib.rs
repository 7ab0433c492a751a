//! # Identity & Session Subsystem
//!
//! **Subsystem ID:** 1
//!
//! ## Purpose
//!
//! Resolves a login credential to a [`shared_types::User`] with a
//! [`shared_types::Role`], persists the session across reloads, and
//! hosts the organization directory used for access scoping.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Credentials are stored only as salted SHA-256 digests | `domain/accounts.rs` - `CredentialRecord` |
//! | Digest comparison is constant-time | `domain/accounts.rs` - `digests_match()` |
//! | An expired session is never returned to a caller | `service.rs` - `current_session()` |
//! | `logout()` clears the stored session unconditionally | `service.rs` - `logout()` |
//! | One user belongs to exactly one organization | `shared_types::User` shape |
//!
//! There is no token refresh; a session is valid until its TTL elapses
//! or `logout()` removes it.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::*;
pub use service::IdentityService;
