//! # MRV Platform Runtime
//!
//! Composition root for the Blue-Carbon MRV platform.
//!
//! ## Choreography Flow
//!
//! ```text
//! FIELD RECORDS (3)
//!     │
//!     └──MeasurementSynced──→ Event Bus ──→ REGISTRY (2): pending → active
//!
//! VERIFICATION (4)
//!     │
//!     └──MintRequested──────→ Event Bus ──→ LEDGER (5): mint + counters
//!                                               │
//!                                               └──CreditsMinted
//! ```
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration and the dependency-injected service set
//! - `adapters/`  - Port implementations connecting subsystems
//! - `wiring/`    - Event routing between subsystems
//! - `queries/`   - Role-polymorphic dashboard view models
//! - `demo/`      - Seeded demo organizations, accounts, and projects
//!
//! All mutation flows through the subsystem command operations; the
//! query layer is read-only and serializable, so a presentation layer
//! can render it without touching domain state.

pub mod adapters;
pub mod container;
pub mod demo;
pub mod queries;
pub mod wiring;

pub use container::{Platform, PlatformConfig};
pub use queries::DashboardView;
