//! # Subsystem Authority Model
//!
//! Privileged mutations (lifecycle transitions, credit counters) are
//! gated on the caller's identity. A caller is either a logged-in user
//! or one of the platform subsystems; each receiving subsystem checks
//! the caller against its authorization matrix before mutating.
//!
//! ## Authorization Matrix
//!
//! | Operation | Authorized Caller(s) |
//! |-----------|----------------------|
//! | `Registry::create_project` | Ngo, Panchayat, Government users |
//! | `Registry::update_project` | Owning organization, Admin |
//! | `Registry::mark_active` | Subsystem 3 (Field Records) |
//! | `Registry::apply_verification_outcome` | Subsystem 4 (Verification) |
//! | `Registry::apply_mint` / `consume_available` | Subsystem 5 (Ledger) |
//! | `Verification::open_review` / `approve` / `reject` | Verifier users |
//! | `Ledger::mint` | Subsystem 4 (Verification) via mint request |

use crate::entities::User;
use serde::{Deserialize, Serialize};

/// Stable identifier for each platform subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SubsystemId {
    /// Composition root / runtime wiring.
    Runtime = 0,
    /// Identity & Session (Subsystem 1).
    Identity = 1,
    /// Project Registry (Subsystem 2).
    Registry = 2,
    /// Field Record Store (Subsystem 3).
    FieldRecords = 3,
    /// Verification Workflow (Subsystem 4).
    Verification = 4,
    /// Carbon Credit Ledger (Subsystem 5).
    Ledger = 5,
}

impl std::fmt::Display for SubsystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Runtime => "runtime",
            Self::Identity => "identity",
            Self::Registry => "registry",
            Self::FieldRecords => "field-records",
            Self::Verification => "verification",
            Self::Ledger => "ledger",
        };
        write!(f, "{name}")
    }
}

/// The caller of a privileged operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Authority {
    /// A logged-in user acting through the command surface.
    User(User),
    /// An internal subsystem acting on a choreography event.
    Subsystem(SubsystemId),
}

impl Authority {
    /// Returns the subsystem id if this is a subsystem caller.
    pub fn subsystem(&self) -> Option<SubsystemId> {
        match self {
            Self::Subsystem(id) => Some(*id),
            Self::User(_) => None,
        }
    }

    /// Returns the user if this is a user caller.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::User(user) => Some(user),
            Self::Subsystem(_) => None,
        }
    }
}
