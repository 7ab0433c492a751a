//! Typed identifiers.
//!
//! Every entity id is a uuid newtype so that a `ProjectId` can never be
//! passed where a `TokenId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier for a registered user.
    UserId
);
entity_id!(
    /// Identifier for an organization.
    OrgId
);
entity_id!(
    /// Identifier for a blue-carbon restoration project.
    ProjectId
);
entity_id!(
    /// Identifier for a field measurement. Doubles as the idempotency
    /// key for offline sync.
    MeasurementId
);
entity_id!(
    /// Identifier for a verification record.
    VerificationId
);
entity_id!(
    /// Identifier for a carbon credit token.
    TokenId
);
entity_id!(
    /// Identifier for a field-collection device. Each device owns one
    /// offline queue.
    DeviceId
);

/// Globally unique token serial number.
///
/// Serials are allocated by the ledger and never reused, including for
/// tokens created by splitting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerialNumber(pub String);

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ProjectId::generate();
        let b = ProjectId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_display_round_trip() {
        let id = TokenId::generate();
        let shown = id.to_string();
        assert_eq!(shown, id.0.to_string());
    }
}
