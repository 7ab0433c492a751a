//! Seeded demo directory.
//!
//! Demo-account scope: the platform ships with a fixed set of
//! organizations and logins so every role's dashboard can be exercised
//! without a registration surface. Credentials are hashed like any
//! other account; the shared demo credential is public by design.

use bc_01_identity::{AccountDirectory, OrganizationDirectory};
use shared_types::{OrgId, Organization, OrganizationType, Role, User, UserId};

/// Credential for every seeded demo account.
pub const DEMO_CREDENTIAL: &str = "blue-carbon-demo";

/// Seeded logins, one per role: `(email, role)`.
pub const DEMO_LOGINS: [(&str, Role); 5] = [
    ("admin@mrv.example.in", Role::Admin),
    ("priya@sundarbansgreen.org", Role::Ngo),
    ("sarpanch@chorao-panchayat.in", Role::Panchayat),
    ("officer@coastalresearch.gov.in", Role::Government),
    ("meera@blueverify.in", Role::Verifier),
];

/// Registers the demo organizations and accounts.
pub fn seed_directories(accounts: &mut AccountDirectory, organizations: &mut OrganizationDirectory) {
    let research = org(
        "National Coastal Research Centre",
        OrganizationType::Government,
        "NCRC/2019/001",
        "Chennai, Tamil Nadu",
    );
    let ngo = org(
        "Sundarbans Green Foundation",
        OrganizationType::Ngo,
        "SGF/2015/0442",
        "Kolkata, West Bengal",
    );
    let panchayat = org(
        "Chorao Gram Panchayat",
        OrganizationType::Panchayat,
        "GP/GOA/0077",
        "Chorao Island, Goa",
    );
    let verifier = org(
        "BlueVerify Services",
        OrganizationType::Verifier,
        "BVS/2021/0310",
        "Bengaluru, Karnataka",
    );

    let role_org = |role: Role| match role {
        Role::Admin | Role::Government => research.id,
        Role::Ngo => ngo.id,
        Role::Panchayat => panchayat.id,
        Role::Verifier => verifier.id,
    };

    for (email, role) in DEMO_LOGINS {
        let name = email
            .split('@')
            .next()
            .unwrap_or(email)
            .to_string();
        accounts.register(
            User {
                id: UserId::generate(),
                name,
                email: email.to_string(),
                role,
                organization: role_org(role),
            },
            DEMO_CREDENTIAL,
        );
    }

    for organization in [research, ngo, panchayat, verifier] {
        organizations.register(organization);
    }
}

fn org(name: &str, org_type: OrganizationType, reg: &str, location: &str) -> Organization {
    Organization {
        id: OrgId::generate(),
        name: name.into(),
        org_type,
        registration_number: reg.into(),
        location: location.into(),
        contact: format!("contact@{}", name.to_lowercase().replace(' ', "-")),
    }
}
