//! Organization directory.
//!
//! Pure access-scoping and display data; the only constraint enforced
//! is id uniqueness.

use shared_types::{OrgId, Organization, OrganizationType};
use std::collections::HashMap;

/// Directory of registered organizations.
#[derive(Debug, Default)]
pub struct OrganizationDirectory {
    by_id: HashMap<OrgId, Organization>,
}

impl OrganizationDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an organization, replacing any previous entry with the
    /// same id.
    pub fn register(&mut self, org: Organization) {
        self.by_id.insert(org.id, org);
    }

    /// Looks up an organization by id.
    pub fn get(&self, id: OrgId) -> Option<&Organization> {
        self.by_id.get(&id)
    }

    /// All organizations of the given type, unordered.
    pub fn organizations_of_type(&self, org_type: OrganizationType) -> Vec<&Organization> {
        self.by_id
            .values()
            .filter(|org| org.org_type == org_type)
            .collect()
    }

    /// Number of registered organizations.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
