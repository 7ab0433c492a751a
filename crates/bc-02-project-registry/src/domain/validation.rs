//! Project creation input and its validation.
//!
//! Validation collects every violated constraint before returning, so a
//! form submission surfaces all problems in one round trip.

use shared_types::{EcosystemType, ProjectLocation, Timestamp, ValidationFailure};

/// Input for `create_project`.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub ecosystem: EcosystemType,
    pub location: ProjectLocation,
    pub area_hectares: f64,
    pub methodology: String,
    pub start_date: Timestamp,
}

impl NewProject {
    /// Checks every constraint and returns the full list of violations.
    pub fn validate(&self) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        if self.name.trim().is_empty() {
            failures.push(ValidationFailure::new("name", "must not be empty"));
        }
        if !(self.area_hectares > 0.0) || !self.area_hectares.is_finite() {
            failures.push(ValidationFailure::new(
                "area_hectares",
                "must be a finite value greater than zero",
            ));
        }
        let point = self.location.point;
        if !(-90.0..=90.0).contains(&point.lat) || !point.lat.is_finite() {
            failures.push(ValidationFailure::new(
                "location.lat",
                "must be within [-90, 90]",
            ));
        }
        if !(-180.0..=180.0).contains(&point.lng) || !point.lng.is_finite() {
            failures.push(ValidationFailure::new(
                "location.lng",
                "must be within [-180, 180]",
            ));
        }
        if self.methodology.trim().is_empty() {
            failures.push(ValidationFailure::new("methodology", "must not be empty"));
        }
        if self.start_date == 0 {
            failures.push(ValidationFailure::new("start_date", "must be set"));
        }

        failures
    }
}
