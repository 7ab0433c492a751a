//! # Core Domain Entities
//!
//! Defines the domain entities shared across subsystems.
//!
//! ## Clusters
//!
//! - **Identity**: `User`, `Role`, `Organization`, `Session`
//! - **Projects**: `Project`, `ProjectStatus`, `ProjectLocation`
//! - **Field Records**: `FieldMeasurement`, `MeasurementPayload`, `SyncStatus`
//! - **Verification**: `VerificationRecord`, `EvidenceItem`, `Findings`
//! - **Credits**: `CarbonCreditToken`, `LedgerEntry`, `TokenMetadata`

use crate::ids::{
    MeasurementId, OrgId, ProjectId, SerialNumber, TokenId, UserId, VerificationId,
};
use serde::{Deserialize, Serialize};

/// Timestamp in milliseconds since UNIX epoch.
pub type Timestamp = u64;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Role assigned to a user at registration. Immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform administrator; sees everything.
    Admin,
    /// NGO field organization; scoped to its own projects.
    Ngo,
    /// Panchayat (local government body); scoped to its own projects.
    Panchayat,
    /// Government agency; read access to all projects.
    Government,
    /// Accredited verifier; reviews evidence and approves credits.
    Verifier,
}

/// Type of a registered organization. Used for access scoping and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationType {
    Ngo,
    Government,
    Panchayat,
    Private,
    Community,
    Verifier,
}

/// A registered organization.
///
/// No relational constraints are enforced beyond uniqueness of `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrgId,
    pub name: String,
    pub org_type: OrganizationType,
    /// Government registration number, free-form.
    pub registration_number: String,
    pub location: String,
    pub contact: String,
}

/// A platform user. Belongs to exactly one organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub organization: OrgId,
}

/// An authenticated session, persisted across reloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    /// When the session was issued (ms).
    pub issued_at: Timestamp,
    /// When the session expires (ms). Expired sessions are discarded on load.
    pub expires_at: Timestamp,
}

impl Session {
    /// Returns true if the session is still valid at `now`.
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        now < self.expires_at
    }
}

// =============================================================================
// CLUSTER B: PROJECTS
// =============================================================================

/// Coastal ecosystem type covered by a restoration project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EcosystemType {
    Mangrove,
    Seagrass,
    Saltmarsh,
    TidalWetland,
}

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, valid range [-90, 90].
    pub lat: f64,
    /// Longitude in degrees, valid range [-180, 180].
    pub lng: f64,
}

impl GeoPoint {
    /// Returns true if both coordinates are within their valid ranges.
    pub fn in_bounds(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Administrative location of a project site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectLocation {
    pub point: GeoPoint,
    pub state: String,
    pub district: String,
}

/// Project lifecycle state.
///
/// ```text
/// [Pending] ──first synced monitoring record──→ [Active]
///     [Active] ──approval + mint──→ [Verified]
///     [Active] ──verification failure──→ [Rejected] | [RequiresAdditionalData]
///     [RequiresAdditionalData] ──new evidence──→ (re-enters the workflow)
/// ```
///
/// There is no transition from `Verified` or `Rejected` back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Pending,
    Active,
    Verified,
    Rejected,
    RequiresAdditionalData,
}

/// A blue-carbon restoration project.
///
/// The registry is the single writer of every field here. The credit
/// counters move only through ledger-authority operations:
/// `available_credits <= total_credits_issued` holds at all times, and
/// `total_credits_issued` only ever increases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub ecosystem: EcosystemType,
    pub location: ProjectLocation,
    /// Project area in hectares. Always > 0.
    pub area_hectares: f64,
    /// Accounting methodology reference (e.g. a VM0033 revision).
    pub methodology: String,
    /// Project start date (ms since epoch).
    pub start_date: Timestamp,
    pub status: ProjectStatus,
    /// Total credits ever minted for this project (tCO2e). Monotonic.
    pub total_credits_issued: u64,
    /// Credits still held in the issuing pool (tCO2e).
    pub available_credits: u64,
    pub created_by: UserId,
    pub organization: OrgId,
}

// =============================================================================
// CLUSTER C: FIELD RECORDS
// =============================================================================

/// Kind of field activity a measurement batch documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementKind {
    Plantation,
    Monitoring,
    Restoration,
}

/// A GPS fix captured on the field device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    pub point: GeoPoint,
    /// Reported horizontal accuracy in meters.
    pub accuracy_m: f64,
}

/// Type-dependent measurement payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MeasurementPayload {
    /// New plantation batch.
    Plantation {
        species: String,
        saplings_planted: u32,
        /// Observed survival rate of a prior batch, percent.
        survival_rate_pct: f64,
    },
    /// Periodic monitoring observation.
    Monitoring {
        canopy_cover_pct: f64,
        water_salinity_ppt: f64,
        /// Sediment carbon density, tC/ha.
        sediment_carbon_density: f64,
        /// Remote-sensing vegetation index, display metric only.
        ndvi: f64,
    },
    /// Restoration intervention.
    Restoration {
        area_treated_hectares: f64,
        interventions: Vec<String>,
    },
}

impl MeasurementPayload {
    /// The measurement kind this payload documents.
    pub fn kind(&self) -> MeasurementKind {
        match self {
            Self::Plantation { .. } => MeasurementKind::Plantation,
            Self::Monitoring { .. } => MeasurementKind::Monitoring,
            Self::Restoration { .. } => MeasurementKind::Restoration,
        }
    }
}

/// Reference to an evidence photograph captured with a measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidencePhoto {
    /// Opaque storage reference.
    pub storage_ref: String,
    pub captured_at: Timestamp,
}

/// Sync state of a field measurement.
///
/// ```text
/// [Offline] ──sync──→ [Syncing] ──→ [Synced]
///                          │
///                          └──transient failure──→ [Error] (stays queued)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Offline,
    Syncing,
    Synced,
    Error,
}

/// A time-stamped measurement batch submitted by a field officer.
///
/// Created offline-first on a field device. Once synced it is an
/// append-only evidentiary record and is never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMeasurement {
    pub id: MeasurementId,
    pub project_id: ProjectId,
    pub recorded_at: Timestamp,
    pub gps: GpsFix,
    pub payload: MeasurementPayload,
    pub photos: Vec<EvidencePhoto>,
    pub field_officer: UserId,
    pub organization: OrgId,
    pub sync_status: SyncStatus,
}

impl FieldMeasurement {
    /// The measurement kind, derived from the payload.
    pub fn kind(&self) -> MeasurementKind {
        self.payload.kind()
    }
}

// =============================================================================
// CLUSTER D: VERIFICATION
// =============================================================================

/// Method used to verify a project's claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMethod {
    FieldVisit,
    DroneSurvey,
    SatelliteImagery,
    MobileData,
    Hybrid,
}

/// A single piece of evidence attached to a review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub id: MeasurementId,
    pub description: String,
    /// Set by the verifier once the item has been checked.
    pub verified: bool,
}

/// Verifier findings recorded during a review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Findings {
    /// Estimated sequestration rate, tCO2e per hectare per year.
    pub carbon_sequestration_rate: f64,
    /// Area the verifier could confirm, hectares.
    pub area_verified_hectares: f64,
    /// Above-ground biomass estimate, tonnes.
    pub biomass_estimate: f64,
    /// Outstanding compliance issues. Must be empty for approval.
    pub compliance_issues: Vec<String>,
}

/// Verification review state.
///
/// `RequiresAdditionalData → InProgress` (resubmission) is the only
/// backward edge; everything else moves strictly forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Pending,
    InProgress,
    Verified,
    Rejected,
    RequiresAdditionalData,
}

/// A verification review of one project.
///
/// Once `immutable_record` is set the findings and the credit
/// recommendation are frozen; the record becomes an append-only audit
/// entry identified by `record_hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub id: VerificationId,
    pub project_id: ProjectId,
    pub verifier: UserId,
    pub method: VerificationMethod,
    pub evidence: Vec<EvidenceItem>,
    pub status: VerificationStatus,
    /// Confidence score in [0, 100].
    pub confidence_score: u8,
    pub findings: Findings,
    /// Credits recommended for minting (tCO2e).
    pub credits_recommended: u64,
    /// True once the record is frozen for audit.
    pub immutable_record: bool,
    /// Hex SHA-256 of the frozen record. Empty until frozen.
    pub record_hash: String,
    pub opened_at: Timestamp,
}

// =============================================================================
// CLUSTER E: CREDITS
// =============================================================================

/// Lifecycle state of a credit token.
///
/// `Active` and `Transferred` are both live (movable, retirable);
/// `Transferred` only marks that ownership has changed hands at least
/// once. `Retired` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenStatus {
    /// In circulation with its original owner.
    Active,
    /// Permanently removed from circulating supply. Terminal.
    Retired,
    /// Ownership has changed hands at least once; still in circulation.
    Transferred,
}

/// Holder of credit tokens. Either an organization or a named external
/// account (marketplace buyer).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRef {
    Organization(OrgId),
    External(String),
}

/// Provenance metadata embedded in every token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub ecosystem: EcosystemType,
    pub methodology: String,
    pub verifier: UserId,
    pub gps: GeoPoint,
    /// Hash of the frozen verification record this token derives from.
    pub evidence_hash: String,
}

/// Kind of a ledger history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryKind {
    Mint,
    Transfer,
    Retire,
}

/// One append-only entry in a token's transaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub at: Timestamp,
    pub kind: LedgerEntryKind,
    pub from: Option<AccountRef>,
    pub to: Option<AccountRef>,
    /// Amount moved, tCO2e.
    pub amount: u64,
    pub note: String,
}

/// A carbon credit token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonCreditToken {
    pub id: TokenId,
    pub project_id: ProjectId,
    /// Current balance on this token, tCO2e.
    pub amount: u64,
    /// Year the underlying sequestration occurred.
    pub vintage: u16,
    pub serial: SerialNumber,
    pub status: TokenStatus,
    pub owner: AccountRef,
    pub issued_at: Timestamp,
    pub metadata: TokenMetadata,
    /// Full transaction history, append-only.
    pub history: Vec<LedgerEntry>,
    /// True while the balance still sits in the issuing organization's
    /// pool. Cleared on the first transfer out; split tokens inherit it.
    pub issuer_pool: bool,
}

impl CarbonCreditToken {
    /// Returns true if the token can still move (transfer or retire).
    pub fn is_live(&self) -> bool {
        !matches!(self.status, TokenStatus::Retired)
    }
}
