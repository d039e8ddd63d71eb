#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Hazard report, jurisdiction, role, and settings types.
//!
//! This crate defines the records shared by every part of the hazard map:
//! the report snapshot that the lifecycle state machine transitions, the
//! operator-configured jurisdiction rules, and the actor context passed
//! explicitly into every guarded operation. Values are validated at the
//! boundary (see [`Coordinates::new`] and [`HazardSeverity::from_value`])
//! so the logic crates can assume well-formed input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Rule state that matches reports from any state.
pub const GENERIC_RULE_STATE: &str = "Generic";

/// Setting key for the citizen proximity radius, in kilometres.
pub const PROXIMITY_RADIUS_KM_KEY: &str = "proximity_radius_km";

/// Setting key for the number of verifications needed to flip a report to
/// [`ReportStatus::Verified`].
pub const VERIFICATION_THRESHOLD_KEY: &str = "verification_threshold";

/// The tier of government accountable for a road segment.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Jurisdiction {
    /// Federal roads (highways, trunk roads, federal bridges).
    Federal,
    /// State and local-authority roads.
    State,
    /// Classification was impossible because the address or state was missing.
    Unknown,
}

impl Jurisdiction {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Federal, Self::State, Self::Unknown]
    }
}

/// The jurisdiction a [`JurisdictionRule`] may assign.
///
/// Rules never produce [`Jurisdiction::Unknown`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum RuleJurisdiction {
    /// Assign [`Jurisdiction::Federal`].
    Federal,
    /// Assign [`Jurisdiction::State`].
    State,
}

impl From<RuleJurisdiction> for Jurisdiction {
    fn from(value: RuleJurisdiction) -> Self {
        match value {
            RuleJurisdiction::Federal => Self::Federal,
            RuleJurisdiction::State => Self::State,
        }
    }
}

/// Lifecycle status of a hazard report.
///
/// The terminal state is serialized as `fixed`. `resolved` is accepted as
/// an input alias, as are the legacy `reported` (for `unverified`) and
/// `in_progress` (for `fix_pending`) names.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReportStatus {
    /// Newly created; awaiting peer verification.
    #[serde(alias = "reported")]
    #[strum(to_string = "unverified", serialize = "reported")]
    Unverified,
    /// Confirmed by at least the configured number of verifiers.
    Verified,
    /// A citizen has reported the hazard as fixed; awaiting confirmation.
    #[serde(alias = "in_progress")]
    #[strum(to_string = "fix_pending", serialize = "in_progress")]
    FixPending,
    /// Terminal: the fix has been confirmed.
    #[serde(alias = "resolved")]
    #[strum(to_string = "fixed", serialize = "resolved")]
    Fixed,
}

impl ReportStatus {
    /// Whether a social-platform post may be published for a report in
    /// this status.
    #[must_use]
    pub const fn is_post_eligible(self) -> bool {
        matches!(self, Self::Verified | Self::Fixed)
    }

    /// Whether this status is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Fixed)
    }

    /// Returns all variants of this enum, in lifecycle order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Unverified, Self::Verified, Self::FixPending, Self::Fixed]
    }
}

/// Severity of a hazard, from 1 (minimal) to 5 (critical).
///
/// Serialized on the wire as the bare integer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(try_from = "u8", into = "u8")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum HazardSeverity {
    /// Level 1: cosmetic damage
    Minimal = 1,
    /// Level 2: minor potholes, faded markings
    Low = 2,
    /// Level 3: damage that forces drivers to slow or swerve
    Moderate = 3,
    /// Level 4: damage likely to cause vehicle damage
    High = 4,
    /// Level 5: collapse, washout, or imminent danger to life
    Critical = 5,
}

impl HazardSeverity {
    /// Returns the numeric value of this severity level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a severity level from a numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-5.
    pub const fn from_value(value: u8) -> Result<Self, InvalidSeverityError> {
        match value {
            1 => Ok(Self::Minimal),
            2 => Ok(Self::Low),
            3 => Ok(Self::Moderate),
            4 => Ok(Self::High),
            5 => Ok(Self::Critical),
            _ => Err(InvalidSeverityError { value }),
        }
    }
}

impl TryFrom<u8> for HazardSeverity {
    type Error = InvalidSeverityError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<HazardSeverity> for u8 {
    fn from(value: HazardSeverity) -> Self {
        value.value()
    }
}

/// Error returned when attempting to create a [`HazardSeverity`] from an
/// invalid numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSeverityError {
    /// The invalid severity value that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidSeverityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid severity value {}: expected 1-5", self.value)
    }
}

impl std::error::Error for InvalidSeverityError {}

/// Role of an authenticated actor.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum UserRole {
    /// Ordinary member of the public.
    Citizen,
    /// Vetted user who may verify and resolve reports remotely.
    Coordinator,
    /// Platform administrator.
    Admin,
}

impl UserRole {
    /// Whether this role carries the remote-override privilege.
    ///
    /// Every role-gated check goes through this predicate.
    #[must_use]
    pub const fn has_elevated_trust(self) -> bool {
        matches!(self, Self::Coordinator | Self::Admin)
    }
}

/// Status of a citizen's application to become a coordinator.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ApplicationStatus {
    /// No application submitted.
    #[default]
    None,
    /// Awaiting admin review.
    Pending,
    /// Approved; the user is promoted to coordinator.
    Approved,
    /// Rejected by an admin.
    Rejected,
}

/// A WGS84 coordinate pair in decimal degrees.
///
/// Deserialization goes through [`Coordinates::new`], so out-of-range
/// values are rejected at the wire boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    /// Latitude (-90 to 90).
    pub lat: f64,
    /// Longitude (-180 to 180).
    pub lng: f64,
}

impl Coordinates {
    /// Creates a coordinate pair, validating the ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is non-finite or out of range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidCoordinatesError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinatesError { lat, lng });
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(InvalidCoordinatesError { lat, lng });
        }
        Ok(Self { lat, lng })
    }
}

/// Unvalidated wire shape of [`Coordinates`].
#[derive(Deserialize)]
struct RawCoordinates {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = InvalidCoordinatesError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lng)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Error returned when a coordinate pair is outside WGS84 bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidCoordinatesError {
    /// The rejected latitude.
    pub lat: f64,
    /// The rejected longitude.
    pub lng: f64,
}

impl std::fmt::Display for InvalidCoordinatesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid coordinates ({}, {}): expected lat -90..90 and lng -180..180",
            self.lat, self.lng
        )
    }
}

impl std::error::Error for InvalidCoordinatesError {}

/// An operator-configured jurisdiction classification rule.
///
/// Rules are evaluated in their given order and the first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionRule {
    /// Optional rule identifier (e.g. `"rule-1"`).
    #[serde(default)]
    pub id: Option<String>,
    /// State the rule applies to, or [`GENERIC_RULE_STATE`] for any state.
    pub state: String,
    /// Local government area the rule was written for. Informational only.
    #[serde(default)]
    pub lga: Option<String>,
    /// Substring matched case-insensitively against the report address.
    pub road_name_pattern: String,
    /// Jurisdiction assigned when the rule matches.
    pub jurisdiction: RuleJurisdiction,
}

impl JurisdictionRule {
    /// Whether this rule applies to reports from every state.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        self.state == GENERIC_RULE_STATE
    }
}

/// A hazard report snapshot.
///
/// Lifecycle operations never mutate a snapshot in place; they return a
/// new one for the caller to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Unique report ID.
    pub id: String,
    /// User who created the report. Immutable.
    pub reporter_id: String,
    /// Short hazard title (e.g. "Pothole").
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Where the hazard was captured.
    pub location: Coordinates,
    /// Free-text address.
    pub address: String,
    /// State name.
    pub state: String,
    /// Local government area name.
    #[serde(default)]
    pub lga: Option<String>,
    /// Accountable tier of government, assigned once at creation.
    pub jurisdiction: Jurisdiction,
    /// Severity (1-5).
    pub severity_level: HazardSeverity,
    /// Current lifecycle status.
    pub status: ReportStatus,
    /// Number of successful verifications.
    pub verification_count: u32,
    /// Users whose verification has been counted, in order.
    #[serde(default)]
    pub verified_by: Vec<String>,
    /// Live-capture evidence photo.
    pub image_url: String,
    /// Photo of the repair, set on resolution.
    #[serde(default)]
    pub after_image_url: Option<String>,
    /// ID of the published social-platform post, if any.
    #[serde(default)]
    pub social_post_id: Option<String>,
    /// Creation time. Immutable.
    pub created_at: DateTime<Utc>,
    /// Time of the last status transition.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields supplied by a reporting client to create a [`Report`].
///
/// Values arrive unvalidated; report creation checks them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReport {
    /// Short hazard title.
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Latitude of the capture.
    pub lat: f64,
    /// Longitude of the capture.
    pub lng: f64,
    /// Free-text address (reverse-geocoded or typed).
    pub address: String,
    /// State name.
    pub state: String,
    /// Local government area name.
    #[serde(default)]
    pub lga: Option<String>,
    /// Severity (expected 1-5).
    pub severity_level: u8,
    /// Live-capture evidence photo.
    pub image_url: String,
}

/// Explicit identity of the caller performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    /// User ID.
    pub user_id: String,
    /// Role.
    pub role: UserRole,
    /// Whether the user is suspended.
    #[serde(default)]
    pub is_suspended: bool,
    /// Current civic points total.
    #[serde(default)]
    pub civic_points: u32,
    /// Coordinator application status.
    #[serde(default)]
    pub application_status: ApplicationStatus,
}

/// Why the device position could not be acquired.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PositionFailure {
    /// The user denied location permission.
    PermissionDenied,
    /// No fix was obtained in time (weak GPS signal).
    Timeout,
    /// The device has no positioning support.
    Unsupported,
}

/// Outcome of the external location-acquisition step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Position {
    /// A position fix was obtained.
    Fix {
        /// Where the actor is.
        coordinates: Coordinates,
    },
    /// Acquisition was attempted and failed.
    Unavailable {
        /// Why it failed.
        reason: PositionFailure,
    },
    /// No acquisition was attempted.
    NotProvided,
}

/// A mutable key/value configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSetting {
    /// Setting key (e.g. [`PROXIMITY_RADIUS_KM_KEY`]).
    pub key: String,
    /// Raw value as stored.
    pub value: String,
    /// Operator-facing description.
    #[serde(default)]
    pub description: Option<String>,
}
