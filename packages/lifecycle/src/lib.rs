#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Hazard report lifecycle state machine.
//!
//! A report moves `unverified -> verified -> fix_pending -> fixed`, with a
//! direct `verified -> fixed` path for coordinators and admins. Every
//! operation here is a pure function over an explicit snapshot: the caller
//! passes the current report, the actor's identity and position, and the
//! trust policy, and receives either a new snapshot or a [`LifecycleError`]
//! with nothing changed. Persisting the result (conditionally on the prior
//! status and verification count) is the caller's job.
//!
//! Also covers the side systems gated by the same trust rules: civic
//! points ([`points`]), coordinator applications ([`application`]), and
//! social-post bookkeeping ([`social`]).

pub mod application;
pub mod collaborators;
pub mod points;
pub mod policy;
pub mod report;
pub mod social;
pub mod transition;

use hazard_map_hazard_models::{ApplicationStatus, PositionFailure, ReportStatus, UserRole};
use strum_macros::{AsRefStr, Display};

pub use policy::TrustPolicy;
pub use report::create_report;
pub use transition::{TransitionAction, TransitionOutcome, apply_transition};

/// The kind of a [`LifecycleError`], for callers that map errors to
/// user-facing messages or status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum ErrorKind {
    /// A required field was missing or malformed.
    InvalidInput,
    /// A role, proximity, or ownership guard failed.
    GuardNotSatisfied,
    /// The action is not defined for the report's current status.
    InvalidStateTransition,
    /// The actor's position could not be acquired.
    LocationUnavailable,
    /// The coordinator application is in the wrong state for the action.
    InvalidApplicationState,
}

/// Why a guard rejected an action.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GuardFailure {
    /// Reporters may not verify their own reports.
    #[error("reporters cannot verify their own report")]
    SelfVerification,

    /// The actor's verification of this report was already counted.
    #[error("actor has already verified this report")]
    AlreadyVerified,

    /// The actor is too far from the hazard.
    #[error("actor is {distance_km:.3} km from the hazard (limit {radius_km} km)")]
    OutOfRange {
        /// Measured great-circle distance.
        distance_km: f64,
        /// Configured proximity radius.
        radius_km: f64,
    },

    /// The actor's role may not perform this action.
    #[error("role {role} may not {action}")]
    RoleNotPermitted {
        /// The actor's role.
        role: UserRole,
        /// The attempted action.
        action: &'static str,
    },

    /// The actor is suspended.
    #[error("actor is suspended")]
    Suspended,
}

/// Errors returned by lifecycle operations.
///
/// All are recoverable: the operation was rejected and no state changed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LifecycleError {
    /// A required field was missing or malformed.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of the offending field.
        message: String,
    },

    /// A role, proximity, or ownership guard failed.
    #[error("Guard not satisfied: {0}")]
    GuardNotSatisfied(GuardFailure),

    /// The action is not defined for the report's current status.
    #[error("Cannot {action} a report that is {from}")]
    InvalidStateTransition {
        /// Status the report was in.
        from: ReportStatus,
        /// The attempted action.
        action: &'static str,
    },

    /// The actor's position could not be acquired.
    #[error("Location unavailable: {reason}")]
    LocationUnavailable {
        /// Why acquisition failed.
        reason: PositionFailure,
    },

    /// The coordinator application is in the wrong state for the action.
    #[error("Cannot {action} an application that is {status}")]
    InvalidApplicationState {
        /// Current application status.
        status: ApplicationStatus,
        /// The attempted action.
        action: &'static str,
    },
}

impl LifecycleError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::GuardNotSatisfied(_) => ErrorKind::GuardNotSatisfied,
            Self::InvalidStateTransition { .. } => ErrorKind::InvalidStateTransition,
            Self::LocationUnavailable { .. } => ErrorKind::LocationUnavailable,
            Self::InvalidApplicationState { .. } => ErrorKind::InvalidApplicationState,
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

impl From<GuardFailure> for LifecycleError {
    fn from(value: GuardFailure) -> Self {
        Self::GuardNotSatisfied(value)
    }
}
