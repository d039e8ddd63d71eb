//! Guarded status transitions.
//!
//! | Action        | From                      | To            | Actor                 | On site |
//! |---------------|---------------------------|---------------|-----------------------|---------|
//! | `verify`      | `unverified`              | `verified`*   | anyone but reporter   | citizen |
//! | `report_fix`  | `verified`                | `fix_pending` | citizen               | yes     |
//! | `confirm_fix` | `fix_pending`             | `fixed`       | citizen               | yes     |
//! | `resolve`     | `verified`, `fix_pending` | `fixed`       | coordinator or admin  | no      |
//!
//! \* once the verification count reaches the policy threshold.

use chrono::{DateTime, Utc};
use hazard_map_hazard_models::{ActorContext, Coordinates, Position, Report, ReportStatus};
use hazard_map_spatial::check_proximity;
use serde::{Deserialize, Serialize};

use crate::points::{award, verification_reward};
use crate::{GuardFailure, LifecycleError, TrustPolicy};

/// An action an actor asks to perform on a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TransitionAction {
    /// Confirm the hazard exists.
    Verify,
    /// Report that the hazard has been repaired.
    ReportFix {
        /// Photo of the repair.
        #[serde(default)]
        after_image_url: Option<String>,
    },
    /// Confirm a reported repair.
    ConfirmFix,
    /// Close the report directly (coordinator/admin).
    Resolve {
        /// Photo of the repair.
        #[serde(default)]
        after_image_url: Option<String>,
    },
}

impl TransitionAction {
    /// Wire name of the action.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Verify => "verify",
            Self::ReportFix { .. } => "report_fix",
            Self::ConfirmFix => "confirm_fix",
            Self::Resolve { .. } => "resolve",
        }
    }

    const fn after_image_url(&self) -> Option<&String> {
        match self {
            Self::ReportFix { after_image_url } | Self::Resolve { after_image_url } => {
                after_image_url.as_ref()
            }
            Self::Verify | Self::ConfirmFix => None,
        }
    }
}

/// Result of a successful transition.
///
/// The caller persists `report` and `actor_civic_points` together, and
/// only if the stored report still has `expected_status` and
/// `expected_verification_count`; otherwise it reloads and retries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionOutcome {
    /// The new report snapshot.
    pub report: Report,
    /// Status the report had when the transition was computed.
    pub expected_status: ReportStatus,
    /// Verification count the report had when the transition was computed.
    pub expected_verification_count: u32,
    /// Civic points earned by the actor.
    pub civic_points_awarded: u32,
    /// The actor's civic points after the award.
    pub actor_civic_points: u32,
}

impl TransitionOutcome {
    /// Whether the transition changed the report's status.
    #[must_use]
    pub fn status_changed(&self) -> bool {
        self.report.status != self.expected_status
    }
}

/// Applies `action` to `report` on behalf of `actor`.
///
/// `position` is the outcome of acquiring the actor's location; it is only
/// consulted for citizens, since coordinators and admins act remotely.
/// The input snapshot is never modified.
///
/// # Errors
///
/// * [`LifecycleError::GuardNotSatisfied`] if the actor is suspended,
///   verifies their own report or one they already verified, has the
///   wrong role, or is out of range.
/// * [`LifecycleError::InvalidStateTransition`] if `action` is not defined
///   for the report's status.
/// * [`LifecycleError::LocationUnavailable`] if a citizen's position could
///   not be acquired.
/// * [`LifecycleError::InvalidInput`] if a citizen supplied no position or
///   invalid coordinates, or a blank after-fix image.
pub fn apply_transition(
    report: &Report,
    action: &TransitionAction,
    actor: &ActorContext,
    position: Position,
    policy: &TrustPolicy,
    now: DateTime<Utc>,
) -> Result<TransitionOutcome, LifecycleError> {
    if actor.is_suspended {
        return Err(GuardFailure::Suspended.into());
    }
    if matches!(action, TransitionAction::Verify) {
        if actor.user_id == report.reporter_id {
            return Err(GuardFailure::SelfVerification.into());
        }
        if report.verified_by.contains(&actor.user_id) {
            return Err(GuardFailure::AlreadyVerified.into());
        }
    }

    let target = target_status(report, action, policy)?;
    check_role(actor, action)?;

    if let Some(url) = action.after_image_url()
        && url.trim().is_empty()
    {
        return Err(LifecycleError::invalid_input(
            "after_image_url must not be blank",
        ));
    }

    check_presence(report, actor, position, policy)?;

    let mut next = report.clone();
    let mut awarded = 0;

    if matches!(action, TransitionAction::Verify) {
        next.verification_count = next.verification_count.saturating_add(1);
        next.verified_by.push(actor.user_id.clone());
        awarded = verification_reward(actor.role);
    }
    if let Some(url) = action.after_image_url() {
        next.after_image_url = Some(url.trim().to_string());
    }
    next.status = target;
    next.updated_at = Some(now);

    log::debug!(
        "Report {}: {} by {} ({}) {} -> {}, verifications {}",
        report.id,
        action.name(),
        actor.user_id,
        actor.role,
        report.status,
        next.status,
        next.verification_count
    );

    Ok(TransitionOutcome {
        report: next,
        expected_status: report.status,
        expected_verification_count: report.verification_count,
        civic_points_awarded: awarded,
        actor_civic_points: award(actor.civic_points, awarded),
    })
}

/// Status the report moves to, or an error if `action` is undefined for
/// its current status.
fn target_status(
    report: &Report,
    action: &TransitionAction,
    policy: &TrustPolicy,
) -> Result<ReportStatus, LifecycleError> {
    let target = match (report.status, action) {
        (ReportStatus::Unverified, TransitionAction::Verify) => {
            let count = report.verification_count.saturating_add(1);
            if count >= policy.verification_threshold {
                ReportStatus::Verified
            } else {
                ReportStatus::Unverified
            }
        }
        (ReportStatus::Verified, TransitionAction::ReportFix { .. }) => ReportStatus::FixPending,
        (ReportStatus::FixPending, TransitionAction::ConfirmFix)
        | (ReportStatus::Verified | ReportStatus::FixPending, TransitionAction::Resolve { .. }) => {
            ReportStatus::Fixed
        }
        (from, action) => {
            return Err(LifecycleError::InvalidStateTransition {
                from,
                action: action.name(),
            });
        }
    };
    Ok(target)
}

/// Citizens report and confirm fixes on site; coordinators and admins
/// resolve remotely. Anyone may verify.
fn check_role(actor: &ActorContext, action: &TransitionAction) -> Result<(), LifecycleError> {
    let permitted = match action {
        TransitionAction::Verify => true,
        TransitionAction::ReportFix { .. } | TransitionAction::ConfirmFix => {
            !actor.role.has_elevated_trust()
        }
        TransitionAction::Resolve { .. } => actor.role.has_elevated_trust(),
    };

    if permitted {
        Ok(())
    } else {
        Err(GuardFailure::RoleNotPermitted {
            role: actor.role,
            action: action.name(),
        }
        .into())
    }
}

fn check_presence(
    report: &Report,
    actor: &ActorContext,
    position: Position,
    policy: &TrustPolicy,
) -> Result<(), LifecycleError> {
    if actor.role.has_elevated_trust() {
        log::debug!(
            "Remote override for {} ({}) on report {}",
            actor.user_id,
            actor.role,
            report.id
        );
        return Ok(());
    }

    let coordinates = match position {
        Position::Fix { coordinates } => Coordinates::new(coordinates.lat, coordinates.lng)
            .map_err(|e| LifecycleError::invalid_input(e.to_string()))?,
        Position::Unavailable { reason } => {
            return Err(LifecycleError::LocationUnavailable { reason });
        }
        Position::NotProvided => {
            return Err(LifecycleError::invalid_input(
                "current coordinates are required",
            ));
        }
    };

    let check = check_proximity(report.location, coordinates, policy.proximity_radius_km);
    if check.within {
        Ok(())
    } else {
        Err(GuardFailure::OutOfRange {
            distance_km: check.distance_km,
            radius_km: policy.proximity_radius_km,
        }
        .into())
    }
}
