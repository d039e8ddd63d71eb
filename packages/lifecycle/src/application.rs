//! Coordinator applications.
//!
//! `NONE --submit--> PENDING --approve--> APPROVED` or
//! `PENDING --reject--> REJECTED`. Nothing else is valid; in particular a
//! rejected citizen cannot reapply. Approval reports the role promotion for
//! the user-management collaborator to apply.

use hazard_map_hazard_models::{ActorContext, ApplicationStatus, UserRole};
use serde::{Deserialize, Serialize};

use crate::{GuardFailure, LifecycleError};

/// An admin's decision on a pending application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationDecision {
    /// Grant coordinator status.
    Approve,
    /// Deny the application.
    Reject,
}

/// Result of reviewing an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationReview {
    /// New application status.
    pub status: ApplicationStatus,
    /// Role the applicant should be promoted to, if any.
    pub promote_to: Option<UserRole>,
}

/// Submits a coordinator application for `applicant`.
///
/// # Errors
///
/// * [`LifecycleError::GuardNotSatisfied`] if the applicant is suspended or
///   not a citizen.
/// * [`LifecycleError::InvalidApplicationState`] unless the applicant's
///   status is `NONE`.
pub fn submit_application(applicant: &ActorContext) -> Result<ApplicationStatus, LifecycleError> {
    if applicant.is_suspended {
        return Err(GuardFailure::Suspended.into());
    }
    if applicant.role != UserRole::Citizen {
        return Err(GuardFailure::RoleNotPermitted {
            role: applicant.role,
            action: "apply",
        }
        .into());
    }
    if applicant.application_status != ApplicationStatus::None {
        return Err(LifecycleError::InvalidApplicationState {
            status: applicant.application_status,
            action: "apply",
        });
    }

    log::info!("User {} applied to become a coordinator", applicant.user_id);
    Ok(ApplicationStatus::Pending)
}

/// Reviews an application currently in `status`.
///
/// # Errors
///
/// * [`LifecycleError::GuardNotSatisfied`] if the reviewer is suspended or
///   not an admin.
/// * [`LifecycleError::InvalidApplicationState`] unless `status` is
///   `PENDING`.
pub fn review_application(
    reviewer: &ActorContext,
    status: ApplicationStatus,
    decision: ApplicationDecision,
) -> Result<ApplicationReview, LifecycleError> {
    if reviewer.is_suspended {
        return Err(GuardFailure::Suspended.into());
    }
    if reviewer.role != UserRole::Admin {
        return Err(GuardFailure::RoleNotPermitted {
            role: reviewer.role,
            action: "review applications",
        }
        .into());
    }
    if status != ApplicationStatus::Pending {
        return Err(LifecycleError::InvalidApplicationState {
            status,
            action: "review",
        });
    }

    let review = match decision {
        ApplicationDecision::Approve => ApplicationReview {
            status: ApplicationStatus::Approved,
            promote_to: Some(UserRole::Coordinator),
        },
        ApplicationDecision::Reject => ApplicationReview {
            status: ApplicationStatus::Rejected,
            promote_to: None,
        },
    };

    log::info!(
        "Admin {} set coordinator application to {}",
        reviewer.user_id,
        review.status
    );
    Ok(review)
}
