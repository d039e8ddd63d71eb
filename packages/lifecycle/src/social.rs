//! Social-platform post bookkeeping.
//!
//! Posting is an administrative action correlated with, but never chained
//! from, status transitions. Both operations are idempotent: triggering a
//! post for a report that already has one, or deleting a post for a report
//! that has none, returns the report unchanged without calling the
//! platform.

use async_trait::async_trait;
use hazard_map_hazard_models::Report;

use crate::LifecycleError;

/// Errors from social-post operations.
#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    /// The report is not in a postable status.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// The social platform rejected or failed the request.
    #[error("Social platform error: {message}")]
    Platform {
        /// Description of the failure.
        message: String,
    },
}

/// A social platform that publishes report notices.
#[async_trait]
pub trait SocialPublisher: Send + Sync {
    /// Publishes a notice for `report` and returns the post ID.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::Platform`] if publishing fails.
    async fn publish(&self, report: &Report) -> Result<String, SocialError>;

    /// Deletes a previously published post.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::Platform`] if deletion fails.
    async fn delete(&self, post_id: &str) -> Result<(), SocialError>;
}

/// Checks that `report` may be posted about.
///
/// # Errors
///
/// Returns [`LifecycleError::InvalidStateTransition`] unless the report is
/// `verified` or `fixed`.
pub fn ensure_post_eligible(report: &Report) -> Result<(), LifecycleError> {
    if report.status.is_post_eligible() {
        Ok(())
    } else {
        Err(LifecycleError::InvalidStateTransition {
            from: report.status,
            action: "post",
        })
    }
}

/// Publishes a post for `report` unless it already has one.
///
/// # Errors
///
/// Returns [`SocialError::Lifecycle`] if the report is not eligible and
/// [`SocialError::Platform`] if publishing fails.
pub async fn trigger_post(
    publisher: &dyn SocialPublisher,
    report: &Report,
) -> Result<Report, SocialError> {
    if let Some(post_id) = &report.social_post_id {
        log::debug!("Report {} already posted as {post_id}", report.id);
        return Ok(report.clone());
    }

    ensure_post_eligible(report)?;

    let post_id = publisher.publish(report).await?;
    log::info!("Published post {post_id} for report {}", report.id);

    Ok(Report {
        social_post_id: Some(post_id),
        ..report.clone()
    })
}

/// Deletes the post for `report`, if any.
///
/// # Errors
///
/// Returns [`SocialError::Platform`] if deletion fails; the report keeps
/// its post ID in that case.
pub async fn delete_post(
    publisher: &dyn SocialPublisher,
    report: &Report,
) -> Result<Report, SocialError> {
    let Some(post_id) = &report.social_post_id else {
        return Ok(report.clone());
    };

    publisher.delete(post_id).await?;
    log::info!("Deleted post {post_id} for report {}", report.id);

    Ok(Report {
        social_post_id: None,
        ..report.clone()
    })
}
