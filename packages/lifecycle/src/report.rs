//! Report creation.

use chrono::{DateTime, Utc};
use hazard_map_hazard_models::{
    ActorContext, Coordinates, HazardSeverity, JurisdictionRule, NewReport, Report, ReportStatus,
};
use hazard_map_jurisdiction::resolve_jurisdiction;

use crate::{GuardFailure, LifecycleError};

/// Creates an `unverified` report from client-supplied fields.
///
/// Assigns a fresh ID and classifies the jurisdiction against `rules`.
/// Jurisdiction is never recomputed after this point.
///
/// # Errors
///
/// * [`LifecycleError::InvalidInput`] if the title, address, state, or
///   live-capture image is blank, the coordinates are out of range, or
///   the severity is not 1-5.
/// * [`LifecycleError::GuardNotSatisfied`] if the reporter is suspended.
pub fn create_report(
    new: &NewReport,
    reporter: &ActorContext,
    rules: &[JurisdictionRule],
    now: DateTime<Utc>,
) -> Result<Report, LifecycleError> {
    if reporter.is_suspended {
        return Err(GuardFailure::Suspended.into());
    }

    require_field("title", &new.title)?;
    require_field("address", &new.address)?;
    require_field("state", &new.state)?;
    require_field("image_url", &new.image_url)?;

    let location = Coordinates::new(new.lat, new.lng)
        .map_err(|e| LifecycleError::invalid_input(e.to_string()))?;
    let severity_level = HazardSeverity::from_value(new.severity_level)
        .map_err(|e| LifecycleError::invalid_input(e.to_string()))?;

    let jurisdiction = resolve_jurisdiction(&new.address, &new.state, rules);

    let report = Report {
        id: uuid::Uuid::new_v4().to_string(),
        reporter_id: reporter.user_id.clone(),
        title: new.title.trim().to_string(),
        description: new.description.trim().to_string(),
        location,
        address: new.address.trim().to_string(),
        state: new.state.trim().to_string(),
        lga: new
            .lga
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from),
        jurisdiction,
        severity_level,
        status: ReportStatus::Unverified,
        verification_count: 0,
        verified_by: Vec::new(),
        image_url: new.image_url.trim().to_string(),
        after_image_url: None,
        social_post_id: None,
        created_at: now,
        updated_at: None,
    };

    log::info!(
        "Created report {} in {} ({})",
        report.id,
        report.state,
        report.jurisdiction
    );

    Ok(report)
}

fn require_field(name: &str, value: &str) -> Result<(), LifecycleError> {
    if value.trim().is_empty() {
        return Err(LifecycleError::invalid_input(format!("{name} is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use hazard_map_hazard_models::{Jurisdiction, UserRole};
    use hazard_map_jurisdiction::registry::default_rules;

    use super::*;
    use crate::ErrorKind;
    use crate::test_support::{actor, now};

    fn new_report() -> NewReport {
        NewReport {
            title: "Collapsed culvert".to_string(),
            description: " Half the lane is gone ".to_string(),
            lat: 6.8,
            lng: 3.4,
            address: "Lagos-Ibadan Expressway, Mowe".to_string(),
            state: "Ogun".to_string(),
            lga: Some("  ".to_string()),
            severity_level: 5,
            image_url: "https://img.example/capture.jpg".to_string(),
        }
    }

    #[test]
    fn creates_unverified_report_with_jurisdiction() {
        let reporter = actor("citizen-1", UserRole::Citizen);
        let report = create_report(&new_report(), &reporter, &default_rules(), now()).unwrap();

        assert_eq!(report.status, ReportStatus::Unverified);
        assert_eq!(report.verification_count, 0);
        assert_eq!(report.jurisdiction, Jurisdiction::Federal);
        assert_eq!(report.reporter_id, "citizen-1");
        assert_eq!(report.severity_level, HazardSeverity::Critical);
        assert_eq!(report.description, "Half the lane is gone");
        assert_eq!(report.lga, None);
        assert_eq!(report.created_at, now());
        assert!(!report.id.is_empty());
    }

    #[test]
    fn expressway_without_rules_is_state() {
        let reporter = actor("citizen-1", UserRole::Citizen);
        let report = create_report(&new_report(), &reporter, &[], now()).unwrap();
        assert_eq!(report.jurisdiction, Jurisdiction::State);
    }

    #[test]
    fn ids_are_unique() {
        let reporter = actor("citizen-1", UserRole::Citizen);
        let a = create_report(&new_report(), &reporter, &[], now()).unwrap();
        let b = create_report(&new_report(), &reporter, &[], now()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn missing_fields_are_invalid_input() {
        let reporter = actor("citizen-1", UserRole::Citizen);

        let cases: [fn(&mut NewReport); 7] = [
            |n| n.address.clear(),
            |n| n.state = " ".to_string(),
            |n| n.image_url.clear(),
            |n| n.title.clear(),
            |n| n.lat = 91.0,
            |n| n.severity_level = 0,
            |n| n.severity_level = 6,
        ];

        for mutate in cases {
            let mut new = new_report();
            mutate(&mut new);
            let err = create_report(&new, &reporter, &[], now()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{err}");
        }
    }

    #[test]
    fn suspended_reporter_is_rejected() {
        let mut reporter = actor("citizen-1", UserRole::Citizen);
        reporter.is_suspended = true;
        let err = create_report(&new_report(), &reporter, &[], now()).unwrap_err();
        assert_eq!(err, LifecycleError::GuardNotSatisfied(GuardFailure::Suspended));
    }
}
