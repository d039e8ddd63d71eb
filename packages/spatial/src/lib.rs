#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Great-circle proximity checks for on-site verification.
//!
//! Citizens may only verify a hazard or confirm its repair when they are
//! physically near it. The guard compares the haversine distance between
//! the report's recorded location and the actor's current position against
//! the configured `proximity_radius_km`. It is pure: acquiring the actor's
//! position happens before it is called.

use geo::{Distance, Haversine, Point};
use hazard_map_hazard_models::Coordinates;

const METERS_PER_KM: f64 = 1000.0;

/// Great-circle distance between two coordinate pairs, in kilometres.
#[must_use]
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    Haversine.distance(to_point(a), to_point(b)) / METERS_PER_KM
}

/// Result of comparing an actor's distance against the proximity radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityCheck {
    /// Great-circle distance between report and actor, in kilometres.
    pub distance_km: f64,
    /// Whether the distance is within the radius.
    pub within: bool,
}

/// Measures the distance from `report` to `actor` and compares it against
/// `radius_km`.
///
/// The boundary is inclusive: an actor exactly `radius_km` away passes. A
/// negative or NaN radius never passes.
#[must_use]
pub fn check_proximity(report: Coordinates, actor: Coordinates, radius_km: f64) -> ProximityCheck {
    let distance_km = distance_km(report, actor);
    let within = distance_km <= radius_km;
    log::debug!(
        "Proximity check: {distance_km:.3} km from report (radius {radius_km} km) -> {within}"
    );
    ProximityCheck {
        distance_km,
        within,
    }
}

/// Whether `actor` is within `radius_km` of `report`.
///
/// See [`check_proximity`] for the boundary rules.
#[must_use]
pub fn within_proximity(report: Coordinates, actor: Coordinates, radius_km: f64) -> bool {
    check_proximity(report, actor, radius_km).within
}

/// Geo points are `(x, y)` = `(lng, lat)`.
fn to_point(c: Coordinates) -> Point<f64> {
    Point::new(c.lng, c.lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(lat: f64, lng: f64) -> Coordinates {
        Coordinates::new(lat, lng).unwrap()
    }

    #[test]
    fn same_point_is_zero_distance() {
        let p = coords(6.5244, 3.3792);
        assert!(distance_km(p, p).abs() < 1e-9);
        assert!(within_proximity(p, p, 0.0));
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = distance_km(coords(0.0, 0.0), coords(1.0, 0.0));
        assert!((d - 111.19).abs() < 0.1, "got {d}");
    }

    #[test]
    fn lagos_to_ibadan() {
        let lagos = coords(6.5244, 3.3792);
        let ibadan = coords(7.3775, 3.9470);
        let d = distance_km(lagos, ibadan);
        assert!((d - 113.0).abs() < 3.0, "got {d}");
    }

    #[test]
    fn nearby_actor_passes_distant_actor_fails() {
        let report = coords(6.5244, 3.3792);
        // ~110 m north
        let near = coords(6.5254, 3.3792);
        // ~1.1 km north
        let far = coords(6.5344, 3.3792);
        assert!(within_proximity(report, near, 0.5));
        assert!(!within_proximity(report, far, 0.5));
    }

    #[test]
    fn boundary_is_inclusive() {
        let report = coords(6.5244, 3.3792);
        let actor = coords(6.5290, 3.3810);
        let exact = distance_km(report, actor);
        assert!(within_proximity(report, actor, exact));
        assert!(!within_proximity(report, actor, exact - 1e-6));
    }

    #[test]
    fn distance_is_symmetric() {
        let a = coords(9.0765, 7.3986);
        let b = coords(12.0022, 8.5920);
        assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn check_reports_distance_with_verdict() {
        let report = coords(6.5244, 3.3792);
        let far = coords(6.5344, 3.3792);
        let check = check_proximity(report, far, 0.5);
        assert!(!check.within);
        assert!((check.distance_km - distance_km(report, far)).abs() < 1e-12);
        assert!(check.distance_km > 1.0);
    }

    #[test]
    fn nan_radius_never_passes() {
        let p = coords(6.5244, 3.3792);
        assert!(!within_proximity(p, p, f64::NAN));
        assert!(!within_proximity(p, p, -1.0));
    }
}
