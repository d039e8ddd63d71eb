//! Trust policy derived from system settings.

use hazard_map_hazard_models::{
    PROXIMITY_RADIUS_KM_KEY, SystemSetting, VERIFICATION_THRESHOLD_KEY,
};
use serde::{Deserialize, Serialize};

/// Radius used when `proximity_radius_km` is unset or malformed (500 m).
pub const DEFAULT_PROXIMITY_RADIUS_KM: f64 = 0.5;

/// Verifications needed when `verification_threshold` is unset or
/// malformed. A single verification is sufficient by default.
pub const DEFAULT_VERIFICATION_THRESHOLD: u32 = 1;

/// Parameters for the trust guards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrustPolicy {
    /// Maximum distance, in kilometres, between a citizen and the hazard.
    pub proximity_radius_km: f64,
    /// Number of verifications after which a report becomes verified.
    pub verification_threshold: u32,
}

impl Default for TrustPolicy {
    fn default() -> Self {
        Self {
            proximity_radius_km: DEFAULT_PROXIMITY_RADIUS_KM,
            verification_threshold: DEFAULT_VERIFICATION_THRESHOLD,
        }
    }
}

impl TrustPolicy {
    /// Builds a policy from system setting records.
    ///
    /// Unknown keys are ignored. A value that does not parse, or a radius
    /// that is negative or not finite, or a threshold of zero, is logged
    /// and replaced by its default.
    #[must_use]
    pub fn from_settings(settings: &[SystemSetting]) -> Self {
        let mut policy = Self::default();

        for setting in settings {
            let value = setting.value.trim();
            match setting.key.as_str() {
                PROXIMITY_RADIUS_KM_KEY => match value.parse::<f64>() {
                    Ok(radius) if radius.is_finite() && radius >= 0.0 => {
                        policy.proximity_radius_km = radius;
                    }
                    _ => log::warn!(
                        "Ignoring invalid {PROXIMITY_RADIUS_KM_KEY} {value:?}, using {DEFAULT_PROXIMITY_RADIUS_KM}"
                    ),
                },
                VERIFICATION_THRESHOLD_KEY => match value.parse::<u32>() {
                    Ok(threshold) if threshold > 0 => {
                        policy.verification_threshold = threshold;
                    }
                    _ => log::warn!(
                        "Ignoring invalid {VERIFICATION_THRESHOLD_KEY} {value:?}, using {DEFAULT_VERIFICATION_THRESHOLD}"
                    ),
                },
                _ => {}
            }
        }

        policy
    }
}
