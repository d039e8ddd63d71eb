#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Jurisdiction classification for hazard reports.
//!
//! Routes each report to the tier of government accountable for the road
//! it was reported on. Classification is data-driven: operators configure
//! an ordered list of [`JurisdictionRule`]s (see [`registry`]) and the
//! first rule whose state and road-name pattern match wins. Addresses no
//! rule matches fall back to a keyword heuristic, so any report with both
//! an address and a state is classified as either federal or state.

pub mod registry;
pub mod store;

use hazard_map_hazard_models::{Jurisdiction, JurisdictionRule};

/// Address keywords that mark a road as federal when no rule matches.
const FEDERAL_KEYWORDS: &[&str] = &["highway", "interstate"];

/// Errors from loading or validating jurisdiction rules.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// TOML parsing failed.
    #[error("Rule parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// I/O error reading a rule file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A rule is structurally invalid.
    #[error("Invalid rule {index}: {message}")]
    Invalid {
        /// Position of the rule in its file.
        index: usize,
        /// What is wrong with it.
        message: String,
    },
}

/// Classifies an address into a [`Jurisdiction`].
///
/// Returns [`Jurisdiction::Unknown`] when either `address` or `state` is
/// empty. Whitespace-only input is not empty and is classified normally.
/// Otherwise the first rule (in slice order) whose state is
/// `"Generic"` or equals `state` case-insensitively, and whose
/// `road_name_pattern` occurs case-insensitively in `address`, decides.
/// With no matching rule, addresses mentioning a highway or interstate are
/// [`Jurisdiction::Federal`] and everything else is
/// [`Jurisdiction::State`].
///
/// Only the literal keywords count: `"Lagos-Ibadan Expressway"` with no
/// matching rule classifies as state.
#[must_use]
pub fn resolve_jurisdiction(
    address: &str,
    state: &str,
    rules: &[JurisdictionRule],
) -> Jurisdiction {
    if address.is_empty() || state.is_empty() {
        return Jurisdiction::Unknown;
    }

    let addr = address.to_lowercase();
    let state = state.to_lowercase();

    if let Some(rule) = rules.iter().find(|r| rule_matches(r, &addr, &state)) {
        log::debug!(
            "Address {address:?} matched rule {} ({:?}) -> {}",
            rule.id.as_deref().unwrap_or("<unnamed>"),
            rule.road_name_pattern,
            rule.jurisdiction
        );
        return rule.jurisdiction.into();
    }

    if FEDERAL_KEYWORDS.iter().any(|k| addr.contains(k)) {
        log::debug!("Address {address:?} matched federal keyword heuristic");
        return Jurisdiction::Federal;
    }

    Jurisdiction::State
}

/// `addr` and `state` must already be lower-cased.
fn rule_matches(rule: &JurisdictionRule, addr: &str, state: &str) -> bool {
    let state_match = rule.is_generic() || rule.state.to_lowercase() == state;
    state_match && addr.contains(&rule.road_name_pattern.to_lowercase())
}

#[cfg(test)]
mod tests {
    use hazard_map_hazard_models::RuleJurisdiction;

    use super::*;

    fn rule(state: &str, pattern: &str, jurisdiction: RuleJurisdiction) -> JurisdictionRule {
        JurisdictionRule {
            id: None,
            state: state.to_string(),
            lga: None,
            road_name_pattern: pattern.to_string(),
            jurisdiction,
        }
    }

    #[test]
    fn empty_address_or_state_is_unknown() {
        let rules = registry::default_rules();
        assert_eq!(
            resolve_jurisdiction("", "Lagos", &rules),
            Jurisdiction::Unknown
        );
        assert_eq!(
            resolve_jurisdiction("Third Mainland Bridge", "", &rules),
            Jurisdiction::Unknown
        );
    }

    #[test]
    fn whitespace_only_input_is_not_empty() {
        let rules = registry::default_rules();
        assert_eq!(
            resolve_jurisdiction("   ", "Lagos", &rules),
            Jurisdiction::State
        );
        assert_eq!(
            resolve_jurisdiction("Old Highway 5", " ", &[]),
            Jurisdiction::Federal
        );
    }

    #[test]
    fn state_rule_matches() {
        let rules = [rule(
            "Lagos",
            "Third Mainland Bridge",
            RuleJurisdiction::Federal,
        )];
        assert_eq!(
            resolve_jurisdiction("Third Mainland Bridge", "Lagos", &rules),
            Jurisdiction::Federal
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let rules = [rule(
            "Lagos",
            "Third Mainland Bridge",
            RuleJurisdiction::Federal,
        )];
        assert_eq!(
            resolve_jurisdiction("near THIRD MAINLAND bridge, Yaba", "lagos", &rules),
            Jurisdiction::Federal
        );
    }

    #[test]
    fn state_rule_does_not_apply_elsewhere() {
        let rules = [rule(
            "Lagos",
            "Third Mainland Bridge",
            RuleJurisdiction::Federal,
        )];
        assert_eq!(
            resolve_jurisdiction("Third Mainland Bridge", "Ogun", &rules),
            Jurisdiction::State
        );
    }

    #[test]
    fn generic_rule_applies_to_any_state() {
        let rules = [rule("Generic", "Trunk A", RuleJurisdiction::Federal)];
        assert_eq!(
            resolve_jurisdiction("Trunk A road, Kano", "Kano", &rules),
            Jurisdiction::Federal
        );
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = [
            rule("Generic", "Road", RuleJurisdiction::State),
            rule("Lagos", "Ikorodu Road", RuleJurisdiction::Federal),
        ];
        assert_eq!(
            resolve_jurisdiction("Ikorodu Road", "Lagos", &rules),
            Jurisdiction::State
        );
    }

    #[test]
    fn rule_can_override_heuristic() {
        let rules = [rule("Ogun", "highway", RuleJurisdiction::State)];
        assert_eq!(
            resolve_jurisdiction("Old Highway 5", "Ogun", &rules),
            Jurisdiction::State
        );
    }

    #[test]
    fn heuristic_keywords_fall_back_to_federal() {
        assert_eq!(
            resolve_jurisdiction("Interstate 95 North", "Lagos", &[]),
            Jurisdiction::Federal
        );
        assert_eq!(
            resolve_jurisdiction("Benin-Ore Highway", "Edo", &[]),
            Jurisdiction::Federal
        );
    }

    #[test]
    fn expressway_without_rule_is_state() {
        assert_eq!(
            resolve_jurisdiction("Lagos-Ibadan Expressway", "Ogun", &[]),
            Jurisdiction::State
        );
    }

    #[test]
    fn expressway_with_default_rules_is_federal() {
        assert_eq!(
            resolve_jurisdiction("Lagos-Ibadan Expressway", "Ogun", &registry::default_rules()),
            Jurisdiction::Federal
        );
    }

    #[test]
    fn unmatched_address_defaults_to_state() {
        assert_eq!(
            resolve_jurisdiction("12 Allen Avenue, Ikeja", "Lagos", &registry::default_rules()),
            Jurisdiction::State
        );
    }
}
