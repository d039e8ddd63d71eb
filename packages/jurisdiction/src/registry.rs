//! Jurisdiction rule sets in TOML.
//!
//! The default rule set in `packages/jurisdiction/rules/default.toml` is
//! baked into the binary at compile time via [`include_str!`]. Operators
//! extend or replace it with their own file of `[[rules]]` tables, parsed
//! by [`parse_rules_toml`].

use hazard_map_hazard_models::JurisdictionRule;
use serde::Deserialize;

use crate::RuleError;

/// Default rule set embedded at compile time.
const DEFAULT_RULES_TOML: &str = include_str!("../rules/default.toml");

#[cfg(test)]
const EXPECTED_DEFAULT_RULE_COUNT: usize = 3;

/// Top-level shape of a rule file.
#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<JurisdictionRule>,
}

/// Parses a rule set from TOML, preserving file order.
///
/// # Errors
///
/// Returns [`RuleError::Parse`] for malformed TOML and
/// [`RuleError::Invalid`] for a rule with a blank state or road-name
/// pattern (a blank pattern would match every address).
pub fn parse_rules_toml(toml_str: &str) -> Result<Vec<JurisdictionRule>, RuleError> {
    let file: RuleFile = toml::de::from_str(toml_str)?;

    for (index, rule) in file.rules.iter().enumerate() {
        if rule.state.trim().is_empty() {
            return Err(RuleError::Invalid {
                index,
                message: "state is blank".to_string(),
            });
        }
        if rule.road_name_pattern.trim().is_empty() {
            return Err(RuleError::Invalid {
                index,
                message: "road_name_pattern is blank".to_string(),
            });
        }
    }

    Ok(file.rules)
}

/// Returns the embedded default rule set.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (this is a compile-time
/// guarantee since the file is embedded and covered by tests).
#[must_use]
pub fn default_rules() -> Vec<JurisdictionRule> {
    parse_rules_toml(DEFAULT_RULES_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse default jurisdiction rules: {e}"))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use hazard_map_hazard_models::RuleJurisdiction;

    use super::*;

    #[test]
    fn loads_default_rules() {
        assert_eq!(default_rules().len(), EXPECTED_DEFAULT_RULE_COUNT);
    }

    #[test]
    fn default_rule_ids_are_unique() {
        let rules = default_rules();
        let mut seen = BTreeSet::new();
        for rule in &rules {
            let id = rule.id.as_deref().unwrap_or_default();
            assert!(!id.is_empty(), "Default rule without id");
            assert!(seen.insert(id), "Duplicate rule ID: {id}");
        }
    }

    #[test]
    fn preserves_file_order() {
        let rules = parse_rules_toml(
            r#"
            [[rules]]
            state = "Lagos"
            road_name_pattern = "Ikorodu Road"
            jurisdiction = "STATE"

            [[rules]]
            state = "Generic"
            road_name_pattern = "Trunk A"
            lga = "Ikeja"
            jurisdiction = "FEDERAL"
            "#,
        )
        .unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].road_name_pattern, "Ikorodu Road");
        assert_eq!(rules[0].jurisdiction, RuleJurisdiction::State);
        assert_eq!(rules[1].lga.as_deref(), Some("Ikeja"));
    }

    #[test]
    fn empty_file_has_no_rules() {
        assert!(parse_rules_toml("").unwrap().is_empty());
    }

    #[test]
    fn rejects_unknown_jurisdiction() {
        let result = parse_rules_toml(
            r#"
            [[rules]]
            state = "Lagos"
            road_name_pattern = "Ikorodu Road"
            jurisdiction = "UNKNOWN"
            "#,
        );
        assert!(matches!(result, Err(RuleError::Parse(_))));
    }

    #[test]
    fn rejects_blank_pattern() {
        let result = parse_rules_toml(
            r#"
            [[rules]]
            state = "Generic"
            road_name_pattern = "  "
            jurisdiction = "FEDERAL"
            "#,
        );
        assert!(matches!(result, Err(RuleError::Invalid { index: 0, .. })));
    }
}
