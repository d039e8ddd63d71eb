//! Sources of jurisdiction rule sets.
//!
//! Rules live in an operator-managed configuration store. [`RuleStore`] is
//! the seam; [`EmbeddedRuleStore`] serves the compiled-in defaults and
//! [`TomlFileRuleStore`] reads an operator file on every load so edits
//! take effect without a redeploy.

use std::path::PathBuf;

use async_trait::async_trait;
use hazard_map_hazard_models::JurisdictionRule;

use crate::RuleError;
use crate::registry::{default_rules, parse_rules_toml};

/// A configuration store that supplies the current rule set.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Loads the rule set, in evaluation order.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if the store cannot be read or parsed.
    async fn load_rules(&self) -> Result<Vec<JurisdictionRule>, RuleError>;
}

/// Serves the embedded default rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedRuleStore;

#[async_trait]
impl RuleStore for EmbeddedRuleStore {
    async fn load_rules(&self) -> Result<Vec<JurisdictionRule>, RuleError> {
        Ok(default_rules())
    }
}

/// Reads rules from a TOML file of `[[rules]]` tables.
#[derive(Debug, Clone)]
pub struct TomlFileRuleStore {
    path: PathBuf,
}

impl TomlFileRuleStore {
    /// Creates a store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RuleStore for TomlFileRuleStore {
    async fn load_rules(&self) -> Result<Vec<JurisdictionRule>, RuleError> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let rules = parse_rules_toml(&contents)?;
        log::info!(
            "Loaded {} jurisdiction rules from {}",
            rules.len(),
            self.path.display()
        );
        Ok(rules)
    }
}
