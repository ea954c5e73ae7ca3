use std::collections::HashMap;

use tracing::info;

use super::source::{RulesConfig, RulesError, RulesSource};
use crate::models::TaxRules;

/// Registry of [`RulesSource`] instances, keyed by source name.
///
/// Typical lifetime:
/// 1. Create with `RulesSourceRegistry::new()`.
/// 2. Call `register` once per known source.
/// 3. Call `load` with the configured source.
pub struct RulesSourceRegistry {
    sources: HashMap<&'static str, Box<dyn RulesSource>>,
}

impl RulesSourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    /// Registers a source, replacing any with the same name.
    pub fn register(
        &mut self,
        source: Box<dyn RulesSource>,
    ) {
        self.sources.insert(source.source_name(), source);
    }

    /// Names of every registered source, sorted alphabetically.
    pub fn available_sources(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.sources.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatches to the source matching `config.source`.
    ///
    /// # Errors
    /// * [`RulesError::Configuration`] when no source has that name, or the
    ///   source produced no years at all.
    /// * Any error the chosen source itself returns.
    pub fn load(
        &self,
        config: &RulesConfig,
    ) -> Result<TaxRules, RulesError> {
        let source = self.sources.get(config.source.as_str()).ok_or_else(|| {
            RulesError::Configuration(format!(
                "unknown rules source '{}'; available: {:?}",
                config.source,
                self.available_sources()
            ))
        })?;

        let rules = source.load(config)?;
        if rules.is_empty() {
            return Err(RulesError::Configuration(format!(
                "rules source '{}' produced no assessment years",
                config.source
            )));
        }

        info!(
            source = %config.source,
            years = rules.len(),
            "tax rules loaded"
        );
        Ok(rules)
    }
}

impl Default for RulesSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
