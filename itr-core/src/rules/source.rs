use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{AssessmentYear, SlabTableError, TaxRules, YearRules};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RulesError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to load rules: {0}")]
    Load(String),

    #[error("Invalid rules: {0}")]
    Invalid(#[from] SlabTableError),

    #[error("No tax rules loaded for assessment year {0}")]
    YearNotFound(AssessmentYear),
}

/// Where tax reference data comes from.
///
/// `source` must match the [`RulesSource::source_name`] of a registered
/// source. `location` is handed to that source unchanged; its meaning is
/// source-specific.
///
/// | source    | location                                  |
/// |-----------|-------------------------------------------|
/// | `builtin` | ignored                                   |
/// | `csv`     | directory holding `slabs.csv` and `regimes.csv` |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    pub source: String,
    #[serde(default)]
    pub location: Option<PathBuf>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            source: "builtin".to_string(),
            location: None,
        }
    }
}

/// One implementation per origin of reference data. Sources are registered
/// with a [`RulesSourceRegistry`](super::RulesSourceRegistry) at startup.
pub trait RulesSource: Send + Sync {
    /// Unique, lowercase identifier for this source.
    fn source_name(&self) -> &'static str;

    /// Reads and validates every year this source knows about.
    fn load(
        &self,
        config: &RulesConfig,
    ) -> Result<TaxRules, RulesError>;
}

impl TaxRules {
    /// Like [`TaxRules::get`], but a missing year is an error.
    pub fn require(
        &self,
        year: AssessmentYear,
    ) -> Result<&YearRules, RulesError> {
        self.get(year).ok_or(RulesError::YearNotFound(year))
    }
}
