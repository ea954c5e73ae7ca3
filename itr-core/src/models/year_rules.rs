use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AssessmentYear, LevyConfig, RegimeKind, SlabTableError, TaxRegime};

/// Reference data for one assessment year: both regimes and the levies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRules {
    pub assessment_year: AssessmentYear,
    pub old: TaxRegime,
    pub new: TaxRegime,
    pub levies: LevyConfig,
}

impl YearRules {
    pub fn regime(
        &self,
        kind: RegimeKind,
    ) -> &TaxRegime {
        match kind {
            RegimeKind::Old => &self.old,
            RegimeKind::New => &self.new,
        }
    }

    pub fn validate(&self) -> Result<(), SlabTableError> {
        self.old.validate()?;
        self.new.validate()
    }
}

/// All loaded reference data, keyed by assessment year.
///
/// Built once at startup by a rules source and passed by reference into
/// calculations. Every year is validated on insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxRules {
    years: BTreeMap<AssessmentYear, YearRules>,
}

impl TaxRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and adds the rules for a year, replacing any existing entry.
    pub fn insert(
        &mut self,
        rules: YearRules,
    ) -> Result<(), SlabTableError> {
        rules.validate()?;
        debug!(year = %rules.assessment_year, "registered tax rules");
        self.years.insert(rules.assessment_year, rules);
        Ok(())
    }

    pub fn get(
        &self,
        year: AssessmentYear,
    ) -> Option<&YearRules> {
        self.years.get(&year)
    }

    /// The most recent year with rules loaded.
    pub fn latest(&self) -> Option<&YearRules> {
        self.years.values().next_back()
    }

    /// Loaded years in ascending order.
    pub fn years(&self) -> Vec<AssessmentYear> {
        self.years.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }
}
