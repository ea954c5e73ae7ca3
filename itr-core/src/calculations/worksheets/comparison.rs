//! Old vs New regime comparison.
//!
//! Runs the [`RegimeWorksheet`] under both regimes of an assessment year
//! and recommends the one with the lower tax payable. When both come out
//! equal the New regime is recommended, since it is the default regime
//! and needs no opt-out.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::regime::{RegimeWorksheet, RegimeWorksheetInput, RegimeWorksheetResult, WorksheetError};
use crate::models::{AssessmentYear, RegimeKind, YearRules};

/// Both worksheets side by side with a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegimeComparison {
    pub assessment_year: AssessmentYear,
    pub old_regime: RegimeWorksheetResult,
    pub new_regime: RegimeWorksheetResult,
    pub recommended: RegimeKind,

    /// How much less the recommended regime costs.
    pub savings: Decimal,
}

impl RegimeComparison {
    pub fn between(
        rules: &YearRules,
        input: &RegimeWorksheetInput,
    ) -> Result<Self, WorksheetError> {
        let worksheet = RegimeWorksheet::new(rules);
        let old_regime = worksheet.calculate(RegimeKind::Old, input)?;
        let new_regime = worksheet.calculate(RegimeKind::New, input)?;

        let (recommended, savings) = if old_regime.tax_payable < new_regime.tax_payable {
            (
                RegimeKind::Old,
                new_regime.tax_payable - old_regime.tax_payable,
            )
        } else {
            (
                RegimeKind::New,
                old_regime.tax_payable - new_regime.tax_payable,
            )
        };

        info!(
            year = %rules.assessment_year,
            %recommended,
            %savings,
            "regimes compared"
        );

        Ok(Self {
            assessment_year: rules.assessment_year,
            old_regime,
            new_regime,
            recommended,
            savings,
        })
    }

    pub fn result_for(
        &self,
        kind: RegimeKind,
    ) -> &RegimeWorksheetResult {
        match kind {
            RegimeKind::Old => &self.old_regime,
            RegimeKind::New => &self.new_regime,
        }
    }
}
