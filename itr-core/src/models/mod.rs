mod assessment_year;
mod calculation_result;
mod deduction_claims;
mod levy_config;
mod tax_regime;
mod tax_slab;
mod taxpayer_profile;
mod year_rules;

pub use assessment_year::{AssessmentYear, ParseAssessmentYearError};
pub use calculation_result::CalculationResult;
pub use deduction_claims::DeductionClaims;
pub use levy_config::{LevyConfig, SurchargeBracket};
pub use tax_regime::{RebateRule, RegimeKind, SlabTableError, TaxRegime};
pub use tax_slab::TaxSlab;
pub use taxpayer_profile::{AgeBand, TaxpayerProfile};
pub use year_rules::{TaxRules, YearRules};
