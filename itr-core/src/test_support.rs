//! Reference regimes shared by unit tests.

use rust_decimal_macros::dec;

use crate::models::{
    AssessmentYear, LevyConfig, RebateRule, RegimeKind, TaxRegime, TaxSlab, YearRules,
};

/// Old regime as in force for AY 2026-27.
pub fn old_regime() -> TaxRegime {
    TaxRegime {
        kind: RegimeKind::Old,
        slabs: vec![
            TaxSlab::new(dec!(0), Some(dec!(250000)), dec!(0)),
            TaxSlab::new(dec!(250000), Some(dec!(500000)), dec!(5)),
            TaxSlab::new(dec!(500000), Some(dec!(1000000)), dec!(20)),
            TaxSlab::new(dec!(1000000), None, dec!(30)),
        ],
        deductions: vec!["80C".into(), "80D".into(), "HRA".into(), "24(b)".into()],
        standard_deduction_limit: dec!(50000),
        senior_exemption_limit: Some(dec!(300000)),
        super_senior_exemption_limit: Some(dec!(500000)),
        rebate: Some(RebateRule {
            income_limit: dec!(500000),
            max_rebate: dec!(12500),
            marginal_relief: false,
        }),
        surcharge_rate_cap: None,
    }
}

/// New regime as in force for AY 2026-27.
pub fn new_regime() -> TaxRegime {
    TaxRegime {
        kind: RegimeKind::New,
        slabs: vec![
            TaxSlab::new(dec!(0), Some(dec!(400000)), dec!(0)),
            TaxSlab::new(dec!(400000), Some(dec!(800000)), dec!(5)),
            TaxSlab::new(dec!(800000), Some(dec!(1200000)), dec!(10)),
            TaxSlab::new(dec!(1200000), Some(dec!(1600000)), dec!(15)),
            TaxSlab::new(dec!(1600000), Some(dec!(2000000)), dec!(20)),
            TaxSlab::new(dec!(2000000), Some(dec!(2400000)), dec!(25)),
            TaxSlab::new(dec!(2400000), None, dec!(30)),
        ],
        deductions: vec!["Standard deduction".into(), "80CCD(2)".into()],
        standard_deduction_limit: dec!(75000),
        senior_exemption_limit: None,
        super_senior_exemption_limit: None,
        rebate: Some(RebateRule {
            income_limit: dec!(1200000),
            max_rebate: dec!(60000),
            marginal_relief: true,
        }),
        surcharge_rate_cap: Some(dec!(25)),
    }
}

pub fn year_rules() -> YearRules {
    YearRules {
        assessment_year: AssessmentYear(2026),
        old: old_regime(),
        new: new_regime(),
        levies: LevyConfig::default(),
    }
}
