//! Regime worksheet: from gross income to tax payable under one regime.
//!
//! # Worksheet Structure
//!
//! | Line | Description |
//! |------|-------------|
//! | 1    | Gross total income (salary + other income) |
//! | 2    | Standard deduction (salaried / pensioners, up to the regime limit) |
//! | 3    | Chapter VI-A deductions and exemptions (Old regime only, capped) |
//! | 4    | Taxable income (Line 1 - Line 2 - Line 3, minimum 0) |
//! | 5    | Tax on taxable income from the slab table |
//! | 6    | Rebate under Section 87A (residents only) |
//! | 7    | Tax after rebate (Line 5 - Line 6) |
//! | 8    | Surcharge on Line 7 |
//! | 9    | Health & education cess on Line 7 + Line 8 |
//! | 10   | Total tax liability (Line 7 + Line 8 + Line 9) |
//! | 11   | Tax payable, rounded to the nearest ₹10 (Section 288B) |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::SlabTaxEngine;
use crate::calculations::common::{max, round_half_up, round_to_nearest_ten};
use crate::models::{
    AgeBand, CalculationResult, DeductionClaims, RegimeKind, TaxRegime, TaxpayerProfile,
    YearRules,
};

const SECTION_80C_CAP: Decimal = dec!(150000);
const SECTION_80CCD_1B_CAP: Decimal = dec!(50000);
const SECTION_80D_CAP: Decimal = dec!(25000);
const SECTION_80D_SENIOR_CAP: Decimal = dec!(50000);
const HOME_LOAN_INTEREST_CAP: Decimal = dec!(200000);

/// Errors that can occur during regime worksheet calculations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorksheetError {
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },
}

/// Income and claims for one taxpayer and one assessment year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegimeWorksheetInput {
    /// Salary or pension income.
    pub salary_income: Decimal,

    /// Income from all other heads (interest, rent, capital gains at slab rates).
    #[serde(default)]
    pub other_income: Decimal,

    /// Whether the standard deduction applies (salaried employees and pensioners).
    #[serde(default = "default_true")]
    pub is_salaried: bool,

    pub profile: TaxpayerProfile,

    #[serde(default)]
    pub claims: DeductionClaims,
}

fn default_true() -> bool {
    true
}

/// Result of the regime worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegimeWorksheetResult {
    pub regime: RegimeKind,
    pub gross_income: Decimal,
    pub standard_deduction: Decimal,

    /// Chapter VI-A deductions and exemptions after statutory caps.
    pub other_deductions: Decimal,

    pub taxable_income: Decimal,

    /// Tax from the slab table before any rebate.
    pub slab_tax: Decimal,

    pub rebate: Decimal,

    /// Liability after rebate; `liability.base_tax` is the tax after rebate.
    pub liability: CalculationResult,

    /// `liability.total_tax` rounded to the nearest ten rupees.
    pub tax_payable: Decimal,
}

/// Calculator for the regime worksheet of one assessment year.
#[derive(Debug, Clone, Copy)]
pub struct RegimeWorksheet<'a> {
    rules: &'a YearRules,
}

impl<'a> RegimeWorksheet<'a> {
    pub fn new(rules: &'a YearRules) -> Self {
        Self { rules }
    }

    /// Runs the worksheet under the given regime.
    ///
    /// # Errors
    ///
    /// Returns [`WorksheetError::NegativeAmount`] if any income or claimed
    /// deduction is negative.
    pub fn calculate(
        &self,
        kind: RegimeKind,
        input: &RegimeWorksheetInput,
    ) -> Result<RegimeWorksheetResult, WorksheetError> {
        Self::validate(input)?;

        let regime = self.rules.regime(kind);
        let engine = SlabTaxEngine::new(&self.rules.levies);

        let gross_income = round_half_up(input.salary_income + input.other_income);
        let standard_deduction = self.standard_deduction(regime, input);
        let other_deductions = self.other_deductions(regime, &input.claims, &input.profile);
        let taxable_income = max(
            gross_income - standard_deduction - other_deductions,
            Decimal::ZERO,
        );

        let slab_tax = engine.slab_tax(taxable_income, regime, &input.profile);
        let rebate = self.rebate(regime, &input.profile, taxable_income, slab_tax);
        let liability = engine.apply_levies(taxable_income, slab_tax - rebate, regime);
        let tax_payable = round_to_nearest_ten(liability.total_tax);

        debug!(
            year = %self.rules.assessment_year,
            regime = %kind,
            %taxable_income,
            %slab_tax,
            %rebate,
            %tax_payable,
            "regime worksheet calculated"
        );

        Ok(RegimeWorksheetResult {
            regime: kind,
            gross_income,
            standard_deduction,
            other_deductions,
            taxable_income,
            slab_tax,
            rebate,
            liability,
            tax_payable,
        })
    }

    fn validate(input: &RegimeWorksheetInput) -> Result<(), WorksheetError> {
        let incomes = [
            ("salaryIncome", input.salary_income),
            ("otherIncome", input.other_income),
        ];
        let negative = incomes
            .into_iter()
            .find(|(_, value)| *value < Decimal::ZERO)
            .or_else(|| input.claims.first_negative());

        match negative {
            Some((field, value)) => Err(WorksheetError::NegativeAmount { field, value }),
            None => Ok(()),
        }
    }

    /// Standard deduction, limited to the salary it is set against.
    fn standard_deduction(
        &self,
        regime: &TaxRegime,
        input: &RegimeWorksheetInput,
    ) -> Decimal {
        if input.is_salaried {
            regime.standard_deduction_limit.min(input.salary_income)
        } else {
            Decimal::ZERO
        }
    }

    /// Capped Chapter VI-A deductions and exemptions.
    ///
    /// The New regime does not admit any of these claims.
    fn other_deductions(
        &self,
        regime: &TaxRegime,
        claims: &DeductionClaims,
        profile: &TaxpayerProfile,
    ) -> Decimal {
        if regime.kind == RegimeKind::New {
            return Decimal::ZERO;
        }

        let health_cap = match profile.age_band() {
            AgeBand::Regular => SECTION_80D_CAP,
            AgeBand::Senior | AgeBand::SuperSenior => SECTION_80D_SENIOR_CAP,
        };

        round_half_up(
            claims.section_80c.min(SECTION_80C_CAP)
                + claims.section_80ccd_1b.min(SECTION_80CCD_1B_CAP)
                + claims.section_80d.min(health_cap)
                + claims.home_loan_interest.min(HOME_LOAN_INTEREST_CAP)
                + claims.hra_exemption
                + claims.other,
        )
    }

    /// Section 87A rebate for residents.
    fn rebate(
        &self,
        regime: &TaxRegime,
        profile: &TaxpayerProfile,
        taxable_income: Decimal,
        slab_tax: Decimal,
    ) -> Decimal {
        let Some(rule) = regime.rebate.as_ref().filter(|_| profile.is_resident) else {
            return Decimal::ZERO;
        };

        if taxable_income <= rule.income_limit {
            return slab_tax.min(rule.max_rebate);
        }

        // Tax may not exceed the income earned above the rebate limit.
        let excess = taxable_income - rule.income_limit;
        if rule.marginal_relief && slab_tax > excess {
            round_half_up(slab_tax - excess)
        } else {
            Decimal::ZERO
        }
    }
}
