//! Loan EMI calculators.
//!
//! The equated monthly instalment for principal `P`, monthly rate `r` and
//! `n` months is
//!
//! ```text
//! EMI = P × r × (1 + r)^n / ((1 + r)^n − 1)
//! ```
//!
//! At 0% interest the formula divides by zero; the loan is then amortized
//! linearly and the EMI is `P / n`.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use itr_core::calculators::{LoanInput, LoanKind, calculate_loan};
//!
//! let input = LoanInput {
//!     principal: dec!(1000000),
//!     interest_rate: dec!(12),
//!     tenure_years: 1,
//! };
//!
//! let result = calculate_loan(LoanKind::General, &input).unwrap();
//!
//! assert_eq!(result.monthly_emi, dec!(88848.79));
//! assert_eq!(result.total_amount, dec!(1066185.48));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{
    CalculatorError, growth_factor, monthly_rate, require_count, require_positive, require_range,
};
use crate::calculations::common::{percent_of, round_half_up};

const MIN_PRINCIPAL: Decimal = dec!(1000);
const MAX_PRINCIPAL: Decimal = dec!(1000000000);
const MAX_INTEREST_RATE: Decimal = dec!(30);
const DEFAULT_LAP_LTV: Decimal = dec!(60);
const MAX_LAP_LTV: Decimal = dec!(70);

/// Loan products with their own tenure limits and fee estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoanKind {
    General,
    Home,
    Car,
    Personal,
    AgainstProperty,
}

impl LoanKind {
    pub fn max_tenure_years(&self) -> u32 {
        match self {
            Self::General | Self::Home => 30,
            Self::AgainstProperty => 15,
            Self::Car => 7,
            Self::Personal => 5,
        }
    }

    /// Flat-percentage estimates of the one-off costs around a loan.
    ///
    /// These are indicative figures, not computed by any engine.
    pub fn additional_info(
        &self,
        principal: Decimal,
    ) -> Option<AdditionalLoanInfo> {
        let fee = |rate: Decimal| round_half_up(percent_of(principal, rate));
        match self {
            Self::General => None,
            Self::Home => Some(AdditionalLoanInfo {
                processing_fee: fee(dec!(0.5)),
                stamp_duty: Some(fee(dec!(5))),
                insurance_estimate: None,
            }),
            Self::Car => Some(AdditionalLoanInfo {
                processing_fee: fee(dec!(1)),
                stamp_duty: None,
                insurance_estimate: Some(fee(dec!(3))),
            }),
            Self::Personal => Some(AdditionalLoanInfo {
                processing_fee: fee(dec!(2)),
                stamp_duty: None,
                insurance_estimate: None,
            }),
            Self::AgainstProperty => Some(AdditionalLoanInfo {
                processing_fee: fee(dec!(1)),
                stamp_duty: None,
                insurance_estimate: None,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanInput {
    pub principal: Decimal,

    /// Annual interest rate in percent.
    pub interest_rate: Decimal,

    pub tenure_years: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalLoanInfo {
    pub processing_fee: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stamp_duty: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_estimate: Option<Decimal>,
}

/// Principal and interest repaid during one year of the loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationYear {
    pub year: u32,
    pub principal_paid: Decimal,
    pub interest_paid: Decimal,
    pub closing_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanResult {
    pub monthly_emi: Decimal,

    /// `monthly_emi × tenure_months`. The schedule settles the paise left
    /// over by rounding in its final instalment, so its interest column can
    /// differ from `total_interest` by at most a paisa per month.
    pub total_amount: Decimal,
    pub total_interest: Decimal,
    pub principal: Decimal,
    pub interest_rate: Decimal,
    pub tenure_years: u32,
    pub tenure_months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<AdditionalLoanInfo>,
    pub schedule: Vec<AmortizationYear>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LapInput {
    pub property_value: Decimal,

    /// Loan-to-value ratio in percent; defaults to 60.
    #[serde(default)]
    pub ltv_percent: Option<Decimal>,

    pub interest_rate: Decimal,
    pub tenure_years: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LapResult {
    pub property_value: Decimal,
    pub ltv_percent: Decimal,
    pub eligible_loan_amount: Decimal,
    pub loan: LoanResult,
}

/// Monthly instalment for a loan, rounded to paise.
///
/// A zero interest rate amortizes the principal linearly.
pub fn monthly_emi(
    principal: Decimal,
    annual_rate_percent: Decimal,
    months: u32,
) -> Result<Decimal, CalculatorError> {
    if months == 0 {
        return Err(CalculatorError::invalid(
            "tenureMonths",
            "tenureMonths must be at least 1",
        ));
    }

    let r = monthly_rate(annual_rate_percent);
    if r.is_zero() {
        return Ok(round_half_up(principal / Decimal::from(months)));
    }

    let factor = growth_factor(r, months, "EMI growth factor")?;
    let emi = principal
        .checked_mul(r)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(factor - Decimal::ONE))
        .ok_or(CalculatorError::Overflow("EMI"))?;

    Ok(round_half_up(emi))
}

/// Validates a loan request and computes EMI, totals, fee estimates and a
/// yearly amortization schedule.
pub fn calculate_loan(
    kind: LoanKind,
    input: &LoanInput,
) -> Result<LoanResult, CalculatorError> {
    require_range("principal", input.principal, MIN_PRINCIPAL, MAX_PRINCIPAL)?;
    require_range(
        "interestRate",
        input.interest_rate,
        Decimal::ZERO,
        MAX_INTEREST_RATE,
    )?;
    require_count("tenureYears", input.tenure_years, 1, kind.max_tenure_years())?;

    let tenure_months = input.tenure_years * 12;
    let monthly_emi = monthly_emi(input.principal, input.interest_rate, tenure_months)?;
    let total_amount = monthly_emi * Decimal::from(tenure_months);
    let total_interest = total_amount - input.principal;
    let schedule = amortization_schedule(
        input.principal,
        input.interest_rate,
        monthly_emi,
        tenure_months,
    );

    debug!(
        ?kind,
        principal = %input.principal,
        rate = %input.interest_rate,
        tenure_months,
        %monthly_emi,
        "loan EMI calculated"
    );

    Ok(LoanResult {
        monthly_emi,
        total_amount,
        total_interest,
        principal: input.principal,
        interest_rate: input.interest_rate,
        tenure_years: input.tenure_years,
        tenure_months,
        additional_info: kind.additional_info(input.principal),
        schedule,
    })
}

/// Loan against property: the loan amount is the property value times the
/// loan-to-value ratio.
pub fn calculate_lap(input: &LapInput) -> Result<LapResult, CalculatorError> {
    require_positive("propertyValue", input.property_value)?;
    let ltv_percent = input.ltv_percent.unwrap_or(DEFAULT_LAP_LTV);
    require_range("ltvPercent", ltv_percent, dec!(1), MAX_LAP_LTV)?;

    let eligible_loan_amount = round_half_up(percent_of(input.property_value, ltv_percent));
    let loan = calculate_loan(
        LoanKind::AgainstProperty,
        &LoanInput {
            principal: eligible_loan_amount,
            interest_rate: input.interest_rate,
            tenure_years: input.tenure_years,
        },
    )?;

    Ok(LapResult {
        property_value: input.property_value,
        ltv_percent,
        eligible_loan_amount,
        loan,
    })
}

/// Month-by-month amortization folded into yearly totals.
///
/// The final instalment absorbs rounding so the balance closes at zero.
fn amortization_schedule(
    principal: Decimal,
    annual_rate_percent: Decimal,
    emi: Decimal,
    months: u32,
) -> Vec<AmortizationYear> {
    let r = monthly_rate(annual_rate_percent);
    let mut balance = principal;
    let mut schedule = Vec::with_capacity((months / 12) as usize);
    let mut principal_paid = Decimal::ZERO;
    let mut interest_paid = Decimal::ZERO;

    for month in 1..=months {
        let interest = round_half_up(balance * r);
        let principal_part = if month == months {
            balance
        } else {
            (emi - interest).min(balance)
        };
        balance -= principal_part;
        principal_paid += principal_part;
        interest_paid += interest;

        if month % 12 == 0 || month == months {
            schedule.push(AmortizationYear {
                year: month.div_ceil(12),
                principal_paid,
                interest_paid,
                closing_balance: balance,
            });
            principal_paid = Decimal::ZERO;
            interest_paid = Decimal::ZERO;
        }
    }

    schedule
}
