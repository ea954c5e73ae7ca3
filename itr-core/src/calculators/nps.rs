//! National Pension System projection.
//!
//! Monthly contributions grow as an annuity-due until retirement. At exit at
//! least 40% of the corpus must buy an annuity; the rest may be withdrawn as
//! a lump sum.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{CalculatorError, monthly_rate, require_count, require_range};
use super::sip::annuity_due_value;
use crate::calculations::common::{percent_of, round_half_up};

pub const NPS_MIN_ANNUITY_PERCENT: Decimal = dec!(40);
const DEFAULT_RETIREMENT_AGE: u32 = 60;
const DEFAULT_ANNUITY_RATE: Decimal = dec!(6);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpsInput {
    pub monthly_contribution: Decimal,
    pub current_age: u32,

    #[serde(default)]
    pub retirement_age: Option<u32>,

    /// Expected annual return in percent.
    pub expected_return: Decimal,

    /// Share of the corpus used to buy an annuity; 40 when absent.
    #[serde(default)]
    pub annuity_percent: Option<Decimal>,

    /// Annual annuity rate in percent; 6 when absent.
    #[serde(default)]
    pub annuity_rate: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpsResult {
    pub total_contribution: Decimal,
    pub total_returns: Decimal,
    pub total_corpus: Decimal,
    pub lump_sum: Decimal,
    pub annuity_amount: Decimal,
    pub monthly_pension: Decimal,
    pub years_to_retirement: u32,
    pub annuity_percent: Decimal,
    pub annuity_rate: Decimal,
}

pub fn calculate_nps(input: &NpsInput) -> Result<NpsResult, CalculatorError> {
    let retirement_age = input.retirement_age.unwrap_or(DEFAULT_RETIREMENT_AGE);
    let annuity_percent = input.annuity_percent.unwrap_or(NPS_MIN_ANNUITY_PERCENT);
    let annuity_rate = input.annuity_rate.unwrap_or(DEFAULT_ANNUITY_RATE);

    require_range("monthlyContribution", input.monthly_contribution, dec!(500), dec!(10000000))?;
    require_count("currentAge", input.current_age, 18, 70)?;
    require_count("retirementAge", retirement_age, input.current_age + 1, 75)?;
    require_range("expectedReturn", input.expected_return, Decimal::ZERO, dec!(20))?;
    require_range("annuityPercent", annuity_percent, NPS_MIN_ANNUITY_PERCENT, dec!(100))?;
    require_range("annuityRate", annuity_rate, Decimal::ZERO, dec!(15))?;

    let years_to_retirement = retirement_age - input.current_age;
    let months = years_to_retirement * 12;

    let total_corpus = round_half_up(annuity_due_value(
        input.monthly_contribution,
        monthly_rate(input.expected_return),
        months,
    )?);
    let total_contribution = input.monthly_contribution * Decimal::from(months);
    let annuity_amount = round_half_up(percent_of(total_corpus, annuity_percent));
    let lump_sum = total_corpus - annuity_amount;
    let monthly_pension = round_half_up(percent_of(annuity_amount, annuity_rate) / Decimal::from(12));

    debug!(
        contribution = %input.monthly_contribution,
        years_to_retirement,
        corpus = %total_corpus,
        pension = %monthly_pension,
        "NPS projection calculated"
    );

    Ok(NpsResult {
        total_contribution,
        total_returns: total_corpus - total_contribution,
        total_corpus,
        lump_sum,
        annuity_amount,
        monthly_pension,
        years_to_retirement,
        annuity_percent,
        annuity_rate,
    })
}
