//! Retirement corpus planning.
//!
//! Today's monthly expenses are inflated to the retirement date. The corpus
//! must fund those expenses, paid at the start of each year and growing with
//! inflation, for every year of retirement. Discounting at the real
//! (inflation-adjusted) post-retirement return turns that into a present
//! value at retirement:
//!
//! ```text
//! real  = (1 + post) / (1 + inflation) − 1
//! corpus = A × (1 − (1 + real)^−N) / real × (1 + real)     (A × N when real = 0)
//! ```
//!
//! Whatever current savings will not cover is closed with a monthly SIP at
//! the pre-retirement return.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{
    CalculatorError, growth_factor, monthly_rate, require_count, require_positive, require_range,
};
use super::sip::annuity_due_value;
use crate::calculations::common::round_half_up;

const MAX_RATE: Decimal = dec!(20);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy: u32,
    pub monthly_expenses: Decimal,

    /// All rates are annual percentages.
    pub inflation_rate: Decimal,
    pub pre_retirement_return: Decimal,
    pub post_retirement_return: Decimal,

    #[serde(default)]
    pub current_savings: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementResult {
    pub years_to_retirement: u32,
    pub years_in_retirement: u32,
    pub monthly_expenses_at_retirement: Decimal,
    pub corpus_required: Decimal,
    pub future_value_of_savings: Decimal,
    pub shortfall: Decimal,
    pub monthly_sip_required: Decimal,
}

pub fn calculate_retirement(input: &RetirementInput) -> Result<RetirementResult, CalculatorError> {
    require_count("currentAge", input.current_age, 18, 70)?;
    require_count("retirementAge", input.retirement_age, input.current_age + 1, 80)?;
    require_count(
        "lifeExpectancy",
        input.life_expectancy,
        input.retirement_age + 1,
        100,
    )?;
    require_positive("monthlyExpenses", input.monthly_expenses)?;
    require_range("inflationRate", input.inflation_rate, Decimal::ZERO, MAX_RATE)?;
    require_range("preRetirementReturn", input.pre_retirement_return, Decimal::ZERO, MAX_RATE)?;
    require_range("postRetirementReturn", input.post_retirement_return, Decimal::ZERO, MAX_RATE)?;
    require_range("currentSavings", input.current_savings, Decimal::ZERO, dec!(10000000000))?;

    let years_to_retirement = input.retirement_age - input.current_age;
    let years_in_retirement = input.life_expectancy - input.retirement_age;

    let inflation = input.inflation_rate / Decimal::ONE_HUNDRED;
    let pre = input.pre_retirement_return / Decimal::ONE_HUNDRED;
    let post = input.post_retirement_return / Decimal::ONE_HUNDRED;

    let monthly_expenses_at_retirement = input.monthly_expenses
        * growth_factor(inflation, years_to_retirement, "inflated expenses")?;
    let annual_expenses = monthly_expenses_at_retirement * Decimal::from(12);

    let real_return = (Decimal::ONE + post) / (Decimal::ONE + inflation) - Decimal::ONE;
    let corpus_required = round_half_up(present_value_due(
        annual_expenses,
        real_return,
        years_in_retirement,
    )?);

    let future_value_of_savings = round_half_up(
        input.current_savings * growth_factor(pre, years_to_retirement, "savings growth")?,
    );
    let shortfall = (corpus_required - future_value_of_savings).max(Decimal::ZERO);

    let months = years_to_retirement * 12;
    let per_rupee = annuity_due_value(
        Decimal::ONE,
        monthly_rate(input.pre_retirement_return),
        months,
    )?;
    let monthly_sip_required = round_half_up(shortfall / per_rupee);

    debug!(
        years_to_retirement,
        years_in_retirement,
        corpus = %corpus_required,
        %shortfall,
        sip = %monthly_sip_required,
        "retirement plan calculated"
    );

    Ok(RetirementResult {
        years_to_retirement,
        years_in_retirement,
        monthly_expenses_at_retirement: round_half_up(monthly_expenses_at_retirement),
        corpus_required,
        future_value_of_savings,
        shortfall,
        monthly_sip_required,
    })
}

/// Present value of `periods` payments made at the start of each period.
fn present_value_due(
    payment: Decimal,
    rate: Decimal,
    periods: u32,
) -> Result<Decimal, CalculatorError> {
    if rate.is_zero() {
        return Ok(payment * Decimal::from(periods));
    }

    let factor = growth_factor(rate, periods, "retirement discount factor")?;
    let discount = Decimal::ONE - Decimal::ONE / factor;
    Ok(payment * discount / rate * (Decimal::ONE + rate))
}
