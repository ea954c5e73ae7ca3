//! Systematic investment plan and one-time (lumpsum) investment growth.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{CalculatorError, growth_factor, monthly_rate, require_count, require_range};
use crate::calculations::common::round_half_up;

const MAX_RETURN_RATE: Decimal = dec!(30);
const MAX_YEARS: u32 = 40;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipInput {
    pub monthly_investment: Decimal,

    /// Expected annual return in percent.
    pub expected_return: Decimal,

    pub tenure_years: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LumpsumInput {
    pub principal: Decimal,
    pub expected_return: Decimal,
    pub tenure_years: u32,
}

/// Growth of an investment: what went in, what it earned, what it is worth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentResult {
    pub invested_amount: Decimal,
    pub estimated_returns: Decimal,
    pub total_value: Decimal,
    pub expected_return: Decimal,
    pub tenure_years: u32,
}

/// Future value of `months` equal contributions paid at the start of each
/// month (annuity-due), unrounded.
///
/// ```text
/// FV = M × ((1 + r)^n − 1) / r × (1 + r)
/// ```
pub(crate) fn annuity_due_value(
    monthly_amount: Decimal,
    monthly_rate: Decimal,
    months: u32,
) -> Result<Decimal, CalculatorError> {
    if monthly_rate.is_zero() {
        return Ok(monthly_amount * Decimal::from(months));
    }

    let factor = growth_factor(monthly_rate, months, "SIP growth factor")?;
    monthly_amount
        .checked_mul(factor - Decimal::ONE)
        .and_then(|v| v.checked_div(monthly_rate))
        .and_then(|v| v.checked_mul(Decimal::ONE + monthly_rate))
        .ok_or(CalculatorError::Overflow("SIP future value"))
}

pub fn calculate_sip(input: &SipInput) -> Result<InvestmentResult, CalculatorError> {
    require_range("monthlyInvestment", input.monthly_investment, dec!(100), dec!(10000000))?;
    require_range("expectedReturn", input.expected_return, Decimal::ZERO, MAX_RETURN_RATE)?;
    require_count("tenureYears", input.tenure_years, 1, MAX_YEARS)?;

    let months = input.tenure_years * 12;
    let total_value = round_half_up(annuity_due_value(
        input.monthly_investment,
        monthly_rate(input.expected_return),
        months,
    )?);
    let invested_amount = input.monthly_investment * Decimal::from(months);

    debug!(
        monthly = %input.monthly_investment,
        rate = %input.expected_return,
        months,
        %total_value,
        "SIP calculated"
    );

    Ok(InvestmentResult {
        invested_amount,
        estimated_returns: total_value - invested_amount,
        total_value,
        expected_return: input.expected_return,
        tenure_years: input.tenure_years,
    })
}

/// One-time investment compounded yearly: `P × (1 + r)^t`.
pub fn calculate_lumpsum(input: &LumpsumInput) -> Result<InvestmentResult, CalculatorError> {
    require_range("principal", input.principal, dec!(100), dec!(1000000000))?;
    require_range("expectedReturn", input.expected_return, Decimal::ZERO, MAX_RETURN_RATE)?;
    require_count("tenureYears", input.tenure_years, 1, MAX_YEARS)?;

    let factor = growth_factor(
        input.expected_return / Decimal::ONE_HUNDRED,
        input.tenure_years,
        "lumpsum growth factor",
    )?;
    let total_value = round_half_up(
        input
            .principal
            .checked_mul(factor)
            .ok_or(CalculatorError::Overflow("lumpsum future value"))?,
    );

    debug!(principal = %input.principal, %total_value, "lumpsum calculated");

    Ok(InvestmentResult {
        invested_amount: input.principal,
        estimated_returns: total_value - input.principal,
        total_value,
        expected_return: input.expected_return,
        tenure_years: input.tenure_years,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn sip_one_year_at_twelve_percent() {
        let result = calculate_sip(&SipInput {
            monthly_investment: dec!(10000),
            expected_return: dec!(12),
            tenure_years: 1,
        })
        .unwrap();

        assert_eq!(result.invested_amount, dec!(120000));
        assert_eq!(result.total_value, dec!(128093.28));
        assert_eq!(result.estimated_returns, dec!(8093.28));
    }

    #[test]
    fn sip_at_zero_return_is_sum_of_contributions() {
        let result = calculate_sip(&SipInput {
            monthly_investment: dec!(5000),
            expected_return: dec!(0),
            tenure_years: 10,
        })
        .unwrap();

        assert_eq!(result.total_value, dec!(600000));
        assert_eq!(result.estimated_returns, dec!(0));
    }

    #[test]
    fn sip_value_grows_with_tenure() {
        let value = |years| {
            calculate_sip(&SipInput {
                monthly_investment: dec!(5000),
                expected_return: dec!(10),
                tenure_years: years,
            })
            .unwrap()
            .total_value
        };

        assert!(value(10) > value(5));
        assert!(value(20) > value(10));
    }

    #[test]
    fn sip_rejects_tiny_instalment() {
        let result = calculate_sip(&SipInput {
            monthly_investment: dec!(50),
            expected_return: dec!(12),
            tenure_years: 5,
        });

        assert!(matches!(
            result,
            Err(CalculatorError::InvalidInput {
                field: "monthlyInvestment",
                ..
            })
        ));
    }

    #[test]
    fn lumpsum_compounds_yearly() {
        let result = calculate_lumpsum(&LumpsumInput {
            principal: dec!(100000),
            expected_return: dec!(10),
            tenure_years: 2,
        })
        .unwrap();

        assert_eq!(result.total_value, dec!(121000.00));
        assert_eq!(result.estimated_returns, dec!(21000.00));
    }

    #[test]
    fn lumpsum_rejects_long_tenure() {
        let result = calculate_lumpsum(&LumpsumInput {
            principal: dec!(100000),
            expected_return: dec!(10),
            tenure_years: 41,
        });

        assert!(result.is_err());
    }
}
