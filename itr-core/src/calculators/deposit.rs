//! Compound interest and fixed deposits.
//!
//! Maturity is `P × (1 + r/n)^(n × t)` where `n` is the number of
//! compounding periods per year, or `P × (1 + r × t)` for simple interest.
//! Tenure may be fractional (an 18 month deposit is `1.5` years).

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{CalculatorError, fractional_growth_factor, require_range};
use crate::calculations::common::round_half_up;

const MAX_PRINCIPAL: Decimal = dec!(1000000000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CompoundingFrequency {
    Simple,
    Yearly,
    HalfYearly,
    #[default]
    Quarterly,
    Monthly,
}

impl CompoundingFrequency {
    /// Compounding periods per year; `None` for simple interest.
    pub fn periods_per_year(&self) -> Option<u32> {
        match self {
            Self::Simple => None,
            Self::Yearly => Some(1),
            Self::HalfYearly => Some(2),
            Self::Quarterly => Some(4),
            Self::Monthly => Some(12),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Yearly => "yearly",
            Self::HalfYearly => "half-yearly",
            Self::Quarterly => "quarterly",
            Self::Monthly => "monthly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Some(Self::Simple),
            "yearly" | "annually" | "annual" => Some(Self::Yearly),
            "half-yearly" | "halfyearly" | "semi-annual" => Some(Self::HalfYearly),
            "quarterly" => Some(Self::Quarterly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }
}

impl fmt::Display for CompoundingFrequency {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositInput {
    pub principal: Decimal,

    /// Annual interest rate in percent.
    pub interest_rate: Decimal,

    pub tenure_years: Decimal,

    /// Missing means quarterly, the usual bank FD convention.
    #[serde(default)]
    pub compounding_frequency: Option<CompoundingFrequency>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositResult {
    pub principal: Decimal,
    pub maturity_amount: Decimal,
    pub total_interest: Decimal,
    pub interest_rate: Decimal,
    pub tenure_years: Decimal,
    pub compounding_frequency: CompoundingFrequency,

    /// Annualised yield after compounding, in percent.
    pub effective_annual_rate: Decimal,
}

/// General compound interest with rate up to 30% and tenure up to 50 years.
pub fn calculate_compound_interest(input: &DepositInput) -> Result<DepositResult, CalculatorError> {
    calculate(input, dec!(30), dec!(50))
}

/// Fixed deposit: rate up to 20%, tenure up to 10 years, quarterly by
/// default.
pub fn calculate_fd(input: &DepositInput) -> Result<DepositResult, CalculatorError> {
    calculate(input, dec!(20), dec!(10))
}

fn calculate(
    input: &DepositInput,
    max_rate: Decimal,
    max_years: Decimal,
) -> Result<DepositResult, CalculatorError> {
    require_range("principal", input.principal, dec!(100), MAX_PRINCIPAL)?;
    require_range("interestRate", input.interest_rate, Decimal::ZERO, max_rate)?;
    if input.tenure_years <= Decimal::ZERO || input.tenure_years > max_years {
        return Err(CalculatorError::invalid(
            "tenureYears",
            format!(
                "tenureYears must be greater than 0 and at most {max_years}, got {}",
                input.tenure_years
            ),
        ));
    }

    let frequency = input.compounding_frequency.unwrap_or_default();
    let rate = input.interest_rate / Decimal::ONE_HUNDRED;

    let (maturity, effective) = match frequency.periods_per_year() {
        None => (
            input.principal * (Decimal::ONE + rate * input.tenure_years),
            input.interest_rate,
        ),
        Some(periods) => {
            let n = Decimal::from(periods);
            let periodic = rate / n;
            let factor = fractional_growth_factor(
                periodic,
                n * input.tenure_years,
                "deposit growth factor",
            )?;
            let yearly = fractional_growth_factor(periodic, n, "effective rate")?;
            (
                input
                    .principal
                    .checked_mul(factor)
                    .ok_or(CalculatorError::Overflow("maturity amount"))?,
                (yearly - Decimal::ONE) * Decimal::ONE_HUNDRED,
            )
        }
    };

    let maturity_amount = round_half_up(maturity);

    debug!(
        principal = %input.principal,
        rate = %input.interest_rate,
        years = %input.tenure_years,
        %frequency,
        %maturity_amount,
        "deposit maturity calculated"
    );

    Ok(DepositResult {
        principal: input.principal,
        maturity_amount,
        total_interest: maturity_amount - input.principal,
        interest_rate: input.interest_rate,
        tenure_years: input.tenure_years,
        compounding_frequency: frequency,
        effective_annual_rate: round_half_up(effective),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn deposit(
        principal: Decimal,
        rate: Decimal,
        years: Decimal,
        frequency: Option<CompoundingFrequency>,
    ) -> DepositInput {
        DepositInput {
            principal,
            interest_rate: rate,
            tenure_years: years,
            compounding_frequency: frequency,
        }
    }

    #[test]
    fn yearly_compounding_for_one_year_equals_simple_interest() {
        let compound = calculate_fd(&deposit(
            dec!(100000),
            dec!(7),
            dec!(1),
            Some(CompoundingFrequency::Yearly),
        ))
        .unwrap();
        let simple = calculate_fd(&deposit(
            dec!(100000),
            dec!(7),
            dec!(1),
            Some(CompoundingFrequency::Simple),
        ))
        .unwrap();

        assert_eq!(compound.maturity_amount, simple.maturity_amount);
        assert_eq!(compound.maturity_amount, dec!(107000.00));
    }

    #[test]
    fn fd_defaults_to_quarterly() {
        let result = calculate_fd(&deposit(dec!(100000), dec!(8), dec!(1), None)).unwrap();

        // 1.02^4 = 1.08243216
        assert_eq!(result.compounding_frequency, CompoundingFrequency::Quarterly);
        assert_eq!(result.maturity_amount, dec!(108243.22));
        assert_eq!(result.total_interest, dec!(8243.22));
        assert_eq!(result.effective_annual_rate, dec!(8.24));
    }

    #[test]
    fn fractional_tenure_with_whole_period_count() {
        let result = calculate_compound_interest(&deposit(
            dec!(100000),
            dec!(8),
            dec!(0.5),
            Some(CompoundingFrequency::HalfYearly),
        ))
        .unwrap();

        assert_eq!(result.maturity_amount, dec!(104000.00));
    }

    #[test]
    fn simple_interest_is_linear_in_time() {
        let result = calculate_compound_interest(&deposit(
            dec!(50000),
            dec!(6),
            dec!(3),
            Some(CompoundingFrequency::Simple),
        ))
        .unwrap();

        assert_eq!(result.maturity_amount, dec!(59000.00));
        assert_eq!(result.effective_annual_rate, dec!(6));
    }

    #[test]
    fn more_frequent_compounding_earns_more() {
        let amount = |frequency| {
            calculate_compound_interest(&deposit(dec!(100000), dec!(9), dec!(5), Some(frequency)))
                .unwrap()
                .maturity_amount
        };

        assert!(amount(CompoundingFrequency::Monthly) > amount(CompoundingFrequency::Quarterly));
        assert!(amount(CompoundingFrequency::Quarterly) > amount(CompoundingFrequency::HalfYearly));
        assert!(amount(CompoundingFrequency::HalfYearly) > amount(CompoundingFrequency::Yearly));
    }

    #[test]
    fn fd_tenure_limited_to_ten_years() {
        let result = calculate_fd(&deposit(dec!(100000), dec!(7), dec!(11), None));

        assert!(matches!(
            result,
            Err(CalculatorError::InvalidInput {
                field: "tenureYears",
                ..
            })
        ));
    }

    #[test]
    fn zero_tenure_is_rejected() {
        assert!(calculate_compound_interest(&deposit(dec!(100000), dec!(7), dec!(0), None)).is_err());
    }

    #[test]
    fn frequency_parses_aliases() {
        assert_eq!(CompoundingFrequency::parse("Half-Yearly"), Some(CompoundingFrequency::HalfYearly));
        assert_eq!(CompoundingFrequency::parse("annually"), Some(CompoundingFrequency::Yearly));
        assert_eq!(CompoundingFrequency::parse("daily"), None);
    }
}
