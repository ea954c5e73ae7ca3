//! Public Provident Fund accrual.
//!
//! PPF credits interest once a year on the running balance. Deposits made
//! at the start of the year earn interest for that year, so each year is:
//! deposit first, then interest on the new balance.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{CalculatorError, require_count, require_range};
use crate::calculations::common::{percent_of, round_half_up};

pub const PPF_MIN_DEPOSIT: Decimal = dec!(500);
pub const PPF_MAX_DEPOSIT: Decimal = dec!(150000);
pub const PPF_DEFAULT_RATE: Decimal = dec!(7.1);

const MIN_TENURE: u32 = 15;
const MAX_TENURE: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PpfInput {
    pub yearly_deposit: Decimal,

    /// Annual rate in percent; defaults to the current notified rate.
    #[serde(default)]
    pub interest_rate: Option<Decimal>,

    pub tenure_years: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PpfYear {
    pub year: u32,
    pub opening_balance: Decimal,
    pub deposit: Decimal,
    pub interest: Decimal,
    pub closing_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PpfResult {
    pub yearly_deposit: Decimal,
    pub interest_rate: Decimal,
    pub tenure_years: u32,
    pub total_deposits: Decimal,
    pub total_interest: Decimal,
    pub maturity_amount: Decimal,
    pub schedule: Vec<PpfYear>,
}

pub fn calculate_ppf(input: &PpfInput) -> Result<PpfResult, CalculatorError> {
    let interest_rate = input.interest_rate.unwrap_or(PPF_DEFAULT_RATE);
    require_range("yearlyDeposit", input.yearly_deposit, PPF_MIN_DEPOSIT, PPF_MAX_DEPOSIT)?;
    require_range("interestRate", interest_rate, Decimal::ZERO, dec!(15))?;
    require_count("tenureYears", input.tenure_years, MIN_TENURE, MAX_TENURE)?;

    let mut balance = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut schedule = Vec::with_capacity(input.tenure_years as usize);

    for year in 1..=input.tenure_years {
        let opening_balance = balance;
        balance += input.yearly_deposit;
        let interest = round_half_up(percent_of(balance, interest_rate));
        balance += interest;
        total_interest += interest;

        schedule.push(PpfYear {
            year,
            opening_balance,
            deposit: input.yearly_deposit,
            interest,
            closing_balance: balance,
        });
    }

    debug!(
        deposit = %input.yearly_deposit,
        rate = %interest_rate,
        years = input.tenure_years,
        maturity = %balance,
        "PPF maturity calculated"
    );

    Ok(PpfResult {
        yearly_deposit: input.yearly_deposit,
        interest_rate,
        tenure_years: input.tenure_years,
        total_deposits: input.yearly_deposit * Decimal::from(input.tenure_years),
        total_interest,
        maturity_amount: balance,
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn deposit_earns_interest_in_the_year_it_is_made() {
        let result = calculate_ppf(&PpfInput {
            yearly_deposit: dec!(150000),
            interest_rate: None,
            tenure_years: 15,
        })
        .unwrap();

        assert_eq!(result.interest_rate, dec!(7.1));
        assert_eq!(
            result.schedule[0],
            PpfYear {
                year: 1,
                opening_balance: dec!(0),
                deposit: dec!(150000),
                interest: dec!(10650.00),
                closing_balance: dec!(160650.00),
            }
        );
        assert_eq!(result.schedule[1].closing_balance, dec!(332706.15));
    }

    #[test]
    fn totals_match_schedule() {
        let result = calculate_ppf(&PpfInput {
            yearly_deposit: dec!(100000),
            interest_rate: Some(dec!(7.1)),
            tenure_years: 20,
        })
        .unwrap();

        assert_eq!(result.schedule.len(), 20);
        assert_eq!(result.total_deposits, dec!(2000000));
        assert_eq!(
            result.maturity_amount,
            result.schedule.last().unwrap().closing_balance
        );
        assert_eq!(
            result.maturity_amount,
            result.total_deposits + result.total_interest
        );
    }

    #[test]
    fn zero_rate_returns_deposits() {
        let result = calculate_ppf(&PpfInput {
            yearly_deposit: dec!(1000),
            interest_rate: Some(dec!(0)),
            tenure_years: 15,
        })
        .unwrap();

        assert_eq!(result.maturity_amount, dec!(15000));
    }

    #[test]
    fn tenure_below_lock_in_is_rejected() {
        let result = calculate_ppf(&PpfInput {
            yearly_deposit: dec!(150000),
            interest_rate: None,
            tenure_years: 10,
        });

        assert!(matches!(
            result,
            Err(CalculatorError::InvalidInput {
                field: "tenureYears",
                ..
            })
        ));
    }

    #[test]
    fn deposit_above_annual_limit_is_rejected() {
        let result = calculate_ppf(&PpfInput {
            yearly_deposit: dec!(150001),
            interest_rate: None,
            tenure_years: 15,
        });

        assert!(matches!(
            result,
            Err(CalculatorError::InvalidInput {
                field: "yearlyDeposit",
                ..
            })
        ));
    }
}
