//! Gratuity under the Payment of Gratuity Act.
//!
//! `gratuity = 15 × basic × min(years, 30) / 26`, where basic is taken as
//! half of the last drawn salary. Up to ₹20,00,000 is exempt from tax.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{CalculatorError, require_count, require_positive};
use crate::calculations::common::{percent_of, round_half_up};

pub const GRATUITY_EXEMPTION_LIMIT: Decimal = dec!(2000000);
const BASIC_SHARE_PERCENT: Decimal = dec!(50);
const MAX_COUNTED_YEARS: u32 = 30;
const MIN_ELIGIBLE_YEARS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GratuityInput {
    pub last_drawn_salary: Decimal,
    pub years_of_service: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GratuityResult {
    pub basic_salary: Decimal,
    pub years_of_service: u32,
    pub counted_years: u32,

    /// Five years of continuous service are needed to claim gratuity.
    pub eligible: bool,

    pub gratuity_amount: Decimal,
    pub exempt_amount: Decimal,
    pub taxable_amount: Decimal,
}

pub fn calculate_gratuity(input: &GratuityInput) -> Result<GratuityResult, CalculatorError> {
    require_positive("lastDrawnSalary", input.last_drawn_salary)?;
    require_count("yearsOfService", input.years_of_service, 1, 50)?;

    let basic_salary = percent_of(input.last_drawn_salary, BASIC_SHARE_PERCENT);
    let counted_years = input.years_of_service.min(MAX_COUNTED_YEARS);
    let gratuity_amount = round_half_up(
        dec!(15) * basic_salary * Decimal::from(counted_years) / dec!(26),
    );
    let exempt_amount = gratuity_amount.min(GRATUITY_EXEMPTION_LIMIT);

    debug!(
        basic = %basic_salary,
        counted_years,
        gratuity = %gratuity_amount,
        "gratuity calculated"
    );

    Ok(GratuityResult {
        basic_salary,
        years_of_service: input.years_of_service,
        counted_years,
        eligible: input.years_of_service >= MIN_ELIGIBLE_YEARS,
        gratuity_amount,
        exempt_amount,
        taxable_amount: gratuity_amount - exempt_amount,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn ten_years_on_six_lakh_salary() {
        let result = calculate_gratuity(&GratuityInput {
            last_drawn_salary: dec!(600000),
            years_of_service: 10,
        })
        .unwrap();

        assert_eq!(result.basic_salary, dec!(300000));
        assert_eq!(result.gratuity_amount, dec!(1730769.23));
        assert_eq!(result.exempt_amount, dec!(1730769.23));
        assert_eq!(result.taxable_amount, dec!(0));
        assert!(result.eligible);
    }

    #[test]
    fn service_beyond_thirty_years_is_not_counted() {
        let at_thirty = calculate_gratuity(&GratuityInput {
            last_drawn_salary: dec!(100000),
            years_of_service: 30,
        })
        .unwrap();
        let at_forty = calculate_gratuity(&GratuityInput {
            last_drawn_salary: dec!(100000),
            years_of_service: 40,
        })
        .unwrap();

        assert_eq!(at_forty.counted_years, 30);
        assert_eq!(at_forty.gratuity_amount, at_thirty.gratuity_amount);
    }

    #[test]
    fn amount_above_cap_is_taxable() {
        // 15 × 5,00,000 × 25 / 26 = 72,11,538.46
        let result = calculate_gratuity(&GratuityInput {
            last_drawn_salary: dec!(1000000),
            years_of_service: 25,
        })
        .unwrap();

        assert_eq!(result.gratuity_amount, dec!(7211538.46));
        assert_eq!(result.exempt_amount, dec!(2000000));
        assert_eq!(result.taxable_amount, dec!(5211538.46));
    }

    #[test]
    fn short_service_is_flagged_ineligible() {
        let result = calculate_gratuity(&GratuityInput {
            last_drawn_salary: dec!(600000),
            years_of_service: 4,
        })
        .unwrap();

        assert!(!result.eligible);
    }

    #[test]
    fn zero_salary_is_rejected() {
        let result = calculate_gratuity(&GratuityInput {
            last_drawn_salary: dec!(0),
            years_of_service: 10,
        });

        assert!(result.is_err());
    }
}
