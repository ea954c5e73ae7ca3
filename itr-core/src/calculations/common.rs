//! Common utility functions for tax and calculator arithmetic.
//!
//! This module provides shared functionality used across the slab engine,
//! the regime worksheets and the financial calculators, including rounding
//! and percentage helpers.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places (paise) using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use itr_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds an amount of tax to the nearest multiple of ten rupees.
///
/// Section 288B requires tax payable to be rounded off to the nearest ten;
/// a remainder of exactly five rupees rounds up.
///
/// ```
/// use rust_decimal_macros::dec;
/// use itr_core::calculations::common::round_to_nearest_ten;
///
/// assert_eq!(round_to_nearest_ten(dec!(54604.99)), dec!(54600));
/// assert_eq!(round_to_nearest_ten(dec!(54605.00)), dec!(54610));
/// ```
pub fn round_to_nearest_ten(value: Decimal) -> Decimal {
    let ten = Decimal::TEN;
    (value / ten).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) * ten
}

/// Returns `rate` percent of `amount`, unrounded.
///
/// Rates throughout this crate are expressed as percentages (`5` for 5%).
pub fn percent_of(
    amount: Decimal,
    rate: Decimal,
) -> Decimal {
    amount * rate / Decimal::ONE_HUNDRED
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use itr_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}
