use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use thiserror::Error;

/// Errors returned by the financial calculators.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalculatorError {
    /// An input was missing, out of range or inconsistent.
    /// `field` is the camelCase name of the offending input.
    #[error("Invalid input: {message}")]
    InvalidInput { field: &'static str, message: String },

    /// An intermediate value exceeded the range of [`Decimal`].
    #[error("calculation overflowed while computing {0}")]
    Overflow(&'static str),
}

impl CalculatorError {
    pub(crate) fn invalid(
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }
}

/// Checks `min <= value <= max`.
pub(crate) fn require_range(
    field: &'static str,
    value: Decimal,
    min: Decimal,
    max: Decimal,
) -> Result<(), CalculatorError> {
    if value < min || value > max {
        return Err(CalculatorError::invalid(
            field,
            format!("{field} must be between {min} and {max}, got {value}"),
        ));
    }
    Ok(())
}

/// Checks `value > 0`.
pub(crate) fn require_positive(
    field: &'static str,
    value: Decimal,
) -> Result<(), CalculatorError> {
    if value <= Decimal::ZERO {
        return Err(CalculatorError::invalid(
            field,
            format!("{field} must be positive, got {value}"),
        ));
    }
    Ok(())
}

/// Checks an integral count such as years or months.
pub(crate) fn require_count(
    field: &'static str,
    value: u32,
    min: u32,
    max: u32,
) -> Result<(), CalculatorError> {
    if value < min || value > max {
        return Err(CalculatorError::invalid(
            field,
            format!("{field} must be between {min} and {max}, got {value}"),
        ));
    }
    Ok(())
}

/// Converts an annual percentage into a monthly fraction (`12` → `0.01`).
pub(crate) fn monthly_rate(annual_percent: Decimal) -> Decimal {
    annual_percent / Decimal::from(12) / Decimal::ONE_HUNDRED
}

/// `(1 + rate)^periods` for a whole number of periods.
pub(crate) fn growth_factor(
    rate: Decimal,
    periods: u32,
    what: &'static str,
) -> Result<Decimal, CalculatorError> {
    (Decimal::ONE + rate)
        .checked_powi(i64::from(periods))
        .ok_or(CalculatorError::Overflow(what))
}

/// `(1 + rate)^periods` where `periods` may be fractional.
pub(crate) fn fractional_growth_factor(
    rate: Decimal,
    periods: Decimal,
    what: &'static str,
) -> Result<Decimal, CalculatorError> {
    let base = Decimal::ONE + rate;
    let factor = if periods.fract().is_zero() {
        let whole = periods.to_i64().ok_or(CalculatorError::Overflow(what))?;
        base.checked_powi(whole)
    } else {
        base.checked_powd(periods)
    };
    factor.ok_or(CalculatorError::Overflow(what))
}
