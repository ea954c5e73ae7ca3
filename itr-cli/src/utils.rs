use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

static AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?P<sign>-)?\s*(?:₹|rs\.?|inr)?\s*(?P<number>[0-9][0-9,]*(?:\.[0-9]+)?)\s*(?P<unit>k|thousand|l|lakhs?|lacs?|cr|crores?)?$",
    )
    .expect("amount pattern compiles")
});

/// Error returned when a string cannot be parsed as an amount or rate.
#[derive(Debug, Error)]
pub enum ParseAmountError {
    #[error("invalid amount '{0}' (expected e.g. 1200000, 12,00,000, 12L or 1.5Cr)")]
    Amount(String),

    #[error("invalid rate '{input}': {source}")]
    Rate {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },
}

/// Parses a rupee amount written the way people write it in India.
///
/// Accepts plain numbers, lakh-style (`12,00,000`) or western (`1,200,000`)
/// grouping, an optional `₹`/`Rs` prefix and `k`, `L`/`lakh` or
/// `Cr`/`crore` suffixes. Case-insensitive.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let invalid = || ParseAmountError::Amount(s.to_string());
    let captures = AMOUNT_PATTERN.captures(s.trim()).ok_or_else(|| {
        tracing::error!(input = %s, "invalid amount");
        invalid()
    })?;

    let number: Decimal = captures["number"]
        .replace(',', "")
        .parse()
        .map_err(|_| invalid())?;

    let multiplier = match captures
        .name("unit")
        .map(|u| u.as_str().to_ascii_lowercase())
        .as_deref()
    {
        None => Decimal::ONE,
        Some("k" | "thousand") => Decimal::from(1_000),
        Some("cr" | "crore" | "crores") => Decimal::from(10_000_000),
        Some(_) => Decimal::from(100_000),
    };

    let amount = number * multiplier;
    Ok(if captures.name("sign").is_some() {
        -amount
    } else {
        amount
    })
}

/// Parses a percentage, with or without a trailing `%`.
pub fn parse_rate(s: &str) -> Result<Decimal, ParseAmountError> {
    let trimmed = s.trim().trim_end_matches('%').trim();
    trimmed.parse().map_err(|e| ParseAmountError::Rate {
        input: s.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_amount_accepts_plain_and_grouped_numbers() {
        assert_eq!(parse_amount("1200000").unwrap(), dec!(1200000));
        assert_eq!(parse_amount("12,00,000").unwrap(), dec!(1200000));
        assert_eq!(parse_amount("1,200,000.50").unwrap(), dec!(1200000.50));
        assert_eq!(parse_amount("  75000  ").unwrap(), dec!(75000));
    }

    #[test]
    fn parse_amount_accepts_indian_units() {
        assert_eq!(parse_amount("12L").unwrap(), dec!(1200000));
        assert_eq!(parse_amount("12 lakh").unwrap(), dec!(1200000));
        assert_eq!(parse_amount("7.5 lakhs").unwrap(), dec!(750000));
        assert_eq!(parse_amount("1.5Cr").unwrap(), dec!(15000000));
        assert_eq!(parse_amount("2 crore").unwrap(), dec!(20000000));
        assert_eq!(parse_amount("50k").unwrap(), dec!(50000));
    }

    #[test]
    fn parse_amount_accepts_currency_prefix() {
        assert_eq!(parse_amount("₹12,00,000").unwrap(), dec!(1200000));
        assert_eq!(parse_amount("Rs. 5L").unwrap(), dec!(500000));
    }

    #[test]
    fn parse_amount_keeps_sign_for_validation() {
        assert_eq!(parse_amount("-5000").unwrap(), dec!(-5000));
    }

    #[test]
    fn parse_amount_rejects_garbage() {
        for input in ["", "abc", "12X", "L12", "1.2.3"] {
            assert!(parse_amount(input).is_err(), "{input} should be rejected");
        }
    }

    #[test]
    fn parse_rate_strips_percent_sign() {
        assert_eq!(parse_rate("8.5%").unwrap(), dec!(8.5));
        assert_eq!(parse_rate(" 12 ").unwrap(), dec!(12));
        assert!(parse_rate("twelve").is_err());
    }
}
