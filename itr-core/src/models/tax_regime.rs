use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::TaxSlab;

/// The two coexisting Indian personal income-tax regimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RegimeKind {
    Old,
    New,
}

impl RegimeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Old => "Old",
            Self::New => "New",
        }
    }

    /// Case-insensitive parse of `Old` / `New`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "old" => Some(Self::Old),
            "new" => Some(Self::New),
            _ => None,
        }
    }

    pub fn all() -> [RegimeKind; 2] {
        [Self::Old, Self::New]
    }
}

impl fmt::Display for RegimeKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Section 87A rebate parameters for resident individuals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebateRule {
    /// Taxable income up to which the rebate is available.
    pub income_limit: Decimal,

    /// Maximum rebate; the rebate never exceeds the slab tax itself.
    pub max_rebate: Decimal,

    /// Whether income slightly above `income_limit` gets marginal relief,
    /// i.e. tax is capped at the income in excess of the limit.
    pub marginal_relief: bool,
}

/// Errors detected when validating a slab table at load time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SlabTableError {
    #[error("{0} regime has no slabs")]
    Empty(RegimeKind),

    #[error("{regime} regime: first slab must start at 0, starts at {found}")]
    FirstSlabNotZero { regime: RegimeKind, found: Decimal },

    #[error("{regime} regime: slab {index} starts at {found}, expected {expected}")]
    NotContiguous {
        regime: RegimeKind,
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("{regime} regime: slab {index} has an empty or inverted range")]
    EmptyRange { regime: RegimeKind, index: usize },

    #[error("{regime} regime: slab {index} is unbounded but is not the last slab")]
    UnboundedBeforeEnd { regime: RegimeKind, index: usize },

    #[error("{0} regime: last slab must be unbounded")]
    LastSlabBounded(RegimeKind),

    #[error("{regime} regime: slab {index} has rate {rate}, expected 0..=100")]
    InvalidRate {
        regime: RegimeKind,
        index: usize,
        rate: Decimal,
    },

    #[error("{regime} regime: {field} must be non-negative, got {value}")]
    NegativeParameter {
        regime: RegimeKind,
        field: &'static str,
        value: Decimal,
    },
}

/// A complete regime for one assessment year.
///
/// Regimes are immutable reference data: build them once when rules are
/// loaded, call [`TaxRegime::validate`], then share them by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRegime {
    pub kind: RegimeKind,
    pub slabs: Vec<TaxSlab>,

    /// Descriptive labels of deductions the regime admits (e.g. `80C`).
    pub deductions: Vec<String>,

    pub standard_deduction_limit: Decimal,

    /// Basic exemption for resident seniors aged 60 to 79.
    /// `None` means the regime ignores age.
    pub senior_exemption_limit: Option<Decimal>,

    /// Basic exemption for resident super seniors aged 80 and above.
    pub super_senior_exemption_limit: Option<Decimal>,

    pub rebate: Option<RebateRule>,

    /// Highest surcharge percentage the regime allows.
    pub surcharge_rate_cap: Option<Decimal>,
}

impl TaxRegime {
    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    /// Checks that the slabs are ordered, contiguous, non-overlapping and
    /// cover `[0, ∞)`, and that every rate and limit is sensible.
    pub fn validate(&self) -> Result<(), SlabTableError> {
        let regime = self.kind;
        let first = self.slabs.first().ok_or(SlabTableError::Empty(regime))?;
        if !first.income_from.is_zero() {
            return Err(SlabTableError::FirstSlabNotZero {
                regime,
                found: first.income_from,
            });
        }

        let last_index = self.slabs.len() - 1;
        let mut expected_from = Decimal::ZERO;
        for (index, slab) in self.slabs.iter().enumerate() {
            if slab.income_from != expected_from {
                return Err(SlabTableError::NotContiguous {
                    regime,
                    index,
                    expected: expected_from,
                    found: slab.income_from,
                });
            }
            if slab.tax_rate < Decimal::ZERO || slab.tax_rate > Decimal::ONE_HUNDRED {
                return Err(SlabTableError::InvalidRate {
                    regime,
                    index,
                    rate: slab.tax_rate,
                });
            }
            match slab.income_to {
                Some(to) if to <= slab.income_from => {
                    return Err(SlabTableError::EmptyRange { regime, index });
                }
                Some(_) if index == last_index => {
                    return Err(SlabTableError::LastSlabBounded(regime));
                }
                Some(to) => expected_from = to,
                None if index != last_index => {
                    return Err(SlabTableError::UnboundedBeforeEnd { regime, index });
                }
                None => {}
            }
        }

        let parameters = [
            ("standard_deduction_limit", Some(self.standard_deduction_limit)),
            ("senior_exemption_limit", self.senior_exemption_limit),
            ("super_senior_exemption_limit", self.super_senior_exemption_limit),
            ("surcharge_rate_cap", self.surcharge_rate_cap),
        ];
        for (field, value) in parameters {
            if let Some(value) = value {
                if value < Decimal::ZERO {
                    return Err(SlabTableError::NegativeParameter {
                        regime,
                        field,
                        value,
                    });
                }
            }
        }

        Ok(())
    }
}
