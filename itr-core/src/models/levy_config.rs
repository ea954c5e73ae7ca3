use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Surcharge applies when taxable income is strictly above `income_above`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurchargeBracket {
    pub income_above: Decimal,
    pub rate: Decimal,
}

/// Surcharge table and cess rate applied on top of slab tax.
///
/// Rates are percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevyConfig {
    /// Ascending by `income_above`.
    pub surcharge: Vec<SurchargeBracket>,
    pub cess_rate: Decimal,
}

impl LevyConfig {
    /// Surcharge percentage for a taxable income, before any regime cap.
    pub fn surcharge_rate(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        self.surcharge
            .iter()
            .rev()
            .find(|b| taxable_income > b.income_above)
            .map(|b| b.rate)
            .unwrap_or(Decimal::ZERO)
    }
}

impl Default for LevyConfig {
    /// 0% up to ₹50L, 10% above ₹50L, 15% above ₹1Cr, 25% above ₹2Cr,
    /// 37% above ₹5Cr, with 4% health and education cess.
    fn default() -> Self {
        let bracket = |above: u64, rate: u32| SurchargeBracket {
            income_above: Decimal::from(above),
            rate: Decimal::from(rate),
        };
        Self {
            surcharge: vec![
                bracket(5_000_000, 10),
                bracket(10_000_000, 15),
                bracket(20_000_000, 25),
                bracket(50_000_000, 37),
            ],
            cess_rate: Decimal::from(4),
        }
    }
}
