use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tax liability produced by the slab engine.
///
/// Derived on every request and never persisted.
/// `total_tax` is always `base_tax + surcharge + cess`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub base_tax: Decimal,
    pub surcharge: Decimal,
    pub cess: Decimal,
    pub total_tax: Decimal,
}

impl CalculationResult {
    pub fn zero() -> Self {
        Self::default()
    }
}
