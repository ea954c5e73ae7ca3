use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One progressive income band taxed at a fixed marginal rate.
///
/// `tax_rate` is a percentage (`5` for 5%). `income_to` of `None` marks
/// the final, unbounded slab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxSlab {
    pub income_from: Decimal,
    pub income_to: Option<Decimal>,
    pub tax_rate: Decimal,
}

impl TaxSlab {
    pub fn new(
        income_from: Decimal,
        income_to: Option<Decimal>,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            income_from,
            income_to,
            tax_rate,
        }
    }

    /// Width of the part of this slab that lies in `(floor, income]`.
    ///
    /// Returns zero when the income does not reach past the slab's lower
    /// bound, so income exactly on a boundary contributes nothing to the
    /// higher slab.
    pub fn taxable_portion(
        &self,
        income: Decimal,
        floor: Decimal,
    ) -> Decimal {
        if income <= self.income_from {
            return Decimal::ZERO;
        }
        let upper = match self.income_to {
            Some(to) => income.min(to),
            None => income,
        };
        let lower = self.income_from.max(floor);
        if upper > lower {
            upper - lower
        } else {
            Decimal::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn slab() -> TaxSlab {
        TaxSlab::new(dec!(400000), Some(dec!(800000)), dec!(5))
    }

    #[test]
    fn taxable_portion_is_zero_below_slab() {
        assert_eq!(slab().taxable_portion(dec!(300000), dec!(0)), dec!(0));
    }

    #[test]
    fn taxable_portion_is_zero_on_lower_boundary() {
        assert_eq!(slab().taxable_portion(dec!(400000), dec!(0)), dec!(0));
    }

    #[test]
    fn taxable_portion_is_partial_inside_slab() {
        assert_eq!(slab().taxable_portion(dec!(650000), dec!(0)), dec!(250000));
    }

    #[test]
    fn taxable_portion_is_full_width_above_slab() {
        assert_eq!(slab().taxable_portion(dec!(2000000), dec!(0)), dec!(400000));
    }

    #[test]
    fn taxable_portion_respects_exemption_floor() {
        assert_eq!(slab().taxable_portion(dec!(650000), dec!(500000)), dec!(150000));
        assert_eq!(slab().taxable_portion(dec!(650000), dec!(900000)), dec!(0));
    }

    #[test]
    fn unbounded_slab_takes_everything_above() {
        let top = TaxSlab::new(dec!(2400000), None, dec!(30));

        assert_eq!(top.taxable_portion(dec!(3000000), dec!(0)), dec!(600000));
    }
}
