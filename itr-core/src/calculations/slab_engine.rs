//! Progressive slab tax engine.
//!
//! Computes base tax, surcharge and health & education cess for a taxable
//! income under one regime of one assessment year.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Exemption floor from age band (resident seniors, Old regime only) |
//! | 2    | One ascending pass over the slabs, summing each slab's share |
//! | 3    | Surcharge percentage looked up from taxable income, applied to base tax |
//! | 4    | Cess on base tax + surcharge |
//! | 5    | Total = base tax + surcharge + cess |
//!
//! The engine trusts its regime: slab tables are validated once when rules
//! are loaded (see [`TaxRegime::validate`]). Taxable income must already be
//! clamped to zero by the caller; negative income is taxed as zero.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use itr_core::calculations::SlabTaxEngine;
//! use itr_core::{LevyConfig, RegimeKind, TaxRegime, TaxSlab, TaxpayerProfile};
//!
//! let regime = TaxRegime {
//!     kind: RegimeKind::New,
//!     slabs: vec![
//!         TaxSlab::new(dec!(0), Some(dec!(400000)), dec!(0)),
//!         TaxSlab::new(dec!(400000), Some(dec!(800000)), dec!(5)),
//!         TaxSlab::new(dec!(800000), Some(dec!(1200000)), dec!(10)),
//!         TaxSlab::new(dec!(1200000), None, dec!(15)),
//!     ],
//!     deductions: vec![],
//!     standard_deduction_limit: dec!(75000),
//!     senior_exemption_limit: None,
//!     super_senior_exemption_limit: None,
//!     rebate: None,
//!     surcharge_rate_cap: Some(dec!(25)),
//! };
//! let levies = LevyConfig::default();
//!
//! let engine = SlabTaxEngine::new(&levies);
//! let result = engine.calculate_tax(dec!(1125000), &regime, &TaxpayerProfile::new(30, true));
//!
//! assert_eq!(result.base_tax, dec!(52500.00));
//! assert_eq!(result.cess, dec!(2100.00));
//! assert_eq!(result.total_tax, dec!(54600.00));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{percent_of, round_half_up};
use crate::models::{AgeBand, CalculationResult, LevyConfig, TaxRegime, TaxpayerProfile};

/// Slab engine bound to the levy table of one assessment year.
#[derive(Debug, Clone, Copy)]
pub struct SlabTaxEngine<'a> {
    levies: &'a LevyConfig,
}

impl<'a> SlabTaxEngine<'a> {
    pub fn new(levies: &'a LevyConfig) -> Self {
        Self { levies }
    }

    /// Calculates base tax, surcharge, cess and total for a taxable income.
    pub fn calculate_tax(
        &self,
        taxable_income: Decimal,
        regime: &TaxRegime,
        profile: &TaxpayerProfile,
    ) -> CalculationResult {
        let base_tax = self.slab_tax(taxable_income, regime, profile);
        let result = self.apply_levies(taxable_income, base_tax, regime);

        debug!(
            regime = %regime.kind,
            %taxable_income,
            base_tax = %result.base_tax,
            surcharge = %result.surcharge,
            cess = %result.cess,
            "slab tax calculated"
        );

        result
    }

    /// Income below which nothing is taxed because of the taxpayer's age.
    ///
    /// Only residents get age-based exemptions, and only regimes that
    /// define them.
    pub fn exemption_floor(
        regime: &TaxRegime,
        profile: &TaxpayerProfile,
    ) -> Decimal {
        if !profile.is_resident {
            return Decimal::ZERO;
        }
        let floor = match profile.age_band() {
            AgeBand::Regular => None,
            AgeBand::Senior => regime.senior_exemption_limit,
            AgeBand::SuperSenior => regime
                .super_senior_exemption_limit
                .or(regime.senior_exemption_limit),
        };
        floor.unwrap_or(Decimal::ZERO)
    }

    /// Tax from the slab table alone, rounded to paise.
    pub fn slab_tax(
        &self,
        taxable_income: Decimal,
        regime: &TaxRegime,
        profile: &TaxpayerProfile,
    ) -> Decimal {
        if taxable_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let floor = Self::exemption_floor(regime, profile);
        let tax: Decimal = regime
            .slabs
            .iter()
            .take_while(|slab| taxable_income > slab.income_from)
            .map(|slab| percent_of(slab.taxable_portion(taxable_income, floor), slab.tax_rate))
            .sum();

        round_half_up(tax)
    }

    /// Surcharge percentage for a taxable income under a regime's cap.
    pub fn surcharge_rate(
        &self,
        taxable_income: Decimal,
        regime: &TaxRegime,
    ) -> Decimal {
        let rate = self.levies.surcharge_rate(taxable_income);
        match regime.surcharge_rate_cap {
            Some(cap) => rate.min(cap),
            None => rate,
        }
    }

    /// Adds surcharge and cess on top of an already computed tax.
    ///
    /// The surcharge bracket is chosen by `taxable_income`, but the
    /// percentage is applied to `tax`. Cess is levied once on
    /// `tax + surcharge`.
    pub fn apply_levies(
        &self,
        taxable_income: Decimal,
        tax: Decimal,
        regime: &TaxRegime,
    ) -> CalculationResult {
        if tax <= Decimal::ZERO {
            return CalculationResult::zero();
        }

        let base_tax = round_half_up(tax);
        let surcharge = round_half_up(percent_of(
            base_tax,
            self.surcharge_rate(taxable_income, regime),
        ));
        let cess = round_half_up(percent_of(base_tax + surcharge, self.levies.cess_rate));

        CalculationResult {
            base_tax,
            surcharge,
            cess,
            total_tax: base_tax + surcharge + cess,
        }
    }
}
