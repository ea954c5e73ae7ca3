use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Chapter VI-A deductions and exemptions a taxpayer claims.
///
/// Amounts are as claimed; statutory caps are applied by the regime
/// worksheet. Only the Old regime honours these claims.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeductionClaims {
    /// Section 80C (PPF, ELSS, life insurance, principal repayment).
    pub section_80c: Decimal,

    /// Section 80CCD(1B), additional self contribution to NPS.
    pub section_80ccd_1b: Decimal,

    /// Section 80D, health insurance premiums.
    pub section_80d: Decimal,

    /// House rent allowance exemption under Section 10(13A).
    pub hra_exemption: Decimal,

    /// Interest on a self-occupied home loan, Section 24(b).
    pub home_loan_interest: Decimal,

    /// Any other deductions, taken as claimed.
    pub other: Decimal,
}

impl DeductionClaims {
    pub fn is_empty(&self) -> bool {
        [
            self.section_80c,
            self.section_80ccd_1b,
            self.section_80d,
            self.hra_exemption,
            self.home_loan_interest,
            self.other,
        ]
        .iter()
        .all(|amount| amount.is_zero())
    }

    /// The first claimed amount that is negative, by field name.
    pub fn first_negative(&self) -> Option<(&'static str, Decimal)> {
        [
            ("section80c", self.section_80c),
            ("section80ccd1b", self.section_80ccd_1b),
            ("section80d", self.section_80d),
            ("hraExemption", self.hra_exemption),
            ("homeLoanInterest", self.home_loan_interest),
            ("other", self.other),
        ]
        .into_iter()
        .find(|(_, amount)| *amount < Decimal::ZERO)
    }
}
