use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Total income above which ITR-1 (Sahaj) may not be used.
pub const ITR1_INCOME_LIMIT: Decimal = dec!(5000000);

/// Return forms the filing flow can prepare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItrForm {
    #[serde(rename = "ITR-1")]
    Itr1,
    #[serde(rename = "ITR-2")]
    Itr2,
}

impl ItrForm {
    /// ITR-1 for residents with total income up to ₹50 lakh and no business
    /// income; ITR-2 otherwise.
    pub fn suggest(
        total_income: Decimal,
        is_resident: bool,
        has_business_income: bool,
    ) -> Self {
        if is_resident && !has_business_income && total_income <= ITR1_INCOME_LIMIT {
            Self::Itr1
        } else {
            Self::Itr2
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Itr1 => "ITR-1",
            Self::Itr2 => "ITR-2",
        }
    }
}

impl fmt::Display for ItrForm {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn resident_salaried_under_limit_files_itr1() {
        assert_eq!(ItrForm::suggest(dec!(1200000), true, false), ItrForm::Itr1);
        assert_eq!(ItrForm::suggest(dec!(5000000), true, false), ItrForm::Itr1);
    }

    #[test]
    fn income_above_fifty_lakh_files_itr2() {
        assert_eq!(ItrForm::suggest(dec!(5000001), true, false), ItrForm::Itr2);
    }

    #[test]
    fn non_resident_files_itr2() {
        assert_eq!(ItrForm::suggest(dec!(500000), false, false), ItrForm::Itr2);
    }

    #[test]
    fn business_income_files_itr2() {
        assert_eq!(ItrForm::suggest(dec!(500000), true, true), ItrForm::Itr2);
    }

    #[test]
    fn serializes_with_official_name() {
        assert_eq!(serde_json::to_string(&ItrForm::Itr1).unwrap(), "\"ITR-1\"");
    }
}
