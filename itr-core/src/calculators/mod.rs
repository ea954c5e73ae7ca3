//! Personal-finance calculators.
//!
//! Each calculator is a pure function taking a validated input struct and
//! returning a result struct. Inputs and results serialize with camelCase
//! field names.

mod deposit;
mod error;
mod gratuity;
mod loan;
mod nps;
mod ppf;
mod retirement;
mod sip;

pub use deposit::{
    CompoundingFrequency, DepositInput, DepositResult, calculate_compound_interest, calculate_fd,
};
pub use error::CalculatorError;
pub use gratuity::{GRATUITY_EXEMPTION_LIMIT, GratuityInput, GratuityResult, calculate_gratuity};
pub use loan::{
    AdditionalLoanInfo, AmortizationYear, LapInput, LapResult, LoanInput, LoanKind, LoanResult,
    calculate_lap, calculate_loan, monthly_emi,
};
pub use nps::{NPS_MIN_ANNUITY_PERCENT, NpsInput, NpsResult, calculate_nps};
pub use ppf::{
    PPF_DEFAULT_RATE, PPF_MAX_DEPOSIT, PPF_MIN_DEPOSIT, PpfInput, PpfResult, PpfYear, calculate_ppf,
};
pub use retirement::{RetirementInput, RetirementResult, calculate_retirement};
pub use sip::{InvestmentResult, LumpsumInput, SipInput, calculate_lumpsum, calculate_sip};
