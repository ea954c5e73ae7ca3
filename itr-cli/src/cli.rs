use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use itr_core::calculators::CompoundingFrequency;
use itr_core::{AssessmentYear, RegimeKind};
use rust_decimal::Decimal;

use crate::utils::{parse_amount, parse_rate};

// ─── top level ──────────────────────────────────────────────────────────────

/// Indian income-tax and personal-finance calculator.
///
/// Amounts accept Indian shorthand: 1200000, 12,00,000, 12L, 1.5Cr or 50k.
/// Results are printed as JSON.
#[derive(Debug, Parser)]
#[command(name = "itr-calc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Settings file (default: ./itr-calc.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `itr_core=debug`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Where tax rules come from: `builtin` or `csv`
    #[arg(long, global = true)]
    pub rules_source: Option<String>,

    /// Directory holding slabs.csv and regimes.csv (implies `--rules-source csv`)
    #[arg(long, global = true)]
    pub rules_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Tax payable under one regime
    Tax(TaxArgs),
    /// Old and New regime side by side, with a recommendation
    Compare(IncomeArgs),
    /// Compare regimes for every taxpayer in a CSV file
    Batch(BatchArgs),
    /// Tax rules loaded for each assessment year
    Years(YearsArgs),

    /// EMI for a general loan
    Emi(LoanArgs),
    /// EMI for a home loan, with fees and stamp duty
    HomeLoan(LoanArgs),
    /// EMI for a car loan, with fees and insurance
    CarLoan(LoanArgs),
    /// EMI for a personal loan, with fees
    PersonalLoan(LoanArgs),
    /// Loan against property
    Lap(LapArgs),

    /// Monthly systematic investment
    Sip(SipArgs),
    /// One-time investment
    Lumpsum(LumpsumArgs),
    /// Bank fixed deposit
    Fd(DepositArgs),
    /// Compound interest on a principal
    CompoundInterest(DepositArgs),
    /// Public Provident Fund
    Ppf(PpfArgs),
    /// National Pension System
    Nps(NpsArgs),
    /// Gratuity and its taxable part
    Gratuity(GratuityArgs),
    /// Corpus needed to retire
    Retirement(RetirementArgs),
}

// ─── tax ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Args)]
pub struct IncomeArgs {
    /// Salary or pension income for the year
    #[arg(long, value_parser = parse_amount)]
    pub salary: Decimal,

    /// Income from other sources
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub other_income: Decimal,

    #[arg(long, default_value_t = 30)]
    pub age: u32,

    /// Not resident in India (no Section 87A rebate)
    #[arg(long)]
    pub non_resident: bool,

    /// Not a salaried employee or pensioner (no standard deduction)
    #[arg(long)]
    pub not_salaried: bool,

    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub section_80c: Decimal,

    #[arg(long = "section-80ccd-1b", value_parser = parse_amount, default_value = "0")]
    pub section_80ccd_1b: Decimal,

    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub section_80d: Decimal,

    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub hra_exemption: Decimal,

    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub home_loan_interest: Decimal,

    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub other_deductions: Decimal,

    /// Assessment year, e.g. 2026-27
    #[arg(long)]
    pub year: Option<AssessmentYear>,
}

#[derive(Debug, Clone, Args)]
pub struct TaxArgs {
    #[command(flatten)]
    pub income: IncomeArgs,

    /// `old` or `new`
    #[arg(long, value_parser = parse_regime, default_value = "new")]
    pub regime: RegimeKind,
}

#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    /// CSV file with one taxpayer per row
    pub file: PathBuf,

    #[arg(long)]
    pub year: Option<AssessmentYear>,
}

#[derive(Debug, Clone, Args)]
pub struct YearsArgs {
    /// Show only this assessment year
    #[arg(long)]
    pub year: Option<AssessmentYear>,
}

// ─── calculators ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Args)]
pub struct LoanArgs {
    #[arg(long, value_parser = parse_amount)]
    pub principal: Decimal,

    /// Annual interest rate in percent
    #[arg(long, value_parser = parse_rate)]
    pub rate: Decimal,

    #[arg(long)]
    pub years: u32,
}

#[derive(Debug, Clone, Args)]
pub struct LapArgs {
    #[arg(long, value_parser = parse_amount)]
    pub property_value: Decimal,

    /// Loan-to-value ratio in percent (default 60)
    #[arg(long, value_parser = parse_rate)]
    pub ltv: Option<Decimal>,

    #[arg(long, value_parser = parse_rate)]
    pub rate: Decimal,

    #[arg(long)]
    pub years: u32,
}

#[derive(Debug, Clone, Args)]
pub struct SipArgs {
    #[arg(long, value_parser = parse_amount)]
    pub monthly: Decimal,

    /// Expected annual return in percent
    #[arg(long, value_parser = parse_rate)]
    pub rate: Decimal,

    #[arg(long)]
    pub years: u32,
}

#[derive(Debug, Clone, Args)]
pub struct LumpsumArgs {
    #[arg(long, value_parser = parse_amount)]
    pub principal: Decimal,

    #[arg(long, value_parser = parse_rate)]
    pub rate: Decimal,

    #[arg(long)]
    pub years: u32,
}

#[derive(Debug, Clone, Args)]
pub struct DepositArgs {
    #[arg(long, value_parser = parse_amount)]
    pub principal: Decimal,

    #[arg(long, value_parser = parse_rate)]
    pub rate: Decimal,

    /// Tenure in years; fractions allowed
    #[arg(long)]
    pub years: Decimal,

    /// simple, yearly, half-yearly, quarterly or monthly
    #[arg(long, value_parser = parse_frequency)]
    pub compounding: Option<CompoundingFrequency>,
}

#[derive(Debug, Clone, Args)]
pub struct PpfArgs {
    #[arg(long, value_parser = parse_amount)]
    pub yearly_deposit: Decimal,

    /// Annual rate in percent (default: current PPF rate)
    #[arg(long, value_parser = parse_rate)]
    pub rate: Option<Decimal>,

    #[arg(long, default_value_t = 15)]
    pub years: u32,
}

#[derive(Debug, Clone, Args)]
pub struct NpsArgs {
    #[arg(long, value_parser = parse_amount)]
    pub monthly: Decimal,

    #[arg(long)]
    pub age: u32,

    #[arg(long)]
    pub retirement_age: Option<u32>,

    /// Expected annual return in percent
    #[arg(long, value_parser = parse_rate)]
    pub rate: Decimal,

    /// Share of the corpus used to buy an annuity
    #[arg(long, value_parser = parse_rate)]
    pub annuity_percent: Option<Decimal>,

    #[arg(long, value_parser = parse_rate)]
    pub annuity_rate: Option<Decimal>,
}

#[derive(Debug, Clone, Args)]
pub struct GratuityArgs {
    /// Last drawn salary
    #[arg(long, value_parser = parse_amount)]
    pub salary: Decimal,

    /// Completed years of service
    #[arg(long)]
    pub years: u32,
}

#[derive(Debug, Clone, Args)]
pub struct RetirementArgs {
    #[arg(long)]
    pub age: u32,

    #[arg(long, default_value_t = 60)]
    pub retirement_age: u32,

    #[arg(long, default_value_t = 85)]
    pub life_expectancy: u32,

    /// Current monthly expenses
    #[arg(long, value_parser = parse_amount)]
    pub monthly_expenses: Decimal,

    #[arg(long, value_parser = parse_rate, default_value = "6")]
    pub inflation: Decimal,

    #[arg(long, value_parser = parse_rate, default_value = "12")]
    pub pre_retirement_return: Decimal,

    #[arg(long, value_parser = parse_rate, default_value = "8")]
    pub post_retirement_return: Decimal,

    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub current_savings: Decimal,
}

fn parse_regime(s: &str) -> Result<RegimeKind, String> {
    RegimeKind::parse(s).ok_or_else(|| format!("unknown regime '{s}' (expected old or new)"))
}

fn parse_frequency(s: &str) -> Result<CompoundingFrequency, String> {
    CompoundingFrequency::parse(s).ok_or_else(|| {
        format!("unknown compounding '{s}' (expected simple, yearly, half-yearly, quarterly or monthly)")
    })
}
