use anyhow::{Context, Result, anyhow};
use itr_core::calculations::{
    RegimeComparison, RegimeWorksheet, RegimeWorksheetInput, RegimeWorksheetResult,
    WorksheetError,
};
use itr_core::calculators::{
    DepositInput, GratuityInput, LapInput, LoanInput, LoanKind, LumpsumInput, NpsInput, PpfInput,
    RetirementInput, SipInput, calculate_compound_interest, calculate_fd, calculate_gratuity,
    calculate_lap, calculate_loan, calculate_lumpsum, calculate_nps, calculate_ppf,
    calculate_retirement, calculate_sip,
};
use itr_core::{
    AssessmentYear, DeductionClaims, RegimeKind, RulesConfig, RulesSourceRegistry, TaxRules,
    TaxpayerProfile, YearRules,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cli::{BatchArgs, Cli, Command, DepositArgs, IncomeArgs, LoanArgs, TaxArgs, YearsArgs};
use crate::config::AppConfig;
use crate::csv_loader;
use crate::logging;

/// Loaded rules plus the settings they came from.
pub struct App {
    config: AppConfig,
    rules: TaxRules,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaxReport {
    assessment_year: AssessmentYear,
    financial_year: String,
    #[serde(flatten)]
    result: RegimeWorksheetResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchRow {
    name: String,
    old_regime_tax: Decimal,
    new_regime_tax: Decimal,
    recommended: RegimeKind,
    savings: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchReport {
    assessment_year: AssessmentYear,
    taxpayers: Vec<BatchRow>,
}

/// Folds command-line overrides into the file configuration.
pub fn apply_overrides(
    mut config: AppConfig,
    cli: &Cli,
) -> AppConfig {
    if let Some(level) = &cli.log_level {
        config.log_level = Some(level.clone());
    }
    if let Some(source) = &cli.rules_source {
        config.rules.source = source.clone();
    }
    if let Some(dir) = &cli.rules_dir {
        config.rules = RulesConfig {
            source: cli.rules_source.clone().unwrap_or_else(|| "csv".to_string()),
            location: Some(dir.clone()),
        };
    }
    config
}

/// Entry point for the binary: reads settings, starts logging, loads rules
/// and runs the command. Returns the JSON to print.
pub fn run(cli: Cli) -> Result<String> {
    let config = AppConfig::discover(cli.config.as_deref())?;
    let config = apply_overrides(config, &cli);

    logging::init_logging(config.log_level.as_deref());
    if let Some(level) = &cli.log_level {
        // An explicit flag also beats RUST_LOG.
        logging::set_log_level(level)?;
    }
    if let Some(path) = &config.log_file {
        logging::enable_file_logging(path)?;
    }

    let app = App::new(config, &itr_data::default_registry())?;
    app.execute(&cli.command)
}

impl App {
    pub fn new(
        config: AppConfig,
        registry: &RulesSourceRegistry,
    ) -> Result<Self> {
        let rules = registry
            .load(&config.rules)
            .with_context(|| format!("cannot load tax rules from source '{}'", config.rules.source))?;
        Ok(Self { config, rules })
    }

    pub fn rules(&self) -> &TaxRules {
        &self.rules
    }

    /// The rules for `requested`, else the configured year, else the
    /// current assessment year. An implicit year that has no rules falls
    /// back to the latest year loaded.
    pub fn year_rules(
        &self,
        requested: Option<AssessmentYear>,
    ) -> Result<&YearRules> {
        if let Some(year) = requested.or(self.config.assessment_year) {
            return Ok(self.rules.require(year)?);
        }

        let current = AssessmentYear::current();
        if let Some(rules) = self.rules.get(current) {
            return Ok(rules);
        }
        let latest = self
            .rules
            .latest()
            .ok_or_else(|| anyhow!("no tax rules loaded"))?;
        warn!(
            %current,
            using = %latest.assessment_year,
            "no rules for the current assessment year; using the latest"
        );
        Ok(latest)
    }

    /// Runs one command and renders its result as pretty JSON.
    pub fn execute(
        &self,
        command: &Command,
    ) -> Result<String> {
        debug!(?command, "executing");
        match command {
            Command::Tax(args) => to_json(&self.tax(args)?),
            Command::Compare(args) => to_json(&self.compare(args)?),
            Command::Batch(args) => to_json(&self.batch(args)?),
            Command::Years(args) => to_json(&self.years(args)?),

            Command::Emi(args) => to_json(&calculate_loan(LoanKind::General, &loan_input(args))?),
            Command::HomeLoan(args) => to_json(&calculate_loan(LoanKind::Home, &loan_input(args))?),
            Command::CarLoan(args) => to_json(&calculate_loan(LoanKind::Car, &loan_input(args))?),
            Command::PersonalLoan(args) => {
                to_json(&calculate_loan(LoanKind::Personal, &loan_input(args))?)
            }
            Command::Lap(args) => to_json(&calculate_lap(&LapInput {
                property_value: args.property_value,
                ltv_percent: args.ltv,
                interest_rate: args.rate,
                tenure_years: args.years,
            })?),

            Command::Sip(args) => to_json(&calculate_sip(&SipInput {
                monthly_investment: args.monthly,
                expected_return: args.rate,
                tenure_years: args.years,
            })?),
            Command::Lumpsum(args) => to_json(&calculate_lumpsum(&LumpsumInput {
                principal: args.principal,
                expected_return: args.rate,
                tenure_years: args.years,
            })?),
            Command::Fd(args) => to_json(&calculate_fd(&deposit_input(args))?),
            Command::CompoundInterest(args) => {
                to_json(&calculate_compound_interest(&deposit_input(args))?)
            }
            Command::Ppf(args) => to_json(&calculate_ppf(&PpfInput {
                yearly_deposit: args.yearly_deposit,
                interest_rate: args.rate,
                tenure_years: args.years,
            })?),
            Command::Nps(args) => to_json(&calculate_nps(&NpsInput {
                monthly_contribution: args.monthly,
                current_age: args.age,
                retirement_age: args.retirement_age,
                expected_return: args.rate,
                annuity_percent: args.annuity_percent,
                annuity_rate: args.annuity_rate,
            })?),
            Command::Gratuity(args) => to_json(&calculate_gratuity(&GratuityInput {
                last_drawn_salary: args.salary,
                years_of_service: args.years,
            })?),
            Command::Retirement(args) => to_json(&calculate_retirement(&RetirementInput {
                current_age: args.age,
                retirement_age: args.retirement_age,
                life_expectancy: args.life_expectancy,
                monthly_expenses: args.monthly_expenses,
                inflation_rate: args.inflation,
                pre_retirement_return: args.pre_retirement_return,
                post_retirement_return: args.post_retirement_return,
                current_savings: args.current_savings,
            })?),
        }
    }

    fn tax(
        &self,
        args: &TaxArgs,
    ) -> Result<TaxReport> {
        let rules = self.year_rules(args.income.year)?;
        let result = RegimeWorksheet::new(rules)
            .calculate(args.regime, &worksheet_input(&args.income))
            .map_err(invalid_input)?;
        Ok(TaxReport {
            assessment_year: rules.assessment_year,
            financial_year: rules.assessment_year.financial_year(),
            result,
        })
    }

    fn compare(
        &self,
        args: &IncomeArgs,
    ) -> Result<RegimeComparison> {
        let rules = self.year_rules(args.year)?;
        RegimeComparison::between(rules, &worksheet_input(args)).map_err(invalid_input)
    }

    fn batch(
        &self,
        args: &BatchArgs,
    ) -> Result<BatchReport> {
        let rules = self.year_rules(args.year)?;
        let records = csv_loader::load_from_file(&args.file)?;
        info!(
            file = %args.file.display(),
            taxpayers = records.len(),
            year = %rules.assessment_year,
            "running batch comparison"
        );

        let taxpayers = records
            .into_iter()
            .enumerate()
            .map(|(idx, record)| {
                let comparison = RegimeComparison::between(rules, &record.input)
                    .map_err(invalid_input)
                    .with_context(|| format!("row {} ({})", idx + 1, record.name))?;
                Ok(BatchRow {
                    name: record.name,
                    old_regime_tax: comparison.old_regime.tax_payable,
                    new_regime_tax: comparison.new_regime.tax_payable,
                    recommended: comparison.recommended,
                    savings: comparison.savings,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BatchReport {
            assessment_year: rules.assessment_year,
            taxpayers,
        })
    }

    fn years(
        &self,
        args: &YearsArgs,
    ) -> Result<Vec<YearRules>> {
        match args.year {
            Some(year) => Ok(vec![self.rules.require(year)?.clone()]),
            None => Ok(self
                .rules
                .years()
                .into_iter()
                .filter_map(|year| self.rules.get(year).cloned())
                .collect()),
        }
    }
}

fn worksheet_input(args: &IncomeArgs) -> RegimeWorksheetInput {
    RegimeWorksheetInput {
        salary_income: args.salary,
        other_income: args.other_income,
        is_salaried: !args.not_salaried,
        profile: TaxpayerProfile::new(args.age, !args.non_resident),
        claims: DeductionClaims {
            section_80c: args.section_80c,
            section_80ccd_1b: args.section_80ccd_1b,
            section_80d: args.section_80d,
            hra_exemption: args.hra_exemption,
            home_loan_interest: args.home_loan_interest,
            other: args.other_deductions,
        },
    }
}

fn loan_input(args: &LoanArgs) -> LoanInput {
    LoanInput {
        principal: args.principal,
        interest_rate: args.rate,
        tenure_years: args.years,
    }
}

fn deposit_input(args: &DepositArgs) -> DepositInput {
    DepositInput {
        principal: args.principal,
        interest_rate: args.rate,
        tenure_years: args.years,
        compounding_frequency: args.compounding,
    }
}

fn invalid_input(err: WorksheetError) -> anyhow::Error {
    anyhow!("Invalid input: {err}")
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("cannot render result as JSON")
}
