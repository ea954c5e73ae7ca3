use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use itr_core::{AssessmentYear, TaxRegime, TaxRules};
use itr_data::{CsvRulesSource, builtin_rules};

/// Validate tax reference data and print a summary.
///
/// The directory must contain:
/// - slabs.csv: assessment_year, regime, income_from, income_to, rate
/// - regimes.csv: assessment_year, regime, standard_deduction_limit,
///   senior_exemption_limit, super_senior_exemption_limit,
///   rebate_income_limit, max_rebate, marginal_relief, surcharge_rate_cap,
///   deductions
///
/// Without a directory the compiled-in data is checked.
#[derive(Parser, Debug)]
#[command(name = "itr-rules-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding slabs.csv and regimes.csv
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Print the slab table for this assessment year (e.g. 2026-27)
    #[arg(short, long)]
    year: Option<AssessmentYear>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let rules = match &args.dir {
        Some(dir) => {
            println!("Checking tax rules in: {}", dir.display());
            CsvRulesSource::load_dir(dir)
                .with_context(|| format!("Invalid tax rules in: {}", dir.display()))?
        }
        None => {
            println!("Checking built-in tax rules");
            builtin_rules().context("Built-in tax rules are invalid")?
        }
    };

    print_summary(&rules);

    if let Some(year) = args.year {
        let year_rules = rules.require(year)?;
        for regime in [&year_rules.old, &year_rules.new] {
            print_slabs(regime);
        }
    }

    println!("All {} assessment years are valid.", rules.len());
    Ok(())
}

fn print_summary(rules: &TaxRules) {
    for year in rules.years() {
        let Some(year_rules) = rules.get(year) else {
            continue;
        };
        println!("AY {year}");
        for regime in [&year_rules.old, &year_rules.new] {
            let top_rate = regime
                .slabs
                .last()
                .map(|s| s.tax_rate.to_string())
                .unwrap_or_default();
            let rebate = regime
                .rebate
                .as_ref()
                .map(|r| format!("up to {} on income to {}", r.max_rebate, r.income_limit))
                .unwrap_or_else(|| "none".to_string());
            println!(
                "  {:<3} {} slabs, top rate {}%, standard deduction {}, rebate {}",
                regime.name(),
                regime.slabs.len(),
                top_rate,
                regime.standard_deduction_limit,
                rebate
            );
        }
    }
}

fn print_slabs(regime: &TaxRegime) {
    println!("{} regime slabs:", regime.name());
    for slab in &regime.slabs {
        let upper = slab
            .income_to
            .map(|to| to.to_string())
            .unwrap_or_else(|| "and above".to_string());
        println!("  {:>10} - {:<10} {}%", slab.income_from, upper, slab.tax_rate);
    }
}
