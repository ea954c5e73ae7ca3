//! CSV loader for batch tax comparisons.
//!
//! ## CSV Format
//!
//! One taxpayer per row. Headers are matched by name, so column order does
//! not matter. Header names are case-sensitive.
//!
//! | Column               | Required | Type    | Notes                                  |
//! |----------------------|----------|---------|----------------------------------------|
//! | `name`               | no       | string  | Defaults to `row N`                    |
//! | `age`                | yes      | integer |                                        |
//! | `salary_income`      | yes      | amount  | `1200000`, `12,00,000` or `12L`        |
//! | `other_income`       | no       | amount  | Empty cell means zero                  |
//! | `is_resident`        | no       | flag    | Defaults to `true`                     |
//! | `is_salaried`        | no       | flag    | Defaults to `true`                     |
//! | `section_80c`        | no       | amount  |                                        |
//! | `section_80ccd_1b`   | no       | amount  |                                        |
//! | `section_80d`        | no       | amount  |                                        |
//! | `hra_exemption`      | no       | amount  |                                        |
//! | `home_loan_interest` | no       | amount  |                                        |
//! | `other_deductions`   | no       | amount  |                                        |
//!
//! Flags accept `true`/`false`, `yes`/`no`, `y`/`n` or `1`/`0`.
//!
//! ### Minimal example
//!
//! ```csv
//! age,salary_income
//! 35,12L
//! ```
use std::path::{Path, PathBuf};

use itr_core::calculations::RegimeWorksheetInput;
use itr_core::{DeductionClaims, TaxpayerProfile};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::utils::parse_amount;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    name: Option<String>,
    age: u32,
    salary_income: String,
    #[serde(default)]
    other_income: Option<String>,
    #[serde(default)]
    is_resident: Option<String>,
    #[serde(default)]
    is_salaried: Option<String>,
    #[serde(default)]
    section_80c: Option<String>,
    #[serde(default)]
    section_80ccd_1b: Option<String>,
    #[serde(default)]
    section_80d: Option<String>,
    #[serde(default)]
    hra_exemption: Option<String>,
    #[serde(default)]
    home_loan_interest: Option<String>,
    #[serde(default)]
    other_deductions: Option<String>,
}

/// Errors that can occur while loading batch CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bad structure, missing required column, or a type mismatch.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based and excludes the header.
    #[error("invalid amount '{value}' in column {column} on row {row}")]
    InvalidAmount {
        column: &'static str,
        value: String,
        row: usize,
    },

    #[error("invalid flag '{value}' in column {column} on row {row} (expected true or false)")]
    InvalidFlag {
        column: &'static str,
        value: String,
        row: usize,
    },
}

/// One taxpayer read from a batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxpayerRecord {
    pub name: String,
    pub input: RegimeWorksheetInput,
}

fn amount(
    cell: Option<&str>,
    column: &'static str,
    row: usize,
) -> Result<Decimal, CsvLoadError> {
    match cell.map(str::trim) {
        None | Some("") => Ok(Decimal::ZERO),
        Some(value) => parse_amount(value).map_err(|_| CsvLoadError::InvalidAmount {
            column,
            value: value.to_string(),
            row,
        }),
    }
}

fn flag(
    cell: Option<&str>,
    column: &'static str,
    row: usize,
) -> Result<bool, CsvLoadError> {
    match cell.map(|c| c.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") => Ok(true),
        Some("true" | "yes" | "y" | "1") => Ok(true),
        Some("false" | "no" | "n" | "0") => Ok(false),
        Some(value) => Err(CsvLoadError::InvalidFlag {
            column,
            value: value.to_string(),
            row,
        }),
    }
}

/// Convert a single CSV row. `row_number` is 1-based.
fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<TaxpayerRecord, CsvLoadError> {
    let claims = DeductionClaims {
        section_80c: amount(row.section_80c.as_deref(), "section_80c", row_number)?,
        section_80ccd_1b: amount(
            row.section_80ccd_1b.as_deref(),
            "section_80ccd_1b",
            row_number,
        )?,
        section_80d: amount(row.section_80d.as_deref(), "section_80d", row_number)?,
        hra_exemption: amount(row.hra_exemption.as_deref(), "hra_exemption", row_number)?,
        home_loan_interest: amount(
            row.home_loan_interest.as_deref(),
            "home_loan_interest",
            row_number,
        )?,
        other: amount(row.other_deductions.as_deref(), "other_deductions", row_number)?,
    };

    let salary_income = match row.salary_income.trim() {
        "" => {
            return Err(CsvLoadError::InvalidAmount {
                column: "salary_income",
                value: String::new(),
                row: row_number,
            });
        }
        value => amount(Some(value), "salary_income", row_number)?,
    };

    let name = row
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("row {row_number}"));

    Ok(TaxpayerRecord {
        name,
        input: RegimeWorksheetInput {
            salary_income,
            other_income: amount(row.other_income.as_deref(), "other_income", row_number)?,
            is_salaried: flag(row.is_salaried.as_deref(), "is_salaried", row_number)?,
            profile: TaxpayerProfile::new(
                row.age,
                flag(row.is_resident.as_deref(), "is_resident", row_number)?,
            ),
            claims,
        },
    })
}

/// Parse CSV text and return one record per row, in file order.
///
/// # Errors
///
/// * [CsvLoadError::Parse] if the CSV is structurally invalid or `age` is
///   not a whole number.
/// * [CsvLoadError::InvalidAmount] / [CsvLoadError::InvalidFlag] for the
///   first bad cell.
pub fn load_from_str(input: &str) -> Result<Vec<TaxpayerRecord>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Read a file from disk and delegate to [load_from_str].
pub fn load_from_file(path: &Path) -> Result<Vec<TaxpayerRecord>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const MINIMAL_CSV: &str = "\
age,salary_income
35,1200000
";

    const FULL_CSV: &str = "\
name,age,salary_income,other_income,is_resident,is_salaried,section_80c,section_80ccd_1b,section_80d,hra_exemption,home_loan_interest,other_deductions
Asha Rao,42,18L,\"1,20,000\",yes,no,150000,50000,25000,2.4L,200000,10000
";

    const MULTI_ROW_CSV: &str = "\
name,age,salary_income,other_income
Asha,30,9L,
Bala,65,\"15,00,000\",50k
,81,7.5L,1L
";

    // -----------------------------------------------------------------------
    // Minimal CSV: only required columns, everything else defaults
    // -----------------------------------------------------------------------
    #[test]
    fn test_minimal_csv_uses_defaults() {
        let records = load_from_str(MINIMAL_CSV).expect("should parse minimal CSV");

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.name, "row 1");
        assert_eq!(r.input.salary_income, dec!(1200000));
        assert_eq!(r.input.other_income, dec!(0));
        assert!(r.input.is_salaried);
        assert_eq!(r.input.profile, TaxpayerProfile::new(35, true));
        assert!(r.input.claims.is_empty());
    }

    // -----------------------------------------------------------------------
    // Full CSV: every column populated, shorthand amounts expanded
    // -----------------------------------------------------------------------
    #[test]
    fn test_full_csv_all_fields_populated() {
        let records = load_from_str(FULL_CSV).expect("should parse full CSV");

        let r = &records[0];
        assert_eq!(r.name, "Asha Rao");
        assert_eq!(r.input.salary_income, dec!(1800000));
        assert_eq!(r.input.other_income, dec!(120000));
        assert!(!r.input.is_salaried);
        assert_eq!(r.input.profile, TaxpayerProfile::new(42, true));
        assert_eq!(
            r.input.claims,
            DeductionClaims {
                section_80c: dec!(150000),
                section_80ccd_1b: dec!(50000),
                section_80d: dec!(25000),
                hra_exemption: dec!(240000),
                home_loan_interest: dec!(200000),
                other: dec!(10000),
            }
        );
    }

    #[test]
    fn test_multi_row_order_and_optional_cells() {
        let records = load_from_str(MULTI_ROW_CSV).expect("should parse");

        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Asha", "Bala", "row 3"]);
        assert_eq!(records[0].input.other_income, dec!(0));
        assert_eq!(records[1].input.salary_income, dec!(1500000));
        assert_eq!(records[1].input.other_income, dec!(50000));
        assert_eq!(records[2].input.profile.age, 81);
    }

    #[test]
    fn test_flag_spellings() {
        let cases = [
            ("true", true),
            ("Yes", true),
            ("y", true),
            ("1", true),
            ("FALSE", false),
            ("no", false),
            ("n", false),
            ("0", false),
        ];

        for (cell, expected) in cases {
            let csv = format!("age,salary_income,is_resident\n30,500000,{cell}\n");
            let records = load_from_str(&csv)
                .unwrap_or_else(|e| panic!("failed to parse flag '{cell}': {e}"));

            assert_eq!(records[0].input.profile.is_resident, expected, "flag '{cell}'");
        }
    }

    // -----------------------------------------------------------------------
    // Errors
    // -----------------------------------------------------------------------
    #[test]
    fn test_invalid_amount_reports_column_and_row() {
        let csv = "\
age,salary_income,section_80c
30,10L,150000
31,11L,lots
";

        match load_from_str(csv).unwrap_err() {
            CsvLoadError::InvalidAmount { column, value, row } => {
                assert_eq!(column, "section_80c");
                assert_eq!(value, "lots");
                assert_eq!(row, 2);
            }
            other => panic!("expected InvalidAmount, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_salary_is_rejected() {
        let csv = "age,salary_income\n30,\n";

        assert!(matches!(
            load_from_str(csv),
            Err(CsvLoadError::InvalidAmount {
                column: "salary_income",
                row: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_flag_returns_error() {
        let csv = "age,salary_income,is_salaried\n30,10L,maybe\n";

        match load_from_str(csv).unwrap_err() {
            CsvLoadError::InvalidFlag { column, value, row } => {
                assert_eq!(column, "is_salaried");
                assert_eq!(value, "maybe");
                assert_eq!(row, 1);
            }
            other => panic!("expected InvalidFlag, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_column_returns_parse_error() {
        let csv = "name,salary_income\nAsha,10L\n";

        assert!(matches!(load_from_str(csv), Err(CsvLoadError::Parse(_))));
    }

    #[test]
    fn test_non_numeric_age_returns_parse_error() {
        let csv = "age,salary_income\nthirty,10L\n";

        assert!(matches!(load_from_str(csv), Err(CsvLoadError::Parse(_))));
    }

    #[test]
    fn test_header_only_is_empty() {
        let records = load_from_str("age,salary_income\n").expect("header-only CSV is valid");
        assert!(records.is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_from_file(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(CsvLoadError::Io { .. })));
    }
}
