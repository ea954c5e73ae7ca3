use std::collections::BTreeMap;
use std::io::Read;

use itr_core::{
    AssessmentYear, LevyConfig, RebateRule, RegimeKind, RulesError, SlabTableError, TaxRegime,
    TaxRules, TaxSlab, YearRules,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur when loading tax reference data.
#[derive(Debug, Error)]
pub enum RulesLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Unknown regime '{0}' (expected Old or New)")]
    UnknownRegime(String),

    #[error("Assessment year {year} has no parameters for the {regime} regime")]
    MissingRegime {
        year: AssessmentYear,
        regime: RegimeKind,
    },

    #[error("Assessment year {year}, {regime} regime: parameters listed more than once")]
    DuplicateRegime {
        year: AssessmentYear,
        regime: RegimeKind,
    },

    #[error("Assessment year {year}, {regime} regime: rebate needs both an income limit and a maximum")]
    IncompleteRebate {
        year: AssessmentYear,
        regime: RegimeKind,
    },

    #[error("Assessment year {year}: {source}")]
    InvalidTable {
        year: AssessmentYear,
        source: SlabTableError,
    },
}

impl From<csv::Error> for RulesLoaderError {
    fn from(err: csv::Error) -> Self {
        RulesLoaderError::CsvParse(err.to_string())
    }
}

impl From<RulesLoaderError> for RulesError {
    fn from(err: RulesLoaderError) -> Self {
        match err {
            RulesLoaderError::InvalidTable { source, .. } => RulesError::Invalid(source),
            other => RulesError::Load(other.to_string()),
        }
    }
}

/// A single row of `slabs.csv`.
///
/// - `assessment_year`: e.g. `2026-27`
/// - `regime`: `Old` or `New`
/// - `income_from`: lower bound of the slab (exclusive)
/// - `income_to`: upper bound (inclusive), empty for the last slab
/// - `rate`: marginal rate in percent (e.g. `5` for 5%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SlabRecord {
    pub assessment_year: AssessmentYear,
    pub regime: String,
    pub income_from: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub income_to: Option<Decimal>,
    pub rate: Decimal,
}

/// A single row of `regimes.csv`.
///
/// Empty optional columns mean the regime has no such rule: no senior
/// exemption, no rebate or no surcharge cap. `deductions` is a
/// semicolon-separated list of labels.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RegimeRecord {
    pub assessment_year: AssessmentYear,
    pub regime: String,
    pub standard_deduction_limit: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub senior_exemption_limit: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub super_senior_exemption_limit: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub rebate_income_limit: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_rebate: Option<Decimal>,
    #[serde(default)]
    pub marginal_relief: bool,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub surcharge_rate_cap: Option<Decimal>,
    #[serde(default)]
    pub deductions: String,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn parse_regime(raw: &str) -> Result<RegimeKind, RulesLoaderError> {
    RegimeKind::parse(raw).ok_or_else(|| RulesLoaderError::UnknownRegime(raw.to_string()))
}

/// Loader for slab tables and regime parameters from CSV.
///
/// Every year is checked as it is assembled, so a malformed table is
/// rejected at load time rather than producing wrong tax later.
pub struct RulesLoader;

impl RulesLoader {
    /// Parse slab records from any reader.
    pub fn parse_slabs<R: Read>(reader: R) -> Result<Vec<SlabRecord>, RulesLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: SlabRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse regime parameter records from any reader.
    pub fn parse_regimes<R: Read>(reader: R) -> Result<Vec<RegimeRecord>, RulesLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: RegimeRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Build validated [`TaxRules`] from parsed records.
    ///
    /// Years come from `regimes`; each needs both an Old and a New row.
    /// Slabs are grouped by (year, regime) and sorted by `income_from`.
    /// Levies use the statutory surcharge table and 4% cess.
    pub fn assemble(
        slabs: &[SlabRecord],
        regimes: &[RegimeRecord],
    ) -> Result<TaxRules, RulesLoaderError> {
        let mut slab_groups: BTreeMap<(AssessmentYear, RegimeKind), Vec<TaxSlab>> =
            BTreeMap::new();
        for record in slabs {
            let kind = parse_regime(&record.regime)?;
            slab_groups
                .entry((record.assessment_year, kind))
                .or_default()
                .push(TaxSlab::new(record.income_from, record.income_to, record.rate));
        }

        let mut parameters: BTreeMap<AssessmentYear, BTreeMap<RegimeKind, &RegimeRecord>> =
            BTreeMap::new();
        for record in regimes {
            let kind = parse_regime(&record.regime)?;
            let year = parameters.entry(record.assessment_year).or_default();
            if year.insert(kind, record).is_some() {
                return Err(RulesLoaderError::DuplicateRegime {
                    year: record.assessment_year,
                    regime: kind,
                });
            }
        }

        let mut rules = TaxRules::new();
        for (year, records) in &parameters {
            let regime = |kind: RegimeKind| -> Result<TaxRegime, RulesLoaderError> {
                let record = records
                    .get(&kind)
                    .ok_or(RulesLoaderError::MissingRegime { year: *year, regime: kind })?;
                let mut slabs = slab_groups.get(&(*year, kind)).cloned().unwrap_or_default();
                slabs.sort_by(|a, b| a.income_from.cmp(&b.income_from));
                build_regime(*year, kind, record, slabs)
            };

            let year_rules = YearRules {
                assessment_year: *year,
                old: regime(RegimeKind::Old)?,
                new: regime(RegimeKind::New)?,
                levies: LevyConfig::default(),
            };
            rules
                .insert(year_rules)
                .map_err(|source| RulesLoaderError::InvalidTable { year: *year, source })?;
        }

        for (year, kind) in slab_groups.keys() {
            if !parameters.contains_key(year) {
                warn!(%year, regime = %kind, "slabs without regime parameters ignored");
            }
        }

        debug!(years = rules.len(), "assembled tax rules");
        Ok(rules)
    }

    /// Parse and assemble in one step.
    pub fn load<S: Read, P: Read>(
        slabs: S,
        regimes: P,
    ) -> Result<TaxRules, RulesLoaderError> {
        let slabs = Self::parse_slabs(slabs)?;
        let regimes = Self::parse_regimes(regimes)?;
        Self::assemble(&slabs, &regimes)
    }
}

fn build_regime(
    year: AssessmentYear,
    kind: RegimeKind,
    record: &RegimeRecord,
    slabs: Vec<TaxSlab>,
) -> Result<TaxRegime, RulesLoaderError> {
    let rebate = match (record.rebate_income_limit, record.max_rebate) {
        (Some(income_limit), Some(max_rebate)) => Some(RebateRule {
            income_limit,
            max_rebate,
            marginal_relief: record.marginal_relief,
        }),
        (None, None) => None,
        _ => return Err(RulesLoaderError::IncompleteRebate { year, regime: kind }),
    };

    Ok(TaxRegime {
        kind,
        slabs,
        deductions: record
            .deductions
            .split(';')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(String::from)
            .collect(),
        standard_deduction_limit: record.standard_deduction_limit,
        senior_exemption_limit: record.senior_exemption_limit,
        super_senior_exemption_limit: record.super_senior_exemption_limit,
        rebate,
        surcharge_rate_cap: record.surcharge_rate_cap,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const SLABS_HEADER: &str = "assessment_year,regime,income_from,income_to,rate";
    const REGIMES_HEADER: &str = "assessment_year,regime,standard_deduction_limit,senior_exemption_limit,super_senior_exemption_limit,rebate_income_limit,max_rebate,marginal_relief,surcharge_rate_cap,deductions";

    const TEST_SLABS: &str = r#"assessment_year,regime,income_from,income_to,rate
2026-27,Old,0,250000,0
2026-27,Old,250000,500000,5
2026-27,Old,500000,1000000,20
2026-27,Old,1000000,,30
2026-27,New,800000,1200000,10
2026-27,New,0,400000,0
2026-27,New,400000,800000,5
2026-27,New,1200000,,15
"#;

    const TEST_REGIMES: &str = r#"assessment_year,regime,standard_deduction_limit,senior_exemption_limit,super_senior_exemption_limit,rebate_income_limit,max_rebate,marginal_relief,surcharge_rate_cap,deductions
2026-27,Old,50000,300000,500000,500000,12500,false,,80C; 80D ;HRA
2026-27,New,75000,,,1200000,60000,true,25,
"#;

    fn csv(
        header: &str,
        rows: &[&str],
    ) -> String {
        let mut text = header.to_string();
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    // =========================================================================
    // parsing
    // =========================================================================

    #[test]
    fn test_parse_single_slab() {
        let text = csv(SLABS_HEADER, &["2026-27,New,400000,800000,5"]);

        let records = RulesLoader::parse_slabs(text.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            records,
            vec![SlabRecord {
                assessment_year: AssessmentYear(2026),
                regime: "New".to_string(),
                income_from: dec!(400000),
                income_to: Some(dec!(800000)),
                rate: dec!(5),
            }]
        );
    }

    #[test]
    fn test_parse_unbounded_slab() {
        let text = csv(SLABS_HEADER, &["2026-27,Old,1000000,,30"]);

        let records = RulesLoader::parse_slabs(text.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].income_to, None);
        assert_eq!(records[0].rate, dec!(30));
    }

    #[test]
    fn test_parse_regime_with_empty_optionals() {
        let records =
            RulesLoader::parse_regimes(TEST_REGIMES.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 2);
        let new = &records[1];
        assert_eq!(new.senior_exemption_limit, None);
        assert_eq!(new.super_senior_exemption_limit, None);
        assert_eq!(new.rebate_income_limit, Some(dec!(1200000)));
        assert!(new.marginal_relief);
        assert_eq!(new.surcharge_rate_cap, Some(dec!(25)));
        assert_eq!(new.deductions, "");
    }

    #[test]
    fn test_parse_bad_decimal() {
        let text = csv(SLABS_HEADER, &["2026-27,New,abc,400000,0"]);

        let err = RulesLoader::parse_slabs(text.as_bytes()).expect_err("Should fail for invalid decimal");

        let RulesLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(msg.contains("invalid"), "Expected 'invalid' in error, got: {}", msg);
    }

    #[test]
    fn test_parse_bad_assessment_year() {
        let text = csv(SLABS_HEADER, &["twenty,New,0,400000,0"]);

        let result = RulesLoader::parse_slabs(text.as_bytes());

        assert!(matches!(result, Err(RulesLoaderError::CsvParse(_))));
    }

    #[test]
    fn test_parse_missing_column() {
        let text = "assessment_year,regime,income_from\n2026-27,New,0";

        let err = RulesLoader::parse_slabs(text.as_bytes()).expect_err("Should fail for missing column");

        let RulesLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(msg.contains("missing field"), "Expected 'missing field' in error, got: {}", msg);
    }

    #[test]
    fn test_parse_empty_csv() {
        let records = RulesLoader::parse_slabs(format!("{SLABS_HEADER}\n").as_bytes())
            .expect("Failed to parse CSV");

        assert!(records.is_empty());
    }

    // =========================================================================
    // assembly
    // =========================================================================

    #[test]
    fn test_assemble_sorts_slabs_and_splits_deductions() {
        let rules = RulesLoader::load(TEST_SLABS.as_bytes(), TEST_REGIMES.as_bytes())
            .expect("Failed to load rules");

        let year = rules.get(AssessmentYear(2026)).expect("year loaded");
        let froms: Vec<_> = year.new.slabs.iter().map(|s| s.income_from).collect();
        assert_eq!(froms, vec![dec!(0), dec!(400000), dec!(800000), dec!(1200000)]);
        assert_eq!(year.old.deductions, vec!["80C", "80D", "HRA"]);
        assert!(year.new.deductions.is_empty());
        assert_eq!(
            year.new.rebate,
            Some(RebateRule {
                income_limit: dec!(1200000),
                max_rebate: dec!(60000),
                marginal_relief: true,
            })
        );
        assert_eq!(year.levies, LevyConfig::default());
    }

    #[test]
    fn test_assemble_rejects_gap_in_slabs() {
        let slabs = csv(
            SLABS_HEADER,
            &[
                "2026-27,Old,0,250000,0",
                "2026-27,Old,300000,,5",
                "2026-27,New,0,,0",
            ],
        );

        let err = RulesLoader::load(slabs.as_bytes(), TEST_REGIMES.as_bytes())
            .expect_err("Should reject non-contiguous slabs");

        assert!(
            matches!(
                err,
                RulesLoaderError::InvalidTable {
                    source: SlabTableError::NotContiguous { .. },
                    ..
                }
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn test_assemble_rejects_missing_slabs() {
        let slabs = csv(SLABS_HEADER, &["2026-27,Old,0,,0"]);

        let err = RulesLoader::load(slabs.as_bytes(), TEST_REGIMES.as_bytes())
            .expect_err("Should reject a regime without slabs");

        assert!(matches!(
            err,
            RulesLoaderError::InvalidTable {
                source: SlabTableError::Empty(RegimeKind::New),
                ..
            }
        ));
    }

    #[test]
    fn test_assemble_rejects_missing_regime() {
        let regimes = csv(
            REGIMES_HEADER,
            &["2026-27,Old,50000,300000,500000,500000,12500,false,,"],
        );

        let err = RulesLoader::load(TEST_SLABS.as_bytes(), regimes.as_bytes())
            .expect_err("Should reject a year with one regime");

        assert!(matches!(
            err,
            RulesLoaderError::MissingRegime {
                regime: RegimeKind::New,
                ..
            }
        ));
    }

    #[test]
    fn test_assemble_rejects_duplicate_regime() {
        let regimes = csv(
            REGIMES_HEADER,
            &[
                "2026-27,New,75000,,,1200000,60000,true,25,",
                "2026-27,New,75000,,,1200000,60000,true,25,",
            ],
        );

        let err = RulesLoader::load(TEST_SLABS.as_bytes(), regimes.as_bytes())
            .expect_err("Should reject duplicate rows");

        assert!(matches!(err, RulesLoaderError::DuplicateRegime { .. }));
    }

    #[test]
    fn test_assemble_rejects_half_rebate() {
        let regimes = csv(
            REGIMES_HEADER,
            &[
                "2026-27,Old,50000,300000,500000,500000,,false,,",
                "2026-27,New,75000,,,1200000,60000,true,25,",
            ],
        );

        let err = RulesLoader::load(TEST_SLABS.as_bytes(), regimes.as_bytes())
            .expect_err("Should reject rebate without maximum");

        assert!(matches!(
            err,
            RulesLoaderError::IncompleteRebate {
                regime: RegimeKind::Old,
                ..
            }
        ));
    }

    #[test]
    fn test_assemble_rejects_unknown_regime() {
        let slabs = csv(SLABS_HEADER, &["2026-27,Middle,0,,0"]);

        let err = RulesLoader::load(slabs.as_bytes(), TEST_REGIMES.as_bytes())
            .expect_err("Should reject unknown regime");

        match err {
            RulesLoaderError::UnknownRegime(ref name) => assert_eq!(name, "Middle"),
            other => panic!("expected UnknownRegime, got {other:?}"),
        }
    }

    #[test]
    fn test_loader_errors_convert_to_rules_errors() {
        let invalid: RulesError = RulesLoaderError::InvalidTable {
            year: AssessmentYear(2026),
            source: SlabTableError::Empty(RegimeKind::Old),
        }
        .into();
        let load: RulesError = RulesLoaderError::UnknownRegime("x".to_string()).into();

        assert_eq!(invalid, RulesError::Invalid(SlabTableError::Empty(RegimeKind::Old)));
        assert!(matches!(load, RulesError::Load(_)));
    }
}
