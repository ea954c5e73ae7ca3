use std::fs::File;
use std::path::Path;

use itr_core::{RulesConfig, RulesError, RulesSource, RulesSourceRegistry, TaxRules};
use tracing::debug;

use crate::loader::RulesLoader;

pub const SLABS_FILE: &str = "slabs.csv";
pub const REGIMES_FILE: &str = "regimes.csv";

const BUILTIN_SLABS: &str = include_str!("../data/slabs.csv");
const BUILTIN_REGIMES: &str = include_str!("../data/regimes.csv");

/// Reference data compiled into the binary.
pub struct BuiltinRulesSource;

impl RulesSource for BuiltinRulesSource {
    fn source_name(&self) -> &'static str {
        "builtin"
    }

    fn load(
        &self,
        _config: &RulesConfig,
    ) -> Result<TaxRules, RulesError> {
        Ok(RulesLoader::load(
            BUILTIN_SLABS.as_bytes(),
            BUILTIN_REGIMES.as_bytes(),
        )?)
    }
}

/// Reads `slabs.csv` and `regimes.csv` from the configured directory.
pub struct CsvRulesSource;

impl CsvRulesSource {
    /// Loads rules from `dir` directly, without going through a registry.
    pub fn load_dir(dir: &Path) -> Result<TaxRules, RulesError> {
        let slabs = open(&dir.join(SLABS_FILE))?;
        let regimes = open(&dir.join(REGIMES_FILE))?;
        debug!(dir = %dir.display(), "loading tax rules from CSV");
        Ok(RulesLoader::load(slabs, regimes)?)
    }
}

impl RulesSource for CsvRulesSource {
    fn source_name(&self) -> &'static str {
        "csv"
    }

    fn load(
        &self,
        config: &RulesConfig,
    ) -> Result<TaxRules, RulesError> {
        let dir = config.location.as_deref().ok_or_else(|| {
            RulesError::Configuration("the csv rules source needs a location directory".to_string())
        })?;
        Self::load_dir(dir)
    }
}

fn open(path: &Path) -> Result<File, RulesError> {
    File::open(path).map_err(|err| RulesError::Load(format!("{}: {err}", path.display())))
}

/// A registry with every source this crate provides.
pub fn default_registry() -> RulesSourceRegistry {
    let mut registry = RulesSourceRegistry::new();
    registry.register(Box::new(BuiltinRulesSource));
    registry.register(Box::new(CsvRulesSource));
    registry
}

/// Loads the compiled-in rules.
pub fn builtin_rules() -> Result<TaxRules, RulesError> {
    BuiltinRulesSource.load(&RulesConfig::default())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use itr_core::AssessmentYear;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn builtin_rules_cover_three_years() {
        let rules = builtin_rules().unwrap();

        assert_eq!(
            rules.years(),
            vec![AssessmentYear(2024), AssessmentYear(2025), AssessmentYear(2026)]
        );
        assert_eq!(rules.latest().map(|r| r.assessment_year), Some(AssessmentYear(2026)));
    }

    #[test]
    fn default_registry_offers_builtin_and_csv() {
        assert_eq!(default_registry().available_sources(), vec!["builtin", "csv"]);
    }

    #[test]
    fn csv_source_requires_location() {
        let result = CsvRulesSource.load(&RulesConfig {
            source: "csv".to_string(),
            location: None,
        });

        assert!(matches!(result, Err(RulesError::Configuration(_))));
    }

    #[test]
    fn csv_source_reads_bundled_directory() {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data");

        let rules = default_registry()
            .load(&RulesConfig {
                source: "csv".to_string(),
                location: Some(dir),
            })
            .unwrap();

        assert_eq!(rules, builtin_rules().unwrap());
    }

    #[test]
    fn missing_directory_is_a_load_error() {
        let result = CsvRulesSource::load_dir(Path::new("/definitely/not/here"));

        match result {
            Err(RulesError::Load(msg)) => assert!(msg.contains("slabs.csv"), "got {msg}"),
            other => panic!("expected Load error, got {other:?}"),
        }
    }
}
