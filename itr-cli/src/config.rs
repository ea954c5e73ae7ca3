//! `itr-calc.toml`: optional settings file for the command-line tool.
//!
//! ```toml
//! log_level = "info"
//! log_file = "itr-calc.log"
//! assessment_year = "2026-27"
//!
//! [rules]
//! source = "csv"
//! location = "rules"
//! ```
//!
//! Relative paths are resolved against the directory holding the file.
//! Command-line flags override every value here.

use std::fs;
use std::path::{Path, PathBuf};

use itr_core::{AssessmentYear, RulesConfig};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "itr-calc.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config file '{path}': {message}")]
    Invalid { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Year used when a command does not name one.
    #[serde(default)]
    pub assessment_year: Option<AssessmentYear>,

    #[serde(default)]
    pub rules: RulesConfig,
}

impl AppConfig {
    /// Parses settings read from `path`. Relative paths are anchored to its directory.
    pub fn from_toml(
        text: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        let mut config: AppConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if config.rules.source.trim().is_empty() {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                message: "rules.source must not be empty".to_string(),
            });
        }
        if let Some(level) = &config.log_level
            && level.trim().is_empty()
        {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                message: "log_level must not be empty".to_string(),
            });
        }

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        config.rules.location = config.rules.location.map(|p| anchor(base_dir, p));
        config.log_file = config.log_file.map(|p| anchor(base_dir, p));

        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "reading config file");
        Self::from_toml(&text, path)
    }

    /// Loads `explicit` if given (it must exist), else [`DEFAULT_CONFIG_FILE`]
    /// from the working directory if present, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

fn anchor(
    base_dir: &Path,
    path: PathBuf,
) -> PathBuf {
    if path.is_relative() {
        base_dir.join(path)
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml("", Path::new("itr-calc.toml")).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.rules.source, "builtin");
    }

    #[test]
    fn parses_every_field_and_anchors_paths() {
        let text = r#"
log_level = "debug"
log_file = "logs/itr.log"
assessment_year = "2025-26"

[rules]
source = "csv"
location = "rules"
"#;

        let config = AppConfig::from_toml(text, Path::new("/etc/itr/itr-calc.toml")).unwrap();

        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.log_file, Some(PathBuf::from("/etc/itr/logs/itr.log")));
        assert_eq!(config.assessment_year, Some(AssessmentYear(2025)));
        assert_eq!(config.rules.source, "csv");
        assert_eq!(config.rules.location, Some(PathBuf::from("/etc/itr/rules")));
    }

    #[test]
    fn absolute_paths_are_kept() {
        let text = "[rules]\nsource = \"csv\"\nlocation = \"/srv/rules\"\n";

        let config = AppConfig::from_toml(text, Path::new("/etc/itr-calc.toml")).unwrap();

        assert_eq!(config.rules.location, Some(PathBuf::from("/srv/rules")));
    }

    #[test]
    fn bad_year_is_a_parse_error() {
        let result = AppConfig::from_toml("assessment_year = \"2026-28\"", Path::new("x.toml"));

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = AppConfig::from_toml("colour = \"blue\"", Path::new("x.toml"));

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn blank_rules_source_is_invalid() {
        let result = AppConfig::from_toml("[rules]\nsource = \" \"", Path::new("x.toml"));

        match result {
            Err(ConfigError::Invalid { message, .. }) => {
                assert_eq!(message, "rules.source must not be empty")
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = AppConfig::discover(Some(Path::new("/definitely/not/here.toml")));

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
