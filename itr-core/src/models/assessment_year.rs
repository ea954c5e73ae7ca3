use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error returned when an assessment year label cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid assessment year '{0}' (expected e.g. 2026-27)")]
pub struct ParseAssessmentYearError(pub String);

/// An Indian assessment year, identified by the calendar year it starts in.
///
/// Income earned in financial year 2025-26 (1 April 2025 to 31 March 2026)
/// is assessed in assessment year 2026-27, represented as
/// `AssessmentYear(2026)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssessmentYear(pub i32);

impl AssessmentYear {
    /// The assessment year for income earned during the financial year that
    /// contains `date`.
    pub fn for_income_on(date: NaiveDate) -> Self {
        // Financial years start on 1 April.
        let fy_start = if date.month() >= 4 {
            date.year()
        } else {
            date.year() - 1
        };
        Self(fy_start + 1)
    }

    /// The assessment year for income earned in the current financial year.
    pub fn current() -> Self {
        Self::for_income_on(Local::now().date_naive())
    }

    pub fn start_year(&self) -> i32 {
        self.0
    }

    /// The financial year the assessed income was earned in, as a label.
    pub fn financial_year(&self) -> String {
        AssessmentYear(self.0 - 1).to_string()
    }
}

impl fmt::Display for AssessmentYear {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}-{:02}", self.0, (self.0 + 1).rem_euclid(100))
    }
}

impl FromStr for AssessmentYear {
    type Err = ParseAssessmentYearError;

    /// Accepts `2026-27`, `2026-2027` or a bare `2026`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseAssessmentYearError(s.to_string());
        let trimmed = s.trim();
        let (start, end) = match trimmed.split_once('-') {
            Some((start, end)) => (start, Some(end)),
            None => (trimmed, None),
        };

        if start.len() != 4 {
            return Err(err());
        }
        let start: i32 = start.parse().map_err(|_| err())?;

        if let Some(end) = end {
            let expected = start + 1;
            let matches = match end.len() {
                2 => end.parse::<i32>().ok() == Some(expected.rem_euclid(100)),
                4 => end.parse::<i32>().ok() == Some(expected),
                _ => false,
            };
            if !matches {
                return Err(err());
            }
        }

        Ok(Self(start))
    }
}

impl Serialize for AssessmentYear {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AssessmentYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
