use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static PAN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("PAN pattern compiles"));

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid PAN '{0}': expected five letters, four digits and a letter (AAAAA9999A)")]
pub struct InvalidPan(pub String);

/// Permanent Account Number, stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pan(String);

impl Pan {
    /// Accepts surrounding whitespace and lower-case letters.
    pub fn parse(raw: &str) -> Result<Self, InvalidPan> {
        let normalized = raw.trim().to_ascii_uppercase();
        if PAN_PATTERN.is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(InvalidPan(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The fourth character marks the holder type; `P` is an individual.
    pub fn is_individual(&self) -> bool {
        self.0.as_bytes()[3] == b'P'
    }
}

impl FromStr for Pan {
    type Err = InvalidPan;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Pan {
    type Error = InvalidPan;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Pan> for String {
    fn from(pan: Pan) -> Self {
        pan.0
    }
}

impl fmt::Display for Pan {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}
