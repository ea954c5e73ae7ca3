//! Pluggable origins of tax reference data.

mod registry;
mod source;

pub use registry::RulesSourceRegistry;
pub use source::{RulesConfig, RulesError, RulesSource};
