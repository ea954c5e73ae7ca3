pub mod calculations;
pub mod calculators;
pub mod filing;
pub mod models;
pub mod rules;

#[cfg(test)]
mod test_support;

pub use models::*;
pub use rules::{RulesConfig, RulesError, RulesSource, RulesSourceRegistry};
