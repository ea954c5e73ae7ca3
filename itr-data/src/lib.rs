mod loader;
mod sources;

pub use loader::{RegimeRecord, RulesLoader, RulesLoaderError, SlabRecord};
pub use sources::{
    BuiltinRulesSource, CsvRulesSource, REGIMES_FILE, SLABS_FILE, builtin_rules, default_registry,
};
