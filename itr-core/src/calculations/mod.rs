//! Income-tax calculation modules.
//!
//! This module provides the progressive slab engine and the worksheets
//! layered on it, plus the rounding helpers they share.

pub mod common;
pub mod slab_engine;
pub mod worksheets;

pub use slab_engine::SlabTaxEngine;
pub use worksheets::{
    RegimeComparison, RegimeWorksheet, RegimeWorksheetInput, RegimeWorksheetResult,
    WorksheetError,
};
