//! Income-tax worksheets built on the slab engine.
//!
//! This module turns gross income and claimed deductions into tax payable
//! under a regime, and compares both regimes of a year.

pub mod comparison;
pub mod regime;

pub use comparison::RegimeComparison;
pub use regime::{RegimeWorksheet, RegimeWorksheetInput, RegimeWorksheetResult, WorksheetError};
