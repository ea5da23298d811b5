//! Output helpers.
//!
//! - monthly-series CSV export (`export`)

pub mod export;

pub use export::*;
