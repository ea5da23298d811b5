//! Reporting utilities: tables, detail blocks, and value formatting.
//!
//! We keep formatting code in one place so:
//! - the fetch/shaping code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

pub mod format;

pub use format::*;
