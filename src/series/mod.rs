//! Time-series shaping for pool charts.
//!
//! The only non-trivial transform in the app lives here: collapsing a raw,
//! possibly-irregular APY history into one point per calendar month over the
//! trailing 12-month window (`monthly`).

pub mod monthly;

pub use monthly::*;
