//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - pool records as reported by the yields API (`Pool`)
//! - category and filter types (`PoolCategory`, `PoolFilter`)
//! - chart sample types (`RawSample`, `MonthlySample`)
//! - the wallet-connection capability (`WalletSession`)

pub mod types;

pub use types::*;
