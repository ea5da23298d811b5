//! External data sources.

pub mod llama;

pub use llama::*;
