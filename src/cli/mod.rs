//! Command-line parsing for the yields dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fetch/shaping code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::PoolCategory;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "yd", version, about = "DeFi yield-pool dashboard (yields.llama.fi)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the curated pools as a table, with optional filters.
    Pools(PoolsArgs),
    /// Show one pool's detail block and its monthly APY series.
    Show(ShowArgs),
    /// Render an ASCII chart of one pool's monthly APY series.
    Chart(ChartArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying fetch pipeline as `yd pools` / `yd show`,
    /// but renders results in a terminal UI using Ratatui.
    Tui(TuiArgs),
}

/// Options for the pool table.
#[derive(Debug, Parser, Clone)]
pub struct PoolsArgs {
    /// Only show pools in this category.
    #[arg(short = 'c', long, value_enum)]
    pub category: Option<PoolCategory>,

    /// Minimum TVL in USD.
    #[arg(long)]
    pub min_tvl: Option<f64>,

    /// Maximum TVL in USD.
    #[arg(long)]
    pub max_tvl: Option<f64>,

    /// Minimum APY in percent.
    #[arg(long)]
    pub min_apy: Option<f64>,

    /// Maximum APY in percent.
    #[arg(long)]
    pub max_apy: Option<f64>,
}

/// Options for the pool detail view.
#[derive(Debug, Parser, Clone)]
pub struct ShowArgs {
    /// Pool ID (as reported by the yields API).
    pub pool_id: String,

    /// Supply the wallet-connection capability (required for Yield Aggregator pools).
    #[arg(long)]
    pub connect_wallet: bool,
}

/// Options for the ASCII chart.
#[derive(Debug, Parser, Clone)]
pub struct ChartArgs {
    /// Pool ID (as reported by the yields API).
    pub pool_id: String,

    /// Supply the wallet-connection capability (required for Yield Aggregator pools).
    #[arg(long)]
    pub connect_wallet: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the monthly series to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for the TUI.
#[derive(Debug, Parser, Clone)]
pub struct TuiArgs {
    /// Category tab to open on launch.
    #[arg(short = 'c', long, value_enum)]
    pub category: Option<PoolCategory>,
}
