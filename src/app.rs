//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - fetches pools/charts from the yields API
//! - shapes the monthly series
//! - prints tables/plots or hands off to the TUI
//! - writes optional exports

use chrono::Utc;
use clap::Parser;

use crate::cli::{ChartArgs, Command, PoolsArgs, ShowArgs, TuiArgs};
use crate::data::LlamaClient;
use crate::domain::{PoolFilter, WalletSession};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `yd` binary.
pub fn run() -> Result<(), AppError> {
    // We want `yd` and `yd -c lending` to behave like `yd tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Pools(args) => handle_pools(args),
        Command::Show(args) => handle_show(args),
        Command::Chart(args) => handle_chart(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_pools(args: PoolsArgs) -> Result<(), AppError> {
    let client = LlamaClient::from_env()?;
    let dashboard = pipeline::load_dashboard(&client)?;

    let filter = PoolFilter {
        category: args.category,
        min_tvl: args.min_tvl,
        max_tvl: args.max_tvl,
        min_apy: args.min_apy,
        max_apy: args.max_apy,
    };

    print!("{}", crate::report::format_pool_table(&dashboard.pools, &filter));
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let client = LlamaClient::from_env()?;
    let wallet = wallet_from_flag(args.connect_wallet);
    let view = pipeline::load_pool_view(&client, &args.pool_id, wallet, Utc::now())?;

    println!("{}", crate::report::format_pool_details(&view.pool, view.category));
    print!("{}", crate::report::format_monthly_series(&view.series));
    Ok(())
}

fn handle_chart(args: ChartArgs) -> Result<(), AppError> {
    let client = LlamaClient::from_env()?;
    let wallet = wallet_from_flag(args.connect_wallet);
    let view = pipeline::load_pool_view(&client, &args.pool_id, wallet, Utc::now())?;

    let plot = crate::plot::render_ascii_chart(&view.series, args.width, args.height);
    println!("{plot}");

    if let Some(path) = &args.export {
        crate::io::export::write_series_csv(path, &view.series)?;
    }

    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    crate::tui::run(args)
}

fn wallet_from_flag(connect: bool) -> WalletSession {
    if connect {
        WalletSession::connected()
    } else {
        WalletSession::default()
    }
}

/// Rewrite argv so `yd` defaults to `yd tui`.
///
/// Rules:
/// - `yd`                      -> `yd tui`
/// - `yd -c lending ...`       -> `yd tui -c lending ...`
/// - `yd --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "pools" | "show" | "chart" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["yd"])), args(&["yd", "tui"]));
    }

    #[test]
    fn leading_flag_is_treated_as_tui_flag() {
        assert_eq!(
            rewrite_args(args(&["yd", "-c", "lending"])),
            args(&["yd", "tui", "-c", "lending"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["yd", "pools"])),
            args(&["yd", "pools"])
        );
        assert_eq!(
            rewrite_args(args(&["yd", "--help"])),
            args(&["yd", "--help"])
        );
    }
}
