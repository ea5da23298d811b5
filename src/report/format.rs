//! Formatted terminal output for pool tables, detail blocks, and series.

use crate::domain::{CategorizedPool, MonthlySample, Pool, PoolCategory, PoolFilter};
use crate::series::parse_timestamp;

/// Format a USD amount with B/M/K scaling: `$1.23B`, `$45.60M`, `$789.00K`,
/// else plain `$12.34`.
pub fn format_currency(value: f64) -> String {
    if value >= 1e9 {
        format!("${:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("${:.2}M", value / 1e6)
    } else if value >= 1e3 {
        format!("${:.2}K", value / 1e3)
    } else {
        format!("${value:.2}")
    }
}

/// Format a percentage with two decimals.
pub fn format_percentage(value: f64) -> String {
    format!("{value:.2}%")
}

fn fmt_opt_pct(value: Option<f64>) -> String {
    value.map(format_percentage).unwrap_or_else(|| "N/A".to_string())
}

fn fmt_opt_sigma(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.3}"))
        .unwrap_or_else(|| "N/A".to_string())
}

fn predicted_probability(pool: &Pool) -> Option<f64> {
    pool.predictions
        .as_ref()
        .and_then(|p| p.predicted_probability)
}

/// Format the pool table for the `pools` command.
///
/// Pools are listed in category order; the filter is applied client-side.
pub fn format_pool_table(pools: &[CategorizedPool], filter: &PoolFilter) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{:<18} {:<16} {:<12} {:<10} {:>10} {:>8} {:>9} {:>7} {:>7}\n",
        "category", "project", "symbol", "chain", "tvl", "apy", "apy(30d)", "pred", "sigma"
    ));
    out.push_str(&format!(
        "{:-<18} {:-<16} {:-<12} {:-<10} {:-<10} {:-<8} {:-<9} {:-<7} {:-<7}\n",
        "", "", "", "", "", "", "", "", ""
    ));

    let mut shown = 0usize;
    for entry in pools.iter().filter(|e| filter.matches(e)) {
        let p = &entry.pool;
        out.push_str(&format!(
            "{:<18} {:<16} {:<12} {:<10} {:>10} {:>8} {:>9} {:>7} {:>7}\n",
            truncate(entry.category.display_name(), 18),
            truncate(&p.project, 16),
            truncate(&p.symbol, 12),
            truncate(&p.chain, 10),
            format_currency(p.tvl_usd),
            fmt_opt_pct(p.apy),
            fmt_opt_pct(p.apy_mean_30d),
            fmt_opt_pct(predicted_probability(p)),
            fmt_opt_sigma(p.sigma),
        ));
        shown += 1;
    }

    if shown == 0 {
        out.push_str("(no pools match the filter)\n");
    }

    out
}

/// Format the detail block for the `show` command.
///
/// `category` is `None` for pools outside the curated set.
pub fn format_pool_details(p: &Pool, category: Option<PoolCategory>) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} - {} ({}) ===\n", p.project, p.symbol, p.chain));
    let category_label = category.map(|c| c.display_name()).unwrap_or("Uncategorized");
    out.push_str(&format!("Category: {category_label}\n"));
    out.push_str(&format!("Pool ID : {}\n", p.pool));
    out.push_str(&format!("TVL     : {}\n", format_currency(p.tvl_usd)));
    out.push_str(&format!("APY     : {}\n", fmt_opt_pct(p.apy)));
    out.push_str(&format!("APY 30d : {}\n", fmt_opt_pct(p.apy_mean_30d)));
    out.push_str(&format!("Sigma   : {}\n", fmt_opt_sigma(p.sigma)));

    if p.apy_base.is_some() || p.apy_reward.is_some() {
        out.push_str(&format!(
            "Split   : base {} | reward {}\n",
            fmt_opt_pct(p.apy_base),
            fmt_opt_pct(p.apy_reward)
        ));
    }
    if let Some(il_risk) = &p.il_risk {
        out.push_str(&format!("IL risk : {il_risk}\n"));
    }
    if let Some(exposure) = &p.exposure {
        out.push_str(&format!("Exposure: {exposure}\n"));
    }
    if let Some(meta) = &p.pool_meta {
        out.push_str(&format!("Meta    : {meta}\n"));
    }
    if let Some(predictions) = &p.predictions {
        let class = predictions.predicted_class.as_deref().unwrap_or("N/A");
        out.push_str(&format!(
            "Outlook : {class} ({})\n",
            fmt_opt_pct(predictions.predicted_probability)
        ));
    }

    out
}

/// Format the monthly series as a small table (`show` command).
pub fn format_monthly_series(series: &[MonthlySample]) -> String {
    let mut out = String::new();
    out.push_str("Monthly APY (trailing 12 months):\n");

    if series.is_empty() {
        out.push_str("(no chart data in the window)\n");
        return out;
    }

    out.push_str(&format!("{:<10} {:>8}\n", "month", "apy"));
    out.push_str(&format!("{:-<10} {:-<8}\n", "", ""));
    for sample in series {
        out.push_str(&format!(
            "{:<10} {:>8}\n",
            month_label(&sample.timestamp),
            format_percentage(sample.apy)
        ));
    }
    out
}

/// `YYYY-MM` label from a sample timestamp (falls back to the raw string).
pub fn month_label(timestamp: &str) -> String {
    match parse_timestamp(timestamp) {
        Some(instant) => instant.format("%Y-%m").to_string(),
        None => timestamp.to_string(),
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Pool, PoolCategory};

    fn entry() -> CategorizedPool {
        CategorizedPool {
            category: PoolCategory::Lending,
            pool: Pool {
                pool: "db678df9".to_string(),
                chain: "Ethereum".to_string(),
                project: "aave-v3".to_string(),
                symbol: "USDC".to_string(),
                tvl_usd: 1_234_000_000.0,
                apy: Some(3.456),
                apy_mean_30d: None,
                apy_base: None,
                apy_reward: None,
                sigma: Some(0.0123),
                stablecoin: Some(true),
                il_risk: None,
                exposure: None,
                pool_meta: None,
                predictions: None,
            },
        }
    }

    #[test]
    fn currency_scaling_thresholds() {
        assert_eq!(format_currency(2_500_000_000.0), "$2.50B");
        assert_eq!(format_currency(1e9), "$1.00B");
        assert_eq!(format_currency(45_600_000.0), "$45.60M");
        assert_eq!(format_currency(789_000.0), "$789.00K");
        assert_eq!(format_currency(999.99), "$999.99");
        assert_eq!(format_currency(0.0), "$0.00");
    }

    #[test]
    fn percentage_two_decimals() {
        assert_eq!(format_percentage(3.456), "3.46%");
        assert_eq!(format_percentage(0.0), "0.00%");
    }

    #[test]
    fn pool_table_shows_na_for_missing_analytics() {
        let table = format_pool_table(&[entry()], &PoolFilter::default());
        assert!(table.contains("aave-v3"));
        assert!(table.contains("$1.23B"));
        assert!(table.contains("3.46%"));
        assert!(table.contains("N/A"));
    }

    #[test]
    fn pool_table_reports_empty_filter_result() {
        let filter = PoolFilter {
            min_apy: Some(50.0),
            ..PoolFilter::default()
        };
        let table = format_pool_table(&[entry()], &filter);
        assert!(table.contains("(no pools match the filter)"));
    }

    #[test]
    fn detail_block_includes_category_and_id() {
        let e = entry();
        let block = format_pool_details(&e.pool, Some(e.category));
        assert!(block.contains("Category: Lending"));
        assert!(block.contains("Pool ID : db678df9"));
        assert!(block.contains("Sigma   : 0.012"));
    }

    #[test]
    fn detail_block_handles_uncategorized_pools() {
        let e = entry();
        let block = format_pool_details(&e.pool, None);
        assert!(block.contains("Category: Uncategorized"));
    }

    #[test]
    fn monthly_series_table_uses_month_labels() {
        let series = vec![
            MonthlySample {
                timestamp: "2024-01-15T00:00:00.000Z".to_string(),
                apy: 5.0,
            },
            MonthlySample {
                timestamp: "2024-02-10".to_string(),
                apy: 6.0,
            },
        ];
        let table = format_monthly_series(&series);
        assert!(table.contains("2024-01"));
        assert!(table.contains("2024-02"));
        assert!(table.contains("5.00%"));
    }

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("much-too-long", 6), "much-.");
    }
}
