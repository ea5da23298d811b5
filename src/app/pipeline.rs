//! Shared fetch/shape pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! pools fetch -> curated categorization, and
//! pool lookup -> chart fetch -> monthly series.
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::data::LlamaClient;
use crate::domain::{CategorizedPool, MonthlySample, Pool, PoolCategory, WalletSession};
use crate::error::AppError;
use crate::series::build_monthly_series;

/// The curated pool table, resolved against a live `/pools` payload.
#[derive(Debug, Clone)]
pub struct Dashboard {
    /// Curated pools in category order. Pools the API no longer reports are
    /// simply absent.
    pub pools: Vec<CategorizedPool>,
}

impl Dashboard {
    pub fn pools_in(&self, category: PoolCategory) -> Vec<&CategorizedPool> {
        self.pools
            .iter()
            .filter(|e| e.category == category)
            .collect()
    }
}

/// One pool's detail view: the record plus its canonical monthly APY series.
///
/// `category` is `None` for pools outside the curated set; they still resolve
/// and are shown uncategorized.
#[derive(Debug, Clone)]
pub struct PoolView {
    pub pool: Pool,
    pub category: Option<PoolCategory>,
    pub series: Vec<MonthlySample>,
}

/// Fetch `/pools` and resolve the curated set.
pub fn load_dashboard(client: &LlamaClient) -> Result<Dashboard, AppError> {
    let all = client.fetch_pools()?;
    Ok(Dashboard {
        pools: categorize_curated(all),
    })
}

/// Resolve one pool and its monthly series.
///
/// `wallet` supplies the gate check: Yield Aggregator pools are locked until
/// the session is connected. `now` anchors the trailing 12-month window.
pub fn load_pool_view(
    client: &LlamaClient,
    pool_id: &str,
    wallet: WalletSession,
    now: DateTime<Utc>,
) -> Result<PoolView, AppError> {
    let all = client.fetch_pools()?;
    let pool = all
        .into_iter()
        .find(|p| p.pool == pool_id)
        .ok_or_else(|| AppError::network(format!("Pool with ID {pool_id} not found.")))?;

    // Pools outside the curated set still resolve; they just carry no
    // category and are never gated.
    let category = PoolCategory::of_pool(pool_id);
    if let Some(category) = category {
        if !wallet.may_view(category) {
            return Err(AppError::gate(format!(
                "This {} pool is locked until you connect a crypto wallet.",
                category.display_name()
            )));
        }
    }

    let raw = client.fetch_chart(pool_id)?;
    let series = build_monthly_series(&raw, now);

    Ok(PoolView {
        pool,
        category,
        series,
    })
}

/// Map the curated pool IDs onto the live pool list, in category order.
///
/// IDs missing from the payload are skipped rather than erroring: a pool the
/// API dropped should not take the dashboard down.
pub fn categorize_curated(all: Vec<Pool>) -> Vec<CategorizedPool> {
    let mut by_id: HashMap<String, Pool> = all.into_iter().map(|p| (p.pool.clone(), p)).collect();

    let mut out = Vec::new();
    for category in PoolCategory::ALL {
        for id in category.curated_ids() {
            if let Some(pool) = by_id.remove(*id) {
                out.push(CategorizedPool { category, pool });
            }
        }
    }
    out
}
