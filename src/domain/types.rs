//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - deserialized straight from the yields API payloads
//! - used in-memory for filtering/grouping
//! - exported to CSV or rendered in tables/charts

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Pool category shown in the dashboard.
///
/// Every curated pool belongs to exactly one of these; the category is
/// assigned on our side (the API does not carry it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PoolCategory {
    Lending,
    LiquidStaking,
    YieldAggregator,
}

impl PoolCategory {
    pub const ALL: [PoolCategory; 3] = [
        PoolCategory::Lending,
        PoolCategory::LiquidStaking,
        PoolCategory::YieldAggregator,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            PoolCategory::Lending => "Lending",
            PoolCategory::LiquidStaking => "Liquid Staking",
            PoolCategory::YieldAggregator => "Yield Aggregator",
        }
    }

    /// Whether viewing pool detail in this category requires a connected wallet.
    ///
    /// Only the Yield Aggregator category is gated; the pool *table* is never
    /// gated, only detail/chart access.
    pub fn requires_wallet(self) -> bool {
        matches!(self, PoolCategory::YieldAggregator)
    }

    /// Curated pool IDs for this category, in display order.
    pub fn curated_ids(self) -> &'static [&'static str] {
        match self {
            PoolCategory::Lending => &[
                "db678df9-3281-4bc2-a8bb-01160ffd6d48", // aave-v3
                "c1ca08e4-d618-415e-ad63-fcec58705469", // compound-v3
                "8edfdf02-cdbb-43f7-bca6-954e5fe56813", // maple
            ],
            PoolCategory::LiquidStaking => &[
                "747c1d2a-c668-4682-b9f9-296708a3dd90", // lido
                "80b8bf92-b953-4c20-98ea-c9653ef2bb98", // binance-staked-eth
                "90bfb3c2-5d35-4959-a275-ba5085b08aa3", // stader
            ],
            PoolCategory::YieldAggregator => &[
                "107fb915-ab29-475b-b526-d0ed0d3e6110", // cian-yield-layer
                "05a3d186-2d42-4e21-b1f0-68c079d22677", // yearn-finance
                "1977885c-d5ae-4c9e-b4df-863b7e1578e6", // beefy
            ],
        }
    }

    /// Look up the category a curated pool ID belongs to.
    pub fn of_pool(pool_id: &str) -> Option<PoolCategory> {
        PoolCategory::ALL
            .into_iter()
            .find(|c| c.curated_ids().contains(&pool_id))
    }
}

/// One pool record from the yields API (`GET /pools`).
///
/// Field names follow the API's camelCase payload; most analytics fields are
/// optional because the API omits them for many pools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    /// Opaque pool ID.
    pub pool: String,
    #[serde(default)]
    pub chain: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub tvl_usd: f64,
    pub apy: Option<f64>,
    #[serde(rename = "apyMean30d")]
    pub apy_mean_30d: Option<f64>,
    pub apy_base: Option<f64>,
    pub apy_reward: Option<f64>,
    pub sigma: Option<f64>,
    pub stablecoin: Option<bool>,
    pub il_risk: Option<String>,
    pub exposure: Option<String>,
    pub pool_meta: Option<String>,
    pub predictions: Option<PoolPredictions>,
}

/// Model-based APY outlook attached to some pools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolPredictions {
    pub predicted_class: Option<String>,
    pub predicted_probability: Option<f64>,
    pub binned_confidence: Option<f64>,
}

/// A pool resolved to its curated category.
#[derive(Debug, Clone)]
pub struct CategorizedPool {
    pub category: PoolCategory,
    pub pool: Pool,
}

/// Client-side filter over a pool list.
#[derive(Debug, Clone, Default)]
pub struct PoolFilter {
    pub category: Option<PoolCategory>,
    pub min_tvl: Option<f64>,
    pub max_tvl: Option<f64>,
    pub min_apy: Option<f64>,
    pub max_apy: Option<f64>,
}

impl PoolFilter {
    pub fn matches(&self, entry: &CategorizedPool) -> bool {
        if let Some(category) = self.category {
            if entry.category != category {
                return false;
            }
        }
        let tvl = entry.pool.tvl_usd;
        if self.min_tvl.is_some_and(|min| tvl < min) {
            return false;
        }
        if self.max_tvl.is_some_and(|max| tvl > max) {
            return false;
        }
        // Pools without a reported APY fail any APY bound.
        if self.min_apy.is_some() || self.max_apy.is_some() {
            let Some(apy) = entry.pool.apy else {
                return false;
            };
            if self.min_apy.is_some_and(|min| apy < min) {
                return false;
            }
            if self.max_apy.is_some_and(|max| apy > max) {
                return false;
            }
        }
        true
    }
}

/// One raw observation from the chart endpoint (`GET /chart/{pool}`).
///
/// No ordering or uniqueness is guaranteed across a payload: samples may be
/// unsorted, duplicated, or missing their rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSample {
    pub timestamp: String,
    pub apy: Option<f64>,
}

/// One point of the canonical monthly series: at most one per calendar month,
/// rate defaulted to `0.0` when the source omitted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySample {
    pub timestamp: String,
    pub apy: f64,
}

/// Wallet-connection capability.
///
/// The connection protocol itself is out of scope; upstream this is an
/// external collaborator, so we model only the boolean it supplies.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalletSession {
    connected: bool,
}

impl WalletSession {
    pub fn connected() -> Self {
        Self { connected: true }
    }

    pub fn is_connected(self) -> bool {
        self.connected
    }

    pub fn connect(&mut self) {
        self.connected = true;
    }

    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// Whether this session may open detail/chart views for `category`.
    pub fn may_view(self, category: PoolCategory) -> bool {
        !category.requires_wallet() || self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(tvl: f64, apy: Option<f64>) -> CategorizedPool {
        CategorizedPool {
            category: PoolCategory::Lending,
            pool: Pool {
                pool: "p".to_string(),
                chain: "Ethereum".to_string(),
                project: "aave-v3".to_string(),
                symbol: "USDC".to_string(),
                tvl_usd: tvl,
                apy,
                apy_mean_30d: None,
                apy_base: None,
                apy_reward: None,
                sigma: None,
                stablecoin: None,
                il_risk: None,
                exposure: None,
                pool_meta: None,
                predictions: None,
            },
        }
    }

    #[test]
    fn curated_ids_map_back_to_their_category() {
        for category in PoolCategory::ALL {
            for id in category.curated_ids() {
                assert_eq!(PoolCategory::of_pool(id), Some(category));
            }
        }
        assert_eq!(PoolCategory::of_pool("not-a-pool"), None);
    }

    #[test]
    fn only_yield_aggregator_is_gated() {
        assert!(!PoolCategory::Lending.requires_wallet());
        assert!(!PoolCategory::LiquidStaking.requires_wallet());
        assert!(PoolCategory::YieldAggregator.requires_wallet());

        let disconnected = WalletSession::default();
        assert!(disconnected.may_view(PoolCategory::Lending));
        assert!(!disconnected.may_view(PoolCategory::YieldAggregator));
        assert!(WalletSession::connected().may_view(PoolCategory::YieldAggregator));
    }

    #[test]
    fn filter_bounds() {
        let f = PoolFilter {
            min_tvl: Some(1_000_000.0),
            min_apy: Some(2.0),
            ..PoolFilter::default()
        };
        assert!(f.matches(&pool(5_000_000.0, Some(3.0))));
        assert!(!f.matches(&pool(500_000.0, Some(3.0))));
        assert!(!f.matches(&pool(5_000_000.0, Some(1.0))));
        // Missing APY fails an APY bound.
        assert!(!f.matches(&pool(5_000_000.0, None)));
        // ...but passes a TVL-only filter.
        let tvl_only = PoolFilter {
            min_tvl: Some(1_000_000.0),
            ..PoolFilter::default()
        };
        assert!(tvl_only.matches(&pool(5_000_000.0, None)));
    }

    #[test]
    fn filter_by_category() {
        let f = PoolFilter {
            category: Some(PoolCategory::LiquidStaking),
            ..PoolFilter::default()
        };
        assert!(!f.matches(&pool(1.0, None)));
    }
}
