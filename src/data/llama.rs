//! DeFi Llama yields API integration.
//!
//! Two endpoints, both wrapped in a `{ "data": [...] }` envelope:
//!
//! - `GET /pools` — every tracked pool with current TVL/APY analytics
//! - `GET /chart/{pool}` — historical APY samples for one pool

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::{Pool, RawSample};
use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "https://yields.llama.fi";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct LlamaClient {
    client: Client,
    base_url: String,
}

impl LlamaClient {
    /// Build a client, honoring an optional `YIELDS_BASE_URL` override from
    /// the environment (`.env` supported). The override also lets tests point
    /// the client at a local stub server.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let base_url =
            std::env::var("YIELDS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch every tracked pool.
    pub fn fetch_pools(&self) -> Result<Vec<Pool>, AppError> {
        let body: Envelope<Pool> = self.get_json(&format!("{}/pools", self.base_url))?;
        Ok(body.data)
    }

    /// Fetch the raw APY history for one pool, in whatever order and shape the
    /// API reports it. Shaping into a monthly series happens downstream.
    pub fn fetch_chart(&self, pool_id: &str) -> Result<Vec<RawSample>, AppError> {
        let body: Envelope<RawSample> =
            self.get_json(&format!("{}/chart/{pool_id}", self.base_url))?;
        Ok(body.data)
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<Envelope<T>, AppError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::network(format!("Yields API request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::network(format!(
                "Yields API request failed with status {}.",
                resp.status()
            )));
        }

        resp.json()
            .map_err(|e| AppError::network(format!("Failed to parse yields API response: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = LlamaClient::with_base_url("http://localhost:9999/").unwrap();
        assert_eq!(client.base_url, "http://localhost:9999");
    }

    #[test]
    fn envelope_defaults_to_empty_data() {
        let body: Envelope<RawSample> = serde_json::from_str("{}").unwrap();
        assert!(body.data.is_empty());
    }

    #[test]
    fn pool_payload_deserializes_from_camel_case() {
        let body: Envelope<Pool> = serde_json::from_str(
            r#"{"data":[{
                "pool": "db678df9-3281-4bc2-a8bb-01160ffd6d48",
                "chain": "Ethereum",
                "project": "aave-v3",
                "symbol": "USDC",
                "tvlUsd": 420000000.0,
                "apy": 3.21,
                "apyMean30d": 3.05,
                "apyBase": 3.0,
                "sigma": 0.012,
                "ilRisk": "no",
                "exposure": "single",
                "predictions": {"predictedClass": "Stable/Up", "predictedProbability": 71.0}
            }]}"#,
        )
        .unwrap();
        let pool = &body.data[0];
        assert_eq!(pool.project, "aave-v3");
        assert_eq!(pool.tvl_usd, 420_000_000.0);
        assert_eq!(pool.apy_mean_30d, Some(3.05));
        assert_eq!(pool.il_risk.as_deref(), Some("no"));
        let predictions = pool.predictions.as_ref().unwrap();
        assert_eq!(predictions.predicted_class.as_deref(), Some("Stable/Up"));
    }

    #[test]
    fn chart_payload_tolerates_missing_apy() {
        let body: Envelope<RawSample> = serde_json::from_str(
            r#"{"data":[
                {"timestamp": "2024-01-15T00:00:00.000Z", "apy": 5.0},
                {"timestamp": "2024-02-10T00:00:00.000Z"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(body.data.len(), 2);
        assert_eq!(body.data[0].apy, Some(5.0));
        assert_eq!(body.data[1].apy, None);
    }
}
