use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use std::sync::OnceLock;

use crate::config::Config;

/// One row of the digest's token performance table, as returned by the
/// CoinGecko markets endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub total_volume: f64,
    pub price_change_percentage_24h: Option<f64>,
}

pub struct CoinGeckoProvider {
    client: Client,
    api_key: Option<String>,
}

impl CoinGeckoProvider {
    pub fn get() -> &'static Self {
        static INSTANCE: OnceLock<CoinGeckoProvider> = OnceLock::new();
        INSTANCE.get_or_init(|| CoinGeckoProvider::new(Config::get().coingecko_api_key.clone()))
    }

    pub fn new(api_key: Option<String>) -> Self {
        CoinGeckoProvider {
            client: Client::new(),
            api_key,
        }
    }

    /// Current price, market cap, volume and 24h change for the given coin
    /// ids, in the requested order.
    pub async fn get_markets(
        &self,
        coin_ids: &[String],
        vs_currency: &str,
    ) -> Result<Vec<MarketSnapshot>> {
        let url = format!(
            "https://api.coingecko.com/api/v3/coins/markets?vs_currency={}&ids={}",
            vs_currency,
            coin_ids.join(",")
        );

        let mut request = self.client.get(&url);
        if let Some(api_key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", api_key);
        }

        let snapshots: Vec<MarketSnapshot> = request.send().await?.json().await?;

        // The endpoint orders by market cap; restore the configured order.
        let mut ordered = Vec::with_capacity(coin_ids.len());
        for coin_id in coin_ids {
            if let Some(snapshot) = snapshots.iter().find(|s| &s.id == coin_id) {
                ordered.push(snapshot.clone());
            } else {
                tracing::warn!("No market data returned for {}", coin_id);
            }
        }

        Ok(ordered)
    }
}
