use anyhow::Result;
use chrono::Utc;

use std::time::Duration;

use crate::config::Config;
use crate::constant::USD_CURRENCY;
use crate::email::template::render_digest;
use crate::email::Mailer;
use crate::heatmap::capture_heatmap;
use crate::insight::fetch_market_insights;
use crate::price::coingecko::CoinGeckoProvider;

pub struct Digest;

impl Digest {
    pub fn new() -> Self {
        Digest
    }

    /// Assembles and dispatches one digest. Section failures degrade to an
    /// omitted section; only mail dispatch itself can fail the run.
    pub async fn run_once(&self) -> Result<()> {
        tracing::info!("Assembling daily digest");
        let config = Config::get();

        let heatmap = match capture_heatmap().await {
            Ok(heatmap) => heatmap,
            Err(e) => {
                tracing::error!("Failed to capture heatmap: {}", e);
                None
            }
        };

        let markets = match CoinGeckoProvider::get()
            .get_markets(&config.digest_token_ids, USD_CURRENCY)
            .await
        {
            Ok(markets) => markets,
            Err(e) => {
                tracing::error!("Failed to fetch market data: {}", e);
                vec![]
            }
        };

        let insights = fetch_market_insights().await;

        let date = Utc::now().format("%B %-d, %Y").to_string();
        let html = render_digest(&date, heatmap.as_deref(), &markets, &insights);
        let subject = format!("Daily Market Digest: {date}");

        Mailer::get().send(&subject, &html).await?;
        Ok(())
    }

    pub async fn run_loop(&self) -> Result<()> {
        let mut round = 1;
        let interval = Duration::from_secs(60 * 60 * Config::get().digest_interval_hours);
        let mut timer = tokio::time::interval(interval);

        loop {
            timer.tick().await;
            tracing::info!("Running digest round {}", round);

            if let Err(e) = self.run_once().await {
                tracing::error!("Failed to send digest: {}", e);
            }

            tracing::info!("Digest round {} completed", round);
            round += 1;
        }
    }
}
