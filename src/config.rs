use serde::{Deserialize, Serialize};

use std::sync::OnceLock;

use crate::constant::*;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    // Perplexity (insight completion) configuration
    pub perplexity_api_key: Option<String>,
    pub perplexity_api_base: String,
    pub perplexity_model: String,

    // Price API configuration
    pub coingecko_api_key: Option<String>,
    pub digest_token_ids: Vec<String>,

    // Heatmap capture configuration
    pub screenshot_api_key: Option<String>,
    pub heatmap_page_url: String,

    // Email configuration
    pub resend_api_key: String,
    pub digest_from: String,
    pub digest_recipients: Vec<String>,

    // Scheduling
    pub digest_interval_hours: u64,
}

impl Config {
    pub fn get() -> &'static Config {
        static INSTANCE: OnceLock<Config> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let perplexity_api_key = std::env::var("PERPLEXITY_API_KEY").ok();
            let perplexity_api_base = std::env::var("PERPLEXITY_API_BASE")
                .unwrap_or_else(|_| PERPLEXITY_API_BASE.into());
            let perplexity_model =
                std::env::var("PERPLEXITY_MODEL").unwrap_or_else(|_| "sonar".into());

            let coingecko_api_key = std::env::var("COINGECKO_API_KEY").ok();
            let digest_token_ids = std::env::var("DIGEST_TOKEN_IDS")
                .unwrap_or_else(|_| DEFAULT_DIGEST_TOKENS.into())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();

            let screenshot_api_key = std::env::var("SCREENSHOT_API_KEY").ok();
            let heatmap_page_url = std::env::var("HEATMAP_PAGE_URL")
                .unwrap_or_else(|_| "https://coin360.com".into());

            let resend_api_key =
                std::env::var("RESEND_API_KEY").expect("RESEND_API_KEY is not set");
            let digest_from = std::env::var("DIGEST_FROM")
                .unwrap_or_else(|_| "Market Digest <digest@updates.local>".into());
            let digest_recipients = std::env::var("DIGEST_RECIPIENTS")
                .expect("DIGEST_RECIPIENTS is not set")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();

            let digest_interval_hours = std::env::var("DIGEST_INTERVAL_HOURS")
                .unwrap_or_else(|_| "24".into())
                .parse()
                .expect("DIGEST_INTERVAL_HOURS must be a valid u64");

            Config {
                perplexity_api_key,
                perplexity_api_base,
                perplexity_model,
                coingecko_api_key,
                digest_token_ids,
                screenshot_api_key,
                heatmap_page_url,
                resend_api_key,
                digest_from,
                digest_recipients,
                digest_interval_hours,
            }
        })
    }
}
