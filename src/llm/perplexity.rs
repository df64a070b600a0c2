use anyhow::Result;
use reqwest::Client;
use serde_json::Value;

use std::sync::OnceLock;

use crate::config::Config;

/// Thin client for the search-grounded completion endpoint. Responses are
/// kept as raw JSON: besides the standard chat-completion fields the
/// envelope may carry `search_results`/`citations` containers whose shape
/// varies between models, and the insight pipeline probes them duck-typed.
pub struct PerplexityClient {
    client: Client,
    api_key: String,
    api_base: String,
}

impl PerplexityClient {
    pub fn get() -> &'static Self {
        static INSTANCE: OnceLock<PerplexityClient> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let config = Config::get();
            let api_key = config
                .perplexity_api_key
                .clone()
                .expect("Perplexity API key not found");
            PerplexityClient::new(api_key, config.perplexity_api_base.clone())
        })
    }

    pub fn new(api_key: String, api_base: String) -> Self {
        PerplexityClient {
            client: Client::new(),
            api_key,
            api_base,
        }
    }

    pub async fn create_completion(&self, body: &Value) -> Result<Value> {
        let url = format!("{}/chat/completions", self.api_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Completion request failed with {}: {}",
                status,
                text
            ));
        }

        Ok(response.json().await?)
    }
}
