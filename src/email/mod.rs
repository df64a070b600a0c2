pub mod template;

use anyhow::Result;
use serde_json::json;

use std::sync::OnceLock;

use crate::config::Config;
use crate::constant::RESEND_API_URL;

/// HTTP mail-API wrapper. Delivery semantics past the provider's 2xx
/// (bounces, provider-side retries) are out of this component's hands.
pub struct Mailer {
    client: reqwest::Client,
    api_key: String,
}

impl Mailer {
    pub fn get() -> &'static Self {
        static INSTANCE: OnceLock<Mailer> = OnceLock::new();
        INSTANCE.get_or_init(|| Mailer::new(Config::get().resend_api_key.clone()))
    }

    pub fn new(api_key: String) -> Self {
        Mailer {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    pub async fn send(&self, subject: &str, html: &str) -> Result<()> {
        let config = Config::get();
        let body = json!({
            "from": config.digest_from,
            "to": config.digest_recipients,
            "subject": subject,
            "html": html,
        });

        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Mail dispatch failed with {}: {}", status, text));
        }

        tracing::info!(
            "Digest sent to {} recipient(s)",
            config.digest_recipients.len()
        );
        Ok(())
    }
}
