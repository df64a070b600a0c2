mod config;
mod constant;
mod digest;
mod email;
mod heatmap;
mod insight;
mod llm;
mod price;

use anyhow::Result;

use crate::config::Config;
use crate::digest::Digest;

#[tokio::main]
async fn main() -> Result<()> {
    setup_env_and_tracing();

    let config = Config::get();
    tracing::info!(
        "Starting market digest agent ({} tokens, {} recipients)",
        config.digest_token_ids.len(),
        config.digest_recipients.len()
    );

    Digest::new().run_loop().await
}

pub fn setup_env_and_tracing() {
    dotenv::dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
