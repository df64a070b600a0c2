use anyhow::Result;

use crate::config::Config;
use crate::constant::SCREENSHOT_API_URL;

/// Captures a PNG of the configured market-heatmap page through the
/// screenshot API. Returns `None` when capture is not configured; the
/// digest simply omits the image.
pub async fn capture_heatmap() -> Result<Option<Vec<u8>>> {
    let config = Config::get();
    let Some(api_key) = &config.screenshot_api_key else {
        tracing::warn!("SCREENSHOT_API_KEY not set, digest will omit the heatmap");
        return Ok(None);
    };

    let response = reqwest::Client::new()
        .get(SCREENSHOT_API_URL)
        .query(&[
            ("access_key", api_key.as_str()),
            ("url", config.heatmap_page_url.as_str()),
            ("format", "png"),
            ("viewport_width", "1280"),
            ("viewport_height", "800"),
            ("block_cookie_banners", "true"),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(anyhow::anyhow!("Heatmap capture failed with {}", status));
    }

    let bytes = response.bytes().await?;
    tracing::info!("Captured heatmap image ({} bytes)", bytes.len());
    Ok(Some(bytes.to_vec()))
}
