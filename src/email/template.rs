use base64::{engine::general_purpose, Engine as _};

use crate::insight::ValidatedInsight;
use crate::price::coingecko::MarketSnapshot;

/// Renders the digest HTML. Sections degrade independently: a missing
/// heatmap, an empty table or an empty insight list each drop their section
/// without affecting the rest.
pub fn render_digest(
    date: &str,
    heatmap_png: Option<&[u8]>,
    markets: &[MarketSnapshot],
    insights: &[ValidatedInsight],
) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        "<h1 style=\"font-family:Arial,sans-serif\">Daily Market Digest</h1>\n\
         <p style=\"color:#666\">{}</p>\n",
        escape(date)
    ));

    if let Some(png) = heatmap_png {
        let encoded = general_purpose::STANDARD.encode(png);
        body.push_str(&format!(
            "<h2>Market Heatmap</h2>\n\
             <img src=\"data:image/png;base64,{encoded}\" alt=\"Market heatmap\" width=\"640\"/>\n"
        ));
    }

    if !markets.is_empty() {
        body.push_str("<h2>Token Performance</h2>\n<table border=\"1\" cellpadding=\"6\" cellspacing=\"0\">\n");
        body.push_str("<tr><th>Token</th><th>Price (USD)</th><th>24h</th><th>Market Cap</th><th>Volume</th></tr>\n");
        for snapshot in markets {
            let change = snapshot
                .price_change_percentage_24h
                .map(|pct| format!("{pct:+.2}%"))
                .unwrap_or_else(|| "n/a".to_string());
            body.push_str(&format!(
                "<tr><td>{} ({})</td><td>{:.2}</td><td>{}</td><td>{:.0}</td><td>{:.0}</td></tr>\n",
                escape(&snapshot.name),
                escape(&snapshot.symbol.to_uppercase()),
                snapshot.current_price,
                change,
                snapshot.market_cap,
                snapshot.total_volume,
            ));
        }
        body.push_str("</table>\n");
    }

    // An empty insight list is a normal outcome: omit the section entirely.
    if !insights.is_empty() {
        body.push_str("<h2>Market Insights</h2>\n");
        for insight in insights {
            body.push_str(&format!(
                "<h3>{}</h3>\n<p>{} <a href=\"{}\">Read more</a></p>\n",
                escape(&insight.title),
                escape(&insight.description),
                escape(&insight.link),
            ));
        }
    }

    format!(
        "<html><body style=\"font-family:Arial,sans-serif;max-width:680px;margin:auto\">\n{body}</body></html>"
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
