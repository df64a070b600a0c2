use serde_json::{json, Value};

/// Builds the insight completion request: a market-analysis prompt plus a
/// structured-output schema pinning the reply to an `insights` array of
/// `{title, description, link}` objects. The model only probabilistically
/// honors the schema, so the response is re-validated downstream.
pub fn insight_request(model: &str) -> Value {
    let system = "You are a financial analyst writing the narrative section of a daily \
        crypto market digest. Base every claim on a specific article from a major \
        financial news outlet and include its URL.";

    let user = r#"Summarize the most important crypto market developments of the last 24 hours.

Return a JSON object with an "insights" array of 3 to 5 items. Each item must have:
- "title": a short headline (under 10 words)
- "description": two or three sentences on what happened and why it matters
- "link": the URL of the specific news article backing the insight

Only use articles from major financial news outlets (Bloomberg, Reuters, WSJ,
Financial Times, CNBC, MarketWatch, Yahoo Finance, The Economist, Forbes,
Business Insider, Nasdaq). Link to the article itself, never to a homepage or
market-data page."#;

    json!({
        "model": model,
        "messages": [
            {"role": "system", "content": system},
            {"role": "user", "content": user},
        ],
        "response_format": {
            "type": "json_schema",
            "json_schema": {
                "name": "market_insights",
                "schema": {
                    "type": "object",
                    "properties": {
                        "insights": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "title": {"type": "string"},
                                    "description": {"type": "string"},
                                    "link": {"type": "string"},
                                },
                                "required": ["title", "description", "link"],
                            },
                        },
                    },
                    "required": ["insights"],
                },
            },
        },
    })
}
