pub mod assemble;
pub mod citation;
pub mod parser;
pub mod validate;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::constant::MAX_DIGEST_INSIGHTS;
use crate::llm::perplexity::PerplexityClient;
use crate::llm::prompt::insight_request;

/// An insight exactly as the upstream model produced it. Every field is
/// untrusted: the link may be missing, malformed, or pointing anywhere.
#[derive(Debug, Clone, Deserialize)]
pub struct RawInsight {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: Option<String>,
}

/// An insight that passed source and article-shape validation. The link's
/// hostname is whitelisted and its description carries no `[n]` markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedInsight {
    pub title: String,
    pub description: String,
    pub link: String,
}

/// Runs the full extraction pipeline over a completion envelope. Total:
/// always returns a (possibly empty) sequence of at most five insights,
/// never an error, whatever shape the envelope is in.
pub fn extract_insights(envelope: &Value) -> Vec<ValidatedInsight> {
    let content = envelope
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let raw = parser::parse_insights(content);
    let citations = citation::extract_citations(envelope);
    tracing::debug!(
        "Extracted {} raw insight(s), {} citation(s)",
        raw.len(),
        citations.len()
    );

    let mut insights = assemble::assemble(&raw, &citations);
    if insights.is_empty() && !raw.is_empty() && !citations.is_empty() {
        tracing::warn!("Strict assembly produced nothing, trying fallback reconstruction");
        insights = assemble::reconstruct(&raw, &citations);
    }

    insights.truncate(MAX_DIGEST_INSIGHTS);
    insights
}

/// Requests today's market insights from the upstream completion service
/// and validates them. Missing credentials and transport failures degrade
/// to an empty section rather than failing the digest.
pub async fn fetch_market_insights() -> Vec<ValidatedInsight> {
    let config = Config::get();
    if config.perplexity_api_key.is_none() {
        tracing::warn!("PERPLEXITY_API_KEY not set, skipping insight section");
        return vec![];
    }

    let request = insight_request(&config.perplexity_model);
    let envelope = match PerplexityClient::get().create_completion(&request).await {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::error!("Insight completion failed: {}", e);
            return vec![];
        }
    };

    let insights = extract_insights(&envelope);
    tracing::info!("Validated {} market insight(s)", insights.len());
    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(content: &str, citations: Vec<&str>) -> Value {
        json!({
            "id": "cmpl-test",
            "choices": [{"message": {"role": "assistant", "content": content}}],
            "citations": citations,
        })
    }

    #[test]
    fn test_end_to_end_marker_resolution() {
        let content = r#"{"insights": [
            {"title": "A", "description": "Rates rose [1].", "link": "https://bloomberg.com/"}
        ]}"#;
        let envelope = envelope(content, vec!["https://bloomberg.com/news/rates-article"]);

        let out = extract_insights(&envelope);
        assert_eq!(
            out,
            vec![ValidatedInsight {
                title: "A".to_string(),
                description: "Rates rose.".to_string(),
                link: "https://bloomberg.com/news/rates-article".to_string(),
            }]
        );
    }

    #[test]
    fn test_output_is_capped_at_five() {
        let items: Vec<Value> = (0..9)
            .map(|i| json!({"title": format!("T{i}"), "description": "d"}))
            .collect();
        let content = json!({ "insights": items }).to_string();
        let citations: Vec<String> = (0..9)
            .map(|i| format!("https://reuters.com/markets/us/story-{i}"))
            .collect();
        let envelope = json!({
            "choices": [{"message": {"content": content}}],
            "citations": citations,
        });

        assert_eq!(extract_insights(&envelope).len(), 5);
    }

    #[test]
    fn test_deterministic_over_identical_input() {
        let content = r#"{"insights": [
            {"title": "A", "description": "d [2]"},
            {"title": "B", "description": "e"}
        ]}"#;
        let envelope = envelope(
            content,
            vec![
                "https://cnbc.com/2024/06/03/story-1.html",
                "https://wsj.com/articles/story-2",
            ],
        );

        assert_eq!(extract_insights(&envelope), extract_insights(&envelope));
    }

    #[test]
    fn test_non_whitelisted_citations_yield_nothing() {
        let content = r#"{"insights": [{"title": "A", "description": "d"}]}"#;
        let envelope = envelope(content, vec!["https://zacks.com/article-1"]);
        assert!(extract_insights(&envelope).is_empty());
    }

    #[test]
    fn test_fallback_recovers_when_strict_pass_sticks_on_bad_citation() {
        // No markers and nothing accepted: the cyclic index never advances,
        // so the strict pass keeps re-selecting the rejected first citation.
        // Fallback re-pairs by position and rescues the second insight.
        let content = r#"{"insights": [
            {"title": "A", "description": "a"},
            {"title": "B", "description": "b"}
        ]}"#;
        let envelope = envelope(
            content,
            vec!["https://reuters.com/", "https://cnbc.com/2024/06/03/story.html"],
        );

        let out = extract_insights(&envelope);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "B");
        assert_eq!(out[0].link, "https://cnbc.com/2024/06/03/story.html");
    }

    #[test]
    fn test_no_markers_survive_in_output() {
        let content = r#"{"insights": [
            {"title": "A", "description": "x [1] y [2] z"},
            {"title": "B", "description": "[3] leading"}
        ]}"#;
        let envelope = envelope(
            content,
            vec![
                "https://forbes.com/sites/writer/2024/06/03/story/",
                "https://nasdaq.com/articles/eth-update",
                "https://marketwatch.com/story/stocks-rise",
            ],
        );

        let marker = regex::Regex::new(r"\[\d+\]").unwrap();
        for insight in extract_insights(&envelope) {
            assert!(!marker.is_match(&insight.description));
        }
    }

    #[test]
    fn test_unparseable_content_yields_nothing() {
        let envelope = envelope("no json here", vec!["https://reuters.com/markets/us/x"]);
        assert!(extract_insights(&envelope).is_empty());
    }

    #[test]
    fn test_missing_content_yields_nothing() {
        let envelope = json!({"choices": []});
        assert!(extract_insights(&envelope).is_empty());
    }
}
