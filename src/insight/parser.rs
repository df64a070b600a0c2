use serde_json::Value;

use super::RawInsight;

/// Pulls the insight array out of the narrative content returned by the
/// completion. The content is only probabilistically well-formed: it may be
/// fenced in markdown, keyed differently than requested, or not JSON at all.
/// Any failure yields an empty sequence rather than an error.
pub fn parse_insights(content: &str) -> Vec<RawInsight> {
    let stripped = strip_code_fence(content);

    let value: Value = match serde_json::from_str(stripped) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Insight content is not valid JSON: {}", e);
            return vec![];
        }
    };

    let Some(items) = find_insight_array(&value) else {
        tracing::warn!("No insight array found in completion content");
        return vec![];
    };

    items
        .iter()
        .filter_map(|item| serde_json::from_value::<RawInsight>(item.clone()).ok())
        .collect()
}

/// Locates the insight array: an `insights` field, the top-level value
/// itself, or the first array-valued field of the decoded object.
fn find_insight_array(value: &Value) -> Option<&Vec<Value>> {
    if let Some(insights) = value.get("insights").and_then(Value::as_array) {
        return Some(insights);
    }
    if let Some(array) = value.as_array() {
        return Some(array);
    }
    value
        .as_object()?
        .values()
        .find_map(|field| field.as_array())
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json" etc.) on the opening fence line.
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_object() {
        let content = r#"{"insights": [{"title": "A", "description": "d", "link": "https://x.com/a"}]}"#;
        let insights = parse_insights(content);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "A");
        assert_eq!(insights[0].link.as_deref(), Some("https://x.com/a"));
    }

    #[test]
    fn test_parse_fenced_json() {
        let content = "```json\n{\"insights\": [{\"title\": \"A\", \"description\": \"d\"}]}\n```";
        let insights = parse_insights(content);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].link, None);
    }

    #[test]
    fn test_parse_bare_fence() {
        let content = "```\n[{\"title\": \"A\", \"description\": \"d\"}]\n```";
        assert_eq!(parse_insights(content).len(), 1);
    }

    #[test]
    fn test_parse_top_level_array() {
        let content = r#"[{"title": "A", "description": "d"}, {"title": "B", "description": "e"}]"#;
        assert_eq!(parse_insights(content).len(), 2);
    }

    #[test]
    fn test_parse_alternate_key() {
        // No "insights" key: the first array-valued field wins.
        let content = r#"{"summary": "markets", "items": [{"title": "A", "description": "d"}]}"#;
        let insights = parse_insights(content);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "A");
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_insights("the market went up today").is_empty());
        assert!(parse_insights("").is_empty());
    }

    #[test]
    fn test_parse_no_array_anywhere() {
        assert!(parse_insights(r#"{"summary": "quiet day"}"#).is_empty());
        assert!(parse_insights("42").is_empty());
    }

    #[test]
    fn test_non_object_elements_skipped() {
        let content = r#"{"insights": [{"title": "A", "description": "d"}, "noise", 7]}"#;
        assert_eq!(parse_insights(content).len(), 1);
    }

    #[test]
    fn test_missing_fields_default_empty() {
        let content = r#"{"insights": [{"title": "Only title"}]}"#;
        let insights = parse_insights(content);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].description, "");
    }
}
