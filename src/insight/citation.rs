use serde_json::Value;
use url::Url;

/// Object fields that may carry the citation URL, tried in order.
const URL_FIELDS: [&str; 5] = ["url", "link", "href", "source_url", "article_url"];

/// The envelope's citation container moves around between providers and
/// model versions. Each known location is a named strategy; they are tried
/// in order and the first non-empty array wins outright, with no merging
/// across locations.
struct ExtractionStrategy {
    name: &'static str,
    locate: fn(&Value) -> Option<&Vec<Value>>,
}

const STRATEGIES: [ExtractionStrategy; 5] = [
    ExtractionStrategy {
        name: "search_results",
        locate: search_results,
    },
    ExtractionStrategy {
        name: "root_citations",
        locate: root_citations,
    },
    ExtractionStrategy {
        name: "choice_citations",
        locate: choice_citations,
    },
    ExtractionStrategy {
        name: "content_citations",
        locate: content_citations,
    },
    ExtractionStrategy {
        name: "field_name_scan",
        locate: field_name_scan,
    },
];

fn search_results(envelope: &Value) -> Option<&Vec<Value>> {
    envelope.get("search_results")?.as_array()
}

fn root_citations(envelope: &Value) -> Option<&Vec<Value>> {
    envelope.get("citations")?.as_array()
}

fn choice_citations(envelope: &Value) -> Option<&Vec<Value>> {
    let choice = envelope.pointer("/choices/0")?;
    choice
        .get("citations")
        .or_else(|| choice.pointer("/message/citations"))?
        .as_array()
}

fn content_citations(envelope: &Value) -> Option<&Vec<Value>> {
    envelope
        .pointer("/choices/0/message/content/citations")?
        .as_array()
}

fn field_name_scan(envelope: &Value) -> Option<&Vec<Value>> {
    envelope.as_object()?.iter().find_map(|(name, value)| {
        let name = name.to_lowercase();
        if name.contains("citation") || name.contains("search_result") {
            value.as_array()
        } else {
            None
        }
    })
}

/// Scans the completion envelope for supporting-source references and
/// normalizes them to bare URL strings. Duplicates are permitted at this
/// stage; ordering follows the located array.
pub fn extract_citations(envelope: &Value) -> Vec<String> {
    for strategy in &STRATEGIES {
        if let Some(entries) = (strategy.locate)(envelope) {
            if entries.is_empty() {
                continue;
            }
            tracing::debug!("Citations located via {} strategy", strategy.name);
            return normalize(entries);
        }
    }
    vec![]
}

fn normalize(entries: &[Value]) -> Vec<String> {
    entries
        .iter()
        .filter_map(citation_url)
        .filter(|url| is_http_url(url))
        .collect()
}

fn citation_url(entry: &Value) -> Option<String> {
    if let Some(url) = entry.as_str() {
        return Some(url.to_string());
    }
    let object = entry.as_object()?;
    URL_FIELDS.iter().find_map(|field| {
        object
            .get(*field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn is_http_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_results_objects() {
        let envelope = json!({
            "search_results": [
                {"title": "Rates", "url": "https://reuters.com/a"},
                {"title": "ETF", "url": "https://bloomberg.com/b"},
            ]
        });
        assert_eq!(
            extract_citations(&envelope),
            vec!["https://reuters.com/a", "https://bloomberg.com/b"]
        );
    }

    #[test]
    fn test_root_citations_strings() {
        let envelope = json!({"citations": ["https://cnbc.com/a", "https://wsj.com/b"]});
        assert_eq!(
            extract_citations(&envelope),
            vec!["https://cnbc.com/a", "https://wsj.com/b"]
        );
    }

    #[test]
    fn test_search_results_take_priority_over_citations() {
        let envelope = json!({
            "citations": ["https://second.com/x"],
            "search_results": [{"url": "https://first.com/x"}],
        });
        assert_eq!(extract_citations(&envelope), vec!["https://first.com/x"]);
    }

    #[test]
    fn test_empty_location_falls_through() {
        // An empty search_results array must not mask citations below it.
        let envelope = json!({
            "search_results": [],
            "citations": ["https://cnbc.com/a"],
        });
        assert_eq!(extract_citations(&envelope), vec!["https://cnbc.com/a"]);
    }

    #[test]
    fn test_choice_nested_citations() {
        let envelope = json!({
            "choices": [{"message": {"content": "...", "citations": ["https://ft.com/a"]}}]
        });
        assert_eq!(extract_citations(&envelope), vec!["https://ft.com/a"]);

        let envelope = json!({
            "choices": [{"citations": ["https://ft.com/b"], "message": {"content": "..."}}]
        });
        assert_eq!(extract_citations(&envelope), vec!["https://ft.com/b"]);
    }

    #[test]
    fn test_content_object_citations() {
        let envelope = json!({
            "choices": [{"message": {"content": {"citations": ["https://wsj.com/c"]}}}]
        });
        assert_eq!(extract_citations(&envelope), vec!["https://wsj.com/c"]);
    }

    #[test]
    fn test_field_name_scan() {
        let envelope = json!({
            "id": "cmpl-1",
            "web_search_results": [{"link": "https://nasdaq.com/d"}],
        });
        assert_eq!(extract_citations(&envelope), vec!["https://nasdaq.com/d"]);
    }

    #[test]
    fn test_alternate_url_fields() {
        let envelope = json!({
            "citations": [
                {"href": "https://a.com/1"},
                {"source_url": "https://b.com/2"},
                {"article_url": "https://c.com/3"},
                {"url": "", "link": "https://d.com/4"},
            ]
        });
        assert_eq!(
            extract_citations(&envelope),
            vec![
                "https://a.com/1",
                "https://b.com/2",
                "https://c.com/3",
                "https://d.com/4"
            ]
        );
    }

    #[test]
    fn test_invalid_entries_dropped() {
        let envelope = json!({
            "citations": [
                "https://good.com/a",
                "ftp://bad.com/b",
                "not a url",
                42,
                {"note": "no url field"},
            ]
        });
        assert_eq!(extract_citations(&envelope), vec!["https://good.com/a"]);
    }

    #[test]
    fn test_no_citations_anywhere() {
        let envelope = json!({"choices": [{"message": {"content": "hello"}}]});
        assert!(extract_citations(&envelope).is_empty());
    }
}
