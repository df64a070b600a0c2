use regex::Regex;

use std::sync::LazyLock;

use crate::constant::MAX_DIGEST_INSIGHTS;

use super::validate::{is_reputable, looks_like_article, passes_relaxed_article_check};
use super::{RawInsight, ValidatedInsight};

static MARKER_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]").expect("valid marker regex"));
static MARKER_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\[\d+\]").expect("valid marker regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Where an insight's backing URL may come from, in ladder order. The first
/// source that yields a candidate wins; if that candidate is then rejected
/// by validation the insight is discarded, with no retry down the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// A `[n]` marker in the description selecting the n-th citation.
    MarkerMatch,
    /// Cyclic positional assignment over the citation list.
    Positional,
    /// The insight's own `link` field, author-asserted and untrusted.
    DirectLink,
}

pub const DEFAULT_LADDER: [CandidateSource; 3] = [
    CandidateSource::MarkerMatch,
    CandidateSource::Positional,
    CandidateSource::DirectLink,
];

/// Pairs each raw insight with a validated backing URL, in original order.
/// Insights whose candidate URL fails the reputable-source or article-shape
/// check are dropped entirely.
pub fn assemble(raw: &[RawInsight], citations: &[String]) -> Vec<ValidatedInsight> {
    assemble_with(raw, citations, &DEFAULT_LADDER)
}

pub fn assemble_with(
    raw: &[RawInsight],
    citations: &[String],
    ladder: &[CandidateSource],
) -> Vec<ValidatedInsight> {
    let mut accepted: Vec<ValidatedInsight> = Vec::new();

    for insight in raw {
        let Some((url, trusted)) = resolve_candidate(insight, citations, accepted.len(), ladder)
        else {
            tracing::debug!("No candidate URL for insight '{}'", insight.title);
            continue;
        };

        if !is_reputable(&url) {
            tracing::debug!("Dropping '{}': source not reputable: {}", insight.title, url);
            continue;
        }
        if !looks_like_article(&url, trusted) {
            tracing::debug!("Dropping '{}': not an article URL: {}", insight.title, url);
            continue;
        }

        accepted.push(ValidatedInsight {
            title: insight.title.trim().to_string(),
            description: strip_citation_markers(&insight.description),
            link: url,
        });
    }

    accepted
}

fn resolve_candidate(
    insight: &RawInsight,
    citations: &[String],
    accepted_count: usize,
    ladder: &[CandidateSource],
) -> Option<(String, bool)> {
    for source in ladder {
        let candidate = match source {
            CandidateSource::MarkerMatch => first_marker_index(&insight.description)
                .filter(|index| *index < citations.len())
                .map(|index| (citations[index].clone(), true)),
            CandidateSource::Positional => {
                if citations.is_empty() {
                    None
                } else {
                    Some((citations[accepted_count % citations.len()].clone(), true))
                }
            }
            CandidateSource::DirectLink => insight
                .link
                .as_deref()
                .map(str::trim)
                .filter(|link| !link.is_empty())
                .map(|link| (link.to_string(), false)),
        };
        if candidate.is_some() {
            return candidate;
        }
    }
    None
}

/// The first `[n]` marker in the text, as a zero-based citation index.
/// `[0]` has no zero-based equivalent and is treated as no marker.
fn first_marker_index(description: &str) -> Option<usize> {
    MARKER_INDEX
        .captures(description)?
        .get(1)?
        .as_str()
        .parse::<usize>()
        .ok()?
        .checked_sub(1)
}

/// Removes every `[n]` marker and normalizes whitespace.
pub fn strip_citation_markers(description: &str) -> String {
    let stripped = MARKER_STRIP.replace_all(description, "");
    WHITESPACE_RUN.replace_all(&stripped, " ").trim().to_string()
}

/// Relaxed positional re-pairing, used only when the strict pass produced
/// nothing while raw insights and citations both exist. Citation indexes
/// saturate at the last citation instead of wrapping.
pub fn reconstruct(raw: &[RawInsight], citations: &[String]) -> Vec<ValidatedInsight> {
    if raw.is_empty() || citations.is_empty() {
        return vec![];
    }

    let mut rebuilt = Vec::new();
    for (index, insight) in raw.iter().take(MAX_DIGEST_INSIGHTS).enumerate() {
        let url = &citations[index.min(citations.len() - 1)];

        if !is_reputable(url) || !passes_relaxed_article_check(url) {
            tracing::debug!("Fallback dropping '{}': rejected URL {}", insight.title, url);
            continue;
        }

        rebuilt.push(ValidatedInsight {
            title: insight.title.trim().to_string(),
            description: strip_citation_markers(&insight.description),
            link: url.clone(),
        });
    }

    if !rebuilt.is_empty() {
        tracing::info!(
            "Fallback reconstruction recovered {} insight(s)",
            rebuilt.len()
        );
    }
    rebuilt
}
