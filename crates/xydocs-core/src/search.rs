//! In-memory fuzzy search over the documentation set.
//!
//! Each document contributes its title, description and cleaned body text.
//! Title and body relevance are combined with configurable weights into a
//! score in `[0, 1]` where lower is better.

use crate::render::to_plain_text;
use crate::{Document, SearchResult};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Tuning knobs for [`SearchIndex`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Weight of the title relevance.
    pub title_weight: f64,
    /// Weight of the body relevance.
    pub content_weight: f64,
    /// Characters kept on each side of a match in snippets.
    pub snippet_padding: usize,
    /// Length of the leading excerpt used when no match position is known.
    pub fallback_snippet_len: usize,
    /// Results scoring above this are dropped.
    pub max_score: f64,
    /// Maximum number of results.
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            title_weight: 0.7,
            content_weight: 0.3,
            snippet_padding: 60,
            fallback_snippet_len: 150,
            max_score: 0.95,
            limit: 20,
        }
    }
}

#[derive(Debug, Clone)]
struct IndexedDocument {
    title: String,
    slug: String,
    description: Option<String>,
    text: String,
}

/// Searchable corpus built from a document list.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    entries: Vec<IndexedDocument>,
    config: SearchConfig,
}

impl SearchIndex {
    /// Index `documents`, keeping one entry per slug (the last one seen).
    ///
    /// `site_title` names the root document when it has no title of its own.
    pub fn build(documents: &[Document], site_title: &str, config: SearchConfig) -> Self {
        let mut by_slug = BTreeMap::new();
        for document in documents {
            by_slug.insert(
                document.slug.clone(),
                IndexedDocument {
                    title: document.display_title(site_title),
                    slug: document.slug.clone(),
                    description: document.description(),
                    text: to_plain_text(&document.content),
                },
            );
        }

        let entries: Vec<IndexedDocument> = by_slug.into_values().collect();
        debug!("Indexed {} documents for search", entries.len());
        Self { entries, config }
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Active configuration.
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run `query` with the configured limit.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        self.search_with_limit(query, self.config.limit)
    }

    /// Run `query`, returning at most `limit` results in ascending score order.
    ///
    /// A blank query returns nothing.
    pub fn search_with_limit(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        let query = query.trim().to_lowercase();
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default();
        let Some(perfect) = matcher.fuzzy_match(&query, &query).filter(|s| *s > 0) else {
            return Vec::new();
        };

        let tw = self.config.title_weight.max(0.0);
        let cw = self.config.content_weight.max(0.0);
        let total_weight = if tw + cw > 0.0 { tw + cw } else { 1.0 };

        let mut results = Vec::new();
        for entry in &self.entries {
            let title_relevance = relevance(matcher.fuzzy_match(&entry.title, &query), perfect);

            let body_match = matcher.fuzzy_indices(&entry.text, &query);
            let exact_body = find_case_insensitive(&entry.text, &query);
            let body_relevance = if exact_body.is_some() {
                1.0
            } else {
                relevance(body_match.as_ref().map(|(score, _)| *score), perfect)
            };

            if title_relevance <= 0.0 && body_relevance <= 0.0 {
                continue;
            }

            let score = 1.0 - (tw * title_relevance + cw * body_relevance) / total_weight;
            if score > self.config.max_score {
                continue;
            }

            let query_chars = query.chars().count();
            let snippet = match (body_match, exact_body) {
                (Some((_, indices)), _) if !indices.is_empty() => {
                    let span = indices[indices.len() - 1] - indices[0] + 1;
                    snippet_around(&entry.text, indices[0], span, self.config.snippet_padding)
                },
                (_, Some(position)) => {
                    snippet_around(&entry.text, position, query_chars, self.config.snippet_padding)
                },
                _ => leading_snippet(&entry.text, self.config.fallback_snippet_len),
            };

            results.push(SearchResult {
                title: entry.title.clone(),
                slug: entry.slug.clone(),
                description: entry.description.clone(),
                snippet,
                score,
            });
        }

        results.sort_by(|a, b| a.score.total_cmp(&b.score));
        results.truncate(limit);
        results
    }
}

#[allow(clippy::cast_precision_loss)]
fn relevance(score: Option<i64>, perfect: i64) -> f64 {
    score.map_or(0.0, |s| (s as f64 / perfect as f64).clamp(0.0, 1.0))
}

/// Character index of the first case-insensitive occurrence of `needle`.
fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let hay: Vec<char> = haystack.chars().collect();
    let pat: Vec<char> = needle.chars().collect();
    if pat.is_empty() || pat.len() > hay.len() {
        return None;
    }

    (0..=hay.len() - pat.len()).find(|&start| {
        hay[start..start + pat.len()]
            .iter()
            .zip(&pat)
            .all(|(h, p)| h.to_lowercase().eq(p.to_lowercase()))
    })
}

/// Excerpt of `text` covering `len` characters from `position`, padded by
/// `padding` characters on each side and clamped to the text.
pub fn snippet_around(text: &str, position: usize, len: usize, padding: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let position = position.min(chars.len());
    let start = position.saturating_sub(padding);
    let end = position
        .saturating_add(len)
        .saturating_add(padding)
        .min(chars.len());

    let mut snippet = String::with_capacity(end - start + 6);
    if start > 0 {
        snippet.push_str("...");
    }
    snippet.extend(&chars[start..end]);
    if end < chars.len() {
        snippet.push_str("...");
    }
    snippet
}

/// The first `max_chars` characters of `text`, with `...` when cut.
pub fn leading_snippet(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::frontmatter::parse_frontmatter;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn doc(raw_slug: &str, source: &str) -> Document {
        let parsed = parse_frontmatter(source);
        Document {
            slug: crate::normalize_slug(raw_slug),
            raw_slug: raw_slug.to_string(),
            frontmatter: parsed.frontmatter,
            content: parsed.body,
            path: PathBuf::from(format!("{raw_slug}.md")),
            modified: None,
            checksum: String::new(),
        }
    }

    fn corpus() -> Vec<Document> {
        vec![
            doc("README", "---\ntitle: Welcome\n---\nXyPriss is a fast web framework."),
            doc(
                "api/system/cpu-monitoring",
                "---\ntitle: CPU Monitoring\ndescription: Watch processor load\n---\n# CPU Monitoring\n\nSample usage with `__sys__.$cpu()`.",
            ),
            doc(
                "guide/performance",
                "---\ntitle: Performance Guide\n---\nTips for tuning. Enable cpu monitoring in production to spot hot paths.",
            ),
            doc(
                "guide/routing",
                "---\ntitle: Routing\n---\nDefine routes with `app.get`.\n\n```ts\napp.get('/', h); [[!root|Handles the index]]\n```",
            ),
        ]
    }

    fn index() -> SearchIndex {
        SearchIndex::build(&corpus(), "XyPriss", SearchConfig::default())
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let idx = index();
        assert!(idx.search("").is_empty());
        assert!(idx.search("   \t").is_empty());
    }

    #[test]
    fn test_title_match_outranks_body_match() {
        let results = index().search("cpu monitoring");
        assert!(results.len() >= 2);
        assert_eq!(results[0].slug, "api/system/cpu-monitoring");
        let body_only = results
            .iter()
            .position(|r| r.slug == "guide/performance")
            .unwrap();
        assert!(body_only > 0);
        assert!(results[0].score < results[body_only].score);
    }

    #[test]
    fn test_scores_ascend_and_stay_in_range() {
        let results = index().search("routing");
        assert!(!results.is_empty());
        for pair in results.windows(2) {
            assert!(pair[0].score <= pair[1].score);
        }
        for r in &results {
            assert!((0.0..=1.0).contains(&r.score));
        }
    }

    #[test]
    fn test_result_carries_description() {
        let results = index().search("cpu monitoring");
        assert_eq!(results[0].title, "CPU Monitoring");
        assert_eq!(results[0].description.as_deref(), Some("Watch processor load"));
    }

    #[test]
    fn test_index_deduplicates_by_slug() {
        let mut docs = corpus();
        docs.push(doc("Guide/Routing", "---\ntitle: Routing v2\n---\nNewer"));
        let idx = SearchIndex::build(&docs, "XyPriss", SearchConfig::default());
        assert_eq!(idx.len(), 4);
        let hit = idx.search("routing v2");
        assert_eq!(hit[0].title, "Routing v2");
    }

    #[test]
    fn test_annotations_and_markup_are_not_indexed() {
        let idx = index();
        assert!(idx.search("handles the index").iter().all(|r| r.slug != "guide/routing"));
        assert!(idx.search("[[!root").is_empty());
    }

    #[test]
    fn test_root_uses_site_title_when_untitled() {
        let idx = SearchIndex::build(&[doc("README", "framework overview")], "XyPriss", SearchConfig::default());
        assert_eq!(idx.search("framework")[0].title, "XyPriss");
    }

    #[test]
    fn test_limit_truncates() {
        let idx = index();
        assert!(idx.search_with_limit("guide", 1).len() <= 1);
        assert!(idx.search_with_limit("guide", 0).is_empty());
    }

    #[test]
    fn test_title_only_hit_uses_leading_snippet() {
        let body = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(6);
        let document = doc("guide/zebra", &format!("---\ntitle: Zebra\n---\n{body}"));
        let config = SearchConfig::default();
        let idx = SearchIndex::build(&[document], "XyPriss", config.clone());

        let results = idx.search("zebra");
        assert_eq!(results.len(), 1);
        let expected = leading_snippet(&to_plain_text(&body), config.fallback_snippet_len);
        assert_eq!(results[0].snippet, expected);
        assert!(results[0].snippet.ends_with("..."));
    }

    #[test]
    fn test_snippet_surrounds_match() {
        let results = index().search("hot paths");
        let hit = results.iter().find(|r| r.slug == "guide/performance").unwrap();
        assert!(hit.snippet.contains("hot paths"));
    }

    #[test]
    fn test_find_case_insensitive_uses_char_positions() {
        assert_eq!(find_case_insensitive("Ünïcode TEXT", "text"), Some(8));
        assert_eq!(find_case_insensitive("abc", "abcd"), None);
    }

    #[test]
    fn test_snippet_edges() {
        assert_eq!(snippet_around("short", 0, 5, 10), "short");
        assert_eq!(snippet_around("0123456789", 5, 1, 2), "...34567...");
        assert_eq!(snippet_around("abc", 99, 3, 1), "...c");
        assert_eq!(leading_snippet("héllo wörld", 5), "héllo...");
        assert_eq!(leading_snippet("tiny", 150), "tiny");
    }

    proptest! {
        #[test]
        fn prop_snippet_never_overflows(
            text in "\\PC{0,200}",
            position in 0usize..400,
            len in 0usize..50,
            padding in 0usize..80,
        ) {
            let snippet = snippet_around(&text, position, len, padding);
            let body = snippet.trim_start_matches("...").trim_end_matches("...");
            prop_assert!(body.chars().count() <= text.chars().count());
            prop_assert!(snippet.chars().count() <= len + 2 * padding + 6);
        }
    }
}
