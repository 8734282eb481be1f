use crate::frontmatter::Frontmatter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One markdown file loaded from the docs root.
///
/// Content is never mutated after load; rendering produces a separate
/// [`RenderedDocument`](crate::RenderedDocument).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Normalized, lowercase routing slug. Empty for the root `README`.
    pub slug: String,
    /// Case-preserving path-derived slug used for disk lookups.
    pub raw_slug: String,
    /// Metadata from the file header.
    pub frontmatter: Frontmatter,
    /// Markdown body with the header removed.
    pub content: String,
    /// Absolute path of the source file.
    pub path: PathBuf,
    /// Last modification time of the source file, when the platform reports one.
    pub modified: Option<DateTime<Utc>>,
    /// Base64 SHA-256 of the raw file bytes.
    pub checksum: String,
}

impl Document {
    /// Display title: front-matter `title`, then the first `# ` heading, then
    /// the last slug segment. `None` only for an untitled root document.
    pub fn title(&self) -> Option<String> {
        if let Some(title) = self.frontmatter.title() {
            return Some(title);
        }

        if let Some(heading) = first_h1(&self.content) {
            return Some(heading);
        }

        self.raw_slug
            .rsplit('/')
            .find(|segment| !segment.is_empty() && !segment.eq_ignore_ascii_case("readme"))
            .map(str::to_string)
    }

    /// [`title`](Self::title), with `site_title` standing in for an untitled root.
    pub fn display_title(&self, site_title: &str) -> String {
        self.title().unwrap_or_else(|| site_title.to_string())
    }

    /// Front-matter `description`, if any.
    pub fn description(&self) -> Option<String> {
        self.frontmatter.description()
    }
}

fn first_h1(content: &str) -> Option<String> {
    let mut in_fence = false;
    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("# ") {
            let title = rest.trim().trim_end_matches('#').trim();
            if !title.is_empty() {
                return Some(title.to_string());
            }
        }
    }
    None
}

/// One ranked hit from [`SearchIndex::search`](crate::SearchIndex::search).
///
/// Lower `score` is a better match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Document title.
    pub title: String,
    /// Normalized slug of the document.
    pub slug: String,
    /// Front-matter description, when present.
    pub description: Option<String>,
    /// Excerpt of cleaned body text around the match.
    pub snippet: String,
    /// Relevance in `[0, 1]`, `0` being a perfect match.
    pub score: f64,
}

/// One heading in a document outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Heading level, 1 to 6.
    pub level: usize,
    /// Heading text with markers removed.
    pub text: String,
    /// Fragment identifier the renderer assigns to this heading.
    pub anchor: String,
    /// 1-based line in the document body.
    pub line: usize,
    /// Nested lower-level headings.
    pub children: Vec<TocEntry>,
}
