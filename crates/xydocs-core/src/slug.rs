//! Slug derivation and normalization.
//!
//! A document's *raw slug* is its path relative to the docs root with the
//! `.md` extension removed and separators forced to `/`. The *slug* is the
//! normalized, lowercase routing identifier. `README` files collapse onto the
//! slug of their directory, so `guide/README.md` is served at `guide` and the
//! root `README.md` is served at the empty slug.

use crate::{Error, Result};
use std::path::{Component, Path};

/// Markdown file extension recognized by the scanner.
pub const MARKDOWN_EXTENSION: &str = "md";

const INDEX_STEM: &str = "readme";

/// Normalize a path-derived identifier into a routing slug.
///
/// Lowercases, converts backslashes to forward slashes and collapses
/// `readme` / `*/readme` onto the directory slug. Idempotent.
pub fn normalize_slug(raw: &str) -> String {
    let lowered = raw.to_lowercase().replace('\\', "/");
    let mut slug = lowered.as_str();

    // `a/readme/readme` must settle in one pass for idempotence
    loop {
        if slug == INDEX_STEM {
            return String::new();
        }
        match slug.strip_suffix("/readme") {
            Some(parent) => slug = parent,
            None => return slug.to_string(),
        }
    }
}

/// Build the raw, case-preserving slug for a file below `root`.
///
/// Returns `None` when `path` is not inside `root` or is not valid UTF-8.
pub fn raw_slug_for(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let without_ext = relative.with_extension("");
    let text = without_ext.to_str()?;
    Some(text.replace('\\', "/"))
}

/// Clean up a slug taken from a request URL.
///
/// Leading and trailing slashes and empty segments are dropped. Segments that
/// could escape the docs root (`..`, absolute components, NUL bytes) are
/// rejected.
pub fn sanitize_request_slug(requested: &str) -> Result<String> {
    if requested.contains('\0') {
        return Err(Error::InvalidSlug(requested.escape_debug().to_string()));
    }

    let unified = requested.replace('\\', "/");
    let mut segments = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {},
            ".." => return Err(Error::InvalidSlug(requested.to_string())),
            other => segments.push(other),
        }
    }

    let cleaned = segments.join("/");
    let has_foreign_component = Path::new(&cleaned)
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));
    if has_foreign_component {
        return Err(Error::InvalidSlug(requested.to_string()));
    }

    Ok(cleaned)
}

/// Derive a URL fragment identifier from heading text.
///
/// Lowercases, keeps alphanumerics, turns whitespace and hyphens into single
/// hyphens and drops everything else. Shared by the renderer and the outline
/// so that table-of-contents links land on the rendered headings.
pub fn heading_anchor(text: &str) -> String {
    let mut anchor = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.trim().chars() {
        if ch.is_alphanumeric() || ch == '_' {
            if pending_hyphen && !anchor.is_empty() {
                anchor.push('-');
            }
            pending_hyphen = false;
            anchor.extend(ch.to_lowercase());
        } else if ch.is_whitespace() || ch == '-' {
            pending_hyphen = true;
        }
    }

    anchor
}

/// Hands out unique anchors for a single document.
#[derive(Debug, Default)]
pub struct AnchorAllocator {
    seen: std::collections::HashMap<String, usize>,
}

impl AnchorAllocator {
    /// Create an allocator with no anchors handed out yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor for `text`, suffixed with `-1`, `-2`, ... on repeats.
    pub fn allocate(&mut self, text: &str) -> String {
        let mut base = heading_anchor(text);
        if base.is_empty() {
            base = "section".to_string();
        }

        let count = self.seen.entry(base.clone()).or_insert(0);
        let anchor = if *count == 0 {
            base
        } else {
            format!("{base}-{count}")
        };
        *count += 1;
        anchor
    }
}
