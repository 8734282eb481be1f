//! Slug to document resolution.
//!
//! Resolution order, first match wins:
//!
//! 1. the exact relative file `<slug>.md`
//! 2. the directory index `<slug>/README.md`
//! 3. a case-insensitive comparison of normalized slugs across every document,
//!    where the last file in scan order wins as it does when listing
//!
//! A miss is `Ok(None)`, never an error.

use crate::scanner::{ensure_root, load_document, scan_markdown_files};
use crate::slug::{MARKDOWN_EXTENSION, normalize_slug, sanitize_request_slug};
use crate::{Document, Result};
use std::path::Path;
use tracing::{debug, warn};

/// Which strategy located a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// `<slug>.md` exists.
    ExactFile,
    /// `<slug>/README.md` exists.
    DirectoryIndex,
    /// Found by comparing normalized slugs.
    CaseInsensitive,
}

/// Resolve `requested` against the files below `root`.
pub fn resolve_on_disk(root: &Path, requested: &str) -> Result<Option<(Document, Resolution)>> {
    ensure_root(root)?;
    let slug = sanitize_request_slug(requested)?;

    if !slug.is_empty() {
        let exact = root.join(format!("{slug}.{MARKDOWN_EXTENSION}"));
        if exact.is_file() {
            debug!("Resolved '{slug}' to {}", exact.display());
            return Ok(Some((load_document(root, &exact)?, Resolution::ExactFile)));
        }
    }

    let index = root.join(&slug).join("README.md");
    if index.is_file() {
        debug!("Resolved '{slug}' to directory index {}", index.display());
        return Ok(Some((load_document(root, &index)?, Resolution::DirectoryIndex)));
    }

    // Listing keeps the last file per slug, so the scan runs back to front
    let wanted = normalize_slug(&slug);
    for path in scan_markdown_files(root)?.into_iter().rev() {
        let Some(raw) = crate::slug::raw_slug_for(root, &path) else {
            continue;
        };
        if normalize_slug(&raw) == wanted {
            match load_document(root, &path) {
                Ok(document) => return Ok(Some((document, Resolution::CaseInsensitive))),
                Err(e) => warn!("Failed to load {}: {e}", path.display()),
            }
        }
    }

    debug!("No document for slug '{slug}'");
    Ok(None)
}

/// Resolve `requested` against an already loaded document list, applying the
/// same strategy order as [`resolve_on_disk`].
pub fn resolve_in<'a>(documents: &'a [Document], requested: &str) -> Result<Option<&'a Document>> {
    let slug = sanitize_request_slug(requested)?;

    if !slug.is_empty() {
        if let Some(doc) = documents.iter().find(|d| d.raw_slug == slug) {
            return Ok(Some(doc));
        }
    }

    let index_slug = if slug.is_empty() {
        "README".to_string()
    } else {
        format!("{slug}/README")
    };
    if let Some(doc) = documents.iter().find(|d| d.raw_slug == index_slug) {
        return Ok(Some(doc));
    }

    let wanted = normalize_slug(&slug);
    Ok(documents.iter().rev().find(|d| d.slug == wanted))
}
