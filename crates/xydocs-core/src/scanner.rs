//! Recursive discovery and loading of markdown files.

use crate::frontmatter::parse_frontmatter;
use crate::slug::{MARKDOWN_EXTENSION, normalize_slug, raw_slug_for};
use crate::{Document, Error, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Collect every `.md` file below `root`, in sorted path order.
///
/// Dot-directories are walked like any other, so every physical `.md` file
/// becomes a document. A missing or unreadable root is fatal; unreadable
/// entries further down are logged and skipped.
pub fn scan_markdown_files(root: &Path) -> Result<Vec<PathBuf>> {
    ensure_root(root)?;

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(Error::RootUnavailable {
                    path: root.to_path_buf(),
                    reason: e.to_string(),
                });
            },
            Err(e) => {
                warn!("Skipping unreadable entry below {}: {e}", root.display());
                continue;
            },
        };

        if entry.file_type().is_file() && has_markdown_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    debug!("Found {} markdown files under {}", files.len(), root.display());
    Ok(files)
}

/// Read and parse one file into a [`Document`].
pub fn load_document(root: &Path, path: &Path) -> Result<Document> {
    let raw_slug = raw_slug_for(root, path).ok_or_else(|| {
        Error::Other(format!(
            "{} is not a UTF-8 path below {}",
            path.display(),
            root.display()
        ))
    })?;

    let bytes = fs::read(path)?;
    let checksum = calculate_sha256(&bytes);
    let text = String::from_utf8_lossy(&bytes);
    let parsed = parse_frontmatter(&text);

    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .map(DateTime::<Utc>::from);

    Ok(Document {
        slug: normalize_slug(&raw_slug),
        raw_slug,
        frontmatter: parsed.frontmatter,
        content: parsed.body,
        path: path.to_path_buf(),
        modified,
        checksum,
    })
}

pub(crate) fn ensure_root(root: &Path) -> Result<()> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::RootUnavailable {
            path: root.to_path_buf(),
            reason: "not a directory".into(),
        }),
        Err(e) => Err(Error::RootUnavailable {
            path: root.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

fn has_markdown_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(MARKDOWN_EXTENSION))
}

fn calculate_sha256(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    STANDARD.encode(hasher.finalize())
}
