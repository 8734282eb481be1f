//! # Output Formatting
//!
//! - **Text**: human-readable, colored when the terminal allows it
//! - **JSON**: a single pretty-printed array or object
//! - **JSONL**: one compact JSON object per line

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use xydocs_core::{Document, SearchResult};

/// Output format for listing commands
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
    /// Newline-delimited JSON
    Jsonl,
}

/// Output format for `get`
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DocumentFormat {
    /// Raw markdown body
    Text,
    /// Document, metadata and outline as JSON
    Json,
    /// Rendered HTML fragment
    Html,
}

/// Write `items` as JSON or JSONL.
pub fn write_json<W: Write, T: Serialize>(out: &mut W, items: &[T], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Jsonl => {
            for item in items {
                serde_json::to_writer(&mut *out, item)?;
                writeln!(out)?;
            }
        },
        OutputFormat::Json | OutputFormat::Text => {
            serde_json::to_writer_pretty(&mut *out, items)?;
            writeln!(out)?;
        },
    }
    Ok(())
}

/// Write search hits as text.
pub fn write_search_text<W: Write>(
    out: &mut W,
    results: &[SearchResult],
    query: &str,
    docs_prefix: &str,
) -> Result<()> {
    if results.is_empty() {
        writeln!(out, "No results for '{query}'")?;
        return Ok(());
    }

    for (rank, hit) in results.iter().enumerate() {
        writeln!(
            out,
            "{:>2}. {} {} {}",
            rank + 1,
            hit.title.bold(),
            route(docs_prefix, &hit.slug).cyan(),
            format!("[{:.3}]", hit.score).dimmed()
        )?;
        if let Some(description) = &hit.description {
            writeln!(out, "    {}", description.italic())?;
        }
        if !hit.snippet.is_empty() {
            writeln!(out, "    {}", hit.snippet)?;
        }
    }
    Ok(())
}

/// One row of `list` output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub path: String,
    pub route: String,
}

impl DocumentSummary {
    pub fn new(document: &Document, site_title: &str, docs_prefix: &str) -> Self {
        Self {
            slug: document.slug.clone(),
            title: document.display_title(site_title),
            description: document.description(),
            path: document.path.display().to_string(),
            route: route(docs_prefix, &document.slug),
        }
    }
}

/// Write document summaries as text.
pub fn write_list_text<W: Write>(out: &mut W, rows: &[DocumentSummary]) -> Result<()> {
    let width = rows.iter().map(|r| r.route.len()).max().unwrap_or(0);
    for row in rows {
        writeln!(out, "{}  {}", format!("{:<width$}", row.route).cyan(), row.title)?;
    }
    Ok(())
}

/// Site route of a document slug.
pub fn route(docs_prefix: &str, slug: &str) -> String {
    let prefix = docs_prefix.trim_end_matches('/');
    if slug.is_empty() {
        if prefix.is_empty() { "/".to_string() } else { prefix.to_string() }
    } else {
        format!("{prefix}/{slug}")
    }
}
