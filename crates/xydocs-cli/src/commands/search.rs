use anyhow::Result;
use std::io::Write;
use std::time::Instant;
use tracing::info;
use xydocs_core::{Config, DocumentStore, SearchIndex};

use crate::output::{OutputFormat, write_json, write_search_text};
use crate::utils::store::open_store;

/// Search all documents for the joined query words.
pub fn execute<W: Write>(
    config: &Config,
    query: &[String],
    limit: Option<usize>,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let query = query.join(" ");
    let start = Instant::now();

    let documents = open_store(config).list_documents()?;
    let index = SearchIndex::build(&documents, &config.site.title, config.search.clone());
    let results = index.search_with_limit(&query, limit.unwrap_or(config.search.limit));

    info!(
        "Found {} results for '{query}' across {} documents in {:.2?}",
        results.len(),
        index.len(),
        start.elapsed()
    );

    match format {
        OutputFormat::Text => write_search_text(out, &results, &query, &config.site.docs_prefix),
        OutputFormat::Json | OutputFormat::Jsonl => write_json(out, &results, format),
    }
}
