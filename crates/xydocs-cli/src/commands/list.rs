use anyhow::Result;
use std::io::Write;
use xydocs_core::{Config, DocumentStore};

use crate::output::{DocumentSummary, OutputFormat, write_json, write_list_text};
use crate::utils::store::open_store;

/// Print every document in slug order.
pub fn execute<W: Write>(config: &Config, format: OutputFormat, out: &mut W) -> Result<()> {
    let documents = open_store(config).list_documents()?;
    let rows: Vec<DocumentSummary> = documents
        .iter()
        .map(|doc| DocumentSummary::new(doc, &config.site.title, &config.site.docs_prefix))
        .collect();

    match format {
        OutputFormat::Text => write_list_text(out, &rows),
        OutputFormat::Json | OutputFormat::Jsonl => write_json(out, &rows, format),
    }
}
