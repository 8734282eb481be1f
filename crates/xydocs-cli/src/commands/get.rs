use anyhow::{Result, bail};
use serde_json::json;
use std::io::Write;
use xydocs_core::{Config, DocumentStore, MarkdownRenderer, outline};

use crate::output::DocumentFormat;
use crate::utils::store::open_store;

/// Print one document. A miss is an error so the process exits non-zero.
pub fn execute<W: Write>(config: &Config, slug: &str, format: DocumentFormat, out: &mut W) -> Result<()> {
    let Some(document) = open_store(config).get_document(slug)? else {
        bail!("Document not found: '{slug}'");
    };

    match format {
        DocumentFormat::Text => {
            out.write_all(document.content.as_bytes())?;
            if !document.content.ends_with('\n') {
                writeln!(out)?;
            }
        },
        DocumentFormat::Html => {
            let rendered = MarkdownRenderer::new(config.render_options()).render(&document.content);
            out.write_all(rendered.html.as_bytes())?;
        },
        DocumentFormat::Json => {
            let value = json!({
                "slug": document.slug,
                "rawSlug": document.raw_slug,
                "title": document.display_title(&config.site.title),
                "description": document.description(),
                "frontmatter": document.frontmatter,
                "path": document.path,
                "modified": document.modified,
                "checksum": document.checksum,
                "outline": outline(&document.content)?,
                "content": document.content,
            });
            serde_json::to_writer_pretty(&mut *out, &value)?;
            writeln!(out)?;
        },
    }
    Ok(())
}
