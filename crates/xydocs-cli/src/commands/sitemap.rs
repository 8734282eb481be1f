use anyhow::{Context, Result};
use std::io::Write;
use xydocs_core::{Config, DocumentStore, build_sitemap};

use crate::utils::store::open_store;

/// Print the sitemap for every document.
pub fn execute<W: Write>(config: &Config, base_url: Option<&str>, out: &mut W) -> Result<()> {
    let documents = open_store(config).list_documents()?;
    let base_url = base_url.unwrap_or(&config.site.base_url);
    let xml = build_sitemap(&documents, base_url, &config.site.docs_prefix)
        .with_context(|| format!("Cannot build sitemap for {base_url}"))?;
    out.write_all(xml.as_bytes())?;
    Ok(())
}
