//! Sitemap generation for the documentation site.
//!
//! ```rust
//! use xydocs_core::sitemap::build_sitemap;
//!
//! let xml = build_sitemap(&[], "https://xypriss.dev", "/docs").unwrap();
//! assert!(xml.contains("<loc>https://xypriss.dev/</loc>"));
//! ```

use crate::{Document, Error, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;
use url::Url;

/// Namespace of the sitemaps.org protocol.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Public URL of the page serving `slug` below `docs_prefix`.
pub fn document_url(base: &Url, docs_prefix: &str, slug: &str) -> Result<Url> {
    let prefix = docs_prefix.trim_matches('/');
    let path = match (prefix.is_empty(), slug.is_empty()) {
        (true, true) => String::new(),
        (true, false) => slug.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}/{slug}"),
    };
    base.join(&path)
        .map_err(|e| Error::Render(format!("Cannot build URL for '{slug}': {e}")))
}

/// Parse `base_url` so that relative joins land below it.
pub fn parse_base_url(base_url: &str) -> Result<Url> {
    let mut base = Url::parse(base_url)
        .map_err(|e| Error::Config(format!("Invalid base URL '{base_url}': {e}")))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

/// Render a `urlset` listing the site root followed by every document in slug
/// order.
pub fn build_sitemap(documents: &[Document], base_url: &str, docs_prefix: &str) -> Result<String> {
    let base = parse_base_url(base_url)?;

    let mut ordered: Vec<&Document> = documents.iter().collect();
    ordered.sort_by(|a, b| a.slug.cmp(&b.slug));

    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NAMESPACE));
    writer.write_event(Event::Start(urlset))?;

    write_url(&mut writer, base.as_str(), None)?;
    for document in ordered {
        let loc = document_url(&base, docs_prefix, &document.slug)?;
        let lastmod = document
            .modified
            .map(|modified| modified.format("%Y-%m-%d").to_string());
        write_url(&mut writer, loc.as_str(), lastmod.as_deref())?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| Error::Render(format!("Sitemap is not valid UTF-8: {e}")))
}

fn write_url(writer: &mut Writer<Cursor<Vec<u8>>>, loc: &str, lastmod: Option<&str>) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("url")))?;
    write_text_element(writer, "loc", loc)?;
    if let Some(lastmod) = lastmod {
        write_text_element(writer, "lastmod", lastmod)?;
    }
    writer.write_event(Event::End(BytesEnd::new("url")))?;
    Ok(())
}

fn write_text_element(writer: &mut Writer<Cursor<Vec<u8>>>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::frontmatter::Frontmatter;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn doc(slug: &str, modified: Option<chrono::DateTime<Utc>>) -> Document {
        Document {
            slug: slug.to_string(),
            raw_slug: slug.to_string(),
            frontmatter: Frontmatter::new(),
            content: String::new(),
            path: PathBuf::from(format!("{slug}.md")),
            modified,
            checksum: String::new(),
        }
    }

    #[test]
    fn test_root_first_then_sorted_documents() {
        let docs = vec![
            doc("guide/intro", None),
            doc("", None),
            doc("api/system/cpu-monitoring", None),
        ];
        let xml = build_sitemap(&docs, "https://xypriss.dev", "/docs").unwrap();

        let locs: Vec<&str> = xml
            .lines()
            .filter_map(|l| l.trim().strip_prefix("<loc>"))
            .filter_map(|l| l.strip_suffix("</loc>"))
            .collect();
        assert_eq!(
            locs,
            vec![
                "https://xypriss.dev/",
                "https://xypriss.dev/docs",
                "https://xypriss.dev/docs/api/system/cpu-monitoring",
                "https://xypriss.dev/docs/guide/intro",
            ]
        );
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(SITEMAP_NAMESPACE));
    }

    #[test]
    fn test_lastmod_only_when_known() {
        let when = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let xml = build_sitemap(
            &[doc("dated", Some(when)), doc("undated", None)],
            "https://xypriss.dev",
            "/docs",
        )
        .unwrap();
        assert_eq!(xml.matches("<lastmod>").count(), 1);
        assert!(xml.contains("<lastmod>2024-01-15</lastmod>"));
    }

    #[test]
    fn test_base_url_with_path() {
        let xml = build_sitemap(&[doc("guide", None)], "https://example.com/xypriss", "docs/").unwrap();
        assert!(xml.contains("<loc>https://example.com/xypriss/docs/guide</loc>"));
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = build_sitemap(&[], "not a url", "/docs").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
