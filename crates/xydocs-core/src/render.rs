//! Markdown rendering and link rewriting.
//!
//! Relative links are rewritten into the site's documentation route space:
//!
//! ```rust
//! use xydocs_core::sanitize_link;
//!
//! assert_eq!(sanitize_link("../foo/bar.md", "/docs"), "/docs/foo/bar");
//! assert_eq!(sanitize_link("https://example.com", "/docs"), "https://example.com");
//! ```

use crate::annotation::{self, Annotation, Segment};
use crate::slug::AnchorAllocator;
use once_cell::sync::Lazy;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, html};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[allow(clippy::unwrap_used)] // constant patterns
static MARKDOWN_EXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.mdx?$").unwrap());
#[allow(clippy::unwrap_used)]
static LEADING_RELATIVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:\.{1,2}/)+").unwrap());
#[allow(clippy::unwrap_used)]
static LEADING_SLASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/+").unwrap());
#[allow(clippy::unwrap_used)]
static REPEATED_SLASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"/{2,}").unwrap());
#[allow(clippy::unwrap_used)]
static URI_SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").unwrap());

/// Default route prefix for documentation pages.
pub const DEFAULT_DOCS_PREFIX: &str = "/docs";

/// Whether `href` points outside the documentation tree and must not be rewritten.
pub fn is_absolute_link(href: &str) -> bool {
    href.starts_with("http") || href.starts_with("//") || href.starts_with('#') || URI_SCHEME.is_match(href)
}

/// Rewrite a relative link target into a route below `prefix`.
///
/// Absolute targets pass through untouched. For everything else the `.md` /
/// `.mdx` extension, leading `./` and `../` segments and leading slashes are
/// removed, the prefix is applied once, and repeated and trailing slashes are
/// collapsed. A `?query` or `#fragment` suffix is carried over unchanged.
pub fn sanitize_link(href: &str, prefix: &str) -> String {
    if is_absolute_link(href) {
        return href.to_string();
    }

    let prefix = normalize_prefix(prefix);
    let (path, suffix) = href
        .find(['?', '#'])
        .map_or((href, ""), |idx| href.split_at(idx));

    let path = MARKDOWN_EXT.replace(path, "");
    let path = LEADING_RELATIVE.replace(&path, "");
    let path = LEADING_SLASHES.replace(&path, "");

    let mut target = format!("{prefix}/{path}");

    let doubled = format!("{prefix}{prefix}");
    while !prefix.is_empty() && (target == doubled || target.starts_with(&format!("{doubled}/"))) {
        target.replace_range(..doubled.len(), &prefix);
    }

    let mut target = REPEATED_SLASHES.replace_all(&target, "/").into_owned();
    if target.len() > 1 && target.ends_with('/') {
        target.pop();
    }
    target.push_str(suffix);
    target
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Settings for [`MarkdownRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Route prefix applied to relative links.
    pub docs_prefix: String,
    /// Pass raw HTML through instead of escaping it.
    pub allow_raw_html: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            docs_prefix: DEFAULT_DOCS_PREFIX.to_string(),
            allow_raw_html: false,
        }
    }
}

/// A fenced or indented code sample after rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBlock {
    /// Language from the fence info string.
    pub language: Option<String>,
    /// Code placed on the clipboard by the copy button, markers removed.
    pub copy_text: String,
    /// Callouts shown inside the displayed code.
    pub annotations: Vec<Annotation>,
}

/// Output of [`MarkdownRenderer::render`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDocument {
    /// HTML fragment for the document body.
    pub html: String,
    /// Code samples in document order.
    pub code_blocks: Vec<CodeBlock>,
    /// Link targets after rewriting, in document order.
    pub links: Vec<String>,
}

/// Markdown to HTML renderer with link rewriting and code-block handling.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a renderer.
    pub const fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Active options.
    pub const fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a document body.
    pub fn render(&self, markdown: &str) -> RenderedDocument {
        let mut events: Vec<Event<'_>> = Vec::new();
        let mut links = Vec::new();
        let mut code_blocks = Vec::new();
        let mut anchors = AnchorAllocator::new();

        let mut open_heading: Option<(usize, String)> = None;
        let mut open_code: Option<(Option<String>, String)> = None;

        for event in Parser::new_ext(markdown, parser_options()) {
            if let Some((_, buffer)) = open_code.as_mut() {
                match event {
                    Event::Text(text) => buffer.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        if let Some((language, source)) = open_code.take() {
                            let (html, block) = render_code_block(language, &source);
                            events.push(Event::Html(html.into()));
                            code_blocks.push(block);
                        }
                    },
                    _ => {},
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let language = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .filter(|lang| !lang.is_empty())
                            .map(str::to_string),
                        CodeBlockKind::Indented => None,
                    };
                    open_code = Some((language, String::new()));
                },
                Event::Start(Tag::Heading { .. }) => {
                    open_heading = Some((events.len(), String::new()));
                    events.push(event);
                },
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((index, text)) = open_heading.take() {
                        let anchor = anchors.allocate(&text);
                        if let Event::Start(Tag::Heading { id, .. }) = &mut events[index] {
                            if id.is_none() {
                                *id = Some(CowStr::from(anchor));
                            }
                        }
                    }
                    events.push(event);
                },
                Event::Text(ref text) | Event::Code(ref text) => {
                    if let Some((_, heading_text)) = open_heading.as_mut() {
                        heading_text.push_str(text);
                    }
                    events.push(event);
                },
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => {
                    let dest_url = if matches!(link_type, LinkType::Autolink | LinkType::Email) {
                        dest_url
                    } else {
                        CowStr::from(sanitize_link(&dest_url, &self.options.docs_prefix))
                    };
                    links.push(dest_url.to_string());
                    events.push(Event::Start(Tag::Link {
                        link_type,
                        dest_url,
                        title,
                        id,
                    }));
                },
                Event::Html(raw) | Event::InlineHtml(raw) if !self.options.allow_raw_html => {
                    events.push(Event::Text(raw));
                },
                other => events.push(other),
            }
        }

        let mut html_out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_out, events.into_iter());

        RenderedDocument {
            html: html_out,
            code_blocks,
            links,
        }
    }
}

/// Reduce markdown to searchable plain text.
///
/// Markup, raw HTML and link targets disappear, code keeps its text minus
/// callout markers, and whitespace collapses to single spaces.
pub fn to_plain_text(markdown: &str) -> String {
    let mut text = String::with_capacity(markdown.len());
    let mut in_code = false;

    for event in Parser::new_ext(markdown, parser_options()) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code = true,
            Event::End(TagEnd::CodeBlock) => {
                in_code = false;
                text.push(' ');
            },
            Event::Text(t) if in_code => text.push_str(&annotation::strip(&t)),
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak | Event::Rule => text.push(' '),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::TableCell
                | TagEnd::BlockQuote(_),
            ) => text.push(' '),
            _ => {},
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of the first heading in `source`, collected the way
/// [`MarkdownRenderer::render`] collects it for the heading `id`.
pub(crate) fn heading_text(source: &str) -> String {
    let mut text = String::new();
    let mut in_heading = false;

    for event in Parser::new_ext(source, parser_options()) {
        match event {
            Event::Start(Tag::Heading { .. }) => in_heading = true,
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) if in_heading => text.push_str(&t),
            _ => {},
        }
    }

    text
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

fn render_code_block(language: Option<String>, source: &str) -> (String, CodeBlock) {
    let copy_text = annotation::strip(source);
    let mut annotations = Vec::new();

    let mut html_out = String::with_capacity(source.len() * 2);
    html_out.push_str("<div class=\"code-block\"");
    if let Some(lang) = &language {
        let _ = write!(
            html_out,
            " data-language=\"{}\"",
            html_escape::encode_double_quoted_attribute(lang)
        );
    }
    let _ = write!(
        html_out,
        "><button type=\"button\" class=\"copy-button\" data-copy=\"{}\">Copy</button><pre><code",
        html_escape::encode_double_quoted_attribute(&copy_text)
    );
    if let Some(lang) = &language {
        let _ = write!(
            html_out,
            " class=\"language-{}\"",
            html_escape::encode_double_quoted_attribute(lang)
        );
    }
    html_out.push('>');

    for segment in annotation::segments(source) {
        match segment {
            Segment::Code(code) => html_out.push_str(&html_escape::encode_text(code)),
            Segment::Marker(note) => {
                let _ = write!(
                    html_out,
                    "<button type=\"button\" class=\"code-annotation\" data-annotation-id=\"{id}\" data-annotation-text=\"{text}\" aria-label=\"{text}\">{label}</button>",
                    id = html_escape::encode_double_quoted_attribute(&note.id),
                    text = html_escape::encode_double_quoted_attribute(&note.text),
                    label = html_escape::encode_text(&note.id),
                );
                annotations.push(note);
            },
        }
    }

    html_out.push_str("</code></pre></div>\n");

    (
        html_out,
        CodeBlock {
            language,
            copy_text,
            annotations,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markdown: &str) -> RenderedDocument {
        MarkdownRenderer::default().render(markdown)
    }

    #[test]
    fn test_sanitize_relative_parent_link() {
        assert_eq!(sanitize_link("../foo/bar.md", "/docs"), "/docs/foo/bar");
    }

    #[test]
    fn test_sanitize_passes_absolute_targets() {
        for href in [
            "https://example.com",
            "http://example.com/a.md",
            "//cdn.example.com/x",
            "#section",
            "mailto:team@xypriss.dev",
        ] {
            assert_eq!(sanitize_link(href, "/docs"), href);
        }
    }

    #[test]
    fn test_sanitize_strips_extensions_and_relative_segments() {
        assert_eq!(sanitize_link("./guide.mdx", "/docs"), "/docs/guide");
        assert_eq!(sanitize_link("../../../api/system.md", "/docs"), "/docs/api/system");
        assert_eq!(sanitize_link("/api/system", "/docs"), "/docs/api/system");
        assert_eq!(sanitize_link("intro", "/docs"), "/docs/intro");
    }

    #[test]
    fn test_sanitize_collapses_double_prefix_and_slashes() {
        assert_eq!(sanitize_link("/docs/guide/intro.md", "/docs"), "/docs/guide/intro");
        assert_eq!(sanitize_link("docs/docs/guide", "/docs"), "/docs/guide");
        assert_eq!(sanitize_link("guide//intro", "/docs"), "/docs/guide/intro");
        assert_eq!(sanitize_link("/docs", "/docs"), "/docs");
        // a sibling named like the prefix is not a double prefix
        assert_eq!(sanitize_link("docsy/page", "/docs"), "/docs/docsy/page");
    }

    #[test]
    fn test_sanitize_keeps_fragment_and_query() {
        assert_eq!(sanitize_link("../guide.md#install", "/docs"), "/docs/guide#install");
        assert_eq!(sanitize_link("api.md?v=2", "/docs"), "/docs/api?v=2");
    }

    #[test]
    fn test_sanitize_directory_links_land_on_routes() {
        assert_eq!(sanitize_link("./", "/docs"), "/docs");
        assert_eq!(sanitize_link("../", "/docs"), "/docs");
        assert_eq!(sanitize_link("../guide/", "/docs"), "/docs/guide");
        assert_eq!(sanitize_link("./#top", "/docs"), "/docs#top");
        assert_eq!(sanitize_link("./", ""), "/");
    }

    #[test]
    fn test_sanitize_honors_custom_prefix() {
        assert_eq!(sanitize_link("../x.md", "handbook/"), "/handbook/x");
    }

    #[test]
    fn test_render_rewrites_links_in_html() {
        let out = render("See [bar](../foo/bar.md) and [site](https://example.com).");
        assert!(out.html.contains(r#"href="/docs/foo/bar""#));
        assert!(out.html.contains(r#"href="https://example.com""#));
        assert_eq!(out.links, vec!["/docs/foo/bar", "https://example.com"]);
    }

    #[test]
    fn test_render_leaves_images_and_autolinks() {
        let out = render("![logo](./logo.png) <https://xypriss.dev>");
        assert!(out.html.contains(r#"src="./logo.png""#));
        assert_eq!(out.links, vec!["https://xypriss.dev"]);
    }

    #[test]
    fn test_render_preserves_structure() {
        let out = render("# Title\n\n## Usage\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\nText.");
        assert!(out.html.contains(r#"<h1 id="title">Title</h1>"#));
        assert!(out.html.contains(r#"<h2 id="usage">Usage</h2>"#));
        assert!(out.html.contains("<table>"));
        assert!(out.html.contains("<td>1</td>"));
        assert!(out.html.contains("<p>Text.</p>"));
    }

    #[test]
    fn test_duplicate_headings_get_unique_ids() {
        let out = render("## Usage\n\n## Usage\n");
        assert!(out.html.contains(r#"id="usage""#));
        assert!(out.html.contains(r#"id="usage-1""#));
    }

    #[test]
    fn test_code_block_copy_text_excludes_markers() {
        let md = "```ts\nconst app = createServer();\napp.listen(3000); [[!port|Any free port]]\n```\n";
        let out = render(md);

        assert_eq!(out.code_blocks.len(), 1);
        let block = &out.code_blocks[0];
        assert_eq!(block.language.as_deref(), Some("ts"));
        assert_eq!(block.copy_text, "const app = createServer();\napp.listen(3000);\n");
        assert_eq!(block.annotations.len(), 1);
        assert_eq!(block.annotations[0].id, "port");

        assert!(out.html.contains(r#"class="code-annotation" data-annotation-id="port""#));
        assert!(out.html.contains(r#"data-annotation-text="Any free port""#));
        assert!(!out.html.contains("[[!port"));
        assert!(out.html.contains(r#"<code class="language-ts">"#));
    }

    #[test]
    fn test_code_is_escaped() {
        let out = render("```html\n<script>alert(1)</script>\n```\n");
        assert!(out.html.contains("&lt;script&gt;"));
        assert!(!out.html.contains("<script>"));
    }

    #[test]
    fn test_raw_html_is_escaped_by_default() {
        let out = render("<script>alert(1)</script>\n\nok");
        assert!(!out.html.contains("<script>"));

        let permissive = MarkdownRenderer::new(RenderOptions {
            allow_raw_html: true,
            ..RenderOptions::default()
        })
        .render("<details>x</details>\n");
        assert!(permissive.html.contains("<details>"));
    }

    #[test]
    fn test_plain_text_strips_markup() {
        let md = "# Title\n\nSome **bold** [link](./x.md) <b>html</b>\n\n```js\nrun(); [[!a|note]]\n```\n";
        assert_eq!(to_plain_text(md), "Title Some bold link html run();");
    }
}
