//! HTML page shells.

use crate::output::route;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write as _;
use xydocs_core::{Document, SiteConfig, TocEntry};

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0;color:#1f2328}\
header{padding:1rem 2rem;border-bottom:1px solid #d0d7de;display:flex;gap:1rem;align-items:center}\
header a{color:inherit;text-decoration:none;font-weight:600}\
.layout{display:flex;gap:2rem;padding:2rem}\
nav.outline{min-width:14rem;font-size:.9rem}\
main{flex:1;max-width:52rem}\
.code-block{position:relative}\
.copy-button{position:absolute;top:.4rem;right:.4rem}\
pre{background:#f6f8fa;padding:1rem;overflow-x:auto}\
.code-annotation{border-radius:50%;border:1px solid #8250df;background:#fbefff;cursor:help}\
#results li{margin-bottom:.75rem}";

const SEARCH_SCRIPT: &str = "const q=document.getElementById('q'),r=document.getElementById('results');\
q&&q.addEventListener('input',async()=>{if(!q.value.trim()){r.innerHTML='';return}\
const res=await fetch('/api/search?q='+encodeURIComponent(q.value));const hits=await res.json();\
r.innerHTML='';for(const h of hits){const li=document.createElement('li'),a=document.createElement('a');\
a.href=r.dataset.prefix+(h.slug?'/'+h.slug:'');a.textContent=h.title;const p=document.createElement('div');\
p.textContent=h.snippet;li.append(a,p);r.append(li)}});\
document.addEventListener('click',e=>{const b=e.target.closest('.copy-button');\
if(b&&navigator.clipboard){navigator.clipboard.writeText(b.dataset.copy)}});";

/// Wrap `body` in a full HTML document.
pub fn layout(site: &SiteConfig, page_title: &str, description: &str, body: &str) -> String {
    let full_title = if page_title == site.title {
        site.title.clone()
    } else {
        format!("{page_title} | {}", site.title)
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>{title}</title>\n<meta name=\"description\" content=\"{description}\">\n\
<style>{STYLE}</style>\n</head>\n<body>\n<header><a href=\"/\">{site}</a>\
<a href=\"{docs}\">Docs</a>\
<input id=\"q\" type=\"search\" placeholder=\"Search docs\" autocomplete=\"off\"></header>\n\
<ul id=\"results\" data-prefix=\"{docs_attr}\"></ul>\n{body}\n<script>{SEARCH_SCRIPT}</script>\n</body>\n</html>\n",
        title = text(&full_title),
        description = attr(description),
        site = text(&site.title),
        docs = attr(&route(&site.docs_prefix, "")),
        docs_attr = attr(site.docs_prefix.trim_end_matches('/')),
    )
}

/// Landing page listing every document.
pub fn landing_page(site: &SiteConfig, documents: &[Document]) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        "<main style=\"padding:2rem\"><h1>{}</h1><p>{}</p><h2>Documentation</h2><ul>",
        text(&site.title),
        text(&site.description)
    );
    for document in documents {
        let _ = write!(
            body,
            "<li><a href=\"{}\">{}</a></li>",
            attr(&route(&site.docs_prefix, &document.slug)),
            text(&document.display_title(&site.title))
        );
    }
    body.push_str("</ul></main>");

    layout(site, &site.title, &site.description, &body)
}

/// Page for one rendered document.
pub fn document_page(site: &SiteConfig, document: &Document, html: &str, toc: &[TocEntry]) -> String {
    let title = document.display_title(&site.title);
    let description = document
        .description()
        .unwrap_or_else(|| site.description.clone());

    let mut body = String::from("<div class=\"layout\">");
    if !toc.is_empty() {
        body.push_str("<nav class=\"outline\"><strong>On this page</strong>");
        write_outline(&mut body, toc);
        body.push_str("</nav>");
    }
    let _ = write!(body, "<main><article>{html}</article></main></div>");

    layout(site, &title, &description, &body)
}

fn write_outline(out: &mut String, entries: &[TocEntry]) {
    out.push_str("<ul>");
    for entry in entries {
        let _ = write!(
            out,
            "<li><a href=\"#{}\">{}</a>",
            attr(&entry.anchor),
            text(&entry.text)
        );
        if !entry.children.is_empty() {
            write_outline(out, &entry.children);
        }
        out.push_str("</li>");
    }
    out.push_str("</ul>");
}

/// 404 page.
pub fn not_found_page(site: &SiteConfig, path: &str) -> String {
    let body = format!(
        "<main style=\"padding:2rem\"><h1>Page not found</h1><p>Nothing lives at <code>{}</code>.</p>\
<p><a href=\"{}\">Back to the documentation</a></p></main>",
        text(path),
        attr(&route(&site.docs_prefix, ""))
    );
    layout(site, "Page not found", &site.description, &body)
}

/// 500 page. The message is shown to the reader.
pub fn error_page(site: &SiteConfig, message: &str) -> String {
    let body = format!(
        "<main style=\"padding:2rem\"><h1>Something went wrong</h1><p>{}</p></main>",
        text(message)
    );
    layout(site, "Error", &site.description, &body)
}
