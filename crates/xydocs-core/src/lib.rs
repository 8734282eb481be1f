//! # xydocs-core
//!
//! Content pipeline for the XyPriss documentation site: markdown files on
//! disk become routable, searchable, renderable documents.
//!
//! ## Architecture
//!
//! - **Scanner**: recursive discovery of `.md` files below a docs root
//! - **Front-matter**: YAML header split from the markdown body
//! - **Slugs**: path-derived identifiers with `README` collapsing
//! - **Store and resolver**: slug lookup with exact, index and case-insensitive fallbacks
//! - **Search**: fuzzy, title-weighted index with bounded snippets
//! - **Rendering**: markdown to HTML with link rewriting and annotated code blocks
//! - **Outline and sitemap**: tree-sitter heading outline and a sitemaps.org `urlset`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use xydocs_core::{Config, DocumentStore, FsDocumentStore, MarkdownRenderer, SearchIndex};
//!
//! let config = Config::load(None)?;
//! let store = FsDocumentStore::new(&config.content.root);
//!
//! if let Some(doc) = store.get_document("guide/intro")? {
//!     let rendered = MarkdownRenderer::new(config.render_options()).render(&doc.content);
//!     println!("{}", rendered.html);
//! }
//!
//! let index = SearchIndex::build(&store.list_documents()?, &config.site.title, config.search.clone());
//! for hit in index.search("routing") {
//!     println!("{:.3} {} ({})", hit.score, hit.title, hit.slug);
//! }
//! # Ok::<(), xydocs_core::Error>(())
//! ```

/// Inline callout markers in code samples
pub mod annotation;
/// Configuration loading and validation
pub mod config;
/// Error types and result aliases
pub mod error;
/// YAML front-matter parsing
pub mod frontmatter;
/// Tree-sitter heading outline
pub mod outline;
/// Markdown rendering and link rewriting
pub mod render;
/// Slug lookup strategies
pub mod resolver;
/// Markdown file discovery and loading
pub mod scanner;
/// Fuzzy search index
pub mod search;
pub mod sitemap;
/// Slug derivation and normalization
pub mod slug;
/// Document repository and caching
pub mod store;
/// Core data types
pub mod types;

pub use annotation::Annotation;
pub use config::{Config, ContentConfig, ServerConfig, SiteConfig};
pub use error::{Error, Result};
pub use frontmatter::{Frontmatter, ParsedSource, parse_frontmatter};
pub use outline::{OutlineParser, outline};
pub use render::{CodeBlock, MarkdownRenderer, RenderOptions, RenderedDocument, sanitize_link};
pub use resolver::Resolution;
pub use search::{SearchConfig, SearchIndex};
pub use sitemap::build_sitemap;
pub use slug::normalize_slug;
pub use store::{CachedDocumentStore, Clock, DocumentStore, FsDocumentStore, SystemClock};
pub use types::*;
