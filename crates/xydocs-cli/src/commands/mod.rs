//! Command implementations for the xydocs CLI

mod completions;
mod get;
mod list;
mod search;
mod serve;
mod sitemap;

pub use completions::generate;
pub use get::execute as get_document;
pub use list::execute as list_documents;
pub use search::execute as search;
pub use serve::execute as serve;
pub use sitemap::execute as print_sitemap;
