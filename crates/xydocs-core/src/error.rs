//! Error types and handling for xydocs-core operations.
//!
//! The content pipeline distinguishes three kinds of failure:
//!
//! - **Structural failures** such as a missing documentation root. These are fatal
//!   and surface as [`Error::RootUnavailable`].
//! - **Per-document problems** such as malformed front-matter. These never reach
//!   callers; the parser degrades and logs a warning instead.
//! - **Misses** such as an unknown slug. These are not errors at all and are
//!   reported as `Ok(None)` by the resolver.
//!
//! ```rust
//! use xydocs_core::{Error, FsDocumentStore, DocumentStore};
//!
//! let store = FsDocumentStore::new("/definitely/not/here");
//! match store.list_documents() {
//!     Err(Error::RootUnavailable { .. }) => eprintln!("docs directory is missing"),
//!     Err(e) => eprintln!("{} error: {e}", e.category()),
//!     Ok(docs) => println!("{} documents", docs.len()),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for xydocs-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed while reading a file below the docs root.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Content could not be parsed.
    ///
    /// Front-matter problems are absorbed by the parser and never produce this
    /// variant; it is reserved for failures such as the outline grammar failing
    /// to load.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The documentation root does not exist or cannot be read.
    ///
    /// This is a deployment problem and is never papered over.
    #[error("Documentation root unavailable at {}: {reason}", path.display())]
    RootUnavailable {
        /// Root directory that was requested.
        path: PathBuf,
        /// Why it could not be used.
        reason: String,
    },

    /// A requested slug tries to escape the documentation root.
    #[error("Invalid slug: {0}")]
    InvalidSlug(String),

    /// Markdown or sitemap rendering failed.
    #[error("Render error: {0}")]
    Render(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Self::Render(err.to_string())
    }
}

impl Error {
    /// Get the error category as a string identifier.
    ///
    /// Used as a structured field in log events and in the HTTP error pages.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Parse(_) => "parse",
            Self::Config(_) => "config",
            Self::RootUnavailable { .. } => "root_unavailable",
            Self::InvalidSlug(_) => "invalid_slug",
            Self::Render(_) => "render",
            Self::Serialization(_) => "serialization",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io;

    #[test]
    fn test_error_display_formatting() {
        let errors = vec![
            (Error::Parse("bad grammar".into()), "Parse error"),
            (Error::Config("missing field".into()), "Configuration error"),
            (Error::InvalidSlug("../etc".into()), "Invalid slug"),
            (Error::Render("unbalanced tag".into()), "Render error"),
            (Error::Serialization("eof".into()), "Serialization error"),
        ];

        for (error, prefix) in errors {
            let rendered = error.to_string();
            assert!(rendered.starts_with(prefix), "{rendered} should start with {prefix}");
        }

        assert_eq!(Error::Other("plain".into()).to_string(), "plain");
    }

    #[test]
    fn test_root_unavailable_mentions_path() {
        let error = Error::RootUnavailable {
            path: PathBuf::from("/srv/docs"),
            reason: "No such file or directory".into(),
        };

        let rendered = error.to_string();
        assert!(rendered.contains("/srv/docs"));
        assert!(rendered.contains("No such file"));
        assert_eq!(error.category(), "root_unavailable");
    }

    #[test]
    fn test_error_categories() {
        let cases = vec![
            (Error::Io(io::Error::other("x")), "io"),
            (Error::Parse("x".into()), "parse"),
            (Error::Config("x".into()), "config"),
            (Error::InvalidSlug("x".into()), "invalid_slug"),
            (Error::Render("x".into()), "render"),
            (Error::Serialization("x".into()), "serialization"),
            (Error::Other("x".into()), "other"),
        ];

        for (error, expected) in cases {
            assert_eq!(error.category(), expected);
        }
    }

    #[test]
    fn test_error_chain_source() {
        let wrapped: Error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied").into();
        let source = std::error::Error::source(&wrapped);
        assert!(source.unwrap().to_string().contains("access denied"));
    }

    #[test]
    fn test_from_toml_error() {
        let err = toml::from_str::<toml::Value>("= nope").unwrap_err();
        let converted: Error = err.into();
        assert_eq!(converted.category(), "serialization");
    }

    proptest! {
        #[test]
        fn test_parse_error_with_arbitrary_messages(msg in r".{0,200}") {
            let error = Error::Parse(msg.clone());
            prop_assert!(error.to_string().contains(&msg));
            prop_assert_eq!(error.category(), "parse");
        }
    }
}
