//! Document repository and its caching policy.
//!
//! [`FsDocumentStore`] reads the disk on every call, so content is always
//! fresh. [`CachedDocumentStore`] wraps any store with an explicit TTL and an
//! injectable [`Clock`], which keeps freshness deterministic in tests.

use crate::resolver::{resolve_in, resolve_on_disk};
use crate::scanner::{load_document, scan_markdown_files};
use crate::{Document, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Read access to the documentation set.
pub trait DocumentStore: Send + Sync {
    /// Every document, de-duplicated by slug and sorted by slug.
    fn list_documents(&self) -> Result<Vec<Document>>;

    /// The document for a requested slug, or `None` when nothing matches.
    fn get_document(&self, slug: &str) -> Result<Option<Document>>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    fn list_documents(&self) -> Result<Vec<Document>> {
        (**self).list_documents()
    }

    fn get_document(&self, slug: &str) -> Result<Option<Document>> {
        (**self).get_document(slug)
    }
}

/// Store backed directly by a directory of markdown files.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    /// Create a store rooted at `root`. The directory is checked lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentStore for FsDocumentStore {
    fn list_documents(&self) -> Result<Vec<Document>> {
        let files = scan_markdown_files(&self.root)?;
        let mut by_slug: BTreeMap<String, Document> = BTreeMap::new();

        for path in files {
            let document = match load_document(&self.root, &path) {
                Ok(document) => document,
                Err(e) => {
                    warn!("Skipping {}: {e}", path.display());
                    continue;
                },
            };

            if let Some(previous) = by_slug.get(&document.slug) {
                warn!(
                    "Slug collision on '{}': {} replaces {}",
                    document.slug,
                    document.path.display(),
                    previous.path.display()
                );
            }
            by_slug.insert(document.slug.clone(), document);
        }

        info!(
            "Loaded {} documents from {}",
            by_slug.len(),
            self.root.display()
        );
        Ok(by_slug.into_values().collect())
    }

    fn get_document(&self, slug: &str) -> Result<Option<Document>> {
        Ok(resolve_on_disk(&self.root, slug)?.map(|(document, _)| document))
    }
}

/// Time source for cache expiry.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct Snapshot {
    loaded_at: Instant,
    documents: Arc<Vec<Document>>,
}

/// TTL cache around another [`DocumentStore`].
///
/// A zero TTL disables caching and every call goes to the inner store.
pub struct CachedDocumentStore<S, C = SystemClock> {
    inner: S,
    ttl: Duration,
    clock: C,
    snapshot: Mutex<Option<Snapshot>>,
}

impl<S: DocumentStore> CachedDocumentStore<S> {
    /// Cache `inner` for `ttl` using the wall clock.
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self::with_clock(inner, ttl, SystemClock)
    }
}

impl<S: DocumentStore, C: Clock> CachedDocumentStore<S, C> {
    /// Cache `inner` for `ttl` using a custom clock.
    pub fn with_clock(inner: S, ttl: Duration, clock: C) -> Self {
        Self {
            inner,
            ttl,
            clock,
            snapshot: Mutex::new(None),
        }
    }

    /// Drop the cached list so the next call reloads.
    pub fn invalidate(&self) {
        *self.snapshot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn documents(&self) -> Result<Arc<Vec<Document>>> {
        let now = self.clock.now();
        let mut guard = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(snapshot) = guard.as_ref() {
            if now.saturating_duration_since(snapshot.loaded_at) < self.ttl {
                return Ok(Arc::clone(&snapshot.documents));
            }
            debug!("Document cache expired, reloading");
        }

        let documents = Arc::new(self.inner.list_documents()?);
        *guard = Some(Snapshot {
            loaded_at: now,
            documents: Arc::clone(&documents),
        });
        Ok(documents)
    }
}

impl<S: DocumentStore, C: Clock> DocumentStore for CachedDocumentStore<S, C> {
    fn list_documents(&self) -> Result<Vec<Document>> {
        if self.ttl.is_zero() {
            return self.inner.list_documents();
        }
        Ok(self.documents()?.as_ref().clone())
    }

    fn get_document(&self, slug: &str) -> Result<Option<Document>> {
        if self.ttl.is_zero() {
            return self.inner.get_document(slug);
        }
        let documents = self.documents()?;
        Ok(resolve_in(&documents, slug)?.cloned())
    }
}
