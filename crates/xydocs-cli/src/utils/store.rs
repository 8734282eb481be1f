use std::sync::Arc;
use tracing::debug;
use xydocs_core::{CachedDocumentStore, Config, DocumentStore, FsDocumentStore};

/// Document store for `config`, cached when `content.cache_ttl_secs` is set.
pub fn open_store(config: &Config) -> Arc<dyn DocumentStore> {
    let fs_store = FsDocumentStore::new(&config.content.root);
    let ttl = config.cache_ttl();

    if ttl.is_zero() {
        debug!("Serving documents from {} without caching", config.content.root.display());
        Arc::new(fs_store)
    } else {
        debug!(
            "Caching documents from {} for {}s",
            config.content.root.display(),
            ttl.as_secs()
        );
        Arc::new(CachedDocumentStore::new(fs_store, ttl))
    }
}
