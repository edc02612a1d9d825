//! Swappable handle to the active document store

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use super::error::StoreResult;
use super::store::{DocumentStore, LoadOptions};

/// Shared handle to the current [`DocumentStore`]
///
/// Readers take snapshots; a reload builds a whole new store and swaps the
/// pointer, so nobody sees a partially loaded store.
#[derive(Debug, Clone)]
pub struct CurrentStore {
    inner: Arc<RwLock<Arc<DocumentStore>>>,
}

impl CurrentStore {
    /// Wrap an already loaded store
    pub fn new(store: DocumentStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(store))),
        }
    }

    /// Load `dir` and wrap the result
    pub fn load(dir: impl AsRef<Path>, options: &LoadOptions) -> StoreResult<Self> {
        DocumentStore::load_with(dir, options).map(Self::new)
    }

    /// The store that is current right now
    pub fn snapshot(&self) -> Arc<DocumentStore> {
        Arc::clone(&self.inner.read())
    }

    /// Install `store` and return the one it replaced
    pub fn replace(&self, store: DocumentStore) -> Arc<DocumentStore> {
        let next = Arc::new(store);
        std::mem::replace(&mut *self.inner.write(), next)
    }

    /// Load `dir` again and swap it in; on failure the current store stays
    pub fn reload(
        &self,
        dir: impl AsRef<Path>,
        options: &LoadOptions,
    ) -> StoreResult<Arc<DocumentStore>> {
        let next = Arc::new(DocumentStore::load_with(dir, options)?);
        *self.inner.write() = Arc::clone(&next);
        tracing::info!("Swapped in store with {} documents", next.len());
        Ok(next)
    }
}
