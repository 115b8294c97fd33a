//! Explicit registry cache
//!
//! Callers that query the same registry repeatedly hold one of these and pass
//! it around. Nothing is memoised behind their back.

use crate::document::RegistryDocument;
use crate::error::RegistryError;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct RegistryCache {
    entries: HashMap<PathBuf, RegistryDocument>,
}

impl RegistryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached document for `path`, loading it on first use
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&RegistryDocument, RegistryError> {
        let path = path.as_ref();
        match self.entries.entry(cache_key(path)) {
            Entry::Occupied(entry) => {
                tracing::trace!(path = %path.display(), "registry cache hit");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let document = RegistryDocument::load(path)?;
                Ok(entry.insert(document))
            }
        }
    }

    /// Seed the cache with an already-loaded document
    pub fn insert(&mut self, path: impl AsRef<Path>, document: RegistryDocument) {
        self.entries.insert(cache_key(path.as_ref()), document);
    }

    /// Drop one entry so the next `load` re-reads the file
    pub fn invalidate(&mut self, path: impl AsRef<Path>) -> bool {
        self.entries.remove(&cache_key(path.as_ref())).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.entries.contains_key(&cache_key(path.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn cache_key(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
