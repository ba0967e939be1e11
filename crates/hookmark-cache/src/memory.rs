//! In-process cache.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::{Cache, CacheBucket};

type Entries = HashMap<String, (String, Vec<u8>)>;

/// [`Cache`] kept in memory for the lifetime of the value.
///
/// Buckets opened with the same name share storage, so a renderer and a test
/// can look at the same entries through separate handles.
#[derive(Clone, Default)]
pub struct MemoryCache {
    buckets: Arc<RwLock<HashMap<String, Arc<RwLock<Entries>>>>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for MemoryCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        let mut buckets = self
            .buckets
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let entries = Arc::clone(buckets.entry(name.to_owned()).or_default());
        Box::new(MemoryBucket { entries })
    }
}

struct MemoryBucket {
    entries: Arc<RwLock<Entries>>,
}

impl CacheBucket for MemoryBucket {
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let (stored, data) = entries.get(key)?;
        (etag.is_empty() || stored == etag).then(|| data.clone())
    }

    fn set(&self, key: &str, etag: &str, value: &[u8]) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), (etag.to_owned(), value.to_vec()));
    }

    fn remove(&self, key: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}
