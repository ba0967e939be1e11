//! Typed access to [`CacheBucket`] values.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CacheBucket;

/// JSON and string helpers for any [`CacheBucket`].
///
/// Kept off the base trait so buckets stay object-safe and only deal in
/// bytes.
///
/// # Example
///
/// ```
/// use hookmark_cache::{Cache, CacheBucketExt, MemoryCache};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Entry { html: String }
///
/// let bucket = MemoryCache::new().bucket("documents");
/// bucket.set_json("intro.md", "v1", &Entry { html: "<p>hi</p>".into() });
///
/// let entry: Option<Entry> = bucket.get_json("intro.md", "v1");
/// assert_eq!(entry, Some(Entry { html: "<p>hi</p>".into() }));
/// ```
pub trait CacheBucketExt: CacheBucket {
    /// Retrieve and deserialize a JSON value.
    ///
    /// Entries that no longer deserialize (for example after a format
    /// change) are treated as a miss.
    fn get_json<T: DeserializeOwned>(&self, key: &str, etag: &str) -> Option<T> {
        let bytes = self.get(key, etag)?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    /// Serialize a value as JSON and store it.
    fn set_json<T: Serialize>(&self, key: &str, etag: &str, value: &T) {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.set(key, etag, &bytes),
            Err(e) => tracing::warn!(key, error = %e, "Failed to serialize cache entry"),
        }
    }

    /// Retrieve a UTF-8 string; invalid UTF-8 is a miss.
    fn get_string(&self, key: &str, etag: &str) -> Option<String> {
        let bytes = self.get(key, etag)?;
        String::from_utf8(bytes).ok()
    }

    fn set_string(&self, key: &str, etag: &str, value: &str) {
        self.set(key, etag, value.as_bytes());
    }
}

impl<B: CacheBucket + ?Sized> CacheBucketExt for B {}
