//! Etag-validated caching for rendered documents.
//!
//! Rendering is cheap per node but adds up across a site, so consumers keep
//! the output of earlier renders and reuse it while the source is unchanged.
//! Two traits form the API:
//!
//! - [`Cache`]: factory for named buckets
//! - [`CacheBucket`]: byte store keyed by document with etag invalidation
//!
//! # Implementations
//!
//! - [`NullCache`]: never stores anything (caching disabled)
//! - [`MemoryCache`]: process-local map, shared by all handles of a bucket
//! - [`FileCache`]: entries on disk under a version-checked root
//!
//! # Example
//!
//! ```
//! use hookmark_cache::{Cache, CacheBucketExt, MemoryCache, content_hash};
//!
//! let source = "# Intro";
//! let cache = MemoryCache::new();
//! let bucket = cache.bucket("documents");
//!
//! bucket.set_string("intro.md", &content_hash(source.as_bytes()), "<h1>Intro</h1>");
//! assert_eq!(
//!     bucket.get_string("intro.md", &content_hash(source.as_bytes())).as_deref(),
//!     Some("<h1>Intro</h1>")
//! );
//! assert_eq!(bucket.get_string("intro.md", "stale"), None);
//! ```

mod ext;
mod file;
mod memory;

use sha2::{Digest, Sha256};

pub use ext::CacheBucketExt;
pub use file::FileCache;
pub use memory::MemoryCache;

/// A named partition within a [`Cache`].
///
/// Values are invalidated by an etag: an opaque string chosen by the caller,
/// usually a hash of the document source. A lookup hits only when both the
/// key and the etag match.
pub trait CacheBucket: Send + Sync {
    /// Retrieve a cached value.
    ///
    /// Returns `None` on a miss or etag mismatch. An empty `etag` skips
    /// validation and returns whatever is stored.
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>>;

    /// Store a value, replacing any entry for the same key.
    ///
    /// Failures are logged and otherwise ignored; a cache that cannot write
    /// degrades to always missing.
    fn set(&self, key: &str, etag: &str, value: &[u8]);

    /// Drop the entry for `key`, if any.
    fn remove(&self, key: &str);
}

/// Factory for named [`CacheBucket`]s.
///
/// Buckets with different names never see each other's entries.
pub trait Cache: Send + Sync {
    /// Open or create a named bucket.
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket>;
}

/// Bucket of a [`NullCache`]: every lookup misses.
pub struct NullCacheBucket;

impl CacheBucket for NullCacheBucket {
    fn get(&self, _key: &str, _etag: &str) -> Option<Vec<u8>> {
        None
    }

    fn set(&self, _key: &str, _etag: &str, _value: &[u8]) {}

    fn remove(&self, _key: &str) {}
}

/// [`Cache`] used when caching is disabled.
pub struct NullCache;

impl Cache for NullCache {
    fn bucket(&self, _name: &str) -> Box<dyn CacheBucket> {
        Box::new(NullCacheBucket)
    }
}

/// Hex-encoded SHA-256 of `bytes`, suitable as an etag.
#[must_use]
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
