//! On-disk cache.
//!
//! Each bucket is a directory under the cache root. Keys are document
//! references that may contain separators or `..`, so an entry is stored
//! under the SHA-256 of its key, fanned out by the first two hex digits:
//!
//! ```text
//! {root}/
//! +-- VERSION
//! +-- documents/
//!     +-- 3f/
//!         +-- 3fa1...e9    # [etag_len: u32 LE][etag][data]
//! ```
//!
//! Lookups read the header first and stop on an etag mismatch without
//! loading the body.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::{Cache, CacheBucket, content_hash};

const VERSION_FILE: &str = "VERSION";

/// [`Cache`] persisted under a root directory.
///
/// The root carries a `VERSION` file. Opening the cache with a different
/// version (or a root without one) wipes the directory, so entries written
/// by an incompatible build are never read back.
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Open the cache at `root`, wiping it if `version` does not match.
    ///
    /// Filesystem errors are logged, never returned: an unusable directory
    /// simply produces buckets that miss.
    #[must_use]
    pub fn new(root: PathBuf, version: &str) -> Self {
        validate_version(&root, version);
        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Cache for FileCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(FileCacheBucket {
            dir: self.root.join(name),
        })
    }
}

struct FileCacheBucket {
    dir: PathBuf,
}

impl FileCacheBucket {
    fn entry_path(&self, key: &str) -> PathBuf {
        let hash = content_hash(key.as_bytes());
        self.dir.join(&hash[..2]).join(hash)
    }
}

impl CacheBucket for FileCacheBucket {
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>> {
        let mut file = File::open(self.entry_path(key)).ok()?;

        let mut len_buf = [0u8; 4];
        file.read_exact(&mut len_buf).ok()?;
        let etag_len = usize::try_from(u32::from_le_bytes(len_buf)).ok()?;

        let mut stored_etag = vec![0u8; etag_len];
        file.read_exact(&mut stored_etag).ok()?;
        if !etag.is_empty() && stored_etag != etag.as_bytes() {
            tracing::trace!(key, "Cache entry is stale");
            return None;
        }

        let mut data = Vec::new();
        file.read_to_end(&mut data).ok()?;
        Some(data)
    }

    fn set(&self, key: &str, etag: &str, value: &[u8]) {
        let path = self.entry_path(key);
        let Some(parent) = path.parent() else {
            return;
        };
        if let Err(e) = fs::create_dir_all(parent) {
            tracing::warn!(key, error = %e, "Failed to create cache directory");
            return;
        }
        let Ok(etag_len) = u32::try_from(etag.len()) else {
            tracing::warn!(key, "Etag too long to cache");
            return;
        };

        let mut buf = Vec::with_capacity(4 + etag.len() + value.len());
        buf.extend_from_slice(&etag_len.to_le_bytes());
        buf.extend_from_slice(etag.as_bytes());
        buf.extend_from_slice(value);

        // Write then rename so concurrent readers never see a torn entry.
        let tmp = path.with_extension("tmp");
        let result = fs::write(&tmp, &buf).and_then(|()| fs::rename(&tmp, &path));
        if let Err(e) = result {
            tracing::warn!(key, error = %e, "Failed to write cache entry");
            let _ = fs::remove_file(&tmp);
        }
    }

    fn remove(&self, key: &str) {
        let _ = fs::remove_file(self.entry_path(key));
    }
}

fn validate_version(root: &Path, version: &str) {
    let version_file = root.join(VERSION_FILE);

    match fs::read_to_string(&version_file) {
        Ok(stored) if stored == version => {
            tracing::debug!(root = %root.display(), version, "Reusing cache");
            return;
        }
        Ok(stored) => {
            tracing::info!(
                root = %root.display(),
                stored = %stored,
                current = version,
                "Cache version changed, wiping cache"
            );
        }
        Err(_) => {
            tracing::info!(root = %root.display(), "Initializing cache");
        }
    }

    if root.exists()
        && let Err(e) = fs::remove_dir_all(root)
    {
        tracing::warn!(root = %root.display(), error = %e, "Failed to remove cache directory");
    }
    if let Err(e) = fs::create_dir_all(root) {
        tracing::warn!(root = %root.display(), error = %e, "Failed to create cache directory");
        return;
    }
    if let Err(e) = fs::write(&version_file, version) {
        tracing::warn!(root = %root.display(), error = %e, "Failed to write cache version");
    }
}
