//! Opaque key-value blob storage.
//!
//! The storefront persists its state as serialized text under a handful of
//! string keys (`cart`, `wishlist`, `user`). The backing store knows nothing
//! about the shape of the values.
//!
//! # Implementations
//!
//! - [`MemoryBlobStore`] - in-process map, used by tests and throwaway sessions
//! - [`DirBlobStore`] - one `<key>.json` file per key under a data directory

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Errors raised by a blob store.
#[derive(Debug, Error)]
pub enum BlobStoreError {
    /// Key contains characters the store cannot address.
    #[error("invalid blob key: {0:?}")]
    InvalidKey(String),

    /// Underlying I/O failed.
    #[error("blob store I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Store refused the write (e.g. quota exceeded).
    #[error("blob store rejected write for key {key}: {reason}")]
    Rejected { key: String, reason: String },
}

/// String-keyed store of serialized values.
///
/// Methods take `&self` so one store can be shared by every component that
/// persists state; implementations handle their own synchronization.
#[cfg_attr(test, mockall::automock)]
pub trait BlobStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, BlobStoreError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set(&self, key: &str, value: &str) -> Result<(), BlobStoreError>;

    /// Delete `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be modified.
    fn remove(&self, key: &str) -> Result<(), BlobStoreError>;
}

// =============================================================================
// In-memory store
// =============================================================================

/// Blob store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, BlobStoreError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BlobStoreError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BlobStoreError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

// =============================================================================
// Directory-backed store
// =============================================================================

/// Blob store keeping each key in its own file under a directory.
///
/// Writes go to a temporary sibling file first and are renamed into place, so
/// a crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct DirBlobStore {
    dir: PathBuf,
}

impl DirBlobStore {
    /// Create a store rooted at `dir`. The directory is created lazily on the
    /// first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, BlobStoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(BlobStoreError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(key: &str) -> impl FnOnce(std::io::Error) -> BlobStoreError + '_ {
    move |source| BlobStoreError::Io {
        key: key.to_owned(),
        source,
    }
}

impl BlobStore for DirBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, BlobStoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key)(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BlobStoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(io_error(key))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(io_error(key))?;
        fs::rename(&tmp, &path).map_err(io_error(key))
    }

    fn remove(&self, key: &str) -> Result<(), BlobStoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key)(e)),
        }
    }
}
