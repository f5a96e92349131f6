//! Persistence adapter binding an entry list to one blob key.
//!
//! Stores never talk to the blob store directly. After every mutation they
//! hand their full entry list to a [`ChangeHook`]; [`ListPersistence`] is the
//! hook that serializes the list as JSON under its key. Swapping the backend
//! means swapping the hook, not touching mutation logic.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::blob::{BlobStore, BlobStoreError};

/// Errors raised while loading or saving persisted state.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The blob store failed.
    #[error("storage error: {0}")]
    Storage(#[from] BlobStoreError),

    /// The stored value could not be parsed.
    #[error("malformed value under key {key}: {source}")]
    Malformed {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory value could not be serialized.
    #[error("failed to serialize value for key {key}: {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Observer invoked by a store after each mutation with the new entry list.
pub trait ChangeHook<E>: Send + Sync {
    /// React to the store's new state.
    fn on_change(&self, entries: &[E]);
}

/// Hook that ignores every change. Used for stores that should not persist.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPersistence;

impl<E> ChangeHook<E> for NoPersistence {
    fn on_change(&self, _entries: &[E]) {}
}

/// JSON persistence of a `Vec<E>` under a fixed blob key.
pub struct ListPersistence<E> {
    store: Arc<dyn BlobStore>,
    key: &'static str,
    _entries: PhantomData<fn() -> E>,
}

impl<E> Clone for ListPersistence<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key,
            _entries: PhantomData,
        }
    }
}

impl<E> std::fmt::Debug for ListPersistence<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListPersistence")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl<E> ListPersistence<E>
where
    E: Serialize + DeserializeOwned,
{
    /// Bind `key` on `store`.
    #[must_use]
    pub fn new(store: Arc<dyn BlobStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            _entries: PhantomData,
        }
    }

    /// Read and parse the persisted list. A missing key is an empty list.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Storage` if the store cannot be read and
    /// `PersistenceError::Malformed` if the stored text does not parse.
    pub fn load(&self) -> Result<Vec<E>, PersistenceError> {
        let Some(raw) = self.store.get(self.key)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|source| PersistenceError::Malformed {
            key: self.key,
            source,
        })
    }

    /// Load the persisted list, falling back to empty on any failure.
    ///
    /// Stored carts and wishlists are convenience state; an unreadable blob
    /// must never prevent the storefront from starting.
    #[must_use]
    pub fn load_or_default(&self) -> Vec<E> {
        match self.load() {
            Ok(entries) => {
                debug!(key = self.key, count = entries.len(), "Loaded persisted entries");
                entries
            }
            Err(e) => {
                warn!(key = self.key, error = %e, "Discarding unreadable persisted state");
                Vec::new()
            }
        }
    }

    /// Serialize `entries` and overwrite the blob.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, entries: &[E]) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(entries).map_err(|source| PersistenceError::Serialize {
            key: self.key,
            source,
        })?;
        self.store.set(self.key, &raw)?;
        Ok(())
    }
}

impl<E> ChangeHook<E> for ListPersistence<E>
where
    E: Serialize + DeserializeOwned,
{
    /// Best-effort save. Failures are logged and reported, never propagated;
    /// the next successful write replaces whatever was lost.
    fn on_change(&self, entries: &[E]) {
        if let Err(e) = self.save(entries) {
            report_write_failure(self.key, &e);
        }
    }
}

/// Log and capture a failed best-effort write. The caller carries on with
/// its in-memory state.
pub(crate) fn report_write_failure(key: &str, err: &PersistenceError) {
    let event_id = sentry::capture_error(err);
    error!(
        key,
        error = %err,
        sentry_event_id = %event_id,
        "Failed to persist state"
    );
}
