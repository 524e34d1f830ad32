//! The generic object-store interface.

use thiserror::Error;

use crate::BoxFuture;

/// Errors that can occur during object store operations.
#[derive(Debug, Error)]
pub enum ObjectStoreError {
    /// I/O failure in the backing store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key cannot be mapped to a storage location.
    #[error("invalid object key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    /// Provider-specific failure.
    #[error("object store provider error: {0}")]
    Provider(String),
}

/// Generic key-value byte storage.
///
/// Keys are human-readable strings (slash-separated paths in practice) so
/// the same key scheme works across memory, disk, and cloud backends.
/// "Not found" is `Ok(None)`, never an error.
///
/// Implementations must be `Send + Sync`, and a `put` observed by a
/// concurrent `get` on the same key must be all-or-nothing: an interrupted
/// or cancelled write never leaves a partial value visible.
pub trait ObjectStore: Send + Sync {
    /// Store a value, replacing any existing value for the key.
    fn put(&self, key: &str, bytes: Vec<u8>) -> BoxFuture<'_, Result<(), ObjectStoreError>>;

    /// Retrieve a value, `Ok(None)` if the key is absent.
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, ObjectStoreError>>;

    /// Delete a value. Returns whether the key existed.
    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, ObjectStoreError>>;

    /// Whether the key exists, without fetching the value.
    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, ObjectStoreError>>;
}
