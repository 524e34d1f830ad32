//! On-disk object store.
//!
//! Keys map directly onto relative paths under a root directory, so the
//! layout on disk mirrors the key scheme (`<canvas>/<x>_<y>_<side>.png`).
//! Writes go through a unique temporary file followed by a rename, so a
//! crashed or cancelled write never leaves a truncated object behind.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::fs;
use tracing::trace;

use crate::cache::traits::{ObjectStore, ObjectStoreError};
use crate::BoxFuture;

/// Object store persisting values as files under a root directory.
pub struct DiskObjectStore {
    root: PathBuf,
    temp_seq: AtomicU64,
}

impl DiskObjectStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            temp_seq: AtomicU64::new(0),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to a path under the root, rejecting keys that would
    /// escape it.
    fn path_for(&self, key: &str) -> Result<PathBuf, ObjectStoreError> {
        if key.is_empty() {
            return Err(ObjectStoreError::InvalidKey {
                key: key.to_string(),
                reason: "key is empty",
            });
        }
        let mut path = self.root.clone();
        for component in key.split('/') {
            if component.is_empty() || component == "." || component == ".." {
                return Err(ObjectStoreError::InvalidKey {
                    key: key.to_string(),
                    reason: "key contains an empty or relative path component",
                });
            }
            path.push(component);
        }
        Ok(path)
    }

    fn temp_path_for(&self, path: &Path) -> PathBuf {
        let seq = self.temp_seq.fetch_add(1, Ordering::Relaxed);
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".tmp.{}.{}", std::process::id(), seq));
        path.with_file_name(name)
    }
}

impl ObjectStore for DiskObjectStore {
    fn put(&self, key: &str, bytes: Vec<u8>) -> BoxFuture<'_, Result<(), ObjectStoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            let path = self.path_for(&key)?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }

            // Write to a sibling temp file, then rename into place. The
            // rename is atomic on the same filesystem, so readers only ever
            // see complete objects.
            let temp = self.temp_path_for(&path);
            if let Err(err) = fs::write(&temp, &bytes).await {
                let _ = fs::remove_file(&temp).await;
                return Err(err.into());
            }
            if let Err(err) = fs::rename(&temp, &path).await {
                let _ = fs::remove_file(&temp).await;
                return Err(err.into());
            }

            trace!(key, bytes = bytes.len(), "wrote object to disk");
            Ok(())
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, ObjectStoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            let path = self.path_for(&key)?;
            match fs::read(&path).await {
                Ok(bytes) => Ok(Some(bytes)),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err.into()),
            }
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, ObjectStoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            let path = self.path_for(&key)?;
            match fs::remove_file(&path).await {
                Ok(()) => Ok(true),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
                Err(err) => Err(err.into()),
            }
        })
    }

    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, ObjectStoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            let path = self.path_for(&key)?;
            match fs::metadata(&path).await {
                Ok(meta) => Ok(meta.is_file()),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
                Err(err) => Err(err.into()),
            }
        })
    }
}
