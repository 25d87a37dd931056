//! Handle to a granted storage.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use redfs_common::{Error, Result, StorageName};

#[derive(Debug)]
struct StorageInner {
    name: StorageName,
    path: PathBuf,
    granted_at: DateTime<Utc>,
    revoked: AtomicBool,
}

/// Capability to use one storage directory.
///
/// Handles are cheap to clone and every clone refers to the same storage.
/// Once the registry revokes a storage, every clone observes it and all
/// path-returning operations fail with [`Error::Revoked`].
#[derive(Debug, Clone)]
pub struct StorageHandle {
    inner: Arc<StorageInner>,
}

impl StorageHandle {
    pub(crate) fn new(name: StorageName, path: PathBuf) -> Self {
        Self {
            inner: Arc::new(StorageInner {
                name,
                path,
                granted_at: Utc::now(),
                revoked: AtomicBool::new(false),
            }),
        }
    }

    /// Name the storage was granted under.
    pub fn name(&self) -> &StorageName {
        &self.inner.name
    }

    /// When access was granted.
    pub fn granted_at(&self) -> DateTime<Utc> {
        self.inner.granted_at
    }

    /// Check if access has been revoked.
    pub fn is_revoked(&self) -> bool {
        self.inner.revoked.load(Ordering::Acquire)
    }

    /// Permanently revoke access for every holder of this storage.
    pub(crate) fn revoke(&self) {
        self.inner.revoked.store(true, Ordering::Release);
    }

    /// Check if two handles refer to the same underlying storage.
    pub fn same_storage(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    fn check_access(&self) -> Result<()> {
        if self.is_revoked() {
            return Err(Error::Revoked(self.inner.name.to_string()));
        }
        Ok(())
    }

    /// Directory of the storage.
    ///
    /// # Errors
    /// - Access has been revoked
    pub fn path(&self) -> Result<&Path> {
        self.check_access()?;
        Ok(&self.inner.path)
    }

    /// Path of a file directly inside the storage.
    ///
    /// # Preconditions
    /// - `file` is a single, non-empty path component
    ///
    /// # Errors
    /// - Access has been revoked
    /// - `file` is empty, `.`/`..`, or contains a separator
    pub fn resolve(&self, file: &str) -> Result<PathBuf> {
        self.check_access()?;

        if file.is_empty() || file == "." || file == ".." {
            return Err(Error::InvalidInput(format!(
                "\"{}\" is not a valid file name",
                file
            )));
        }
        if file.contains('/') || file.contains('\\') {
            return Err(Error::InvalidInput(
                "File name cannot contain separators".to_string(),
            ));
        }

        Ok(self.inner.path.join(file))
    }
}
