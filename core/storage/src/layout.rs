//! On-disk layout of the storage root.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use redfs_common::{Error, Result};

/// Default location of the storage root, relative to the base directory.
pub const STORAGES_DIRNAME: &str = "r6/storages";

/// Location of the storage root used by older releases.
pub const LEGACY_STORAGES_DIRNAME: &str = "red4ext/plugins/RedFileSystem/storages";

/// Where storages live, relative to the host base location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLayout {
    /// Absolute base directory provided by the host.
    pub base_dir: PathBuf,
    /// Storage root, relative to `base_dir`.
    #[serde(default = "default_storages_dir")]
    pub storages_dir: PathBuf,
    /// Legacy storage root, relative to `base_dir`.
    #[serde(default = "default_legacy_dir")]
    pub legacy_dir: PathBuf,
}

fn default_storages_dir() -> PathBuf {
    PathBuf::from(STORAGES_DIRNAME)
}

fn default_legacy_dir() -> PathBuf {
    PathBuf::from(LEGACY_STORAGES_DIRNAME)
}

impl StorageLayout {
    /// Create the default layout below `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            storages_dir: default_storages_dir(),
            legacy_dir: default_legacy_dir(),
        }
    }

    /// Derive the base directory from the process working directory.
    ///
    /// The host loads plugins two levels below its install directory, so the
    /// base is the grandparent of the working directory.
    ///
    /// # Errors
    /// - Working directory cannot be resolved
    /// - Working directory has fewer than two ancestors
    pub fn from_working_dir() -> Result<Self> {
        let cwd = std::path::absolute(".")?;
        let base = grandparent(&cwd).ok_or_else(|| {
            Error::InvalidInput(format!(
                "Cannot derive base directory from \"{}\"",
                cwd.display()
            ))
        })?;
        Ok(Self::new(base))
    }

    /// Absolute storage root.
    pub fn root(&self) -> PathBuf {
        self.base_dir.join(&self.storages_dir)
    }

    /// Absolute legacy storage root.
    pub fn legacy_root(&self) -> PathBuf {
        self.base_dir.join(&self.legacy_dir)
    }

    /// Serialize layout to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize layout from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }
}

fn grandparent(path: &Path) -> Option<PathBuf> {
    // Drop `.` components so each `parent` removes a real directory.
    let path: PathBuf = path.components().collect();
    path.parent()?.parent().map(Path::to_path_buf)
}
