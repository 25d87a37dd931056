//! Common types used throughout RedFS.

use std::fmt;

/// Name reserved for the storage shared by every client.
pub const SHARED_STORAGE_NAME: &str = "shared";

/// Minimum length of a storage name.
pub const MIN_NAME_LEN: usize = 3;

/// Maximum length of a storage name.
pub const MAX_NAME_LEN: usize = 24;

/// Name of a storage as requested by a client.
///
/// The requested casing is kept for diagnostics and for the directory
/// component on disk. Comparisons between names go through
/// [`StorageName::canonical`], which is the ASCII lower-case form.
#[derive(Debug, Clone)]
pub struct StorageName(String);

impl StorageName {
    /// Wrap a name. No validation is performed here.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The reserved shared storage name.
    pub fn shared() -> Self {
        Self(SHARED_STORAGE_NAME.to_string())
    }

    /// Get the name as requested.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key used for case-insensitive lookups.
    pub fn canonical(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    /// Compare against another name ignoring ASCII case.
    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }

    /// Check if this is the reserved shared name, in any casing.
    pub fn is_shared(&self) -> bool {
        self.eq_ignore_case(SHARED_STORAGE_NAME)
    }
}

impl PartialEq for StorageName {
    fn eq(&self, other: &Self) -> bool {
        self.eq_ignore_case(&other.0)
    }
}

impl Eq for StorageName {}

impl fmt::Display for StorageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StorageName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
