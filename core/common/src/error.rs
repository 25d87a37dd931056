//! Common error types for RedFS.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for RedFS operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A storage directory could not be inspected or created.
    #[error("Failed to provision directory \"{}\": {reason}", .path.display())]
    Provisioning { path: PathBuf, reason: String },

    /// Copying the legacy storage root failed.
    #[error("Failed to migrate directory from \"{}\" to \"{}\": {source}", .from.display(), .to.display())]
    Migration {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Storage name does not match the naming rule.
    #[error("Name of storage \"{0}\" is not allowed")]
    InvalidName(String),

    /// Storage name is reserved for the shared storage.
    #[error("Name of storage \"{0}\" is reserved")]
    ReservedName(String),

    /// Storage was requested more than once in a session.
    #[error("Attempt to access storage \"{0}\" several times")]
    DuplicateAccess(String),

    /// The registry is not operational.
    #[error("RedFileSystem is disabled")]
    Disabled,

    /// Access through this handle has been revoked.
    #[error("Access to storage \"{0}\" has been revoked")]
    Revoked(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Whether this error disables the registry for the rest of the session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Provisioning { .. } | Error::Migration { .. })
    }
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
