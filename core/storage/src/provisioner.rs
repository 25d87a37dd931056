//! Directory provisioning.

use std::fs;
use std::path::Path;

use redfs_common::{Error, Result};

/// Outcome of a successful provisioning request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioned {
    /// Something already existed at the path.
    Present,
    /// The directory was created by this call.
    Created,
}

/// Ensure a directory exists at `path`.
///
/// Only the last path component is ever created; missing ancestors are an
/// error rather than being created along the way.
///
/// # Postconditions
/// - At most one directory is created, exactly at `path`
/// - Calling again on the same path returns [`Provisioned::Present`]
///
/// # Errors
/// - The existence check failed (permission denied, invalid path)
/// - The directory could not be created
pub fn ensure_directory(path: &Path) -> Result<Provisioned> {
    let is_present = path.try_exists().map_err(|e| Error::Provisioning {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if is_present {
        return Ok(Provisioned::Present);
    }

    fs::create_dir(path).map_err(|e| Error::Provisioning {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(Provisioned::Created)
}
