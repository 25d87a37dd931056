//! One-time migration of the legacy storage root.
//!
//! Older releases kept storages below the plugin directory. On startup the
//! legacy tree is copied over the current storage root; the legacy tree is
//! only removed at teardown, so an interrupted session simply copies again
//! on the next start.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, error};
use walkdir::WalkDir;

use redfs_common::{Error, Result};

/// Outcome of a successful migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Migration {
    /// No legacy root exists.
    NoOp,
    /// The legacy root was copied.
    Migrated {
        /// Number of files copied.
        files: usize,
    },
}

/// Copy `old_root` recursively into `new_root`.
///
/// Files already present in `new_root` are overwritten. A legacy root that
/// is a regular file is copied into `new_root`. `old_root` is left
/// untouched; see [`remove_legacy`].
///
/// # Errors
/// - The existence check on `old_root` failed
/// - Any directory creation or file copy failed; the I/O error is kept as
///   the source of [`Error::Migration`]
pub fn migrate(old_root: &Path, new_root: &Path) -> Result<Migration> {
    let migration_error = |source: io::Error| Error::Migration {
        from: old_root.to_path_buf(),
        to: new_root.to_path_buf(),
        source,
    };

    let has_old_root = old_root.try_exists().map_err(migration_error)?;
    if !has_old_root {
        debug!("No legacy storages at \"{}\"", old_root.display());
        return Ok(Migration::NoOp);
    }

    match copy_tree(old_root, new_root) {
        Ok(files) => Ok(Migration::Migrated { files }),
        Err(e) => {
            error!("Could not migrate \"storages\" due to: {}.", e);
            Err(migration_error(e))
        }
    }
}

/// Remove the legacy root, if any.
///
/// Returns `Ok(false)` when there was nothing to remove.
pub fn remove_legacy(old_root: &Path) -> Result<bool> {
    if !old_root.try_exists()? {
        return Ok(false);
    }
    if old_root.is_dir() {
        fs::remove_dir_all(old_root)?;
    } else {
        fs::remove_file(old_root)?;
    }
    Ok(true)
}

fn copy_tree(from: &Path, to: &Path) -> io::Result<usize> {
    // A single file is copied into the target directory under its own name.
    if !from.is_dir() {
        let file_name = from.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("\"{}\" has no file name", from.display()),
            )
        })?;
        fs::copy(from, to.join(file_name))?;
        return Ok(1);
    }

    let mut files = 0;
    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| io::Error::other(e.to_string()))?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            files += 1;
        }
    }
    Ok(files)
}
