//! Storage registry granting per-name access to storage directories.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use redfs_common::{Error, Result, StorageName};
use crate::handle::StorageHandle;
use crate::layout::StorageLayout;
use crate::migrator::{self, Migration};
use crate::provisioner;
use crate::validator;

/// Lifecycle state of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    /// `load` has not been called yet.
    Uninitialized,
    /// Storages can be granted.
    Operational,
    /// Loading failed or the registry was unloaded.
    Disabled,
}

/// A name bound to its storage for the rest of the session.
#[derive(Debug)]
struct StorageEntry {
    name: StorageName,
    handle: StorageHandle,
}

/// Registry handing out one storage directory per client name.
///
/// A name can be granted once per session. A second request for the same
/// name, in any casing, is rejected and permanently revokes the storage
/// that was granted first. The shared storage is the one exception: every
/// request returns the same handle.
///
/// The registry owns every granted storage until [`StorageRegistry::unload`].
/// Callers needing concurrent access must wrap it in a single lock, as the
/// duplicate check and the insert form one critical section.
pub struct StorageRegistry {
    layout: StorageLayout,
    entries: HashMap<String, StorageEntry>,
    state: RegistryState,
}

impl StorageRegistry {
    /// Create an uninitialized registry for the given layout.
    pub fn new(layout: StorageLayout) -> Self {
        Self {
            layout,
            entries: HashMap::new(),
            state: RegistryState::Uninitialized,
        }
    }

    /// Provision the storage root and migrate legacy storages.
    ///
    /// # Preconditions
    /// - Registry has not been loaded before
    ///
    /// # Postconditions
    /// - On success the registry is operational
    /// - On failure the registry is disabled for the rest of the session
    ///
    /// # Errors
    /// - Registry already loaded
    /// - Storage root could not be provisioned
    /// - Legacy storages could not be migrated
    pub fn load(&mut self) -> Result<()> {
        if self.state != RegistryState::Uninitialized {
            warn!("RedFileSystem has already been loaded.");
            return Err(Error::InvalidInput(
                "Registry has already been loaded".to_string(),
            ));
        }

        let root = self.layout.root();
        if let Err(e) = provisioner::ensure_directory(&root) {
            self.state = RegistryState::Disabled;
            error!("Failed to create directory at \"{}\".", root.display());
            error!("RedFileSystem has been disabled.");
            return Err(e);
        }

        let legacy_root = self.layout.legacy_root();
        match migrator::migrate(&legacy_root, &root) {
            Ok(Migration::NoOp) => {}
            Ok(Migration::Migrated { files }) => {
                info!(
                    "Migrated {} file(s) from \"{}\" to \"{}\".",
                    files,
                    legacy_root.display(),
                    root.display()
                );
            }
            Err(e) => {
                self.state = RegistryState::Disabled;
                warn!(
                    "Failed to migrate directory from \"{}\" to \"{}\".",
                    legacy_root.display(),
                    root.display()
                );
                warn!("You need to manually move content yourself.");
                return Err(e);
            }
        }

        self.state = RegistryState::Operational;
        info!("RedFileSystem has been enabled.");
        Ok(())
    }

    /// Tear the registry down.
    ///
    /// Removes the legacy root (best effort), revokes and forgets every
    /// granted storage, and disables the registry.
    pub fn unload(&mut self) {
        let legacy_root = self.layout.legacy_root();
        if let Err(e) = migrator::remove_legacy(&legacy_root) {
            debug!(
                "Could not remove legacy storages at \"{}\": {}",
                legacy_root.display(),
                e
            );
        }

        for entry in self.entries.values() {
            entry.handle.revoke();
        }
        self.entries.clear();
        self.state = RegistryState::Disabled;
        info!("RedFileSystem has been terminated.");
    }

    /// Grant exclusive access to the storage called `name`.
    ///
    /// # Postconditions
    /// - On success `StorageRoot/name` exists and the name is bound
    /// - On a repeated name the first storage is revoked
    ///
    /// # Errors
    /// - Registry is not operational
    /// - Name is invalid or reserved
    /// - Name was already granted this session
    /// - Storage directory could not be provisioned
    pub fn acquire(&mut self, name: &str) -> Result<StorageHandle> {
        if !self.is_operational() {
            error!("RedFileSystem is disabled for all mods.");
            return Err(Error::Disabled);
        }

        if let Err(e) = validator::validate(name).into_result(name) {
            error!("Name of storage \"{}\" is not allowed.", name);
            error!("See the documentation to fix this issue.");
            return Err(e);
        }

        let name = StorageName::new(name);
        if let Some(entry) = self.entries.get(&name.canonical()) {
            entry.handle.revoke();
            error!(
                "Attempt to access storage \"{}\" several times. Only one mod can access \
                 its own storage with RedFileSystem. Access to storage \"{}\" has been \
                 permanently revoked for this session.",
                name, entry.name
            );
            return Err(Error::DuplicateAccess(name.to_string()));
        }

        let handle = self
            .grant(name.clone())
            .inspect_err(|_| error!("Failed to create storage \"{}\".", name))?;
        info!("Access to storage \"{}\" has been granted.", name);
        Ok(handle)
    }

    /// Grant access to the storage shared by every client.
    ///
    /// Repeated calls return the same storage.
    ///
    /// # Errors
    /// - Registry is not operational
    /// - Shared directory could not be provisioned
    pub fn acquire_shared(&mut self) -> Result<StorageHandle> {
        if !self.is_operational() {
            error!("RedFileSystem is disabled.");
            return Err(Error::Disabled);
        }

        let name = StorageName::shared();
        if let Some(entry) = self.entries.get(&name.canonical()) {
            info!("Access to shared storage has been granted.");
            return Ok(entry.handle.clone());
        }

        let handle = self
            .grant(name)
            .inspect_err(|_| error!("Failed to create shared storage."))?;
        info!("Access to shared storage has been granted.");
        Ok(handle)
    }

    /// Host-facing variant of [`StorageRegistry::acquire`].
    ///
    /// Rejections are logged and reported as `None`.
    pub fn get_storage(&mut self, name: &str) -> Option<StorageHandle> {
        self.acquire(name).ok()
    }

    /// Host-facing variant of [`StorageRegistry::acquire_shared`].
    pub fn get_shared_storage(&mut self) -> Option<StorageHandle> {
        self.acquire_shared().ok()
    }

    fn grant(&mut self, name: StorageName) -> Result<StorageHandle> {
        let path = self.layout.root().join(name.as_str());
        provisioner::ensure_directory(&path)?;

        let handle = StorageHandle::new(name.clone(), path);
        self.entries.insert(
            name.canonical(),
            StorageEntry {
                name,
                handle: handle.clone(),
            },
        );
        Ok(handle)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RegistryState {
        self.state
    }

    /// Check if storages can be granted.
    pub fn is_operational(&self) -> bool {
        self.state == RegistryState::Operational
    }

    /// Layout this registry was created with.
    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    /// Absolute storage root.
    pub fn root(&self) -> PathBuf {
        self.layout.root()
    }

    /// Names bound this session, as first requested, sorted.
    pub fn granted(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .values()
            .map(|entry| entry.name.to_string())
            .collect();
        names.sort();
        names
    }

    /// Check if `name` is bound, ignoring case.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }
}

/// Create a registry for `base_dir` with the default layout and load it.
///
/// Load failures are logged and leave the registry disabled; the registry is
/// returned either way so the host can keep answering requests.
pub fn load_registry(base_dir: impl AsRef<Path>) -> StorageRegistry {
    let mut registry = StorageRegistry::new(StorageLayout::new(base_dir.as_ref()));
    if let Err(e) = registry.load() {
        debug!("Registry stays disabled: {}", e);
    }
    registry
}
