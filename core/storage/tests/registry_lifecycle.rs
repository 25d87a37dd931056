//! Full load, acquire and unload cycles against a temporary game directory.

use std::fs;
use std::path::{Path, PathBuf};

use redfs_common::Error;
use redfs_storage::{RegistryState, StorageHandle, StorageLayout, StorageRegistry};
use tempfile::TempDir;

fn game_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("r6")).unwrap();
    temp
}

fn legacy_root(base: &Path) -> PathBuf {
    base.join("red4ext")
        .join("plugins")
        .join("RedFileSystem")
        .join("storages")
}

fn storages(base: &Path) -> PathBuf {
    base.join("r6").join("storages")
}

#[test]
fn test_session_walkthrough() {
    let temp = game_dir();
    let mut registry = StorageRegistry::new(StorageLayout::new(temp.path()));
    registry.load().unwrap();

    assert!(matches!(registry.acquire("ab"), Err(Error::InvalidName(_))));

    let my_mod = registry.acquire("MyMod").unwrap();
    assert!(storages(temp.path()).join("MyMod").is_dir());
    fs::write(my_mod.resolve("settings.json").unwrap(), b"{}").unwrap();

    assert!(matches!(
        registry.acquire("mymod"),
        Err(Error::DuplicateAccess(_))
    ));
    assert!(my_mod.is_revoked());
    assert!(my_mod.resolve("settings.json").is_err());

    assert!(matches!(
        registry.acquire("shared"),
        Err(Error::ReservedName(_))
    ));

    let shared = registry.acquire_shared().unwrap();
    let shared_again = registry.acquire_shared().unwrap();
    assert!(StorageHandle::same_storage(&shared, &shared_again));

    assert_eq!(
        registry.granted(),
        vec!["MyMod".to_string(), "shared".to_string()]
    );

    registry.unload();
    assert_eq!(registry.state(), RegistryState::Disabled);
    assert!(registry.get_shared_storage().is_none());
    // Data written during the session survives teardown.
    assert!(storages(temp.path()).join("MyMod").join("settings.json").exists());
}

#[test]
fn test_legacy_storages_migrated_then_removed() {
    let temp = game_dir();
    let legacy = legacy_root(temp.path());
    fs::create_dir_all(legacy.join("MyMod")).unwrap();
    fs::write(legacy.join("MyMod").join("save.json"), b"legacy").unwrap();
    fs::create_dir_all(storages(temp.path()).join("MyMod")).unwrap();
    fs::write(storages(temp.path()).join("MyMod").join("save.json"), b"stale").unwrap();

    let mut registry = StorageRegistry::new(StorageLayout::new(temp.path()));
    registry.load().unwrap();

    let handle = registry.acquire("MyMod").unwrap();
    assert_eq!(fs::read(handle.resolve("save.json").unwrap()).unwrap(), b"legacy");
    assert!(legacy.exists());

    registry.unload();
    assert!(!legacy.exists());
    assert!(storages(temp.path()).join("MyMod").join("save.json").exists());
}

#[test]
fn test_interrupted_session_copies_again() {
    let temp = game_dir();
    let legacy = legacy_root(temp.path());
    fs::create_dir_all(legacy.join("MyMod")).unwrap();
    fs::write(legacy.join("MyMod").join("save.json"), b"legacy").unwrap();

    // First run ends without unload.
    {
        let mut registry = StorageRegistry::new(StorageLayout::new(temp.path()));
        registry.load().unwrap();
        let handle = registry.acquire("MyMod").unwrap();
        fs::write(handle.resolve("save.json").unwrap(), b"edited").unwrap();
    }
    assert!(legacy.exists());

    // The next run copies the legacy tree over the edits.
    let mut registry = StorageRegistry::new(StorageLayout::new(temp.path()));
    registry.load().unwrap();
    let handle = registry.acquire("MyMod").unwrap();
    assert_eq!(fs::read(handle.resolve("save.json").unwrap()).unwrap(), b"legacy");
}

#[test]
fn test_failed_migration_recovers_next_run() {
    let temp = game_dir();
    let legacy = legacy_root(temp.path());
    fs::create_dir_all(&legacy).unwrap();
    // A legacy file where the storage root already has a directory.
    fs::write(legacy.join("MyMod"), b"legacy file").unwrap();
    fs::create_dir_all(storages(temp.path()).join("MyMod")).unwrap();

    let mut registry = StorageRegistry::new(StorageLayout::new(temp.path()));
    let result = registry.load();

    assert!(matches!(result, Err(Error::Migration { .. })));
    assert_eq!(registry.state(), RegistryState::Disabled);
    assert!(registry.get_storage("MyMod").is_none());
    assert!(registry.get_shared_storage().is_none());

    registry.unload();
    assert!(!legacy.exists());

    let mut next_run = StorageRegistry::new(StorageLayout::new(temp.path()));
    next_run.load().unwrap();
    assert_eq!(next_run.state(), RegistryState::Operational);
    assert!(next_run.acquire("MyMod").is_ok());
}

#[test]
fn test_legacy_root_file_migrated() {
    let temp = game_dir();
    let legacy = legacy_root(temp.path());
    fs::create_dir_all(legacy.parent().unwrap()).unwrap();
    fs::write(&legacy, b"loose file").unwrap();

    let mut registry = StorageRegistry::new(StorageLayout::new(temp.path()));
    registry.load().unwrap();
    assert!(storages(temp.path()).join("storages").is_file());

    registry.unload();
    assert!(!legacy.exists());
}

#[test]
fn test_custom_layout() {
    let temp = TempDir::new().unwrap();
    let layout = StorageLayout::from_json(&format!(
        r#"{{"base_dir": {:?}, "storages_dir": "data", "legacy_dir": "old"}}"#,
        temp.path().to_str().unwrap()
    ))
    .unwrap();

    let mut registry = StorageRegistry::new(layout);
    registry.load().unwrap();

    let handle = registry.acquire("MyMod").unwrap();
    assert_eq!(handle.path().unwrap(), temp.path().join("data").join("MyMod").as_path());
}
