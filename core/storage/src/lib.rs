//! Storage broker for RedFS.
//!
//! This module hands out name-scoped directories below a storage root to
//! clients ("mods"), plus one directory shared by all of them.
//!
//! # Design Principles
//! - One grant per name: a repeated request revokes the first grant
//! - Fail closed: a root that cannot be provisioned disables every request
//! - Legacy storages are copied on load and only removed on unload

pub mod handle;
pub mod layout;
pub mod migrator;
pub mod provisioner;
pub mod registry;
pub mod validator;

pub use handle::StorageHandle;
pub use layout::StorageLayout;
pub use migrator::Migration;
pub use provisioner::Provisioned;
pub use registry::{load_registry, RegistryState, StorageRegistry};
pub use validator::{validate, Validation};
