//! Common utilities and types shared across the RedFS crates.
//!
//! This module provides the error taxonomy and the storage name type used by
//! the storage broker and its host shims.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{StorageName, MAX_NAME_LEN, MIN_NAME_LEN, SHARED_STORAGE_NAME};
