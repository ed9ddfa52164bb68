//! Cache module for keeping launches on disk
//!
//! This module provides the local loader, which saves the latest launches
//! as a single snapshot and serves them back while they are inside the
//! freshness window, together with the store implementations it can use: a
//! JSON file and a SQLite database.

mod file_store;
mod local_loader;
mod policy;
mod queue;
mod sqlite_store;
mod store;

#[cfg(test)]
mod store_contract;
#[cfg(test)]
mod store_spy;

use std::path::PathBuf;

use directories::ProjectDirs;

pub use file_store::JsonFileStore;
pub use local_loader::{
    CacheValidation, Clock, LocalLaunchLoader, LocalLoadResult, SaveResult, SystemClock,
};
pub use policy::{CachePolicy, DEFAULT_MAX_CACHE_AGE_DAYS};
pub use sqlite_store::SqliteStore;
pub use store::{
    CacheSnapshot, DeletionCompletion, InsertionCompletion, LaunchStore, LocalLaunchItem,
    RetrievalCompletion, StoreError,
};

/// Returns the XDG-compliant cache directory for launches
///
/// Uses `~/.cache/launches/` on Linux, or the equivalent path on other
/// platforms. Returns `None` if it cannot be determined (e.g., no home
/// directory).
pub fn default_cache_dir() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "launches")?;
    Some(project_dirs.cache_dir().to_path_buf())
}
