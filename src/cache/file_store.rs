//! Launch store persisted as a single JSON file
//!
//! The file holds `{"launches": [...], "timestamp": ...}`. Inserts write a
//! uniquely named temporary file next to the store and rename it over the
//! store, so readers never see a partially written cache.

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use super::queue::SerialQueue;
use super::store::{
    CacheSnapshot, DeletionCompletion, InsertionCompletion, LaunchStore, LocalLaunchItem,
    RetrievalCompletion, StoreError,
};

/// On-disk layout of the cache file
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// The cached launches, in order
    launches: Vec<LocalLaunchItem>,
    /// When the launches were cached
    timestamp: DateTime<Utc>,
}

/// Stores the launch cache in one JSON file
///
/// All file access happens on a private worker thread, one operation at a
/// time, in the order operations were requested.
#[derive(Debug)]
pub struct JsonFileStore {
    /// Location of the cache file
    store_path: Arc<PathBuf>,
    queue: SerialQueue,
}

impl JsonFileStore {
    /// Creates a store backed by the file at `store_path`
    ///
    /// The file and its parent directories are created on first insert.
    pub fn new(store_path: impl Into<PathBuf>) -> io::Result<Self> {
        Ok(Self {
            store_path: Arc::new(store_path.into()),
            queue: SerialQueue::new("launches-json-store")?,
        })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }
}

impl LaunchStore for JsonFileStore {
    fn delete_cached_launches(&self, completion: DeletionCompletion) {
        let path = Arc::clone(&self.store_path);
        self.queue.dispatch(move || completion(delete_file(&path)));
    }

    fn insert(
        &self,
        launches: Vec<LocalLaunchItem>,
        timestamp: DateTime<Utc>,
        completion: InsertionCompletion,
    ) {
        let path = Arc::clone(&self.store_path);
        let entry = CacheEntry {
            launches,
            timestamp,
        };
        self.queue.dispatch(move || completion(write_file(&path, &entry)));
    }

    fn retrieve(&self, completion: RetrievalCompletion) {
        let path = Arc::clone(&self.store_path);
        self.queue.dispatch(move || completion(read_file(&path)));
    }
}

/// Reads the snapshot; a missing file is an empty cache
fn read_file(path: &Path) -> Result<Option<CacheSnapshot>, StoreError> {
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let entry: CacheEntry = serde_json::from_slice(&content)?;
    debug!(path = %path.display(), launches = entry.launches.len(), "read cache file");

    Ok(Some(CacheSnapshot {
        launches: entry.launches,
        timestamp: entry.timestamp,
    }))
}

/// Replaces the cache file with `entry`
fn write_file(path: &Path, entry: &CacheEntry) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let json = serde_json::to_vec_pretty(entry)?;
    // Removed on drop unless persisted, so a failed write leaves nothing behind
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(&json)?;
    temp.persist(path).map_err(|e| e.error)?;

    debug!(path = %path.display(), launches = entry.launches.len(), "wrote cache file");
    Ok(())
}

/// Removes the cache file; nothing to remove is not an error
fn delete_file(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed cache file");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
