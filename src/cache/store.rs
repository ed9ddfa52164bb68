//! Persistence boundary for the launch cache

use chrono::{DateTime, Utc};
use futures::channel::oneshot;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::LaunchItem;

/// A launch as kept in the local cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalLaunchItem {
    pub id: i64,
    pub name: String,
    pub date: String,
}

impl LocalLaunchItem {
    pub fn new(id: i64, name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            date: date.into(),
        }
    }
}

impl From<LaunchItem> for LocalLaunchItem {
    fn from(item: LaunchItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            date: item.date,
        }
    }
}

impl From<LocalLaunchItem> for LaunchItem {
    fn from(local: LocalLaunchItem) -> Self {
        Self {
            id: local.id,
            name: local.name,
            date: local.date,
        }
    }
}

/// The whole cache: every launch plus the single time they were stored at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSnapshot {
    pub launches: Vec<LocalLaunchItem>,
    pub timestamp: DateTime<Utc>,
}

/// Errors reported by a [`LaunchStore`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Reading or writing the cache file failed
    #[error("Cache I/O failed: {0}")]
    Io(String),

    /// Cache contents could not be encoded or decoded
    #[error("Cache data is invalid: {0}")]
    Encoding(String),

    /// The cache database reported an error
    #[error("Cache database failed: {0}")]
    Database(String),

    /// The store finished an operation without reporting back
    #[error("Cache operation ended without completing")]
    Interrupted,
}

impl From<std::io::Error> for StoreError {
    fn from(error: std::io::Error) -> Self {
        StoreError::Io(error.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        StoreError::Encoding(error.to_string())
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        StoreError::Database(error.to_string())
    }
}

impl From<oneshot::Canceled> for StoreError {
    fn from(_: oneshot::Canceled) -> Self {
        StoreError::Interrupted
    }
}

pub type DeletionCompletion = Box<dyn FnOnce(Result<(), StoreError>) + Send + 'static>;
pub type InsertionCompletion = Box<dyn FnOnce(Result<(), StoreError>) + Send + 'static>;
pub type RetrievalCompletion =
    Box<dyn FnOnce(Result<Option<CacheSnapshot>, StoreError>) + Send + 'static>;

/// Holds at most one [`CacheSnapshot`]
///
/// Completions can be invoked on any thread; callers are responsible for
/// moving results to the thread they need. Operations issued against one
/// store complete in the order they were issued.
pub trait LaunchStore: Send + Sync {
    /// Removes the snapshot, succeeding when there is none
    fn delete_cached_launches(&self, completion: DeletionCompletion);

    /// Replaces whatever is stored with exactly this snapshot
    fn insert(
        &self,
        launches: Vec<LocalLaunchItem>,
        timestamp: DateTime<Utc>,
        completion: InsertionCompletion,
    );

    /// Delivers the snapshot, `None` when the cache is empty
    fn retrieve(&self, completion: RetrievalCompletion);
}
