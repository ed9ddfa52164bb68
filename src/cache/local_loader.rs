//! Saves launches to and loads them from a [`LaunchStore`]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::channel::oneshot;
use tracing::{debug, warn};

use super::policy::CachePolicy;
use super::store::{CacheSnapshot, LaunchStore, LocalLaunchItem, StoreError};
use crate::data::{LaunchItem, LaunchLoader, LoadCompletion};
use crate::liveness::{Liveness, Watch};

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc> + Send + Sync,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

pub type SaveResult = Result<(), StoreError>;
pub type LocalLoadResult = Result<Vec<LaunchItem>, StoreError>;

/// What [`LocalLaunchLoader::validate_cache_with`] found and did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheValidation {
    /// Nothing was cached
    Empty,
    /// The snapshot is inside the freshness window and was kept
    Fresh,
    /// The snapshot was outside the freshness window and was deleted
    PrunedStale,
    /// The snapshot could not be read and was deleted
    PrunedUnreadable,
}

/// Keeps the launch cache in a [`LaunchStore`]
///
/// No completion is delivered once the loader has been dropped, and no
/// corrective delete is issued on its behalf either.
pub struct LocalLaunchLoader<S: LaunchStore + ?Sized> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
    liveness: Liveness,
}

impl<S: LaunchStore + ?Sized + 'static> LocalLaunchLoader<S> {
    pub fn new(store: Arc<S>, clock: impl Clock + 'static) -> Self {
        Self {
            store,
            clock: Arc::new(clock),
            policy: CachePolicy::default(),
            liveness: Liveness::new(),
        }
    }

    /// Replaces the default seven day freshness window
    pub fn with_policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Replaces the cache with `launches`, stamped with the current time
    ///
    /// The existing snapshot is deleted first. If that fails the error is
    /// reported and nothing is inserted.
    pub fn save<F>(&self, launches: Vec<LaunchItem>, completion: F)
    where
        F: FnOnce(SaveResult) + Send + 'static,
    {
        let timestamp = self.clock.now();
        let store = Arc::clone(&self.store);
        let watch = self.liveness.watch();

        self.store.delete_cached_launches(Box::new(move |deletion| {
            if !watch.is_alive() {
                return;
            }

            if let Err(error) = deletion {
                warn!(%error, "could not delete cached launches, not saving");
                completion(Err(error));
                return;
            }

            Self::cache(&store, launches, timestamp, watch, completion);
        }));
    }

    fn cache<F>(
        store: &S,
        launches: Vec<LaunchItem>,
        timestamp: DateTime<Utc>,
        watch: Watch,
        completion: F,
    ) where
        F: FnOnce(SaveResult) + Send + 'static,
    {
        let count = launches.len();
        let local = launches.into_iter().map(LocalLaunchItem::from).collect();

        store.insert(
            local,
            timestamp,
            Box::new(move |insertion| {
                if !watch.is_alive() {
                    return;
                }

                match &insertion {
                    Ok(()) => debug!(launches = count, %timestamp, "saved launches to cache"),
                    Err(error) => warn!(%error, "could not insert launches into cache"),
                }
                completion(insertion);
            }),
        );
    }

    /// Awaits [`save`](Self::save)
    pub async fn save_async(&self, launches: Vec<LaunchItem>) -> SaveResult {
        let (tx, rx) = oneshot::channel();
        self.save(launches, move |result| {
            let _ = tx.send(result);
        });
        rx.await?
    }

    /// Delivers the cached launches if they are still fresh
    ///
    /// An empty or stale cache yields an empty list. Loading never modifies
    /// the cache; pruning stale data is left to
    /// [`validate_cache`](Self::validate_cache).
    pub fn load<F>(&self, completion: F)
    where
        F: FnOnce(LocalLoadResult) + Send + 'static,
    {
        let clock = Arc::clone(&self.clock);
        let policy = self.policy;
        let watch = self.liveness.watch();

        self.store.retrieve(Box::new(move |retrieval| {
            if !watch.is_alive() {
                return;
            }

            let result = match retrieval {
                Err(error) => {
                    warn!(%error, "could not retrieve cached launches");
                    Err(error)
                }
                Ok(Some(CacheSnapshot {
                    launches,
                    timestamp,
                })) if policy.is_fresh(timestamp, clock.now()) => {
                    debug!(launches = launches.len(), %timestamp, "serving fresh cache");
                    Ok(launches.into_iter().map(LaunchItem::from).collect())
                }
                Ok(Some(snapshot)) => {
                    debug!(timestamp = %snapshot.timestamp, "cache is stale");
                    Ok(Vec::new())
                }
                Ok(None) => Ok(Vec::new()),
            };
            completion(result);
        }));
    }

    /// Deletes the cache if it is stale or cannot be read
    ///
    /// Errors from the corrective delete are logged and otherwise ignored.
    pub fn validate_cache(&self) {
        self.validate_cache_with(|_| {});
    }

    /// Same as [`validate_cache`](Self::validate_cache), reporting the
    /// outcome once any corrective delete has finished
    pub fn validate_cache_with<F>(&self, completion: F)
    where
        F: FnOnce(CacheValidation) + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let clock = Arc::clone(&self.clock);
        let policy = self.policy;
        let watch = self.liveness.watch();

        self.store.retrieve(Box::new(move |retrieval| {
            if !watch.is_alive() {
                return;
            }

            let outcome = match retrieval {
                Err(error) => {
                    warn!(%error, "cached launches are unreadable, deleting them");
                    CacheValidation::PrunedUnreadable
                }
                Ok(Some(snapshot)) if !policy.is_fresh(snapshot.timestamp, clock.now()) => {
                    debug!(timestamp = %snapshot.timestamp, "deleting stale cache");
                    CacheValidation::PrunedStale
                }
                Ok(Some(_)) => CacheValidation::Fresh,
                Ok(None) => CacheValidation::Empty,
            };

            match outcome {
                CacheValidation::Empty | CacheValidation::Fresh => completion(outcome),
                CacheValidation::PrunedStale | CacheValidation::PrunedUnreadable => {
                    store.delete_cached_launches(Box::new(move |deletion| {
                        if let Err(error) = deletion {
                            warn!(%error, "could not delete invalid cache");
                        }
                        if watch.is_alive() {
                            completion(outcome);
                        }
                    }));
                }
            }
        }));
    }
}

impl<S: LaunchStore + ?Sized + 'static> LaunchLoader for LocalLaunchLoader<S> {
    type Error = StoreError;

    fn load(&self, completion: LoadCompletion<StoreError>) {
        LocalLaunchLoader::load(self, completion);
    }

    fn interrupted_error(&self) -> StoreError {
        StoreError::Interrupted
    }
}
