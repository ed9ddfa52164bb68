//! Behaviour every [`LaunchStore`] implementation must share
//!
//! Each store's test module calls these assertions against its own
//! implementation.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::store::{CacheSnapshot, LaunchStore, LocalLaunchItem, StoreError};

const TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) fn unique_launches() -> Vec<LocalLaunchItem> {
    vec![
        LocalLaunchItem::new(1, "Crew-9", "Sep 28"),
        LocalLaunchItem::new(2, "Europa Clipper", "Oct 10"),
    ]
}

pub(crate) fn retrieve<S: LaunchStore + ?Sized>(
    store: &S,
) -> Result<Option<CacheSnapshot>, StoreError> {
    let (tx, rx) = mpsc::channel();
    store.retrieve(Box::new(move |result| {
        let _ = tx.send(result);
    }));
    rx.recv_timeout(TIMEOUT).expect("Wait for cache retrieval")
}

pub(crate) fn insert<S: LaunchStore + ?Sized>(
    store: &S,
    launches: Vec<LocalLaunchItem>,
    timestamp: DateTime<Utc>,
) -> Result<(), StoreError> {
    let (tx, rx) = mpsc::channel();
    store.insert(
        launches,
        timestamp,
        Box::new(move |result| {
            let _ = tx.send(result);
        }),
    );
    rx.recv_timeout(TIMEOUT).expect("Wait for cache insertion")
}

pub(crate) fn delete<S: LaunchStore + ?Sized>(store: &S) -> Result<(), StoreError> {
    let (tx, rx) = mpsc::channel();
    store.delete_cached_launches(Box::new(move |result| {
        let _ = tx.send(result);
    }));
    rx.recv_timeout(TIMEOUT).expect("Wait for cache deletion")
}

pub(crate) fn assert_retrieve_delivers_empty_on_empty_cache<S: LaunchStore + ?Sized>(store: &S) {
    assert_eq!(retrieve(store), Ok(None));
}

pub(crate) fn assert_retrieve_has_no_side_effects_on_empty_cache<S: LaunchStore + ?Sized>(
    store: &S,
) {
    assert_eq!(retrieve(store), Ok(None));
    assert_eq!(retrieve(store), Ok(None));
}

pub(crate) fn assert_retrieve_delivers_found_values_on_non_empty_cache<S: LaunchStore + ?Sized>(
    store: &S,
) {
    let launches = unique_launches();
    let timestamp = Utc::now();

    insert(store, launches.clone(), timestamp).expect("Expected to insert cache successfully");

    assert_eq!(
        retrieve(store),
        Ok(Some(CacheSnapshot {
            launches,
            timestamp
        }))
    );
}

pub(crate) fn assert_retrieve_has_no_side_effects_on_non_empty_cache<S: LaunchStore + ?Sized>(
    store: &S,
) {
    let launches = unique_launches();
    let timestamp = Utc::now();
    let expected = Ok(Some(CacheSnapshot {
        launches: launches.clone(),
        timestamp,
    }));

    insert(store, launches, timestamp).expect("Expected to insert cache successfully");

    assert_eq!(retrieve(store), expected);
    assert_eq!(retrieve(store), expected);
}

pub(crate) fn assert_insert_delivers_no_error_on_empty_cache<S: LaunchStore + ?Sized>(store: &S) {
    assert_eq!(insert(store, unique_launches(), Utc::now()), Ok(()));
}

pub(crate) fn assert_insert_delivers_no_error_on_non_empty_cache<S: LaunchStore + ?Sized>(
    store: &S,
) {
    insert(store, unique_launches(), Utc::now()).expect("Expected to insert cache successfully");

    assert_eq!(insert(store, unique_launches(), Utc::now()), Ok(()));
}

pub(crate) fn assert_insert_overrides_previously_inserted_cache_values<S: LaunchStore + ?Sized>(
    store: &S,
) {
    insert(store, unique_launches(), Utc::now()).expect("Expected to insert cache successfully");

    let latest_launches = vec![LocalLaunchItem::new(3, "Starlink 10-1", "Oct 21")];
    let latest_timestamp = Utc::now();
    insert(store, latest_launches.clone(), latest_timestamp)
        .expect("Expected to override cache successfully");

    assert_eq!(
        retrieve(store),
        Ok(Some(CacheSnapshot {
            launches: latest_launches,
            timestamp: latest_timestamp
        }))
    );
}

pub(crate) fn assert_delete_delivers_no_error_on_empty_cache<S: LaunchStore + ?Sized>(store: &S) {
    assert_eq!(delete(store), Ok(()));
}

pub(crate) fn assert_delete_has_no_side_effects_on_empty_cache<S: LaunchStore + ?Sized>(
    store: &S,
) {
    delete(store).expect("Expected empty cache deletion to succeed");

    assert_eq!(retrieve(store), Ok(None));
}

pub(crate) fn assert_delete_delivers_no_error_on_non_empty_cache<S: LaunchStore + ?Sized>(
    store: &S,
) {
    insert(store, unique_launches(), Utc::now()).expect("Expected to insert cache successfully");

    assert_eq!(delete(store), Ok(()));
}

pub(crate) fn assert_delete_empties_previously_inserted_cache<S: LaunchStore + ?Sized>(store: &S) {
    insert(store, unique_launches(), Utc::now()).expect("Expected to insert cache successfully");

    delete(store).expect("Expected non-empty cache deletion to succeed");

    assert_eq!(retrieve(store), Ok(None));
}

/// Issues insert, delete, insert, retrieve without waiting in between and
/// checks they completed in that order with the last insert visible
pub(crate) fn assert_side_effects_run_serially<S: LaunchStore + ?Sized>(store: &S) {
    let completed = Arc::new(Mutex::new(Vec::new()));
    let (done_tx, done_rx) = mpsc::channel();
    let last_launches = vec![LocalLaunchItem::new(9, "Last", "Dec 31")];
    let last_timestamp = Utc::now();

    let log = Arc::clone(&completed);
    store.insert(
        unique_launches(),
        Utc::now(),
        Box::new(move |_| log.lock().unwrap().push("insert 1")),
    );

    let log = Arc::clone(&completed);
    store.delete_cached_launches(Box::new(move |_| log.lock().unwrap().push("delete")));

    let log = Arc::clone(&completed);
    store.insert(
        last_launches.clone(),
        last_timestamp,
        Box::new(move |_| log.lock().unwrap().push("insert 2")),
    );

    let log = Arc::clone(&completed);
    store.retrieve(Box::new(move |result| {
        log.lock().unwrap().push("retrieve");
        let _ = done_tx.send(result);
    }));

    let retrieved = done_rx
        .recv_timeout(TIMEOUT)
        .expect("Wait for operations to finish");

    assert_eq!(
        *completed.lock().unwrap(),
        vec!["insert 1", "delete", "insert 2", "retrieve"],
        "Expected side-effects to run serially but operations finished in the wrong order"
    );
    assert_eq!(
        retrieved,
        Ok(Some(CacheSnapshot {
            launches: last_launches,
            timestamp: last_timestamp
        }))
    );
}

pub(crate) fn assert_store_keeps_completing_after_a_completion_panics<S>(store: &S)
where
    S: LaunchStore + ?Sized,
{
    let launches = unique_launches();
    let timestamp = Utc::now();

    store.retrieve(Box::new(|_| panic!("completion failed")));
    insert(store, launches.clone(), timestamp)
        .expect("Expected to insert after a failed completion");

    assert_eq!(
        retrieve(store),
        Ok(Some(CacheSnapshot {
            launches,
            timestamp
        }))
    );
}
