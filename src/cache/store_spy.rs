//! Recording [`LaunchStore`] for loader tests

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use super::store::{
    CacheSnapshot, DeletionCompletion, InsertionCompletion, LaunchStore, LocalLaunchItem,
    RetrievalCompletion, StoreError,
};

/// A call received by the spy
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ReceivedMessage {
    DeleteCachedLaunches,
    Insert(Vec<LocalLaunchItem>, DateTime<Utc>),
    Retrieve,
}

#[derive(Default)]
struct Recorded {
    messages: Vec<ReceivedMessage>,
    deletions: Vec<Option<DeletionCompletion>>,
    insertions: Vec<Option<InsertionCompletion>>,
    retrievals: Vec<Option<RetrievalCompletion>>,
}

/// Captures every call and holds completions until the test fires them
#[derive(Clone, Default)]
pub(crate) struct LaunchStoreSpy {
    recorded: Arc<Mutex<Recorded>>,
}

impl LaunchStoreSpy {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn received_messages(&self) -> Vec<ReceivedMessage> {
        self.recorded.lock().unwrap().messages.clone()
    }

    pub(crate) fn complete_deletion(&self, result: Result<(), StoreError>, index: usize) {
        let completion = self.recorded.lock().unwrap().deletions[index]
            .take()
            .expect("Deletion was already completed");
        completion(result);
    }

    pub(crate) fn complete_insertion(&self, result: Result<(), StoreError>, index: usize) {
        let completion = self.recorded.lock().unwrap().insertions[index]
            .take()
            .expect("Insertion was already completed");
        completion(result);
    }

    pub(crate) fn complete_retrieval(
        &self,
        result: Result<Option<CacheSnapshot>, StoreError>,
        index: usize,
    ) {
        let completion = self.recorded.lock().unwrap().retrievals[index]
            .take()
            .expect("Retrieval was already completed");
        completion(result);
    }

    pub(crate) fn complete_retrieval_with_empty_cache(&self, index: usize) {
        self.complete_retrieval(Ok(None), index);
    }

    pub(crate) fn complete_retrieval_with(
        &self,
        launches: Vec<LocalLaunchItem>,
        timestamp: DateTime<Utc>,
        index: usize,
    ) {
        self.complete_retrieval(
            Ok(Some(CacheSnapshot {
                launches,
                timestamp,
            })),
            index,
        );
    }
}

impl LaunchStore for LaunchStoreSpy {
    fn delete_cached_launches(&self, completion: DeletionCompletion) {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.messages.push(ReceivedMessage::DeleteCachedLaunches);
        recorded.deletions.push(Some(completion));
    }

    fn insert(
        &self,
        launches: Vec<LocalLaunchItem>,
        timestamp: DateTime<Utc>,
        completion: InsertionCompletion,
    ) {
        let mut recorded = self.recorded.lock().unwrap();
        recorded
            .messages
            .push(ReceivedMessage::Insert(launches, timestamp));
        recorded.insertions.push(Some(completion));
    }

    fn retrieve(&self, completion: RetrievalCompletion) {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.messages.push(ReceivedMessage::Retrieve);
        recorded.retrievals.push(Some(completion));
    }
}
