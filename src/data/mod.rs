//! Core data models for the launches library
//!
//! This module contains the domain type shared by the remote and the local
//! loaders, and the capability both of them expose.

use futures::channel::oneshot;
use serde::Serialize;

/// An upcoming rocket launch
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LaunchItem {
    /// Identifier assigned by the launch provider
    pub id: i64,
    /// Human-readable mission name
    pub name: String,
    /// Launch date as published by the provider
    pub date: String,
}

impl LaunchItem {
    pub fn new(id: i64, name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            date: date.into(),
        }
    }
}

/// Completion handed to [`LaunchLoader::load`]
pub type LoadCompletion<E> = Box<dyn FnOnce(Result<Vec<LaunchItem>, E>) + Send + 'static>;

/// Anything that can produce a list of launches
///
/// The completion may be invoked on any thread, and is not invoked at all
/// if the loader is dropped before its collaborator answers.
pub trait LaunchLoader {
    type Error: Send + 'static;

    fn load(&self, completion: LoadCompletion<Self::Error>);

    /// Error reported when a collaborator drops the completion without
    /// calling it
    fn interrupted_error(&self) -> Self::Error;
}

/// Awaits a single load from any [`LaunchLoader`]
///
/// # Returns
/// * `Ok(Vec<LaunchItem>)` - The loaded launches
/// * `Err(L::Error)` - The loader's error, or
///   [`interrupted_error`](LaunchLoader::interrupted_error) if the completion
///   was dropped without being called
pub async fn load_launches<L>(loader: &L) -> Result<Vec<LaunchItem>, L::Error>
where
    L: LaunchLoader + ?Sized,
{
    let (tx, rx) = oneshot::channel();
    loader.load(Box::new(move |result| {
        let _ = tx.send(result);
    }));
    rx.await.unwrap_or_else(|_| Err(loader.interrupted_error()))
}
