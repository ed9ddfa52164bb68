//! Owner tokens that let completions detect a released loader.
//!
//! A loader owns a [`Liveness`]; every asynchronous operation it starts
//! carries a [`Watch`] instead of a reference to the loader. When the loader
//! is dropped the watch reports it, and the pending callback becomes a no-op.

use std::sync::{Arc, Weak};

/// Owner side of the token. Dropped together with the owning loader.
#[derive(Debug, Default)]
pub(crate) struct Liveness(Arc<()>);

impl Liveness {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns a non-owning handle to hand to callbacks.
    pub(crate) fn watch(&self) -> Watch {
        Watch(Arc::downgrade(&self.0))
    }
}

/// Non-owning side of the token, safe to move to any thread.
#[derive(Debug, Clone)]
pub(crate) struct Watch(Weak<()>);

impl Watch {
    pub(crate) fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}
