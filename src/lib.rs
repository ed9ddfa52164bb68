//! Rocket Launches Library
//!
//! Loads upcoming launches from a remote endpoint and keeps a local snapshot
//! with a freshness window so the list is still available offline.

pub mod api;
pub mod cache;
pub mod cli;
pub mod data;
mod liveness;
