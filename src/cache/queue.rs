//! FIFO worker shared by the store implementations

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use tokio::sync::mpsc;
use tracing::error;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs submitted jobs one at a time, in submission order, on a dedicated
/// thread
///
/// A job that panics is logged and skipped; later jobs still run. The thread
/// exits once the queue is dropped and every queued job ran.
#[derive(Debug)]
pub(crate) struct SerialQueue {
    sender: mpsc::UnboundedSender<Job>,
}

impl SerialQueue {
    pub(crate) fn new(name: &str) -> io::Result<Self> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();

        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                while let Some(job) = receiver.blocking_recv() {
                    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
                        error!(panic = panic_message(&*payload), "store operation panicked");
                    }
                }
            })?;

        Ok(Self { sender })
    }

    pub(crate) fn dispatch<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.sender.send(Box::new(job)).is_err() {
            error!("store worker has stopped, dropping operation");
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown"
    }
}
