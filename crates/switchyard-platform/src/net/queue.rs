//! Hand-off queue between capture workers and the receive path

use crate::traits::CaptureRecord;
use crossbeam_channel::{select, unbounded, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;
use switchyard_core::LinkType;

/// A captured frame tagged with where it came from
#[derive(Debug, Clone)]
pub(crate) struct QueueEntry {
    pub device: Arc<str>,
    pub link_type: LinkType,
    pub record: CaptureRecord,
}

/// Outcome of a pop
#[derive(Debug)]
pub(crate) enum Pop {
    Entry(QueueEntry),
    TimedOut,
    Cancelled,
}

/// Unbounded multi-producer, single-consumer queue
///
/// Entries from one producer keep their order; entries from different
/// producers interleave in arrival order.
pub(crate) struct SharedQueue {
    tx: Sender<QueueEntry>,
    rx: Receiver<QueueEntry>,
}

impl SharedQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Handle for a capture worker
    pub fn producer(&self) -> Sender<QueueEntry> {
        self.tx.clone()
    }

    /// Take one entry
    ///
    /// Waits until an entry arrives, `cancel` is closed, or `timeout` passes.
    /// `None` waits without a bound.
    pub fn pop(&self, timeout: Option<Duration>, cancel: &Receiver<()>) -> Pop {
        // The queue keeps a sender, so `rx` only fails once cancelled
        match timeout {
            Some(timeout) => select! {
                recv(self.rx) -> entry => entry.map_or(Pop::Cancelled, Pop::Entry),
                recv(cancel) -> _ => Pop::Cancelled,
                default(timeout) => Pop::TimedOut,
            },
            None => select! {
                recv(self.rx) -> entry => entry.map_or(Pop::Cancelled, Pop::Entry),
                recv(cancel) -> _ => Pop::Cancelled,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }
}
