//! Shutdown coordination
//!
//! A running flag plus a cancellation channel. Nothing is ever sent on the
//! channel: triggering shutdown drops its only sender, which wakes every
//! receiver waiting on it at once.

use crate::error::{PlatformError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

struct Inner {
    running: AtomicBool,
    cancel_tx: Mutex<Option<Sender<()>>>,
    cancel_rx: Receiver<()>,
}

/// Shared stop signal for one capture engine
///
/// Clones refer to the same signal.
#[derive(Clone)]
pub struct ShutdownHandle {
    inner: Arc<Inner>,
}

impl ShutdownHandle {
    /// Create a handle in the running state
    pub fn new() -> Self {
        let (cancel_tx, cancel_rx) = bounded(0);
        Self {
            inner: Arc::new(Inner {
                running: AtomicBool::new(true),
                cancel_tx: Mutex::new(Some(cancel_tx)),
                cancel_rx,
            }),
        }
    }

    /// Whether shutdown has not been requested yet
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::Acquire)
    }

    /// Request shutdown
    ///
    /// Clears the running flag, then wakes anyone blocked on the
    /// cancellation channel. Returns `true` for the call that changed the
    /// state.
    pub fn trigger(&self) -> bool {
        let was_running = self.inner.running.swap(false, Ordering::AcqRel);
        self.inner.cancel_tx.lock().take();
        was_running
    }

    /// Receiver that becomes ready once shutdown is triggered
    pub(crate) fn cancelled(&self) -> &Receiver<()> {
        &self.inner.cancel_rx
    }

    /// Trigger shutdown on SIGINT, SIGTERM or SIGHUP
    ///
    /// The process can hold only one such handler.
    ///
    /// # Errors
    /// `SignalHandler` if a handler is already installed or the OS refuses.
    pub fn install_signal_handler(&self) -> Result<()> {
        let handle = self.clone();
        ctrlc::set_handler(move || {
            if handle.trigger() {
                info!("Received termination signal, shutting down...");
            }
        })
        .map_err(|e| PlatformError::SignalHandler(e.to_string()))
    }
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShutdownHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownHandle")
            .field("running", &self.is_running())
            .finish()
    }
}
