//! In-memory capture device
//!
//! Frames are injected by the test and handed out by `recv`; sent frames are
//! recorded. The device counts how often it is closed and whether anyone read
//! from it afterwards.

use crate::error::{PlatformError, Result};
use crate::traits::{CaptureDevice, CaptureRecord, DeviceStats};
use bytes::Bytes;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use switchyard_core::LinkType;

/// Capture device backed by a channel
pub struct MockDevice {
    name: String,
    link_type: LinkType,
    inbox_tx: Sender<CaptureRecord>,
    inbox_rx: Receiver<CaptureRecord>,
    sent: Mutex<Vec<Bytes>>,
    closed: AtomicBool,
    close_count: AtomicUsize,
    reads_after_close: AtomicUsize,
    fail_sends: AtomicBool,
    received: AtomicU64,
}

impl MockDevice {
    /// Create a device with the given name and link type
    pub fn new(name: impl Into<String>, link_type: LinkType) -> Self {
        let (inbox_tx, inbox_rx) = unbounded();
        Self {
            name: name.into(),
            link_type,
            inbox_tx,
            inbox_rx,
            sent: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
            close_count: AtomicUsize::new(0),
            reads_after_close: AtomicUsize::new(0),
            fail_sends: AtomicBool::new(false),
            received: AtomicU64::new(0),
        }
    }

    /// Create an Ethernet device
    pub fn ethernet(name: impl Into<String>) -> Self {
        Self::new(name, LinkType::Ethernet)
    }

    /// Queue a frame for the next `recv`
    pub fn inject(&self, record: CaptureRecord) {
        // The device owns the receiver, so the channel cannot be disconnected
        let _ = self.inbox_tx.send(record);
    }

    /// Queue raw bytes with the given timestamp
    pub fn inject_frame(&self, timestamp: f64, data: impl Into<Bytes>) {
        self.inject(CaptureRecord::new(timestamp, data));
    }

    /// Frames not yet received
    pub fn pending(&self) -> usize {
        self.inbox_rx.len()
    }

    /// Frames passed to `send`, in order
    pub fn sent(&self) -> Vec<Bytes> {
        self.sent.lock().clone()
    }

    /// Make every following `send` fail
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Number of `close` calls
    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }

    /// Whether the device has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of `recv` calls made after the device was closed
    pub fn reads_after_close(&self) -> usize {
        self.reads_after_close.load(Ordering::SeqCst)
    }

    fn snapshot(&self) -> DeviceStats {
        DeviceStats {
            received: self.received.load(Ordering::SeqCst),
            dropped_by_library: 0,
            dropped_by_interface: 0,
        }
    }
}

impl CaptureDevice for MockDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn link_type(&self) -> LinkType {
        self.link_type
    }

    fn recv(&self, timeout: Duration) -> Result<Option<CaptureRecord>> {
        if self.is_closed() {
            self.reads_after_close.fetch_add(1, Ordering::SeqCst);
            return Err(PlatformError::DeviceClosed(self.name.clone()));
        }
        match self.inbox_rx.recv_timeout(timeout) {
            Ok(record) => {
                self.received.fetch_add(1, Ordering::SeqCst);
                Ok(Some(record))
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => Ok(None),
        }
    }

    fn send(&self, frame: &[u8]) -> Result<()> {
        if self.is_closed() {
            return Err(PlatformError::DeviceClosed(self.name.clone()));
        }
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(PlatformError::Send {
                device: self.name.clone(),
                reason: "injected failure".into(),
            });
        }
        self.sent.lock().push(Bytes::copy_from_slice(frame));
        Ok(())
    }

    fn stats(&self) -> Result<DeviceStats> {
        Ok(self.snapshot())
    }

    fn close(&self) -> Result<DeviceStats> {
        self.close_count.fetch_add(1, Ordering::SeqCst);
        self.closed.store(true, Ordering::SeqCst);
        Ok(self.snapshot())
    }
}
