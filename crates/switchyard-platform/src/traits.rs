//! Capture device interface
//!
//! A device is one open capture/injection endpoint bound to a single
//! interface. Devices are shared as `Arc<dyn CaptureDevice>`: one capture
//! worker receives on it while the façade sends on it, so implementations
//! keep the two directions independent.

use crate::Result;
use bytes::Bytes;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use switchyard_core::LinkType;

/// Capture and injection endpoint for one interface
#[cfg_attr(test, mockall::automock)]
pub trait CaptureDevice: Send + Sync {
    /// Interface name this device is bound to
    fn name(&self) -> &str;

    /// Link-layer encapsulation of captured frames
    fn link_type(&self) -> LinkType;

    /// Wait up to `timeout` for one frame
    ///
    /// Returns `Ok(None)` when nothing arrived in time.
    fn recv(&self, timeout: Duration) -> Result<Option<CaptureRecord>>;

    /// Transmit one frame
    fn send(&self, frame: &[u8]) -> Result<()>;

    /// Statistics so far
    fn stats(&self) -> Result<DeviceStats>;

    /// Release the endpoint and return its final statistics
    ///
    /// Calling `close` again returns the same statistics without touching the
    /// endpoint.
    fn close(&self) -> Result<DeviceStats>;
}

/// One captured frame
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRecord {
    /// Capture time in seconds since the Unix epoch
    pub timestamp: f64,
    /// Raw frame bytes
    pub data: Bytes,
}

impl CaptureRecord {
    /// Create a record with an explicit timestamp
    pub fn new(timestamp: f64, data: impl Into<Bytes>) -> Self {
        Self {
            timestamp,
            data: data.into(),
        }
    }

    /// Create a record stamped with the current time
    pub fn now(data: impl Into<Bytes>) -> Self {
        Self::new(unix_timestamp(), data)
    }
}

/// Receive and drop counters of a device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    /// Frames handed to the capture worker
    pub received: u64,
    /// Frames dropped by the capture library
    pub dropped_by_library: u64,
    /// Frames dropped by the interface or kernel
    pub dropped_by_interface: u64,
}

/// Current time in seconds since the Unix epoch
pub fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |elapsed| elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_now_is_recent() {
        let before = unix_timestamp();
        let record = CaptureRecord::now(vec![1u8, 2, 3]);
        assert!(record.timestamp >= before);
        assert_eq!(record.data.len(), 3);
    }

    #[test]
    fn test_stats_default() {
        let stats = DeviceStats::default();
        assert_eq!(stats.received, 0);
        assert_eq!(stats.dropped_by_library, 0);
        assert_eq!(stats.dropped_by_interface, 0);
    }
}
