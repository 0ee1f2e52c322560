//! pnet datalink device
//!
//! Safe wrapper around a pnet Ethernet channel.

use crate::error::{PlatformError, Result};
use crate::traits::{CaptureDevice, CaptureRecord, DeviceStats};
use parking_lot::Mutex;
use pnet::datalink::{self, Channel, Config, DataLinkReceiver, DataLinkSender};
use std::io::ErrorKind;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use switchyard_core::config::CaptureConfig;
use switchyard_core::LinkType;
use tracing::{debug, info, warn};

/// Live capture device on a pnet datalink channel
///
/// The receive and transmit halves are locked separately, so a send never
/// waits for a worker blocked in `recv`.
///
/// # Example
///
/// ```rust,ignore
/// use switchyard_core::config::CaptureConfig;
/// use switchyard_platform::{CaptureDevice, PnetDevice};
/// use std::time::Duration;
///
/// let device = PnetDevice::open("eth0", &CaptureConfig::default())?;
/// if let Some(record) = device.recv(Duration::from_millis(200))? {
///     device.send(&record.data)?;
/// }
/// device.close()?;
/// ```
pub struct PnetDevice {
    name: String,
    rx: Mutex<Option<Box<dyn DataLinkReceiver>>>,
    tx: Mutex<Option<Box<dyn DataLinkSender>>>,
    received: AtomicU64,
    /// How long one read on the channel blocks
    read_timeout: Duration,
    /// Interface drop counter when the device was opened
    drops_at_open: Option<u64>,
    final_stats: Mutex<Option<DeviceStats>>,
}

impl PnetDevice {
    /// Open a capture channel on the named interface
    ///
    /// The channel's read timeout is the configured poll interval, which
    /// bounds how long a single `recv` can block.
    ///
    /// # Errors
    /// Returns `DeviceOpen` when the interface does not exist, does not offer
    /// an Ethernet channel, or cannot be opened without capture privileges.
    pub fn open(name: &str, capture: &CaptureConfig) -> Result<Self> {
        let interface = datalink::interfaces()
            .into_iter()
            .find(|iface| iface.name == name)
            .ok_or_else(|| PlatformError::DeviceOpen {
                device: name.to_string(),
                reason: "no such interface".into(),
            })?;

        let config = Config {
            read_timeout: Some(capture.poll_interval()),
            read_buffer_size: capture.read_buffer_size,
            write_buffer_size: capture.write_buffer_size,
            promiscuous: capture.promiscuous,
            ..Config::default()
        };

        let (tx, rx) = match datalink::channel(&interface, config) {
            Ok(Channel::Ethernet(tx, rx)) => (tx, rx),
            Ok(_) => {
                return Err(PlatformError::DeviceOpen {
                    device: name.to_string(),
                    reason: "unsupported channel type".into(),
                })
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                return Err(PlatformError::DeviceOpen {
                    device: name.to_string(),
                    reason: "permission denied: capture requires elevated privileges".into(),
                })
            }
            Err(e) => {
                return Err(PlatformError::DeviceOpen {
                    device: name.to_string(),
                    reason: e.to_string(),
                })
            }
        };

        info!(
            device = name,
            promiscuous = capture.promiscuous,
            poll_ms = capture.poll_interval_ms,
            "Opened capture device"
        );

        Ok(Self {
            name: name.to_string(),
            rx: Mutex::new(Some(rx)),
            tx: Mutex::new(Some(tx)),
            received: AtomicU64::new(0),
            read_timeout: capture.poll_interval(),
            drops_at_open: interface_drops(name),
            final_stats: Mutex::new(None),
        })
    }

    fn current_stats(&self) -> DeviceStats {
        let dropped_by_interface = match (self.drops_at_open, interface_drops(&self.name)) {
            (Some(start), Some(now)) => now.saturating_sub(start),
            _ => 0,
        };
        DeviceStats {
            received: self.received.load(Ordering::Relaxed),
            // pnet does not report library-level drops
            dropped_by_library: 0,
            dropped_by_interface,
        }
    }
}

impl CaptureDevice for PnetDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn link_type(&self) -> LinkType {
        // pnet presents every channel, loopback included, with Ethernet framing
        LinkType::Ethernet
    }

    /// Reads in steps of the channel's read timeout
    ///
    /// A `timeout` shorter than one step still waits for one read, so the
    /// wait is bounded by the larger of `timeout` and the poll interval.
    /// Capture workers always pass the poll interval.
    fn recv(&self, timeout: Duration) -> Result<Option<CaptureRecord>> {
        let mut guard = self.rx.lock();
        let rx = guard
            .as_mut()
            .ok_or_else(|| PlatformError::DeviceClosed(self.name.clone()))?;

        for _ in 0..reads_within(timeout, self.read_timeout) {
            match rx.next() {
                Ok(frame) => {
                    self.received.fetch_add(1, Ordering::Relaxed);
                    return Ok(Some(CaptureRecord::now(frame.to_vec())));
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                    ) => {}
                Err(e) => {
                    return Err(PlatformError::Capture {
                        device: self.name.clone(),
                        reason: e.to_string(),
                    })
                }
            }
        }
        Ok(None)
    }

    fn send(&self, frame: &[u8]) -> Result<()> {
        let mut guard = self.tx.lock();
        let tx = guard
            .as_mut()
            .ok_or_else(|| PlatformError::DeviceClosed(self.name.clone()))?;

        match tx.send_to(frame, None) {
            Some(Ok(())) => {
                debug!(device = %self.name, len = frame.len(), "Sent frame");
                Ok(())
            }
            Some(Err(e)) => Err(PlatformError::Send {
                device: self.name.clone(),
                reason: e.to_string(),
            }),
            None => Err(PlatformError::Send {
                device: self.name.clone(),
                reason: "transmit buffer too small for frame".into(),
            }),
        }
    }

    fn stats(&self) -> Result<DeviceStats> {
        if let Some(stats) = *self.final_stats.lock() {
            return Ok(stats);
        }
        Ok(self.current_stats())
    }

    fn close(&self) -> Result<DeviceStats> {
        let mut final_stats = self.final_stats.lock();
        if let Some(stats) = *final_stats {
            return Ok(stats);
        }

        let stats = self.current_stats();
        self.rx.lock().take();
        self.tx.lock().take();
        *final_stats = Some(stats);

        info!(
            device = %self.name,
            received = stats.received,
            dropped_by_interface = stats.dropped_by_interface,
            "Closed capture device"
        );
        Ok(stats)
    }
}

impl Drop for PnetDevice {
    fn drop(&mut self) {
        if self.final_stats.lock().is_none() {
            if let Err(e) = self.close() {
                warn!(device = %self.name, error = %e, "Failed to close capture device");
            }
        }
    }
}

/// Number of channel reads that fit in `timeout`, at least one
fn reads_within(timeout: Duration, read_timeout: Duration) -> u128 {
    if read_timeout.is_zero() {
        return 1;
    }
    (timeout.as_nanos() / read_timeout.as_nanos()).max(1)
}

/// Kernel receive-drop counter of an interface
#[cfg(target_os = "linux")]
fn interface_drops(name: &str) -> Option<u64> {
    let path = format!("/sys/class/net/{name}/statistics/rx_dropped");
    std::fs::read_to_string(path).ok()?.trim().parse().ok()
}

#[cfg(not(target_os = "linux"))]
fn interface_drops(_name: &str) -> Option<u64> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_interface() {
        let result = PnetDevice::open("switchyard-test-missing0", &CaptureConfig::default());
        assert!(matches!(result, Err(PlatformError::DeviceOpen { .. })));
    }

    #[test]
    fn test_reads_never_exceed_timeout() {
        let step = Duration::from_millis(200);
        assert_eq!(reads_within(Duration::from_millis(50), step), 1);
        assert_eq!(reads_within(Duration::from_millis(200), step), 1);
        assert_eq!(reads_within(Duration::from_millis(550), step), 2);
        assert_eq!(reads_within(Duration::from_secs(1), step), 5);
        assert_eq!(reads_within(Duration::ZERO, step), 1);
        assert_eq!(reads_within(Duration::from_secs(1), Duration::ZERO), 1);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_interface_drops_missing() {
        assert_eq!(interface_drops("switchyard-test-missing0"), None);
    }
}
