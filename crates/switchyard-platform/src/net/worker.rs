//! Per-interface capture worker

use super::queue::QueueEntry;
use super::shutdown::ShutdownHandle;
use crate::error::Result;
use crate::traits::CaptureDevice;
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, warn};

/// A thread polling one device and feeding the shared queue
pub(crate) struct CaptureWorker {
    device: Arc<str>,
    handle: JoinHandle<()>,
}

impl CaptureWorker {
    /// Start polling `device` until `shutdown` is triggered
    pub fn spawn(
        device_name: &str,
        device: Arc<dyn CaptureDevice>,
        queue: Sender<QueueEntry>,
        shutdown: ShutdownHandle,
        poll_interval: Duration,
    ) -> Result<Self> {
        let name: Arc<str> = Arc::from(device_name);
        let thread_name = name.clone();
        let handle = thread::Builder::new()
            .name(format!("capture-{device_name}"))
            .spawn(move || {
                capture_loop(&thread_name, device.as_ref(), &queue, &shutdown, poll_interval)
            })?;
        Ok(Self { device: name, handle })
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    /// Wait for the thread to finish; `false` if it panicked
    pub fn join(self) -> bool {
        self.handle.join().is_ok()
    }
}

fn capture_loop(
    name: &Arc<str>,
    device: &dyn CaptureDevice,
    queue: &Sender<QueueEntry>,
    shutdown: &ShutdownHandle,
    poll_interval: Duration,
) {
    let link_type = device.link_type();
    debug!(device = %name, %link_type, "Capture worker started");

    while shutdown.is_running() {
        match device.recv(poll_interval) {
            Ok(Some(record)) => {
                let entry = QueueEntry {
                    device: name.clone(),
                    link_type,
                    record,
                };
                if queue.send(entry).is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => {
                error!(device = %name, error = %e, "Capture failed, stopping worker");
                break;
            }
        }
    }

    // The device stays open; the engine closes it after every worker is joined
    match device.stats() {
        Ok(stats) => debug!(
            device = %name,
            received = stats.received,
            dropped_by_library = stats.dropped_by_library,
            dropped_by_interface = stats.dropped_by_interface,
            "Capture worker stopped"
        ),
        Err(e) => warn!(device = %name, error = %e, "Failed to read device statistics"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlatformError;
    use crate::mock::MockDevice;
    use crate::traits::{DeviceStats, MockCaptureDevice};
    use crossbeam_channel::unbounded;
    use switchyard_core::LinkType;

    const POLL: Duration = Duration::from_millis(5);

    #[test]
    fn test_forwards_frames_in_order() {
        let device = Arc::new(MockDevice::ethernet("eth0"));
        let (tx, rx) = unbounded();
        let shutdown = ShutdownHandle::new();
        let worker =
            CaptureWorker::spawn("eth0", device.clone(), tx, shutdown.clone(), POLL).unwrap();

        for ts in 1..=3 {
            device.inject_frame(f64::from(ts), vec![0u8; 60]);
        }
        let entries: Vec<QueueEntry> = (0..3)
            .map(|_| rx.recv_timeout(Duration::from_secs(2)).unwrap())
            .collect();

        shutdown.trigger();
        assert_eq!(worker.device(), "eth0");
        assert!(worker.join());

        let stamps: Vec<f64> = entries.iter().map(|e| e.record.timestamp).collect();
        assert_eq!(stamps, vec![1.0, 2.0, 3.0]);
        assert!(entries.iter().all(|e| &*e.device == "eth0" && e.link_type == LinkType::Ethernet));
        assert!(!device.is_closed());
    }

    #[test]
    fn test_device_error_stops_worker() {
        let mut device = MockCaptureDevice::new();
        device.expect_link_type().return_const(LinkType::Ethernet);
        device.expect_recv().times(1).returning(|_| {
            Err(PlatformError::Capture {
                device: "eth0".into(),
                reason: "link down".into(),
            })
        });
        device.expect_stats().times(1).returning(|| Ok(DeviceStats::default()));
        device.expect_close().never();

        let (tx, _rx) = unbounded();
        let shutdown = ShutdownHandle::new();
        let worker =
            CaptureWorker::spawn("eth0", Arc::new(device), tx, shutdown.clone(), POLL).unwrap();

        assert!(worker.join());
        assert!(shutdown.is_running());
    }
}
