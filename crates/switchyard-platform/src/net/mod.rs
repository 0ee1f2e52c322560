//! Capture-aggregation engine
//!
//! [`LiveNet`] opens one device per interface and runs one capture worker
//! thread per device. Workers push every frame into a shared queue; the
//! consumer pulls from it with [`LiveNet::recv_packet`] and writes with
//! [`LiveNet::send_packet`].
//!
//! Shutdown is cooperative. Triggering the [`ShutdownHandle`] clears the
//! running flag, which every worker checks once per poll interval, and
//! closes a cancellation channel that releases a consumer blocked in
//! `recv_packet`. [`LiveNet::shutdown`] then joins the workers and only
//! afterwards closes the devices, so no device is read after it is closed.

mod queue;
mod shutdown;
mod worker;

pub use shutdown::ShutdownHandle;

use crate::datalink::PnetDevice;
use crate::discovery;
use crate::error::{PlatformError, Result};
use crate::traits::CaptureDevice;
use parking_lot::Mutex;
use pnet::util::MacAddr;
use queue::{Pop, SharedQueue};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use switchyard_core::packet::{self, Packet};
use switchyard_core::{Config, DeviceRef, Interface};
use tracing::{debug, info, warn};
use worker::CaptureWorker;

/// Name used when neither the configuration nor the host provides one
const FALLBACK_NAME: &str = "switchyard";

/// A packet handed to the consumer
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedPacket {
    /// Capture time in seconds since the Unix epoch
    pub timestamp: f64,
    /// Interface the packet arrived on
    pub ingress: String,
    /// Decoded packet
    pub packet: Packet,
}

/// Live network façade over a set of capture devices
pub struct LiveNet {
    name: String,
    interfaces: Vec<Interface>,
    devices: HashMap<String, Arc<dyn CaptureDevice>>,
    queue: SharedQueue,
    shutdown: ShutdownHandle,
    workers: Mutex<Vec<CaptureWorker>>,
    torn_down: AtomicBool,
}

impl LiveNet {
    /// Open the interfaces selected by `config` and start capturing
    ///
    /// # Errors
    /// Fails if the configuration is invalid, the selection is empty, or any
    /// device cannot be opened. Devices opened before the failure are
    /// closed again.
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;
        let names = discovery::select_devices(&config.devices)?;

        let mut opened: Vec<(Interface, Arc<dyn CaptureDevice>)> = Vec::with_capacity(names.len());
        for name in &names {
            match open_device(name, config) {
                Ok(entry) => opened.push(entry),
                Err(e) => {
                    close_all(opened.iter().map(|(_, device)| device));
                    return Err(e);
                }
            }
        }

        Self::with_devices(config.name.clone(), opened, config.capture.poll_interval())
    }

    /// Start capturing on devices that are already open
    ///
    /// Takes ownership of the devices: they are closed by
    /// [`shutdown`](Self::shutdown), or right away if construction fails.
    ///
    /// # Errors
    /// `NoDevices` for an empty list, `DeviceOpen` for a duplicate name, and
    /// `Io` if a worker thread cannot be spawned.
    pub fn with_devices(
        name: Option<String>,
        devices: Vec<(Interface, Arc<dyn CaptureDevice>)>,
        poll_interval: Duration,
    ) -> Result<Self> {
        if devices.is_empty() {
            return Err(PlatformError::NoDevices);
        }

        let mut interfaces = Vec::with_capacity(devices.len());
        let mut handles: HashMap<String, Arc<dyn CaptureDevice>> =
            HashMap::with_capacity(devices.len());
        for (interface, device) in &devices {
            if handles.insert(interface.name.clone(), device.clone()).is_some() {
                close_all(devices.iter().map(|(_, device)| device));
                return Err(PlatformError::DeviceOpen {
                    device: interface.name.clone(),
                    reason: "interface given more than once".into(),
                });
            }
            interfaces.push(interface.clone());
        }

        let net = Self {
            name: name.unwrap_or_else(default_name),
            interfaces,
            devices: handles,
            queue: SharedQueue::new(),
            shutdown: ShutdownHandle::new(),
            workers: Mutex::new(Vec::with_capacity(devices.len())),
            torn_down: AtomicBool::new(false),
        };

        for (interface, device) in devices {
            let spawned = CaptureWorker::spawn(
                &interface.name,
                device,
                net.queue.producer(),
                net.shutdown.clone(),
                poll_interval,
            );
            match spawned {
                Ok(worker) => net.workers.lock().push(worker),
                Err(e) => {
                    net.shutdown();
                    return Err(e);
                }
            }
        }

        info!(
            name = %net.name,
            devices = ?net.interfaces.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
            poll_ms = u64::try_from(poll_interval.as_millis()).unwrap_or(u64::MAX),
            "Capture engine started"
        );
        Ok(net)
    }

    /// Name of this node
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Interfaces the engine captures on
    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    /// Same as [`interfaces`](Self::interfaces)
    pub fn ports(&self) -> &[Interface] {
        self.interfaces()
    }

    /// Interface with the given name
    pub fn interface_by_name(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|iface| iface.name == name)
    }

    /// Interface that has the given address configured
    pub fn interface_by_ipaddr(&self, ip: IpAddr) -> Option<&Interface> {
        self.interfaces.iter().find(|iface| iface.has_ip(ip))
    }

    /// Interface with the given hardware address
    pub fn interface_by_macaddr(&self, mac: MacAddr) -> Option<&Interface> {
        self.interfaces.iter().find(|iface| iface.mac == Some(mac))
    }

    /// Handle for stopping the engine from another thread or a signal
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Whether the engine is still capturing
    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    /// Receive the next packet from any interface
    ///
    /// Blocks until a packet arrives when `timeout` is `None`. Frames whose
    /// link type has no decoder, or that fail to decode, are logged and
    /// skipped; the timeout applies afresh to each queue wait.
    ///
    /// # Errors
    /// `Shutdown` once the engine is stopping, `NoPackets` when the timeout
    /// passes while it is still running. A shutdown that starts just after a
    /// timeout may still be reported as `NoPackets` once.
    pub fn recv_packet(&self, timeout: Option<Duration>) -> Result<ReceivedPacket> {
        loop {
            if !self.shutdown.is_running() {
                return Err(PlatformError::Shutdown);
            }

            // A pop that races `trigger` may still hand out an entry
            let entry = match self.queue.pop(timeout, self.shutdown.cancelled()) {
                Pop::Entry(entry) if self.shutdown.is_running() => entry,
                Pop::TimedOut if self.shutdown.is_running() => {
                    return Err(PlatformError::NoPackets)
                }
                Pop::Entry(_) | Pop::TimedOut | Pop::Cancelled => {
                    return Err(PlatformError::Shutdown)
                }
            };

            let Some(decoder) = packet::decoder_for(entry.link_type) else {
                warn!(
                    device = %entry.device,
                    link_type = %entry.link_type,
                    "Received packet with unrecognized link type, skipping"
                );
                continue;
            };

            match decoder(&entry.record.data) {
                Ok(packet) => {
                    return Ok(ReceivedPacket {
                        timestamp: entry.record.timestamp,
                        ingress: entry.device.to_string(),
                        packet,
                    })
                }
                Err(e) => {
                    warn!(device = %entry.device, error = %e, "Failed to decode packet, skipping");
                }
            }
        }
    }

    /// Send a packet out of one interface
    ///
    /// The device is resolved before the packet is looked at, so an unknown
    /// device is reported even when the packet is also bad.
    ///
    /// # Errors
    /// `UnknownDevice` if no open device matches, `InvalidPacket` if the
    /// packet is missing, shorter than its first header, or framed for a
    /// different link type than the device, and `Send` (or `DeviceClosed`
    /// after shutdown) from the device itself.
    pub fn send_packet<'a>(
        &self,
        device: impl Into<DeviceRef>,
        packet: impl Into<Option<&'a Packet>>,
    ) -> Result<()> {
        let (name, handle) = self.resolve(&device.into())?;

        let packet = packet
            .into()
            .ok_or_else(|| PlatformError::InvalidPacket("no packet given".into()))?;
        packet
            .validate()
            .map_err(|e| PlatformError::InvalidPacket(e.to_string()))?;
        if packet.link_type() != handle.link_type() {
            return Err(PlatformError::InvalidPacket(format!(
                "{} framing cannot be sent on {name} ({})",
                packet.link_type(),
                handle.link_type()
            )));
        }

        debug!(device = name, %packet, "Sending packet");
        handle.send(&packet::encode(packet))
    }

    fn resolve(&self, device: &DeviceRef) -> Result<(&str, &Arc<dyn CaptureDevice>)> {
        let name = match device {
            DeviceRef::Name(name) => name.as_str(),
            DeviceRef::Interface(interface) => interface.name.as_str(),
            DeviceRef::Index(index) => self
                .interfaces
                .iter()
                .find(|iface| iface.index == *index)
                .map(|iface| iface.name.as_str())
                .ok_or_else(|| PlatformError::UnknownDevice(format!("interface index {index}")))?,
        };
        self.devices
            .get_key_value(name)
            .map(|(name, handle)| (name.as_str(), handle))
            .ok_or_else(|| PlatformError::UnknownDevice(name.to_string()))
    }

    /// Stop capturing and release every device
    ///
    /// Triggers shutdown, joins every worker, then closes each device once.
    /// Later calls, and calls after a signal already triggered shutdown,
    /// still complete the teardown exactly once.
    pub fn shutdown(&self) {
        self.shutdown.trigger();
        if self.torn_down.swap(true, Ordering::AcqRel) {
            return;
        }

        let workers = std::mem::take(&mut *self.workers.lock());
        for worker in workers {
            let device = worker.device().to_string();
            if !worker.join() {
                warn!(device = %device, "Capture worker panicked");
            }
        }

        close_all(self.devices.values());

        let pending = self.queue.len();
        if pending > 0 {
            debug!(pending, "Discarding queued packets");
        }
        info!(name = %self.name, "Capture engine shut down");
    }
}

impl Drop for LiveNet {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for LiveNet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveNet")
            .field("name", &self.name)
            .field("interfaces", &self.interfaces)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

fn open_device(name: &str, config: &Config) -> Result<(Interface, Arc<dyn CaptureDevice>)> {
    let interface =
        discovery::find_interface(name).ok_or_else(|| PlatformError::DeviceOpen {
            device: name.to_string(),
            reason: "no such interface".into(),
        })?;
    let device = PnetDevice::open(name, &config.capture)?;
    Ok((interface, Arc::new(device)))
}

fn close_all<'a>(devices: impl IntoIterator<Item = &'a Arc<dyn CaptureDevice>>) {
    for device in devices {
        match device.close() {
            Ok(stats) => debug!(
                device = device.name(),
                received = stats.received,
                dropped_by_library = stats.dropped_by_library,
                dropped_by_interface = stats.dropped_by_interface,
                "Closed device"
            ),
            Err(e) => warn!(device = device.name(), error = %e, "Failed to close device"),
        }
    }
}

/// Host name, or a fixed fallback
fn default_name() -> String {
    std::fs::read_to_string("/proc/sys/kernel/hostname")
        .ok()
        .or_else(|| std::env::var("HOSTNAME").ok())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}
