//! Interface discovery
//!
//! Enumerates interfaces through pnet and picks the ones the engine should
//! open.

use crate::error::{PlatformError, Result};
use pnet::datalink::{self, NetworkInterface};
use switchyard_core::config::DeviceSelection;
use switchyard_core::{Interface, InterfaceType};
use tracing::debug;

/// A discovered interface and whether it is up
#[derive(Debug, Clone)]
struct Candidate {
    interface: Interface,
    is_up: bool,
}

impl From<&NetworkInterface> for Candidate {
    fn from(iface: &NetworkInterface) -> Self {
        let iface_type = if iface.is_loopback() {
            InterfaceType::Loopback
        } else {
            detect_type(&iface.name)
        };
        Self {
            interface: Interface {
                name: iface.name.clone(),
                mac: iface.mac,
                ips: iface.ips.clone(),
                index: iface.index,
                iface_type,
            },
            is_up: iface.is_up(),
        }
    }
}

#[cfg(target_os = "linux")]
fn detect_type(name: &str) -> InterfaceType {
    let sys = std::path::Path::new("/sys/class/net").join(name);
    if sys.join("wireless").exists() || sys.join("phy80211").exists() {
        InterfaceType::Wireless
    } else if sys.exists() {
        InterfaceType::Wired
    } else {
        InterfaceType::Unknown
    }
}

#[cfg(not(target_os = "linux"))]
fn detect_type(_name: &str) -> InterfaceType {
    InterfaceType::Unknown
}

fn candidates() -> Vec<Candidate> {
    datalink::interfaces().iter().map(Candidate::from).collect()
}

/// List every interface on the host
pub fn interfaces() -> Vec<Interface> {
    candidates().into_iter().map(|c| c.interface).collect()
}

/// Look up one interface by name
pub fn find_interface(name: &str) -> Option<Interface> {
    interfaces().into_iter().find(|iface| iface.name == name)
}

/// Names of the interfaces to open for a selection
///
/// An explicit include list is taken as given (each name must exist);
/// otherwise every interface that is up is used, loopback only on request.
/// Excluded names are removed last.
///
/// # Errors
/// `DeviceOpen` for an included name that does not exist, `NoDevices`
/// when nothing is left.
pub fn select_devices(selection: &DeviceSelection) -> Result<Vec<String>> {
    select_from(&candidates(), selection)
}

fn select_from(available: &[Candidate], selection: &DeviceSelection) -> Result<Vec<String>> {
    let names: Vec<String> = if selection.include.is_empty() {
        available
            .iter()
            .filter(|c| c.is_up)
            .filter(|c| {
                selection.include_loopback || c.interface.iface_type != InterfaceType::Loopback
            })
            .map(|c| c.interface.name.clone())
            .collect()
    } else {
        for name in &selection.include {
            if !available.iter().any(|c| &c.interface.name == name) {
                return Err(PlatformError::DeviceOpen {
                    device: name.clone(),
                    reason: "no such interface".into(),
                });
            }
        }
        selection.include.clone()
    };

    let selected: Vec<String> = names
        .into_iter()
        .filter(|name| selection.allows(name))
        .collect();

    if selected.is_empty() {
        return Err(PlatformError::NoDevices);
    }
    debug!(devices = ?selected, "Selected capture devices");
    Ok(selected)
}
