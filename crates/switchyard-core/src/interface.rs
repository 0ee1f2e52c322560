//! Interface metadata and device references

use pnet::ipnetwork::IpNetwork;
use pnet::util::MacAddr;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

/// Kind of network interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterfaceType {
    /// Could not be determined
    #[default]
    Unknown,
    /// Loopback interface
    Loopback,
    /// Wired (Ethernet) interface
    Wired,
    /// Wireless interface
    Wireless,
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InterfaceType::Unknown => "unknown",
            InterfaceType::Loopback => "loopback",
            InterfaceType::Wired => "wired",
            InterfaceType::Wireless => "wireless",
        };
        f.write_str(name)
    }
}

/// A network interface a capture device is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    /// Interface name (e.g. "eth0")
    pub name: String,
    /// Link-layer address, if the interface has one
    pub mac: Option<MacAddr>,
    /// Configured addresses with their prefixes
    pub ips: Vec<IpNetwork>,
    /// OS interface index
    pub index: u32,
    /// Kind of interface
    pub iface_type: InterfaceType,
}

impl Interface {
    /// Create an interface record with no addresses
    pub fn new(name: impl Into<String>, mac: Option<MacAddr>, index: u32) -> Self {
        Self {
            name: name.into(),
            mac,
            ips: Vec::new(),
            index,
            iface_type: InterfaceType::Unknown,
        }
    }

    /// Add an address
    pub fn with_ip(mut self, ip: IpNetwork) -> Self {
        self.ips.push(ip);
        self
    }

    /// Set the interface kind
    pub fn with_type(mut self, iface_type: InterfaceType) -> Self {
        self.iface_type = iface_type;
        self
    }

    /// First IPv4 address
    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        self.ips.iter().find_map(|net| match net {
            IpNetwork::V4(v4) => Some(v4.ip()),
            IpNetwork::V6(_) => None,
        })
    }

    /// Netmask of the first IPv4 address
    pub fn netmask(&self) -> Option<Ipv4Addr> {
        self.ips.iter().find_map(|net| match net {
            IpNetwork::V4(v4) => Some(v4.mask()),
            IpNetwork::V6(_) => None,
        })
    }

    /// Whether the address is configured on this interface
    pub fn has_ip(&self, ip: IpAddr) -> bool {
        self.ips.iter().any(|net| net.ip() == ip)
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.name)?;
        match self.mac {
            Some(mac) => write!(f, "mac:{mac}")?,
            None => f.write_str("mac:none")?,
        }
        if self.ips.is_empty() {
            f.write_str(" ip:none")?;
        }
        for ip in &self.ips {
            write!(f, " ip:{ip}")?;
        }
        write!(f, " index:{} type:{}", self.index, self.iface_type)
    }
}

/// Ways of naming the device a packet should leave through
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceRef {
    /// Interface name
    Name(String),
    /// OS interface index
    Index(u32),
    /// Interface record
    Interface(Interface),
}

impl From<&str> for DeviceRef {
    fn from(name: &str) -> Self {
        DeviceRef::Name(name.to_string())
    }
}

impl From<String> for DeviceRef {
    fn from(name: String) -> Self {
        DeviceRef::Name(name)
    }
}

impl From<&String> for DeviceRef {
    fn from(name: &String) -> Self {
        DeviceRef::Name(name.clone())
    }
}

impl From<u32> for DeviceRef {
    fn from(index: u32) -> Self {
        DeviceRef::Index(index)
    }
}

impl From<Interface> for DeviceRef {
    fn from(interface: Interface) -> Self {
        DeviceRef::Interface(interface)
    }
}

impl From<&Interface> for DeviceRef {
    fn from(interface: &Interface) -> Self {
        DeviceRef::Interface(interface.clone())
    }
}

impl fmt::Display for DeviceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceRef::Name(name) => f.write_str(name),
            DeviceRef::Index(index) => write!(f, "#{index}"),
            DeviceRef::Interface(interface) => f.write_str(&interface.name),
        }
    }
}
