//! Packet type definitions

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Link-layer encapsulation of a captured frame
///
/// Values follow the libpcap `DLT_*` numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkType {
    /// BSD loopback encapsulation (`DLT_NULL`)
    Null,
    /// Ethernet II framing (`DLT_EN10MB`)
    Ethernet,
    /// Raw IP, no link layer (`DLT_RAW`)
    Raw,
    /// Any other encapsulation
    Other(u32),
}

impl LinkType {
    /// Create from a libpcap DLT number
    pub fn from_dlt(dlt: u32) -> Self {
        match dlt {
            0 => LinkType::Null,
            1 => LinkType::Ethernet,
            101 => LinkType::Raw,
            other => LinkType::Other(other),
        }
    }

    /// Get the libpcap DLT number
    pub fn dlt(self) -> u32 {
        match self {
            LinkType::Null => 0,
            LinkType::Ethernet => 1,
            LinkType::Raw => 101,
            LinkType::Other(dlt) => dlt,
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkType::Null => f.write_str("NULL"),
            LinkType::Ethernet => f.write_str("EN10MB"),
            LinkType::Raw => f.write_str("RAW"),
            LinkType::Other(dlt) => write!(f, "DLT({dlt})"),
        }
    }
}

/// The header a decoded packet starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FirstHeader {
    /// Ethernet II header (14 bytes)
    Ethernet,
    /// BSD loopback header: 4-byte address family in host byte order
    Null,
}

impl FirstHeader {
    /// Size of the header in bytes
    pub fn header_len(self) -> usize {
        match self {
            FirstHeader::Ethernet => 14,
            FirstHeader::Null => 4,
        }
    }

    /// Link type a device must have to carry this framing
    pub fn link_type(self) -> LinkType {
        match self {
            FirstHeader::Ethernet => LinkType::Ethernet,
            FirstHeader::Null => LinkType::Null,
        }
    }
}

/// Transport layer summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// TCP segment
    Tcp {
        /// Source port
        src_port: u16,
        /// Destination port
        dst_port: u16,
    },
    /// UDP datagram
    Udp {
        /// Source port
        src_port: u16,
        /// Destination port
        dst_port: u16,
    },
    /// ICMP message
    Icmp {
        /// ICMP type
        icmp_type: u8,
    },
    /// ICMPv6 message
    Icmpv6 {
        /// ICMPv6 type
        icmp_type: u8,
    },
    /// Other or truncated transport, by protocol number
    Other(u8),
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Tcp { src_port, dst_port } => write!(f, "TCP {src_port}->{dst_port}"),
            Transport::Udp { src_port, dst_port } => write!(f, "UDP {src_port}->{dst_port}"),
            Transport::Icmp { icmp_type } => write!(f, "ICMP type {icmp_type}"),
            Transport::Icmpv6 { icmp_type } => write!(f, "ICMPv6 type {icmp_type}"),
            Transport::Other(proto) => write!(f, "proto {proto}"),
        }
    }
}

/// Network layer summary of a decoded packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkSummary {
    /// IPv4 datagram
    Ipv4 {
        /// Source address
        src: Ipv4Addr,
        /// Destination address
        dst: Ipv4Addr,
        /// Transport header
        transport: Transport,
    },
    /// IPv6 datagram
    Ipv6 {
        /// Source address
        src: Ipv6Addr,
        /// Destination address
        dst: Ipv6Addr,
        /// Transport header
        transport: Transport,
    },
    /// ARP message
    Arp {
        /// ARP operation (1 = request, 2 = reply)
        operation: u16,
        /// Sender protocol address
        sender: Ipv4Addr,
        /// Target protocol address
        target: Ipv4Addr,
    },
    /// Unrecognized payload, by EtherType
    Other(u16),
    /// Payload too short for the header it announces
    Truncated,
}

impl fmt::Display for NetworkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkSummary::Ipv4 { src, dst, transport } => {
                write!(f, "IPv4 {src}->{dst} {transport}")
            }
            NetworkSummary::Ipv6 { src, dst, transport } => {
                write!(f, "IPv6 {src}->{dst} {transport}")
            }
            NetworkSummary::Arp {
                operation,
                sender,
                target,
            } => {
                let op = match operation {
                    1 => "request",
                    2 => "reply",
                    _ => "op",
                };
                write!(f, "ARP {op} {sender}->{target}")
            }
            NetworkSummary::Other(ethertype) => write!(f, "ethertype 0x{ethertype:04x}"),
            NetworkSummary::Truncated => f.write_str("truncated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_type_dlt_mapping() {
        assert_eq!(LinkType::from_dlt(0), LinkType::Null);
        assert_eq!(LinkType::from_dlt(1), LinkType::Ethernet);
        assert_eq!(LinkType::from_dlt(101), LinkType::Raw);
        assert_eq!(LinkType::from_dlt(127), LinkType::Other(127));
        assert_eq!(LinkType::Other(127).dlt(), 127);
        assert_eq!(LinkType::Ethernet.dlt(), 1);
    }

    #[test]
    fn test_link_type_display() {
        assert_eq!(LinkType::Ethernet.to_string(), "EN10MB");
        assert_eq!(LinkType::Other(113).to_string(), "DLT(113)");
    }

    #[test]
    fn test_first_header_link_type() {
        assert_eq!(FirstHeader::Ethernet.link_type(), LinkType::Ethernet);
        assert_eq!(FirstHeader::Null.link_type(), LinkType::Null);
        assert_eq!(FirstHeader::Ethernet.header_len(), 14);
        assert_eq!(FirstHeader::Null.header_len(), 4);
    }

    #[test]
    fn test_summary_display() {
        let summary = NetworkSummary::Ipv4 {
            src: Ipv4Addr::new(10, 0, 0, 1),
            dst: Ipv4Addr::new(10, 0, 0, 2),
            transport: Transport::Udp {
                src_port: 68,
                dst_port: 67,
            },
        };
        assert_eq!(summary.to_string(), "IPv4 10.0.0.1->10.0.0.2 UDP 68->67");

        let arp = NetworkSummary::Arp {
            operation: 1,
            sender: Ipv4Addr::new(192, 168, 1, 1),
            target: Ipv4Addr::new(192, 168, 1, 7),
        };
        assert_eq!(arp.to_string(), "ARP request 192.168.1.1->192.168.1.7");
    }
}
