//! Decoded packets and the link-type decoder table
//!
//! Header views come from `pnet_packet`; this module only decides where a
//! frame starts and hands out read-only views over the captured bytes.

mod decoder;
mod types;

pub use decoder::{decode, decoder_for, encode, Decoder};
pub use types::*;

use crate::error::{Error, Result};
use bytes::Bytes;
use pnet_packet::arp::ArpPacket;
use pnet_packet::ethernet::{EtherTypes, EthernetPacket};
use pnet_packet::icmp::IcmpPacket;
use pnet_packet::icmpv6::Icmpv6Packet;
use pnet_packet::ip::{IpNextHeaderProtocol, IpNextHeaderProtocols};
use pnet_packet::ipv4::Ipv4Packet;
use pnet_packet::ipv6::Ipv6Packet;
use pnet_packet::tcp::TcpPacket;
use pnet_packet::udp::UdpPacket;
use pnet_packet::Packet as _;
use std::fmt;

/// Address family values seen in BSD loopback headers
const AF_INET: u32 = 2;
const AF_INET6: [u32; 4] = [10, 24, 28, 30];

const ETHERTYPE_IPV4: u16 = 0x0800;
const ETHERTYPE_IPV6: u16 = 0x86dd;

/// A decoded frame
///
/// Cloning is cheap: the bytes are reference counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    first_header: FirstHeader,
    data: Bytes,
}

impl Packet {
    /// Wrap raw bytes without checking them
    pub fn new(first_header: FirstHeader, data: impl Into<Bytes>) -> Self {
        Self {
            first_header,
            data: data.into(),
        }
    }

    /// Create a packet from raw bytes, checking the first header fits
    pub fn from_bytes(data: &[u8], first_header: FirstHeader) -> Result<Self> {
        let packet = Self::new(first_header, Bytes::copy_from_slice(data));
        packet.validate()?;
        Ok(packet)
    }

    /// Build an Ethernet packet from raw bytes
    pub fn ethernet(data: &[u8]) -> Result<Self> {
        Self::from_bytes(data, FirstHeader::Ethernet)
    }

    /// Check that the packet is non-empty and holds its first header
    pub fn validate(&self) -> Result<()> {
        let expected = self.first_header.header_len();
        if self.data.len() < expected {
            return Err(Error::PacketTooSmall {
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    /// The header this packet starts with
    pub fn first_header(&self) -> FirstHeader {
        self.first_header
    }

    /// Link type a device needs to carry this packet
    pub fn link_type(&self) -> LinkType {
        self.first_header.link_type()
    }

    /// Get the raw packet data
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get total packet length
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if packet is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Ethernet header view, for Ethernet-framed packets
    pub fn ethernet_header(&self) -> Option<EthernetPacket<'_>> {
        match self.first_header {
            FirstHeader::Ethernet => EthernetPacket::new(&self.data),
            FirstHeader::Null => None,
        }
    }

    /// Address family of a loopback-framed packet
    ///
    /// The family is stored in the byte order of the capturing host, so both
    /// orders are tried.
    fn null_family(&self) -> Option<u32> {
        let raw: [u8; 4] = self.data.get(..4)?.try_into().ok()?;
        let le = u32::from_le_bytes(raw);
        let be = u32::from_be_bytes(raw);
        Some(if le < 256 { le } else { be })
    }

    /// EtherType of the payload following the first header
    pub fn ethertype(&self) -> Option<u16> {
        match self.first_header {
            FirstHeader::Ethernet => self.ethernet_header().map(|eth| eth.get_ethertype().0),
            FirstHeader::Null => match self.null_family()? {
                AF_INET => Some(ETHERTYPE_IPV4),
                family if AF_INET6.contains(&family) => Some(ETHERTYPE_IPV6),
                _ => None,
            },
        }
    }

    /// Bytes after the first header
    pub fn payload(&self) -> &[u8] {
        self.data.get(self.first_header.header_len()..).unwrap_or(&[])
    }

    /// Summarize the network and transport headers
    pub fn network(&self) -> NetworkSummary {
        let Some(ethertype) = self.ethertype() else {
            return NetworkSummary::Truncated;
        };
        let payload = self.payload();

        match ethertype {
            t if t == EtherTypes::Ipv4.0 => match Ipv4Packet::new(payload) {
                Some(ip) => NetworkSummary::Ipv4 {
                    src: ip.get_source(),
                    dst: ip.get_destination(),
                    transport: transport_summary(ip.get_next_level_protocol(), ip.payload()),
                },
                None => NetworkSummary::Truncated,
            },
            t if t == EtherTypes::Ipv6.0 => match Ipv6Packet::new(payload) {
                Some(ip) => NetworkSummary::Ipv6 {
                    src: ip.get_source(),
                    dst: ip.get_destination(),
                    transport: transport_summary(ip.get_next_header(), ip.payload()),
                },
                None => NetworkSummary::Truncated,
            },
            t if t == EtherTypes::Arp.0 => match ArpPacket::new(payload) {
                Some(arp) => NetworkSummary::Arp {
                    operation: arp.get_operation().0,
                    sender: arp.get_sender_proto_addr(),
                    target: arp.get_target_proto_addr(),
                },
                None => NetworkSummary::Truncated,
            },
            other => NetworkSummary::Other(other),
        }
    }
}

fn transport_summary(protocol: IpNextHeaderProtocol, payload: &[u8]) -> Transport {
    match protocol {
        IpNextHeaderProtocols::Tcp => TcpPacket::new(payload).map(|tcp| Transport::Tcp {
            src_port: tcp.get_source(),
            dst_port: tcp.get_destination(),
        }),
        IpNextHeaderProtocols::Udp => UdpPacket::new(payload).map(|udp| Transport::Udp {
            src_port: udp.get_source(),
            dst_port: udp.get_destination(),
        }),
        IpNextHeaderProtocols::Icmp => IcmpPacket::new(payload).map(|icmp| Transport::Icmp {
            icmp_type: icmp.get_icmp_type().0,
        }),
        IpNextHeaderProtocols::Icmpv6 => Icmpv6Packet::new(payload).map(|icmp| Transport::Icmpv6 {
            icmp_type: icmp.get_icmpv6_type().0,
        }),
        _ => None,
    }
    .unwrap_or(Transport::Other(protocol.0))
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first_header {
            FirstHeader::Ethernet => match self.ethernet_header() {
                Some(eth) => write!(
                    f,
                    "Ethernet {}->{} {}",
                    eth.get_source(),
                    eth.get_destination(),
                    self.network()
                ),
                None => write!(f, "Ethernet truncated ({} bytes)", self.len()),
            },
            FirstHeader::Null => write!(f, "Null {}", self.network()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn create_udp_frame() -> Vec<u8> {
        vec![
            // Ethernet header (14 bytes)
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, // Destination: broadcast
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, // Source
            0x08, 0x00, // EtherType: IPv4
            // IPv4 header (20 bytes)
            0x45, 0x00, 0x00, 0x1c, // Version, IHL, TOS, Total Length (28)
            0x00, 0x01, 0x00, 0x00, // ID, Flags, Fragment
            0x40, 0x11, 0x00, 0x00, // TTL, Protocol (UDP), Checksum
            0x0a, 0x00, 0x00, 0x01, // Source IP (10.0.0.1)
            0x0a, 0x00, 0x00, 0x02, // Dest IP (10.0.0.2)
            // UDP header (8 bytes)
            0x00, 0x44, 0x00, 0x43, // Src Port (68), Dst Port (67)
            0x00, 0x08, 0x00, 0x00, // Length, Checksum
        ]
    }

    #[test]
    fn test_ethernet_summary() {
        let packet = Packet::ethernet(&create_udp_frame()).unwrap();

        assert_eq!(packet.ethertype(), Some(0x0800));
        assert_eq!(
            packet.network(),
            NetworkSummary::Ipv4 {
                src: Ipv4Addr::new(10, 0, 0, 1),
                dst: Ipv4Addr::new(10, 0, 0, 2),
                transport: Transport::Udp {
                    src_port: 68,
                    dst_port: 67
                },
            }
        );
        assert_eq!(
            packet.to_string(),
            "Ethernet 00:11:22:33:44:55->ff:ff:ff:ff:ff:ff IPv4 10.0.0.1->10.0.0.2 UDP 68->67"
        );
    }

    #[test]
    fn test_null_header_both_byte_orders() {
        let mut frame = create_udp_frame()[14..].to_vec();
        let mut le = AF_INET.to_le_bytes().to_vec();
        le.extend_from_slice(&frame);
        let packet = Packet::from_bytes(&le, FirstHeader::Null).unwrap();
        assert_eq!(packet.ethertype(), Some(0x0800));

        let mut be = 30u32.to_be_bytes().to_vec();
        be.append(&mut frame);
        let packet = Packet::from_bytes(&be, FirstHeader::Null).unwrap();
        assert_eq!(packet.ethertype(), Some(0x86dd));
        assert_eq!(packet.network(), NetworkSummary::Truncated);
    }

    #[test]
    fn test_packet_too_small() {
        let result = Packet::ethernet(&[0x00, 0x11]);
        assert!(matches!(
            result,
            Err(Error::PacketTooSmall {
                expected: 14,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_unchecked_packet_fails_validation() {
        let packet = Packet::new(FirstHeader::Ethernet, Vec::<u8>::new());
        assert!(packet.is_empty());
        assert!(packet.validate().is_err());
        assert_eq!(packet.network(), NetworkSummary::Truncated);
    }

    #[test]
    fn test_unknown_ethertype() {
        let mut frame = create_udp_frame();
        frame[12] = 0x88;
        frame[13] = 0xcc; // LLDP
        let packet = Packet::ethernet(&frame).unwrap();
        assert_eq!(packet.network(), NetworkSummary::Other(0x88cc));
    }
}
