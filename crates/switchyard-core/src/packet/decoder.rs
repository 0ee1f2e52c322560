//! Link-type decoder table

use std::collections::HashMap;

use bytes::Bytes;
use once_cell::sync::Lazy;

use super::{FirstHeader, LinkType, Packet};
use crate::error::{Error, Result};

/// Turns the raw bytes of one capture into a packet
pub type Decoder = fn(&[u8]) -> Result<Packet>;

static DECODERS: Lazy<HashMap<LinkType, Decoder>> = Lazy::new(|| {
    let mut table: HashMap<LinkType, Decoder> = HashMap::new();
    table.insert(LinkType::Ethernet, decode_ethernet as Decoder);
    table.insert(LinkType::Null, decode_null as Decoder);
    table
});

fn decode_ethernet(raw: &[u8]) -> Result<Packet> {
    Packet::from_bytes(raw, FirstHeader::Ethernet)
}

fn decode_null(raw: &[u8]) -> Result<Packet> {
    Packet::from_bytes(raw, FirstHeader::Null)
}

/// Look up the decoder registered for a link type
pub fn decoder_for(link_type: LinkType) -> Option<Decoder> {
    DECODERS.get(&link_type).copied()
}

/// Decode raw capture bytes of the given link type
pub fn decode(raw: &[u8], link_type: LinkType) -> Result<Packet> {
    let decoder = decoder_for(link_type).ok_or(Error::UnsupportedLinkType(link_type))?;
    decoder(raw)
}

/// Serialize a packet back to wire bytes
pub fn encode(packet: &Packet) -> Bytes {
    packet.data.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_link_types() {
        assert!(decoder_for(LinkType::Ethernet).is_some());
        assert!(decoder_for(LinkType::Null).is_some());
        assert!(decoder_for(LinkType::Raw).is_none());
        assert!(decoder_for(LinkType::Other(105)).is_none());
    }

    #[test]
    fn test_decode_unsupported() {
        let result = decode(&[0u8; 40], LinkType::Raw);
        assert!(matches!(result, Err(Error::UnsupportedLinkType(LinkType::Raw))));
    }

    #[test]
    fn test_decode_sets_first_header() {
        let packet = decode(&[0u8; 20], LinkType::Null).unwrap();
        assert_eq!(packet.first_header(), FirstHeader::Null);

        let packet = decode(&[0u8; 20], LinkType::Ethernet).unwrap();
        assert_eq!(packet.first_header(), FirstHeader::Ethernet);
    }

    #[test]
    fn test_encode_returns_frame_bytes() {
        let raw: Vec<u8> = (0u8..64).collect();
        let packet = decode(&raw, LinkType::Ethernet).unwrap();
        assert_eq!(&encode(&packet)[..], &raw[..]);
    }
}
