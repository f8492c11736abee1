use etherparse::Ethernet2Slice;
use pcap_parser::Linktype;
use thiserror::Error;

use crate::buffer::ByteBuffer;

pub const ETHERTYPE_VLAN: u16 = 0x8100;
pub const VLAN_TAG_LEN: usize = 4;

#[derive(Debug, Error)]
pub enum EthernetError {
    #[error("ethernet slice error: {0}")]
    Slice(String),
    #[error("truncated VLAN tag")]
    TruncatedVlan,
}

/// Link-layer view of one frame, VLAN tag removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetFrame<'a> {
    pub destination: [u8; 6],
    pub source: [u8; 6],
    pub ether_type: u16,
    pub vlan_id: Option<u16>,
    pub payload: &'a [u8],
}

/// Slice an Ethernet II frame. Returns `Ok(None)` for other link types.
pub fn parse_ethernet(
    linktype: Linktype,
    data: &[u8],
) -> Result<Option<EthernetFrame<'_>>, EthernetError> {
    if linktype != Linktype::ETHERNET {
        return Ok(None);
    }
    let eth = Ethernet2Slice::from_slice_without_fcs(data)
        .map_err(|e| EthernetError::Slice(e.to_string()))?;
    let mut frame = EthernetFrame {
        destination: eth.destination(),
        source: eth.source(),
        ether_type: eth.ether_type().0,
        vlan_id: None,
        payload: eth.payload_slice(),
    };

    if frame.ether_type == ETHERTYPE_VLAN {
        let tag = ByteBuffer::new(frame.payload);
        let tci = tag.read_u16_be(0).map_err(|_| EthernetError::TruncatedVlan)?;
        frame.ether_type = tag.read_u16_be(2).map_err(|_| EthernetError::TruncatedVlan)?;
        frame.vlan_id = Some(tci & 0x0fff);
        frame.payload = tag.clamped_slice(VLAN_TAG_LEN, tag.len());
    }
    Ok(Some(frame))
}

#[cfg(test)]
mod tests {
    use pcap_parser::Linktype;

    use super::{EthernetError, parse_ethernet};

    const DST: [u8; 6] = [0x01, 0x0e, 0xcf, 0x00, 0x00, 0x00];
    const SRC: [u8; 6] = [0x00, 0x0e, 0x8c, 0x12, 0x34, 0x56];

    fn frame(ether_type: u16, rest: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&DST);
        data.extend_from_slice(&SRC);
        data.extend_from_slice(&ether_type.to_be_bytes());
        data.extend_from_slice(rest);
        data
    }

    #[test]
    fn slices_untagged_frame() {
        let data = frame(0x8892, &[0xfe, 0xfe, 0x05, 0x00]);
        let eth = parse_ethernet(Linktype::ETHERNET, &data).unwrap().unwrap();
        assert_eq!(eth.source, SRC);
        assert_eq!(eth.destination, DST);
        assert_eq!(eth.ether_type, 0x8892);
        assert_eq!(eth.vlan_id, None);
        assert_eq!(eth.payload, &[0xfe, 0xfe, 0x05, 0x00]);
    }

    #[test]
    fn strips_vlan_tag() {
        let data = frame(0x8100, &[0xc0, 0x05, 0x88, 0x92, 0x80, 0x00]);
        let eth = parse_ethernet(Linktype::ETHERNET, &data).unwrap().unwrap();
        assert_eq!(eth.ether_type, 0x8892);
        assert_eq!(eth.vlan_id, Some(5));
        assert_eq!(eth.payload, &[0x80, 0x00]);
    }

    #[test]
    fn truncated_vlan_tag_is_an_error() {
        let data = frame(0x8100, &[0xc0]);
        let err = parse_ethernet(Linktype::ETHERNET, &data).unwrap_err();
        assert!(matches!(err, EthernetError::TruncatedVlan));
    }

    #[test]
    fn non_ethernet_link_is_skipped() {
        let data = frame(0x8892, &[]);
        assert!(parse_ethernet(Linktype::RAW, &data).unwrap().is_none());
    }

    #[test]
    fn short_frame_is_a_slice_error() {
        let err = parse_ethernet(Linktype::ETHERNET, &[0u8; 5]).unwrap_err();
        assert!(matches!(err, EthernetError::Slice(_)));
    }
}
