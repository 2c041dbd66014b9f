use super::{DltPlugin, DltType, EncodeResult, L3Proto};
use crate::direction::Direction;
use crate::eth::{ether_type, EthHdr};

/// Standard untagged Ethernet II framing.
#[derive(Debug)]
pub struct EthernetPlugin;

impl DltPlugin for EthernetPlugin {
    fn dlt_type(&self) -> DltType {
        DltType::Ethernet
    }

    fn decode(&self, buf: &[u8]) -> Option<L3Proto> {
        let hdr = EthHdr::parse(buf)?;
        Some(match hdr.ether_type.to_bits() {
            ether_type::IPV4 => L3Proto::Ipv4,
            ether_type::IPV6 => L3Proto::Ipv6,
            ether_type::ARP => L3Proto::Arp,
            other => L3Proto::Other(other),
        })
    }

    fn encode(&self, buf: &mut Vec<u8>, _direction: Direction) -> EncodeResult {
        // Plain Ethernet in, plain Ethernet out: no header shape change.
        let new_len = buf.len();
        EncodeResult::Ok { new_len }
    }

    fn l2_len(&self, _buf: &[u8]) -> usize {
        EthHdr::LEN
    }
}
