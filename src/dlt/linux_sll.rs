use super::{DltPlugin, DltType, EncodeResult, L3Proto};
use crate::direction::Direction;
use crate::eth::ether_type;

/// Linux "cooked" capture encapsulation (`DLT_LINUX_SLL`): a fixed 16-byte
/// pseudo-header carrying packet type, ARPHRD type, address length/bytes,
/// and a protocol field in the same position `ether_type` would be.
#[derive(Debug)]
pub struct LinuxSllPlugin;

const SLL_HDR_LEN: usize = 16;
const PROTO_OFFSET: usize = 14;

impl DltPlugin for LinuxSllPlugin {
    fn dlt_type(&self) -> DltType {
        DltType::LinuxSll
    }

    fn decode(&self, buf: &[u8]) -> Option<L3Proto> {
        if buf.len() < SLL_HDR_LEN {
            return None;
        }
        let proto = u16::from_be_bytes([buf[PROTO_OFFSET], buf[PROTO_OFFSET + 1]]);
        Some(match proto {
            ether_type::IPV4 => L3Proto::Ipv4,
            ether_type::IPV6 => L3Proto::Ipv6,
            ether_type::ARP => L3Proto::Arp,
            other => L3Proto::Other(other),
        })
    }

    fn encode(&self, buf: &mut Vec<u8>, _direction: Direction) -> EncodeResult {
        EncodeResult::Ok { new_len: buf.len() }
    }

    fn l2_len(&self, _buf: &[u8]) -> usize {
        SLL_HDR_LEN
    }
}
