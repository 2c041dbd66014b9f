use super::{DltPlugin, DltType, EncodeResult, L3Proto};
use crate::direction::Direction;

/// BSD loopback encapsulation (`DLT_NULL`): a 4-byte host-order address
/// family value instead of an ethertype.
#[derive(Debug)]
pub struct NullPlugin;

const NULL_HDR_LEN: usize = 4;
const AF_INET: u32 = 2;
const AF_INET6_BSD: u32 = 30; // matches macOS/BSD AF_INET6; Linux differs but loopback captures are host-local.

impl DltPlugin for NullPlugin {
    fn dlt_type(&self) -> DltType {
        DltType::Null
    }

    fn decode(&self, buf: &[u8]) -> Option<L3Proto> {
        if buf.len() < NULL_HDR_LEN {
            return None;
        }
        let family = u32::from_ne_bytes([buf[0], buf[1], buf[2], buf[3]]);
        match family {
            AF_INET => Some(L3Proto::Ipv4),
            AF_INET6_BSD => Some(L3Proto::Ipv6),
            _ => None,
        }
    }

    fn encode(&self, buf: &mut Vec<u8>, _direction: Direction) -> EncodeResult {
        EncodeResult::Ok { new_len: buf.len() }
    }

    fn l2_len(&self, _buf: &[u8]) -> usize {
        NULL_HDR_LEN
    }
}
