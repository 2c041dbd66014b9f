use super::{DltPlugin, DltType, EncodeResult, L3Proto};
use crate::direction::Direction;

/// Raw IP: no link-layer header at all, decode sniffs the IP version
/// nibble of the first byte (matches libpcap's `DLT_RAW`).
#[derive(Debug)]
pub struct RawPlugin;

impl DltPlugin for RawPlugin {
    fn dlt_type(&self) -> DltType {
        DltType::Raw
    }

    fn decode(&self, buf: &[u8]) -> Option<L3Proto> {
        let version = buf.first()? >> 4;
        match version {
            4 => Some(L3Proto::Ipv4),
            6 => Some(L3Proto::Ipv6),
            _ => None,
        }
    }

    fn encode(&self, buf: &mut Vec<u8>, _direction: Direction) -> EncodeResult {
        EncodeResult::Ok { new_len: buf.len() }
    }

    fn l2_len(&self, _buf: &[u8]) -> usize {
        0
    }
}
