use super::{DltPlugin, DltType, EncodeResult, L3Proto};
use crate::direction::Direction;
use crate::error::EditError;

/// 802.11 framing. Only standard data frames carrying an LLC/SNAP header
/// can be translated to an L3 payload; management and QoS-data frames
/// cannot be safely rewritten in place (no stable ethertype location) and
/// are dropped with a soft error instead of being forwarded unedited.
#[derive(Debug)]
pub struct Ieee80211Plugin;

const FRAME_TYPE_MANAGEMENT: u8 = 0b00;
const FRAME_TYPE_DATA: u8 = 0b10;
const SUBTYPE_QOS_DATA: u8 = 0b1000;

impl Ieee80211Plugin {
    fn frame_control(buf: &[u8]) -> Option<(u8, u8)> {
        let fc = *buf.first()?;
        let frame_type = (fc >> 2) & 0b11;
        let subtype = (fc >> 4) & 0b1111;
        Some((frame_type, subtype))
    }
}

impl DltPlugin for Ieee80211Plugin {
    fn dlt_type(&self) -> DltType {
        DltType::Ieee80211
    }

    fn decode(&self, _buf: &[u8]) -> Option<L3Proto> {
        // Translating any 802.11 frame type to an L3 proto requires
        // reassembling past the LLC/SNAP header; left for a future plugin.
        None
    }

    fn encode(&self, buf: &mut Vec<u8>, _direction: Direction) -> EncodeResult {
        match Self::frame_control(buf) {
            Some((frame_type, subtype))
                if frame_type == FRAME_TYPE_MANAGEMENT
                    || (frame_type == FRAME_TYPE_DATA && subtype == SUBTYPE_QOS_DATA) =>
            {
                EncodeResult::SoftError(EditError::soft(
                    "802.11 management or QoS-data frame cannot be translated",
                ))
            }
            Some(_) => EncodeResult::Ok { new_len: buf.len() },
            None => EncodeResult::Error(EditError::fatal("802.11 frame shorter than frame control field")),
        }
    }

    fn l2_len(&self, _buf: &[u8]) -> usize {
        0
    }
}
