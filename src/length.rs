//! Length adjuster.

use crate::config::LengthPolicy;
use crate::dlt::L3Proto;
use crate::l3::{Ipv4HeaderViewMut, Ipv6HeaderViewMut};
use crate::packet::PacketRecord;

/// Applies `policy` to `packet`. `l2_len` is the current L2 header length
/// (stage 5's re-located value); `proto` identifies which header's length
/// field to update, if any. Returns whether the buffer or a header field
/// changed (feeds the pipeline's recompute counter).
pub fn adjust(
    policy: LengthPolicy,
    mtu: u32,
    packet: &mut PacketRecord,
    l2_len: usize,
    proto: Option<L3Proto>,
) -> bool {
    match policy {
        LengthPolicy::None => false,
        LengthPolicy::PadToOriginal => pad_to_original(packet),
        LengthPolicy::TruncateToMtu => truncate_to_mtu(mtu, packet, l2_len, proto),
    }
}

fn pad_to_original(packet: &mut PacketRecord) -> bool {
    if packet.captured_len() < packet.wire_len {
        packet.bytes.resize(packet.wire_len, 0);
        true
    } else {
        false
    }
}

fn truncate_to_mtu(mtu: u32, packet: &mut PacketRecord, l2_len: usize, proto: Option<L3Proto>) -> bool {
    let mtu = mtu as usize;
    if packet.captured_len() <= l2_len + mtu {
        return false;
    }
    let new_total = l2_len + mtu;
    let old_total = packet.captured_len();
    packet.bytes.truncate(new_total);
    packet.apply_len_delta(new_total as isize - old_total as isize);

    let l3_payload_len = new_total - l2_len;
    match proto {
        Some(L3Proto::Ipv4) => {
            if let Some(mut view) = Ipv4HeaderViewMut::new(&mut packet.bytes[l2_len..]) {
                view.set_total_length(l3_payload_len as u16);
            }
        }
        Some(L3Proto::Ipv6) => {
            if let Some(mut view) = Ipv6HeaderViewMut::new(&mut packet.bytes[l2_len..]) {
                let payload_len = l3_payload_len.saturating_sub(Ipv6HeaderViewMut::LEN);
                view.set_payload_length(payload_len as u16);
            }
        }
        _ => {}
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_extends_to_wire_len() {
        let mut packet = PacketRecord::new(0, 0, 64, vec![0u8; 60]);
        assert!(pad_to_original(&mut packet));
        assert_eq!(packet.captured_len(), 64);
    }

    #[test]
    fn truncate_clips_and_updates_total_length() {
        let mut bytes = vec![0u8; 14 + 20 + 100];
        bytes[14] = 0x45;
        let mut packet = PacketRecord::new(0, 0, bytes.len(), bytes);
        let changed = truncate_to_mtu(50, &mut packet, 14, Some(L3Proto::Ipv4));
        assert!(changed);
        assert_eq!(packet.captured_len(), 14 + 50);
        let view = Ipv4HeaderViewMut::new(&mut packet.bytes[14..]).unwrap();
        assert_eq!(view.total_length(), 50);
    }
}
