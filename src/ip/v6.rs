use core::net::Ipv6Addr;

use crate::bitfield::BitfieldUnit;
use crate::types::U16;

use super::IpProto;

/// IPv6 header, which is present after the Ethernet header.
///
/// Version (4 bits), Traffic Class (8 bits) and Flow Label (20 bits) share
/// the first 32-bit word of the header; [`crate::l3::Ipv6HeaderViewMut`] is
/// the live, in-place editor for those bits, this type is a parsed, `Copy`
/// snapshot used by tests and debug output.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct Ipv6Hdr {
    /// Version (4 bits) / Traffic Class high nibble (4 bits).
    pub _bitfield_1: BitfieldUnit<[u8; 1]>,
    /// Traffic Class low nibble (4 bits) packed with the Flow Label's top
    /// bits; kept as raw bytes here, see [`crate::l3::Ipv6HeaderViewMut`]
    /// for the bit-accurate accessors used by the editing pipeline.
    pub flow_label: [u8; 3],
    /// Payload Length: size of the payload following this fixed header,
    /// including any extension headers.
    pub payload_len: U16,
    /// Next Header: type of the header (extension or upper-layer)
    /// immediately following this one.
    pub next_hdr: IpProto,
    /// Hop Limit: IPv6's analogue of IPv4's TTL.
    pub hop_limit: u8,
    /// Source Address.
    pub src_addr: Ipv6Addr,
    /// Destination Address.
    pub dst_addr: Ipv6Addr,
}

impl Ipv6Hdr {
    /// Length of the fixed IPv6 header (excludes extension headers).
    pub const LEN: usize = 40;

    /// Parses the fixed 40-byte header from the front of `buf`.
    pub fn parse(buf: &[u8]) -> Option<Ipv6Hdr> {
        if buf.len() < Self::LEN {
            return None;
        }
        let mut src = [0u8; 16];
        let mut dst = [0u8; 16];
        src.copy_from_slice(&buf[8..24]);
        dst.copy_from_slice(&buf[24..40]);
        Some(Ipv6Hdr {
            _bitfield_1: BitfieldUnit::new([buf[0]]),
            flow_label: [buf[1], buf[2], buf[3]],
            payload_len: U16::new(buf[4], buf[5]),
            next_hdr: IpProto::from_u8(buf[6]),
            hop_limit: buf[7],
            src_addr: Ipv6Addr::from(src),
            dst_addr: Ipv6Addr::from(dst),
        })
    }

    /// Writes the fixed 40-byte header back into the front of `buf`.
    pub fn write_to(&self, buf: &mut [u8]) {
        let [b0] = self._bitfield_1.raw();
        buf[0] = b0;
        buf[1..4].copy_from_slice(&self.flow_label);
        buf[4..6].copy_from_slice(&self.payload_len.octets());
        buf[6] = self.next_hdr as u8;
        buf[7] = self.hop_limit;
        buf[8..24].copy_from_slice(&self.src_addr.octets());
        buf[24..40].copy_from_slice(&self.dst_addr.octets());
    }

    #[inline]
    pub fn priority(&self) -> u8 {
        self._bitfield_1.get(0, 4) as u8
    }

    #[inline]
    pub fn set_priority(&mut self, val: u8) {
        self._bitfield_1.set(0, 4, val as u64)
    }

    #[inline]
    pub fn version(&self) -> u8 {
        self._bitfield_1.get(4, 4) as u8
    }

    #[inline]
    pub fn set_version(&mut self, val: u8) {
        self._bitfield_1.set(4, 4, val as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v6_round_trip() {
        let mut buf = [0u8; 40];
        buf[0] = 0x60; // version 6
        buf[8..24].copy_from_slice(&Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 0).octets());
        buf[24..40].copy_from_slice(&Ipv6Addr::new(2, 0, 0, 0, 0, 0, 0, 1).octets());

        let hdr = Ipv6Hdr::parse(&buf).unwrap();
        assert_eq!(hdr.src_addr, Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 0));
        assert_eq!(hdr.dst_addr, Ipv6Addr::new(2, 0, 0, 0, 0, 0, 0, 1));
        assert_eq!(hdr.version(), 6);

        let mut out = [0u8; 40];
        hdr.write_to(&mut out);
        assert_eq!(buf, out);
    }
}
