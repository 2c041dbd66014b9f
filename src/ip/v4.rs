use core::net::Ipv4Addr;

use crate::bitfield::BitfieldUnit;
use crate::types::U16;

use super::IpProto;

/// IPv4 header, which is present after the Ethernet header.
///
/// [INTERNET PROTOCOL](https://datatracker.ietf.org/doc/html/rfc791)
/// ```text
/// 0                   1                   2                   3
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |Version|  IHL  |Type of Service|          Total Length         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |         Identification        |Flags|      Fragment Offset    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  Time to Live |    Protocol   |         Header Checksum       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                       Source Address                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                    Destination Address                        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                    Options                    |    Padding    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// This is a *parsed snapshot* of the fixed 20-byte header, not a live
/// overlay: the pipeline mutates a packet buffer in place through
/// [`crate::l3::Ipv4HeaderViewMut`] and only re-parses this struct where a
/// detached, `Copy` view is convenient (tests, debug formatting).
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct Ipv4Hdr {
    /// Version (4 bits) / Internet Header Length in 32-bit words (4 bits).
    pub _bitfield_1: BitfieldUnit<[u8; 1]>,
    /// Type of Service: QoS hint used to prioritize traffic.
    pub tos: u8,
    /// Total Length: entire size of the IP packet (header + data) in bytes.
    pub tot_len: U16,
    /// Identification: shared by all fragments of one original datagram.
    pub id: U16,
    /// Flags (3 bits) + Fragment Offset (13 bits).
    pub frag_off: BitfieldUnit<[u8; 2]>,
    /// Time to Live: decremented by every router that forwards the packet.
    pub ttl: u8,
    /// Protocol: identifies the encapsulated transport protocol.
    pub proto: IpProto,
    /// Header Checksum: one's-complement checksum of the header only.
    pub check: U16,
    /// Source Address.
    pub src_addr: Ipv4Addr,
    /// Destination Address.
    pub dst_addr: Ipv4Addr,
}

impl Ipv4Hdr {
    /// Length of the fixed (no-options) IPv4 header.
    pub const LEN: usize = 20;

    /// Parses the fixed 20-byte header from the front of `buf`.
    ///
    /// Returns `None` if `buf` is shorter than [`Ipv4Hdr::LEN`].
    pub fn parse(buf: &[u8]) -> Option<Ipv4Hdr> {
        if buf.len() < Self::LEN {
            return None;
        }
        Some(Ipv4Hdr {
            _bitfield_1: BitfieldUnit::new([buf[0]]),
            tos: buf[1],
            tot_len: U16::new(buf[2], buf[3]),
            id: U16::new(buf[4], buf[5]),
            frag_off: BitfieldUnit::new([buf[6], buf[7]]),
            ttl: buf[8],
            proto: IpProto::from_u8(buf[9]),
            check: U16::new(buf[10], buf[11]),
            src_addr: Ipv4Addr::new(buf[12], buf[13], buf[14], buf[15]),
            dst_addr: Ipv4Addr::new(buf[16], buf[17], buf[18], buf[19]),
        })
    }

    /// Writes the fixed 20-byte header back into the front of `buf`.
    pub fn write_to(&self, buf: &mut [u8]) {
        let [b0] = self._bitfield_1.raw();
        buf[0] = b0;
        buf[1] = self.tos;
        buf[2..4].copy_from_slice(&self.tot_len.octets());
        buf[4..6].copy_from_slice(&self.id.octets());
        buf[6..8].copy_from_slice(&self.frag_off.raw());
        buf[8] = self.ttl;
        buf[9] = self.proto as u8;
        buf[10..12].copy_from_slice(&self.check.octets());
        buf[12..16].copy_from_slice(&self.src_addr.octets());
        buf[16..20].copy_from_slice(&self.dst_addr.octets());
    }

    #[inline]
    pub fn ihl(&self) -> u8 {
        self._bitfield_1.get(0, 4) as u8
    }

    #[inline]
    pub fn set_ihl(&mut self, val: u8) {
        self._bitfield_1.set(0, 4, val as u64)
    }

    /// Version: always 4 for this header type.
    #[inline]
    pub fn version(&self) -> u8 {
        self._bitfield_1.get(4, 4) as u8
    }

    #[inline]
    pub fn set_version(&mut self, val: u8) {
        self._bitfield_1.set(4, 4, val as u64)
    }

    #[inline]
    pub fn hdrlen(&self) -> usize {
        self.ihl() as usize * 4
    }

    /// Is the **DONT_FRAGMENT** flag set?
    #[inline]
    pub fn dont_fragment(&self) -> bool {
        self.frag_off.get_bit(15)
    }

    /// Is the **MORE_FRAGMENTS** flag set?
    #[inline]
    pub fn more_fragments(&self) -> bool {
        self.frag_off.get_bit(14)
    }

    /// If "more fragments" is set or the offset is nonzero, this is a
    /// fragment of a larger datagram (RFC 791).
    #[inline]
    pub fn is_fragment(&self) -> bool {
        self.frag_off.get(0, 14) > 0
    }

    #[inline]
    pub fn is_not_first_fragment(&self) -> bool {
        self.frag_off.get(0, 13) > 0
    }

    #[inline]
    pub fn has_l4_header(&self) -> bool {
        !self.is_not_first_fragment()
    }
}
