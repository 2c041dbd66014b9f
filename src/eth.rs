use crate::types::U16;

/// Length in bytes of a standard (untagged) Ethernet II header.
pub const ETH_HDR_LEN: usize = 14;

/// Ethertype values this crate cares about.
pub mod ether_type {
    pub const IPV4: u16 = 0x0800;
    pub const ARP: u16 = 0x0806;
    pub const IPV6: u16 = 0x86DD;
}

/// Ethernet header, which is present at the beginning of every Ethernet frame.
///
/// Unlike the IPv4/IPv6 header types in [`crate::ip`], this is a detached
/// (copied) view: the live buffer is small and always aligned at offset 0,
/// so there is no benefit to an in-place overlay here, and a plain struct
/// keeps the Ethernet plugin free of unsafe code.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct EthHdr {
    /// Destination MAC address.
    pub dst_addr: [u8; 6],
    /// Source MAC address.
    pub src_addr: [u8; 6],
    /// Protocol which is encapsulated in the payload of the frame, network byte order.
    pub ether_type: U16,
}

impl EthHdr {
    pub const LEN: usize = ETH_HDR_LEN;

    /// Parses an Ethernet header out of the first [`EthHdr::LEN`] bytes of `buf`.
    ///
    /// Returns `None` if `buf` is shorter than a full header.
    pub fn parse(buf: &[u8]) -> Option<EthHdr> {
        if buf.len() < Self::LEN {
            return None;
        }
        let mut dst_addr = [0u8; 6];
        let mut src_addr = [0u8; 6];
        dst_addr.copy_from_slice(&buf[0..6]);
        src_addr.copy_from_slice(&buf[6..12]);
        let ether_type = U16::new(buf[12], buf[13]);
        Some(EthHdr {
            dst_addr,
            src_addr,
            ether_type,
        })
    }

    /// Writes this header back into the first [`EthHdr::LEN`] bytes of `buf`.
    pub fn write_to(&self, buf: &mut [u8]) {
        buf[0..6].copy_from_slice(&self.dst_addr);
        buf[6..12].copy_from_slice(&self.src_addr);
        buf[12..14].copy_from_slice(&self.ether_type.octets());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_bytes() {
        let mut buf = [0u8; 14];
        buf[0..6].copy_from_slice(&[1, 2, 3, 4, 5, 6]);
        buf[6..12].copy_from_slice(&[6, 5, 4, 3, 2, 1]);
        buf[12..14].copy_from_slice(&ether_type::IPV4.to_be_bytes());

        let hdr = EthHdr::parse(&buf).unwrap();
        assert_eq!(hdr.dst_addr, [1, 2, 3, 4, 5, 6]);
        assert_eq!(hdr.ether_type.to_bits(), ether_type::IPV4);

        let mut out = [0u8; 14];
        hdr.write_to(&mut out);
        assert_eq!(buf, out);
    }

    #[test]
    fn rejects_short_buffers() {
        assert!(EthHdr::parse(&[0u8; 13]).is_none());
    }
}
