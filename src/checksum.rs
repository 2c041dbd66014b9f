//! One's-complement checksum kernel.
//!
//! `Sum16` accumulates 16-bit words the way etherparse's `Sum16BitWords`
//! does (`add_2bytes`/`add_4bytes`/`add_slice`, fold to one's complement);
//! the call sites and "checksum fixup is terminal, runs iff the packet
//! changed" contract follow the original's
//! `fix_ipv4_checksums`/`fix_ipv6_checksums`.

use crate::error::{ChecksumResult, EditError};
use crate::ip::IpProto;

/// Accumulates 16-bit words for a one's-complement checksum.
#[derive(Default, Clone, Copy)]
pub struct Sum16 {
    sum: u32,
}

impl Sum16 {
    pub fn new() -> Sum16 {
        Sum16::default()
    }

    pub fn add_2bytes(mut self, bytes: [u8; 2]) -> Self {
        self.sum += u16::from_be_bytes(bytes) as u32;
        self
    }

    pub fn add_4bytes(mut self, bytes: [u8; 4]) -> Self {
        self.sum += u16::from_be_bytes([bytes[0], bytes[1]]) as u32;
        self.sum += u16::from_be_bytes([bytes[2], bytes[3]]) as u32;
        self
    }

    pub fn add_16bytes(mut self, bytes: [u8; 16]) -> Self {
        for chunk in bytes.chunks_exact(2) {
            self.sum += u16::from_be_bytes([chunk[0], chunk[1]]) as u32;
        }
        self
    }

    pub fn add_slice(mut self, data: &[u8]) -> Self {
        let mut chunks = data.chunks_exact(2);
        for chunk in &mut chunks {
            self.sum += u16::from_be_bytes([chunk[0], chunk[1]]) as u32;
        }
        if let [last] = *chunks.remainder() {
            self.sum += u16::from_be_bytes([last, 0]) as u32;
        }
        self
    }

    /// Folds the accumulated sum down to 16 bits and takes the one's
    /// complement, as RFC 1071 describes.
    pub fn ones_complement(self) -> u16 {
        let mut sum = self.sum;
        while sum >> 16 != 0 {
            sum = (sum & 0xFFFF) + (sum >> 16);
        }
        !(sum as u16)
    }
}

/// Computes the IPv4 header checksum over `header` (checksum field must be
/// zeroed by the caller before calling this, or excluded from `header`).
pub fn ipv4_header_checksum(header_no_checksum: &[u8]) -> u16 {
    Sum16::new().add_slice(header_no_checksum).ones_complement()
}

/// Recomputes the IPv4 header checksum in place (bytes 10-11 of `header`),
/// treating the checksum field itself as zero regardless of its current
/// value. `header` must start at byte 0 of the IPv4 header and cover at
/// least the declared IHL length.
pub fn fix_ipv4_header_checksum(header: &mut [u8]) -> ChecksumResult {
    if header.len() < 20 {
        return ChecksumResult::Err(EditError::fatal("IPv4 header shorter than 20 bytes"));
    }
    let header_len = ((header[0] & 0x0F) as usize * 4).clamp(20, header.len());
    header[10] = 0;
    header[11] = 0;
    let checksum = ipv4_header_checksum(&header[..header_len]);
    header[10..12].copy_from_slice(&checksum.to_be_bytes());
    ChecksumResult::Ok
}

fn transport_checksum_ipv4_pseudo(
    src: [u8; 4],
    dst: [u8; 4],
    proto: IpProto,
    transport_len: u16,
    transport_bytes: &[u8],
) -> u16 {
    Sum16::new()
        .add_4bytes(src)
        .add_4bytes(dst)
        .add_2bytes([0, proto as u8])
        .add_2bytes(transport_len.to_be_bytes())
        .add_slice(transport_bytes)
        .ones_complement()
}

fn transport_checksum_ipv6_pseudo(
    src: [u8; 16],
    dst: [u8; 16],
    proto: IpProto,
    transport_len: u32,
    transport_bytes: &[u8],
) -> u16 {
    Sum16::new()
        .add_16bytes(src)
        .add_16bytes(dst)
        .add_4bytes(transport_len.to_be_bytes())
        .add_2bytes([0, proto as u8])
        .add_slice(transport_bytes)
        .ones_complement()
}

/// Computes the TCP/UDP checksum over an IPv4 pseudo-header + transport
/// bytes (with the transport checksum field treated as zero), and writes
/// it into offset 16 (TCP) or 6 (UDP) of `transport`.
///
/// `declared_len` is the transport length the IP header claims (total
/// length minus IP header length); it drives the pseudo-header's length
/// field. `transport` holds only the bytes actually captured, which may
/// be shorter than `declared_len` for a truncated capture, but must never
/// be longer — callers slice the buffer down to `declared_len` first so
/// that any trailing bytes outside the IP datagram (link-layer padding,
/// capture slop) never enter the sum.
pub fn fix_transport_checksum_ipv4(
    src: [u8; 4],
    dst: [u8; 4],
    proto: IpProto,
    declared_len: u16,
    transport: &mut [u8],
) -> ChecksumResult {
    let checksum_offset = match proto {
        IpProto::Tcp => 16,
        IpProto::Udp => 6,
        IpProto::Icmp => {
            return fix_icmpv4_checksum(transport);
        }
        _ => return ChecksumResult::Ok,
    };
    if transport.len() < checksum_offset + 2 {
        return ChecksumResult::Err(EditError::fatal("transport header shorter than checksum field"));
    }
    let truncated = transport.len() < declared_len as usize;
    transport[checksum_offset] = 0;
    transport[checksum_offset + 1] = 0;
    let checksum = transport_checksum_ipv4_pseudo(src, dst, proto, declared_len, transport);
    transport[checksum_offset..checksum_offset + 2].copy_from_slice(&checksum.to_be_bytes());
    if truncated {
        ChecksumResult::Warn("capture truncated; checksum computed over captured bytes only".into())
    } else {
        ChecksumResult::Ok
    }
}

/// IPv6 analogue of [`fix_transport_checksum_ipv4`]; ICMPv6 also requires
/// the pseudo-header, unlike ICMPv4. `declared_len` is the IPv6 payload
/// length (no extension header chain is modeled, so it is the transport
/// length directly).
pub fn fix_transport_checksum_ipv6(
    src: [u8; 16],
    dst: [u8; 16],
    proto: IpProto,
    declared_len: u32,
    transport: &mut [u8],
) -> ChecksumResult {
    let checksum_offset = match proto {
        IpProto::Tcp => 16,
        IpProto::Udp => 6,
        IpProto::Ipv6Icmp => 2,
        _ => return ChecksumResult::Ok,
    };
    if transport.len() < checksum_offset + 2 {
        return ChecksumResult::Err(EditError::fatal("transport header shorter than checksum field"));
    }
    let truncated = (transport.len() as u64) < declared_len as u64;
    transport[checksum_offset] = 0;
    transport[checksum_offset + 1] = 0;
    let checksum = transport_checksum_ipv6_pseudo(src, dst, proto, declared_len, transport);
    transport[checksum_offset..checksum_offset + 2].copy_from_slice(&checksum.to_be_bytes());
    if truncated {
        ChecksumResult::Warn("capture truncated; checksum computed over captured bytes only".into())
    } else {
        ChecksumResult::Ok
    }
}

/// ICMPv4 has no pseudo-header: the checksum covers only the ICMP message.
pub fn fix_icmpv4_checksum(icmp: &mut [u8]) -> ChecksumResult {
    if icmp.len() < 4 {
        return ChecksumResult::Err(EditError::fatal("ICMP message shorter than 4 bytes"));
    }
    icmp[2] = 0;
    icmp[3] = 0;
    let checksum = Sum16::new().add_slice(icmp).ones_complement();
    icmp[2..4].copy_from_slice(&checksum.to_be_bytes());
    ChecksumResult::Ok
}
