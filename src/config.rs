//! The configuration surface a front-end (option parser) produces and the
//! core consumes. Parsing the `key=value` option strings
//! themselves is out of scope; `SessionConfig` is the shape those parsers
//! must build.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::direction::Direction;
use crate::dlt::DltType;

/// `ttl=set:N|add:N|sub:N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlMode {
    Set,
    Add,
    Sub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlRule {
    pub mode: TtlMode,
    pub value: u8,
}

/// `fixlen=pad|trunc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthPolicy {
    #[default]
    None,
    PadToOriginal,
    TruncateToMtu,
}

/// `fixcsum=on|off|auto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumPolicy {
    ForcedOn,
    #[default]
    Auto,
    Disabled,
}

/// An IPv4 CIDR block: address + prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Cidr {
    pub network: Ipv4Addr,
    pub prefix_len: u8,
}

impl Ipv4Cidr {
    pub fn new(network: Ipv4Addr, prefix_len: u8) -> Ipv4Cidr {
        Ipv4Cidr { network, prefix_len }
    }

    fn mask(&self) -> u32 {
        if self.prefix_len == 0 {
            0
        } else {
            u32::MAX << (32 - self.prefix_len as u32)
        }
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        let mask = self.mask();
        u32::from(self.network) & mask == u32::from(addr) & mask
    }

    /// Remaps `addr` from this CIDR into `target`, preserving the host
    /// bits (the part of the address not covered by the prefix).
    pub fn remap(&self, addr: Ipv4Addr, target: &Ipv4Cidr) -> Ipv4Addr {
        let host_mask = !self.mask();
        let host_bits = u32::from(addr) & host_mask;
        let target_mask = target.mask();
        Ipv4Addr::from((u32::from(target.network) & target_mask) | (host_bits & !target_mask))
    }
}

/// An IPv6 CIDR block: address + prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6Cidr {
    pub network: Ipv6Addr,
    pub prefix_len: u8,
}

impl Ipv6Cidr {
    pub fn new(network: Ipv6Addr, prefix_len: u8) -> Ipv6Cidr {
        Ipv6Cidr { network, prefix_len }
    }

    fn mask(&self) -> u128 {
        if self.prefix_len == 0 {
            0
        } else {
            u128::MAX << (128 - self.prefix_len as u32)
        }
    }

    pub fn contains(&self, addr: Ipv6Addr) -> bool {
        let mask = self.mask();
        u128::from(self.network) & mask == u128::from(addr) & mask
    }

    pub fn remap(&self, addr: Ipv6Addr, target: &Ipv6Cidr) -> Ipv6Addr {
        let host_mask = !self.mask();
        let host_bits = u128::from(addr) & host_mask;
        let target_mask = target.mask();
        Ipv6Addr::from((u128::from(target.network) & target_mask) | (host_bits & !target_mask))
    }
}

/// One direction-scoped CIDR-to-CIDR IPv4 rewrite rule.
#[derive(Debug, Clone, Copy)]
pub struct Ipv4RewriteRule {
    pub direction: Direction,
    pub from: Ipv4Cidr,
    pub to: Ipv4Cidr,
}

/// One direction-scoped CIDR-to-CIDR IPv6 rewrite rule.
#[derive(Debug, Clone, Copy)]
pub struct Ipv6RewriteRule {
    pub direction: Direction,
    pub from: Ipv6Cidr,
    pub to: Ipv6Cidr,
}

/// Per-direction CIDR-to-CIDR remap rules.
#[derive(Debug, Clone, Default)]
pub struct AddressRewriteTable {
    pub ipv4: Vec<Ipv4RewriteRule>,
    pub ipv6: Vec<Ipv6RewriteRule>,
}

impl AddressRewriteTable {
    pub fn rewrite_ipv4(&self, addr: Ipv4Addr, direction: Direction) -> Option<Ipv4Addr> {
        self.ipv4
            .iter()
            .find(|rule| rule.direction == direction && rule.from.contains(addr))
            .map(|rule| rule.from.remap(addr, &rule.to))
    }

    pub fn rewrite_ipv6(&self, addr: Ipv6Addr, direction: Direction) -> Option<Ipv6Addr> {
        self.ipv6
            .iter()
            .find(|rule| rule.direction == direction && rule.from.contains(addr))
            .map(|rule| rule.from.remap(addr, &rule.to))
    }
}

/// `portmap=F:T,...`: ordered from-port/to-port pairs.
#[derive(Debug, Clone, Default)]
pub struct PortMap {
    entries: Vec<(u16, u16)>,
}

impl PortMap {
    pub fn new(entries: Vec<(u16, u16)>) -> PortMap {
        PortMap { entries }
    }

    /// Returns the mapped port if `port` matches an entry, scanning in
    /// order (table sizes are small; a linear scan matches the original's
    /// linked-list lookup without inventing a `HashMap` for a handful of
    /// entries).
    pub fn translate(&self, port: u16) -> Option<u16> {
        self.entries
            .iter()
            .find(|(from, _)| *from == port)
            .map(|(_, to)| *to)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable, validated-once-built configuration for a [`crate::session::Session`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub input_dlt: DltType,
    pub output_dlt: DltType,
    pub mtu: u32,
    pub tos: Option<u8>,
    pub traffic_class: Option<u8>,
    pub flow_label: Option<u32>,
    pub ttl_rule: Option<TtlRule>,
    pub port_map: PortMap,
    pub address_rewrite: AddressRewriteTable,
    pub length_policy: LengthPolicy,
    pub checksum_policy: ChecksumPolicy,
    pub strip_ethernet_fcs: bool,
    pub seed: Option<u32>,
}

/// Default assumes 802.3 Ethernet, matching `tcpedit_init`'s `DEFAULT_MTU`.
pub const DEFAULT_MTU: u32 = 1500;

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            input_dlt: DltType::Ethernet,
            output_dlt: DltType::Ethernet,
            mtu: DEFAULT_MTU,
            tos: None,
            traffic_class: None,
            flow_label: None,
            ttl_rule: None,
            port_map: PortMap::default(),
            address_rewrite: AddressRewriteTable::default(),
            length_policy: LengthPolicy::default(),
            checksum_policy: ChecksumPolicy::default(),
            strip_ethernet_fcs: false,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cidr_remap_preserves_host_bits() {
        let from = Ipv4Cidr::new(Ipv4Addr::new(10, 0, 0, 0), 24);
        let to = Ipv4Cidr::new(Ipv4Addr::new(192, 168, 5, 0), 24);
        let addr = Ipv4Addr::new(10, 0, 0, 42);
        assert!(from.contains(addr));
        assert_eq!(from.remap(addr, &to), Ipv4Addr::new(192, 168, 5, 42));
    }

    #[test]
    fn port_map_identity_misses_are_none() {
        let map = PortMap::new(vec![(53, 5353)]);
        assert_eq!(map.translate(53), Some(5353));
        assert_eq!(map.translate(80), None);
    }
}
