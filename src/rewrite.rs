//! Field rewriters: TTL/hop-limit, port map,
//! address rewrite. Each returns how many fields it actually changed, fed
//! into the pipeline's `needtorecalc` counter — so a no-op rule (TTL set
//! to the current value, port map to identity) correctly reports zero
//! recomputes.

use crate::config::{AddressRewriteTable, PortMap, TtlMode, TtlRule};
use crate::direction::Direction;
use crate::l3::{ArpHeaderViewMut, Ipv4HeaderViewMut, Ipv6HeaderViewMut, TransportPortsViewMut};

/// Applies `rule` to `current`, saturating the result into `[1, 255]`,
/// matching the original's `rewrite_ipv4_ttl`/`rewrite_ipv6_hlim`.
pub fn apply_ttl_rule(rule: TtlRule, current: u8) -> u8 {
    let raw: i32 = match rule.mode {
        TtlMode::Set => rule.value as i32,
        TtlMode::Add => current as i32 + rule.value as i32,
        TtlMode::Sub => current as i32 - rule.value as i32,
    };
    raw.clamp(1, 255) as u8
}

/// Rewrites TTL/hop-limit on `current`; returns `Some(new_value)` only if
/// it actually changed (so the caller can decide whether to recompute).
pub fn rewrite_ttl(rule: Option<TtlRule>, current: u8) -> Option<u8> {
    let rule = rule?;
    let new_value = apply_ttl_rule(rule, current);
    if new_value == current {
        None
    } else {
        Some(new_value)
    }
}

/// Rewrites source/destination ports per `port_map`; returns the number
/// of fields changed (0, 1, or 2).
pub fn rewrite_ports(port_map: &PortMap, ports: &mut TransportPortsViewMut) -> u32 {
    if port_map.is_empty() {
        return 0;
    }
    let mut recompute = 0;
    if let Some(new_src) = port_map.translate(ports.source_port()) {
        if new_src != ports.source_port() {
            ports.set_source_port(new_src);
            recompute += 1;
        }
    }
    if let Some(new_dst) = port_map.translate(ports.destination_port()) {
        if new_dst != ports.destination_port() {
            ports.set_destination_port(new_dst);
            recompute += 1;
        }
    }
    recompute
}

/// Rewrites source/destination addresses on an IPv4 header per the
/// direction-scoped CIDR table; returns the number of fields changed.
pub fn rewrite_ipv4_addresses(
    table: &AddressRewriteTable,
    direction: Direction,
    view: &mut Ipv4HeaderViewMut,
) -> u32 {
    let mut recompute = 0;
    if let Some(new_src) = table.rewrite_ipv4(view.source().into(), direction) {
        if new_src.octets() != view.source() {
            view.set_source(new_src.octets());
            recompute += 1;
        }
    }
    if let Some(new_dst) = table.rewrite_ipv4(view.destination().into(), direction) {
        if new_dst.octets() != view.destination() {
            view.set_destination(new_dst.octets());
            recompute += 1;
        }
    }
    recompute
}

/// IPv6 analogue of [`rewrite_ipv4_addresses`].
pub fn rewrite_ipv6_addresses(
    table: &AddressRewriteTable,
    direction: Direction,
    view: &mut Ipv6HeaderViewMut,
) -> u32 {
    let mut recompute = 0;
    if let Some(new_src) = table.rewrite_ipv6(view.source().into(), direction) {
        if new_src.octets() != view.source() {
            view.set_source(new_src.octets());
            recompute += 1;
        }
    }
    if let Some(new_dst) = table.rewrite_ipv6(view.destination().into(), direction) {
        if new_dst.octets() != view.destination() {
            view.set_destination(new_dst.octets());
            recompute += 1;
        }
    }
    recompute
}

/// Rewrites an ARP packet's sender/target protocol addresses. ARP has no
/// checksum, so the return value is purely informational: callers never feed it into a recompute counter.
pub fn rewrite_arp_addresses(
    table: &AddressRewriteTable,
    direction: Direction,
    view: &mut ArpHeaderViewMut,
) -> u32 {
    let mut changed = 0;
    if let Some(new_sender) = table.rewrite_ipv4(view.sender_protocol_address().into(), direction) {
        if new_sender.octets() != view.sender_protocol_address() {
            view.set_sender_protocol_address(new_sender.octets());
            changed += 1;
        }
    }
    if let Some(new_target) = table.rewrite_ipv4(view.target_protocol_address().into(), direction) {
        if new_target.octets() != view.target_protocol_address() {
            view.set_target_protocol_address(new_target.octets());
            changed += 1;
        }
    }
    changed
}
