//! The editor pipeline: the ordered, 13-stage sequence of
//! transformations applied to one packet. Stage order mirrors the
//! original `tcpedit_packet()` stage for stage: L2 rewrite first (it
//! relocates everything after it), checksums last (every earlier stage
//! can invalidate them), randomization after address rewrite (the user's
//! explicit mapping is the substrate for obfuscation).

use tracing::{debug, instrument};

use crate::checksum::{fix_ipv4_header_checksum, fix_transport_checksum_ipv4, fix_transport_checksum_ipv6};
use crate::config::ChecksumPolicy;
use crate::direction::Direction;
use crate::dlt::{EncodeResult, L3Proto};
use crate::error::{ChecksumResult, EditError, EditOutcome};
use crate::ip::IpProto;
use crate::l3::{ArpHeaderViewMut, Ipv4HeaderViewMut, Ipv6HeaderViewMut, TransportPortsViewMut};
use crate::length;
use crate::packet::PacketRecord;
use crate::randomizer;
use crate::rewrite;
use crate::session::Session;

/// Stateless orchestrator for the editing pipeline. Holds no data of its
/// own; all mutable state lives on [`Session`] and [`PacketRecord`].
#[derive(Debug, Default)]
pub struct Editor;

impl Editor {
    pub fn new() -> Editor {
        Editor
    }

    /// Runs the 13-stage pipeline on `packet`. Asserts if `session` has
    /// not been validated — editing an unvalidated session is a
    /// programmer error, not a recoverable one.
    #[instrument(skip(self, session, packet), fields(packet_number = session.counters.packet_number + 1))]
    pub fn edit(&self, session: &mut Session, packet: &mut PacketRecord, direction: Direction) -> EditOutcome {
        assert!(session.is_validated(), "edit() called before Session::validate()");

        // Stage 1: counter bump.
        session.counters.packet_number += 1;
        debug!(caplen = packet.captured_len(), "packet");

        // Stage 2: FCS strip.
        if session.config.strip_ethernet_fcs && packet.captured_len() >= 4 {
            let new_len = packet.captured_len() - 4;
            packet.bytes.truncate(new_len);
            packet.apply_len_delta(-4);
        }

        // Stage 3: L2 decode. A `None` result means "no L3 present"; not
        // an error, later IP-only stages are simply skipped.
        let proto = session.dlt_ctx.decoder.decode(&packet.bytes);
        debug!(?proto, "layer 3 protocol");

        // Stage 4: L2 rewrite.
        let old_len = packet.captured_len();
        match session.dlt_ctx.encoder.encode(&mut packet.bytes, direction) {
            EncodeResult::SoftError(err) => {
                debug!(message = %err.message(), "soft error, dropping packet");
                session.latch_error(err);
                return EditOutcome::Drop;
            }
            EncodeResult::Error(err) => {
                session.latch_error(err.clone());
                return EditOutcome::Error(err);
            }
            EncodeResult::Ok { new_len } => {
                let delta = new_len as isize - old_len as isize;
                packet.apply_len_delta(delta);
            }
        }

        // Stage 5: L3 location.
        let l2_len = session.dlt_ctx.encoder.l2_len(&packet.bytes);
        debug!(l2_len, "layer 2 length after rewrite");

        let mut recompute: u32 = 0;

        // Stages 6-7: IPv4/IPv6 field edits.
        match proto {
            Some(L3Proto::Ipv4) => {
                recompute += edit_ipv4_fields(session, &mut packet.bytes, l2_len);
            }
            Some(L3Proto::Ipv6) => {
                recompute += edit_ipv6_fields(session, &mut packet.bytes, l2_len);
            }
            _ => {}
        }

        // Stage 8: length adjustment.
        if length::adjust(session.config.length_policy, session.config.mtu, packet, l2_len, proto) {
            recompute += 1;
        }

        // Stage 9: address rewrite.
        if !session.config.address_rewrite.ipv4.is_empty() || !session.config.address_rewrite.ipv6.is_empty() {
            match proto {
                Some(L3Proto::Ipv4) => {
                    if let Some(mut view) = Ipv4HeaderViewMut::new(&mut packet.bytes[l2_len..]) {
                        recompute += rewrite::rewrite_ipv4_addresses(&session.config.address_rewrite, direction, &mut view);
                    }
                }
                Some(L3Proto::Ipv6) => {
                    if let Some(mut view) = Ipv6HeaderViewMut::new(&mut packet.bytes[l2_len..]) {
                        recompute += rewrite::rewrite_ipv6_addresses(&session.config.address_rewrite, direction, &mut view);
                    }
                }
                Some(L3Proto::Arp) => {
                    if let Some(mut view) = ArpHeaderViewMut::new(&mut packet.bytes[l2_len..]) {
                        rewrite::rewrite_arp_addresses(&session.config.address_rewrite, direction, &mut view);
                    }
                }
                _ => {}
            }
        }

        // Stage 10: address randomization.
        if let Some(seed) = session.config.seed {
            match proto {
                Some(L3Proto::Ipv4) => {
                    if let Some(mut view) = Ipv4HeaderViewMut::new(&mut packet.bytes[l2_len..]) {
                        let new_src = randomizer::randomize_ipv4(seed, view.source().into());
                        let new_dst = randomizer::randomize_ipv4(seed, view.destination().into());
                        view.set_source(new_src.octets());
                        view.set_destination(new_dst.octets());
                        recompute += 1;
                    }
                }
                Some(L3Proto::Ipv6) => {
                    if let Some(mut view) = Ipv6HeaderViewMut::new(&mut packet.bytes[l2_len..]) {
                        let new_src = randomizer::randomize_ipv6(seed, view.source().into());
                        let new_dst = randomizer::randomize_ipv6(seed, view.destination().into());
                        view.set_source(new_src.octets());
                        view.set_destination(new_dst.octets());
                        recompute += 1;
                    }
                }
                Some(L3Proto::Arp) => {
                    if let Some(mut view) = ArpHeaderViewMut::new(&mut packet.bytes[l2_len..]) {
                        let new_sender = randomizer::randomize_arp_addr(seed, view.sender_protocol_address());
                        let new_target = randomizer::randomize_arp_addr(seed, view.target_protocol_address());
                        view.set_sender_protocol_address(new_sender);
                        view.set_target_protocol_address(new_target);
                        // ARP has no checksum: no recompute bump.
                    }
                }
                _ => {}
            }
        }

        // Stage 11: checksum fixup (terminal).
        let should_fix =
            session.config.checksum_policy == ChecksumPolicy::ForcedOn
                || (recompute > 0 && session.config.checksum_policy != ChecksumPolicy::Disabled);
        if should_fix {
            match fix_checksums(&mut packet.bytes, l2_len, proto) {
                Ok(Some(warning)) => session.latch_warning(warning),
                Ok(None) => {}
                Err(err) => {
                    session.latch_error(err.clone());
                    return EditOutcome::Error(err);
                }
            }
        }

        // Stage 12: L3 merge (no-op here: views above write straight into
        // `packet.bytes`; this seam exists for a future aligned-access
        // plugin that copies the L3 header into a scratch buffer).
        if let Some(l3_offset) = session.dlt_ctx.encoder.l3_data_offset(&packet.bytes) {
            let end = packet.bytes.len().min(l3_offset + 256);
            let snapshot = packet.bytes[l3_offset..end].to_vec();
            session.dlt_ctx.encoder.merge_l3(&mut packet.bytes, l3_offset, &snapshot);
        }

        // Stage 13: counter update.
        session.counters.total_bytes += packet.captured_len() as u64;
        session.counters.pkts_edited += 1;

        if recompute == 0 && old_len == packet.captured_len() {
            EditOutcome::Unchanged
        } else {
            EditOutcome::Changed
        }
    }
}

fn edit_ipv4_fields(session: &mut Session, buf: &mut [u8], l2_len: usize) -> u32 {
    let mut recompute = 0;
    let Some(mut view) = Ipv4HeaderViewMut::new(&mut buf[l2_len..]) else {
        return 0;
    };

    if let Some(tos) = session.config.tos {
        view.set_tos(tos);
        recompute += 1;
    }

    if let Some(new_ttl) = rewrite::rewrite_ttl(session.config.ttl_rule, view.ttl()) {
        view.set_ttl(new_ttl);
        recompute += 1;
    }

    let proto = view.protocol();
    let header_len = view.header_len_clamped();
    drop(view);

    if !session.config.port_map.is_empty() && matches!(proto, IpProto::Tcp | IpProto::Udp) {
        let transport_start = l2_len + header_len;
        if let Some(mut ports) = TransportPortsViewMut::new(&mut buf[transport_start..]) {
            recompute += rewrite::rewrite_ports(&session.config.port_map, &mut ports);
        }
    }

    recompute
}

fn edit_ipv6_fields(session: &mut Session, buf: &mut [u8], l2_len: usize) -> u32 {
    let mut recompute = 0;
    let Some(mut view) = Ipv6HeaderViewMut::new(&mut buf[l2_len..]) else {
        return 0;
    };

    if let Some(new_hop_limit) = rewrite::rewrite_ttl(session.config.ttl_rule, view.hop_limit()) {
        view.set_hop_limit(new_hop_limit);
        recompute += 1;
    }

    if let Some(tclass) = session.config.traffic_class {
        view.set_traffic_class(tclass);
        recompute += 1;
    }

    if let Some(flow_label) = session.config.flow_label {
        view.set_flow_label(flow_label);
        recompute += 1;
    }

    let next_header = view.next_header();
    drop(view);

    if !session.config.port_map.is_empty() && matches!(next_header, IpProto::Tcp | IpProto::Udp) {
        let transport_start = l2_len + Ipv6HeaderViewMut::LEN;
        if let Some(mut ports) = TransportPortsViewMut::new(&mut buf[transport_start..]) {
            recompute += rewrite::rewrite_ports(&session.config.port_map, &mut ports);
        }
    }

    recompute
}

/// Runs the checksum kernel for `proto`. Returns the kernel's warning, if
/// any, as `Ok(Some(_))`; a warning is non-fatal per spec (flushed to the
/// session's warning slot and treated as success by the caller). A
/// malformed header the kernel can't checksum at all (e.g. too short to
/// parse once earlier stages have run) is fatal per spec.md §7 and
/// surfaces as `Err`.
fn fix_checksums(buf: &mut [u8], l2_len: usize, proto: Option<L3Proto>) -> Result<Option<String>, EditError> {
    let mut warning = None;
    let mut latch = |result: ChecksumResult| -> Result<(), EditError> {
        match result {
            ChecksumResult::Ok => Ok(()),
            ChecksumResult::Warn(message) => {
                warning = Some(message);
                Ok(())
            }
            ChecksumResult::Err(err) => Err(err),
        }
    };
    match proto {
        Some(L3Proto::Ipv4) => {
            let (src, dst, ip_proto, header_len, total_length) = {
                let view = match Ipv4HeaderViewMut::new(&mut buf[l2_len..]) {
                    Some(v) => v,
                    None => {
                        return Err(EditError::fatal(
                            "IPv4 header too short to checksum at stage 11",
                        ))
                    }
                };
                (
                    view.source(),
                    view.destination(),
                    view.protocol(),
                    view.header_len_clamped(),
                    view.total_length(),
                )
            };
            let transport_start = l2_len + header_len;
            if matches!(ip_proto, IpProto::Tcp | IpProto::Udp | IpProto::Icmp) {
                let declared_len = total_length.saturating_sub(header_len as u16);
                let available = buf.len().saturating_sub(transport_start);
                let bound = transport_start + (declared_len as usize).min(available);
                latch(fix_transport_checksum_ipv4(
                    src,
                    dst,
                    ip_proto,
                    declared_len,
                    &mut buf[transport_start..bound],
                ))?;
            }
            latch(fix_ipv4_header_checksum(&mut buf[l2_len..l2_len + header_len]))?;
            Ok(warning)
        }
        Some(L3Proto::Ipv6) => {
            let (src, dst, next_header, payload_length) = {
                let view = match Ipv6HeaderViewMut::new(&mut buf[l2_len..]) {
                    Some(v) => v,
                    None => {
                        return Err(EditError::fatal(
                            "IPv6 header too short to checksum at stage 11",
                        ))
                    }
                };
                (view.source(), view.destination(), view.next_header(), view.payload_length())
            };
            let transport_start = l2_len + Ipv6HeaderViewMut::LEN;
            if matches!(next_header, IpProto::Tcp | IpProto::Udp | IpProto::Ipv6Icmp) {
                let declared_len = payload_length as u32;
                let available = buf.len().saturating_sub(transport_start);
                let bound = transport_start + (declared_len as usize).min(available);
                latch(fix_transport_checksum_ipv6(
                    src,
                    dst,
                    next_header,
                    declared_len,
                    &mut buf[transport_start..bound],
                ))?;
            }
            Ok(warning)
        }
        _ => Ok(None),
    }
}
