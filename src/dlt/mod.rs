//! DLT (Data Link Type) plugin registry.
//!
//! Each plugin implements a fixed capability set: decode, encode,
//! l2-length, l3-data-offset, merge-l3. A [`DltContext`] holds two
//! independent plugin instances — decoder (input link-type) and encoder
//! (output link-type) — so link-type translation (e.g. raw IP to
//! Ethernet) is possible, following the original's `tcpedit_dlt_src`/
//! `tcpedit_dlt_dst` split. This trait-object dispatch replaces the
//! original's function-pointer table; the registry is static after
//! `Session` init — no plugin is added or removed per packet.

pub mod ethernet;
pub mod ieee80211;
pub mod linux_sll;
pub mod null;
pub mod raw;

use crate::direction::Direction;
use crate::error::EditError;

/// Numeric link-type identifiers, matching libpcap's `DLT_*` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DltType {
    Null,
    Ethernet,
    Raw,
    Ieee80211,
    LinuxSll,
}

impl DltType {
    /// The libpcap `DLT_*` numeric value for this link-type.
    pub fn numeric(self) -> i32 {
        match self {
            DltType::Null => 0,
            DltType::Ethernet => 1,
            DltType::Ieee80211 => 105,
            DltType::Raw => 12,
            DltType::LinuxSll => 113,
        }
    }
}

/// The L3 protocol a decoder found at the front of the L3 payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum L3Proto {
    Ipv4,
    Ipv6,
    Arp,
    Other(u16),
}

/// Outcome of [`DltPlugin::encode`].
#[derive(Debug, Clone)]
pub enum EncodeResult {
    /// L2 was rewritten in place; buffer length is now `new_len`.
    Ok { new_len: usize },
    /// This packet cannot be translated to the output link-type and
    /// should be dropped; the session continues.
    SoftError(EditError),
    /// Fatal encoding error.
    Error(EditError),
}

/// Capability set a link-layer plugin must implement.
pub trait DltPlugin: std::fmt::Debug {
    fn dlt_type(&self) -> DltType;

    /// Identifies the L3 protocol encapsulated after this plugin's L2
    /// header, or `None` if there is no L3 header (not an error: IP-only
    /// stages are simply skipped for the rest of the pipeline).
    fn decode(&self, buf: &[u8]) -> Option<L3Proto>;

    /// Rewrites the L2 header in place for `direction`, growing or
    /// shrinking `buf` as needed. Returns the new total buffer length on
    /// success.
    fn encode(&self, buf: &mut Vec<u8>, direction: Direction) -> EncodeResult;

    /// Length of this plugin's L2 header in the current buffer.
    fn l2_len(&self, buf: &[u8]) -> usize;

    /// Byte offset of the first L3 byte in `buf`, or `None` if there is no
    /// L3 header.
    fn l3_data_offset(&self, buf: &[u8]) -> Option<usize> {
        if self.decode(buf).is_some() {
            Some(self.l2_len(buf))
        } else {
            None
        }
    }

    /// Merges a (possibly separately-buffered) L3 header back into `buf`
    /// at `l3_offset`. Plugins on permissive architectures that never
    /// copy the L3 header out make this a no-op; the seam exists for
    /// aligned-access platforms that must assemble the header elsewhere
    /// before writing it back.
    fn merge_l3(&self, buf: &mut [u8], l3_offset: usize, l3_header: &[u8]) {
        let end = l3_offset + l3_header.len();
        if end <= buf.len() {
            buf[l3_offset..end].copy_from_slice(l3_header);
        }
    }
}

/// Holds the decoder (input link-type) and encoder (output link-type)
/// plugin instances for one session. Selected once at session init and
/// never swapped mid-run.
#[derive(Debug)]
pub struct DltContext {
    pub decoder: Box<dyn DltPlugin>,
    pub encoder: Box<dyn DltPlugin>,
}

impl DltContext {
    /// Builds a context with the same plugin used for both decode and
    /// encode (the common case: no link-type translation).
    pub fn same(dlt: DltType) -> Result<DltContext, EditError> {
        Ok(DltContext {
            decoder: plugin_for(dlt)?,
            encoder: plugin_for(dlt)?,
        })
    }

    /// Builds a context translating from `input` to `output`.
    pub fn translating(input: DltType, output: DltType) -> Result<DltContext, EditError> {
        Ok(DltContext {
            decoder: plugin_for(input)?,
            encoder: plugin_for(output)?,
        })
    }
}

fn plugin_for(dlt: DltType) -> Result<Box<dyn DltPlugin>, EditError> {
    Ok(match dlt {
        DltType::Null => Box::new(null::NullPlugin),
        DltType::Ethernet => Box::new(ethernet::EthernetPlugin),
        DltType::Raw => Box::new(raw::RawPlugin),
        DltType::Ieee80211 => Box::new(ieee80211::Ieee80211Plugin),
        DltType::LinuxSll => Box::new(linux_sll::LinuxSllPlugin),
    })
}
