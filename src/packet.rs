//! The transient, per-call packet record.

/// A capture record: header plus the owned, mutable byte buffer.
///
/// `bytes.len()` is always the current captured length; `wire_len` may
/// legitimately exceed it (a truncated capture: the original packet on
/// the wire was longer than what was captured). Captured length must
/// never exceed wire length after an edit: `wire_len >= bytes.len()` is
/// maintained by [`PacketRecord::apply_len_delta`].
#[derive(Debug, Clone)]
pub struct PacketRecord {
    pub timestamp_sec: i64,
    pub timestamp_usec: i64,
    pub wire_len: usize,
    pub bytes: Vec<u8>,
}

impl PacketRecord {
    pub fn new(timestamp_sec: i64, timestamp_usec: i64, wire_len: usize, bytes: Vec<u8>) -> PacketRecord {
        PacketRecord {
            timestamp_sec,
            timestamp_usec,
            wire_len,
            bytes,
        }
    }

    pub fn captured_len(&self) -> usize {
        self.bytes.len()
    }

    /// Applies a length delta to both captured and wire length together,
    /// keeping them in lockstep for any buffer resize (e.g. the L2
    /// rewrite stage growing/shrinking the link header).
    pub fn apply_len_delta(&mut self, delta: isize) {
        if delta >= 0 {
            self.wire_len += delta as usize;
        } else {
            self.wire_len = self.wire_len.saturating_sub((-delta) as usize);
        }
    }
}
