//! Per-run session state: immutable configuration plus
//! mutable runtime counters and the latched error/warning slots.

use crate::config::SessionConfig;
use crate::dlt::DltContext;
use crate::error::EditError;

/// Packet/byte counters accumulated over a session's lifetime.
#[derive(Debug, Clone, Copy, Default)]
pub struct Counters {
    pub packet_number: u64,
    pub pkts_edited: u64,
    pub total_bytes: u64,
}

/// One editing run. Not safe for concurrent use from multiple threads
/// — callers needing parallelism construct one `Session` per
/// thread; ordinary `&mut` borrowing through this API already prevents
/// concurrent misuse without needing to weaken auto `Send`/`Sync`.
#[derive(Debug)]
pub struct Session {
    pub config: SessionConfig,
    pub dlt_ctx: DltContext,
    pub counters: Counters,
    validated: bool,
    error: Option<EditError>,
    warning: Option<String>,
}

impl Session {
    /// Acquires the DLT plugin pair for `config`. Opening a session with
    /// an unsupported link-type fails here, at init, not at the first
    /// packet.
    pub fn new(config: SessionConfig) -> Result<Session, EditError> {
        let dlt_ctx = DltContext::translating(config.input_dlt, config.output_dlt)?;
        Ok(Session {
            config,
            dlt_ctx,
            counters: Counters::default(),
            validated: false,
            error: None,
            warning: None,
        })
    }

    /// Required barrier before any packet may be edited. Currently a
    /// no-op beyond setting the flag; kept as a separate seam from `new`
    /// for future rules (e.g. verifying the DLT pair is realizable).
    pub fn validate(&mut self) {
        self.validated = true;
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }

    pub(crate) fn latch_error(&mut self, error: EditError) {
        tracing::warn!(message = %error.message(), "tcpedit error latched");
        self.error = Some(error);
    }

    pub(crate) fn latch_warning(&mut self, warning: impl Into<String>) {
        let warning = warning.into();
        tracing::debug!(message = %warning, "tcpedit warning latched");
        self.warning = Some(warning);
    }

    /// Renders the last latched error, the structured-replacement's
    /// latched-string view.
    pub fn get_error(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }

    /// Renders the last latched warning; overwritten on each new warning
    ///.
    pub fn get_warning(&self) -> Option<String> {
        self.warning.clone()
    }
}
