//! Structured error/outcome types.
//!
//! The original tcpedit exposes a single latched error string and a single
//! latched warning string per session (`tcpedit_geterr`/`tcpedit_getwarn`),
//! overwritten on every failure. [`EditError`] replaces that with a
//! structured enum; [`crate::session::Session::get_error`] and
//! [`crate::session::Session::get_warning`] render the last one back to a
//! `String` for callers that just want the old latched-string view.

use std::fmt;
use std::panic::Location;

/// A fatal or soft failure produced while editing one packet.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EditError {
    /// This packet cannot be edited (e.g. an 802.11 management frame); the
    /// session continues, but this packet should be dropped.
    #[error("{message} ({location})")]
    SoftError {
        message: String,
        location: SourceLocation,
    },
    /// A fatal condition; the caller decides whether to abort the session.
    #[error("{message} ({location})")]
    Fatal {
        message: String,
        location: SourceLocation,
    },
}

impl EditError {
    #[track_caller]
    pub fn soft(message: impl Into<String>) -> EditError {
        EditError::SoftError {
            message: message.into(),
            location: SourceLocation::caller(),
        }
    }

    #[track_caller]
    pub fn fatal(message: impl Into<String>) -> EditError {
        EditError::Fatal {
            message: message.into(),
            location: SourceLocation::caller(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            EditError::SoftError { message, .. } => message,
            EditError::Fatal { message, .. } => message,
        }
    }
}

/// `(function/file, line)` provenance, standing in for the original's
/// hand-assembled `__FUNCTION__:__LINE__` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    #[track_caller]
    pub fn caller() -> SourceLocation {
        let loc: &Location<'static> = Location::caller();
        SourceLocation {
            file: loc.file(),
            line: loc.line(),
            column: loc.column(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Result of the checksum kernel for a single span.
#[derive(Debug, Clone)]
pub enum ChecksumResult {
    Ok,
    /// Packet was shorter than its own declared length; checksum was
    /// computed only over the captured bytes.
    Warn(String),
    /// The header could not be parsed well enough to checksum at all
    /// (e.g. a declared length that doesn't fit the captured bytes).
    /// Fatal: spec.md §7 treats checksum errors as fatal for the packet.
    Err(EditError),
}

/// Outcome of [`crate::editor::Editor::edit`] for one packet.
#[derive(Debug, Clone)]
pub enum EditOutcome {
    /// Packet returned byte-identical.
    Unchanged,
    /// Packet returned, lengths possibly updated.
    Changed,
    /// This packet should be skipped; the session continues.
    Drop,
    /// Fatal for this packet; `Session`'s error string is latched too.
    Error(EditError),
}

impl EditOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, EditOutcome::Error(_))
    }

    pub fn is_drop(&self) -> bool {
        matches!(self, EditOutcome::Drop)
    }
}
