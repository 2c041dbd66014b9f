//! `tcpedit-rs`: an engine for rewriting link, network, and transport
//! header fields in captured packets while preserving wire format
//! (counters, checksums, and lengths stay internally consistent across an
//! edit). See [`Editor`] for the entry point and [`SessionConfig`] for the
//! surface a front-end builds to configure one.
//!
//! ```no_run
//! use tcpedit_rs::{Direction, Editor, PacketRecord, Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig::default()).expect("unsupported DLT pair");
//! session.validate();
//!
//! let mut packet = PacketRecord::new(0, 0, 64, vec![0u8; 64]);
//! let editor = Editor::new();
//! let _outcome = editor.edit(&mut session, &mut packet, Direction::ClientToServer);
//! ```

pub mod bitfield;
pub mod checksum;
pub mod config;
pub mod direction;
pub mod dlt;
pub mod editor;
pub mod error;
pub mod eth;
pub mod ip;
pub mod l3;
pub mod length;
pub mod packet;
pub mod randomizer;
pub mod rewrite;
pub mod session;
pub mod types;

pub use config::{
    AddressRewriteTable, ChecksumPolicy, Ipv4Cidr, Ipv4RewriteRule, Ipv6Cidr, Ipv6RewriteRule, LengthPolicy,
    PortMap, SessionConfig, TtlMode, TtlRule,
};
pub use direction::Direction;
pub use dlt::{DltContext, DltPlugin, DltType, EncodeResult, L3Proto};
pub use editor::Editor;
pub use error::{ChecksumResult, EditError, EditOutcome, SourceLocation};
pub use packet::PacketRecord;
pub use session::{Counters, Session};
