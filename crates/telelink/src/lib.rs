//! Telemetry packetization and schema sync over small radio frames.
//!
//! telelink moves fixed-layout telemetry records across links whose frames
//! top out at 255 bytes (LoRa and similar). The sender declares named,
//! typed fields, announces the layout once, then streams raw records; the
//! receiver learns the layout from the announcement and reads fields back
//! by name.
//!
//! # Crate Structure
//!
//! - [`transport`] - Frame sink abstraction (in-memory loopback, `io::Write`)
//! - [`frame`] - 4-byte headers, segmentation and sequence-checked reassembly
//! - [`schema`] - Field tables, typed field codec, schema announcements
//!   (behind `schema` feature)
//! - [`peer`] - Packet dispatch and the application-facing [`peer::Link`]
//!   (behind `peer` feature)

/// Re-export transport types.
pub mod transport {
    pub use telelink_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use telelink_frame::*;
}

/// Re-export schema types (requires `schema` feature).
#[cfg(feature = "schema")]
pub mod schema {
    pub use telelink_schema::*;
}

/// Re-export peer types (requires `peer` feature).
#[cfg(feature = "peer")]
pub mod peer {
    pub use telelink_peer::*;
}
