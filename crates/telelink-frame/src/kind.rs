//! Packet kind tags.
//!
//! The kind occupies the low nibble of header byte 1, so at most 16 kinds
//! exist. Only two are defined.

use crate::error::FrameError;

/// What a logical packet carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketKind {
    /// Field values laid out per the sender's schema.
    Report = 0,
    /// The sender's field-name list, for schema synchronization.
    SchemaAnnounce = 1,
}

impl PacketKind {
    /// Wire tag of this kind.
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Returns a human-readable name for this kind.
    pub const fn name(self) -> &'static str {
        match self {
            PacketKind::Report => "REPORT",
            PacketKind::SchemaAnnounce => "SCHEMA_ANNOUNCE",
        }
    }
}

impl TryFrom<u8> for PacketKind {
    type Error = FrameError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(PacketKind::Report),
            1 => Ok(PacketKind::SchemaAnnounce),
            other => Err(FrameError::UnknownKind(other)),
        }
    }
}

impl std::fmt::Display for PacketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
