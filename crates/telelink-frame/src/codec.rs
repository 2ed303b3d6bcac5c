use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};
use crate::kind::PacketKind;

/// Frame header: seq (1) + kind/flags (1) + length or lead seq (2) = 4 bytes.
pub const HEADER_SIZE: usize = 4;

/// Largest frame on the wire, header included.
pub const MAX_FRAME_LEN: usize = telelink_transport::MAX_FRAME_LEN;

/// Payload bytes carried by one full frame.
pub const FRAGMENT_PAYLOAD: usize = MAX_FRAME_LEN - HEADER_SIZE;

/// Fragments one logical packet may span before the mod-256 back-reference
/// aliases.
pub const MAX_FRAGMENTS: usize = 256;

/// Hard upper bound on a logical packet: 256 fragments of 251 bytes.
pub const MAX_PACKET_LEN: usize = MAX_FRAGMENTS * FRAGMENT_PAYLOAD;

/// Default bound on a logical packet: 16 KiB.
pub const DEFAULT_MAX_PACKET_LEN: usize = 16 * 1024;

const CONTINUATION_BIT: u8 = 0x10;
const KIND_MASK: u8 = 0x0F;

/// Meaning of header bytes 2-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    /// Leading frame: total logical packet length, little-endian.
    Length(u16),
    /// Continuation frame: sequence number of the leading frame (byte 3).
    LeadSeq(u8),
}

/// Decoded 4-byte frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Rolling per-frame sequence number.
    pub seq: u8,
    /// What the logical packet carries.
    pub kind: PacketKind,
    /// Length on leading frames, back-reference on continuation frames.
    pub field: HeaderField,
}

impl FrameHeader {
    /// Header of the first frame of a packet.
    pub fn leading(seq: u8, kind: PacketKind, length: u16) -> Self {
        Self {
            seq,
            kind,
            field: HeaderField::Length(length),
        }
    }

    /// Header of a later frame of the packet that started at `lead_seq`.
    pub fn continuation(seq: u8, kind: PacketKind, lead_seq: u8) -> Self {
        Self {
            seq,
            kind,
            field: HeaderField::LeadSeq(lead_seq),
        }
    }

    /// Returns true if this frame continues an earlier one.
    pub fn is_continuation(&self) -> bool {
        matches!(self.field, HeaderField::LeadSeq(_))
    }
}

/// Encode a frame header into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────┬─────────────────────┬──────────────────────────────┐
/// │ Seq (1B) │ Kind | Cont<<4 (1B) │ Length (2B LE)   leading     │
/// │          │                     │ 0, LeadSeq (1B)  continuation│
/// └──────────┴─────────────────────┴──────────────────────────────┘
/// ```
pub fn encode_header(header: &FrameHeader, dst: &mut BytesMut) {
    dst.reserve(HEADER_SIZE);
    dst.put_u8(header.seq);
    match header.field {
        HeaderField::Length(length) => {
            dst.put_u8(header.kind.tag());
            dst.put_u16_le(length);
        }
        HeaderField::LeadSeq(lead_seq) => {
            dst.put_u8(header.kind.tag() | CONTINUATION_BIT);
            dst.put_u8(0);
            dst.put_u8(lead_seq);
        }
    }
}

/// Decode the header at the start of a frame.
///
/// Bits 5-7 of byte 1 are reserved and ignored.
pub fn decode_header(frame: &[u8]) -> Result<FrameHeader> {
    let &[seq, flags, b2, b3, ..] = frame else {
        return Err(FrameError::FrameTooShort { len: frame.len() });
    };

    let kind = PacketKind::try_from(flags & KIND_MASK)?;
    let field = if flags & CONTINUATION_BIT != 0 {
        HeaderField::LeadSeq(b3)
    } else {
        HeaderField::Length(u16::from_le_bytes([b2, b3]))
    };

    Ok(FrameHeader { seq, kind, field })
}

/// Configuration shared by the segmenter and the reassembler.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Largest logical packet accepted either way. Default: 16 KiB,
    /// never above [`MAX_PACKET_LEN`].
    pub max_packet_len: usize,
}

impl FrameConfig {
    /// Effective packet bound after clamping to the protocol limit.
    pub fn packet_limit(&self) -> usize {
        self.max_packet_len.min(MAX_PACKET_LEN)
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_packet_len: DEFAULT_MAX_PACKET_LEN,
        }
    }
}
