//! Sequence-numbered segmentation and reassembly over 255-byte radio frames.
//!
//! This is the core value-add layer of telelink. Every logical packet is cut
//! into frames of at most 255 bytes, each carrying a 4-byte header:
//! - A 1-byte rolling sequence number (one per frame, wraps mod 256)
//! - A packet kind nibble plus a continuation flag
//! - The total packet length (leading frame) or the sequence number of the
//!   leading frame (continuation frames)
//!
//! Fragment position is derived from sequence distance, so no per-frame
//! offset field is needed.

pub mod codec;
pub mod error;
pub mod kind;
pub mod reassembler;
pub mod segmenter;

pub use codec::{
    decode_header, encode_header, FrameConfig, FrameHeader, HeaderField, DEFAULT_MAX_PACKET_LEN,
    FRAGMENT_PAYLOAD, HEADER_SIZE, MAX_FRAGMENTS, MAX_FRAME_LEN, MAX_PACKET_LEN,
};
pub use error::{FrameError, Result};
pub use kind::PacketKind;
pub use reassembler::{FrameReassembler, Packet};
pub use segmenter::FrameSegmenter;
