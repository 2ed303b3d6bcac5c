use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::codec::{
    decode_header, FrameConfig, HeaderField, FRAGMENT_PAYLOAD, HEADER_SIZE, MAX_FRAME_LEN,
};
use crate::error::{FrameError, Result};
use crate::kind::PacketKind;

/// A fully reassembled logical packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// What the packet carries.
    pub kind: PacketKind,
    /// The logical payload, exactly as segmented by the sender.
    pub payload: Bytes,
}

/// Reassembly state for the single in-flight packet.
///
/// ```text
/// +------+  leading (len > 251)  +--------------+
/// | Idle |---------------------->| Accumulating |
/// +------+                       +--------------+
///    ^  |                          |        |
///    |  | leading (len <= 251)     | last   | new leading frame
///    |  v                          | frame  | (abandons packet)
///    +-- complete <----------------+        v
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReassemblyState {
    Idle,
    Accumulating {
        kind: PacketKind,
        lead_seq: u8,
        declared_len: usize,
    },
}

/// Rebuilds logical packets from inbound frames.
///
/// Continuation frames are accepted only in sequence order. A leading frame
/// is always accepted and becomes the new synchronization point, which is
/// how the receiver heals after silent frame loss.
#[derive(Debug)]
pub struct FrameReassembler {
    state: ReassemblyState,
    buf: BytesMut,
    expected_seq: u8,
    config: FrameConfig,
}

impl FrameReassembler {
    /// Create a new reassembler with default configuration.
    pub fn new() -> Self {
        Self::with_config(FrameConfig::default())
    }

    /// Create a new reassembler with explicit configuration.
    pub fn with_config(config: FrameConfig) -> Self {
        Self {
            state: ReassemblyState::Idle,
            buf: BytesMut::new(),
            expected_seq: 0,
            config,
        }
    }

    /// Feed one inbound frame.
    ///
    /// Returns `Ok(Some(packet))` when the frame completes a packet and
    /// `Ok(None)` when more frames are needed. A rejected frame leaves the
    /// reassembler untouched.
    pub fn push_frame(&mut self, frame: &[u8]) -> Result<Option<Packet>> {
        if frame.len() > MAX_FRAME_LEN {
            return Err(FrameError::FrameTooLarge {
                len: frame.len(),
                max: MAX_FRAME_LEN,
            });
        }
        let header = decode_header(frame)?;
        let body = &frame[HEADER_SIZE..];

        let completed = match header.field {
            HeaderField::Length(length) => {
                self.accept_leading(header.kind, header.seq, length, body)?
            }
            HeaderField::LeadSeq(lead_seq) => {
                if header.seq != self.expected_seq {
                    return Err(FrameError::SequenceGap {
                        expected: self.expected_seq,
                        actual: header.seq,
                    });
                }
                self.accept_continuation(header.kind, header.seq, lead_seq, body)?
            }
        };

        self.expected_seq = header.seq.wrapping_add(1);
        Ok(completed)
    }

    fn accept_leading(
        &mut self,
        kind: PacketKind,
        seq: u8,
        length: u16,
        body: &[u8],
    ) -> Result<Option<Packet>> {
        let declared_len = usize::from(length);
        let limit = self.config.packet_limit();
        if declared_len > limit {
            return Err(FrameError::ReassemblyOverflow {
                needed: declared_len,
                max: limit,
            });
        }

        let first_len = declared_len.min(FRAGMENT_PAYLOAD);
        if body.len() != first_len {
            return Err(FrameError::MalformedFrame(format!(
                "leading frame carries {} bytes, header declares {first_len}",
                body.len()
            )));
        }

        if let ReassemblyState::Accumulating { lead_seq, .. } = self.state {
            debug!(lead_seq, new_lead = seq, "abandoning incomplete packet");
        }

        if self.buf.len() < declared_len {
            self.buf.resize(declared_len, 0);
        }
        self.buf[..first_len].copy_from_slice(body);

        if declared_len <= FRAGMENT_PAYLOAD {
            self.state = ReassemblyState::Idle;
            return Ok(Some(self.complete(kind, declared_len)));
        }

        trace!(seq, declared_len, "leading frame accepted");
        self.state = ReassemblyState::Accumulating {
            kind,
            lead_seq: seq,
            declared_len,
        };
        Ok(None)
    }

    fn accept_continuation(
        &mut self,
        kind: PacketKind,
        seq: u8,
        back_ref: u8,
        body: &[u8],
    ) -> Result<Option<Packet>> {
        let ReassemblyState::Accumulating {
            kind: expected_kind,
            lead_seq,
            declared_len,
        } = self.state
        else {
            return Err(FrameError::UnexpectedContinuation { seq });
        };
        if back_ref != lead_seq || kind != expected_kind {
            return Err(FrameError::UnexpectedContinuation { seq });
        }

        let index = usize::from(seq.wrapping_sub(lead_seq));
        if index == 0 {
            return Err(FrameError::MalformedFrame(
                "continuation frame shares the leading sequence number".to_string(),
            ));
        }
        if body.is_empty() {
            return Err(FrameError::MalformedFrame(
                "continuation frame without payload".to_string(),
            ));
        }

        let start = index * FRAGMENT_PAYLOAD;
        let end = start + body.len();
        if end > declared_len {
            return Err(FrameError::ReassemblyOverflow {
                needed: end,
                max: declared_len,
            });
        }
        self.buf[start..end].copy_from_slice(body);
        trace!(seq, index, received = end, declared_len, "continuation frame accepted");

        if end == declared_len {
            self.state = ReassemblyState::Idle;
            return Ok(Some(self.complete(kind, declared_len)));
        }
        Ok(None)
    }

    fn complete(&mut self, kind: PacketKind, len: usize) -> Packet {
        debug!(%kind, len, "packet reassembled");
        Packet {
            kind,
            payload: Bytes::copy_from_slice(&self.buf[..len]),
        }
    }

    /// Sequence number an in-order continuation frame must carry.
    pub fn expected_seq(&self) -> u8 {
        self.expected_seq
    }

    /// Returns true if no packet is partially reassembled.
    pub fn is_idle(&self) -> bool {
        self.state == ReassemblyState::Idle
    }

    /// Abandon any partially reassembled packet.
    ///
    /// The sequence counter is kept; the next leading frame resyncs anyway.
    pub fn reset(&mut self) {
        self.state = ReassemblyState::Idle;
    }

    /// Update the reassembly bound for subsequent packets.
    pub fn set_max_packet_len(&mut self, max_packet_len: usize) {
        self.config.max_packet_len = max_packet_len;
    }

    /// Current reassembler configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl Default for FrameReassembler {
    fn default() -> Self {
        Self::new()
    }
}
