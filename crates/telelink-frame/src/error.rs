use telelink_transport::TransportError;

/// Errors that can occur while segmenting or reassembling packets.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A continuation frame arrived out of order (expected on lossy links).
    #[error("sequence gap (expected {expected}, got {actual})")]
    SequenceGap { expected: u8, actual: u8 },

    /// A frame would write past the configured reassembly bound.
    #[error("reassembly overflow ({needed} bytes, max {max})")]
    ReassemblyOverflow { needed: usize, max: usize },

    /// A frame exceeds the transport frame limit.
    #[error("frame too large ({len} bytes, max {max})")]
    FrameTooLarge { len: usize, max: usize },

    /// A frame is too short to hold a header.
    #[error("frame too short ({len} bytes, header is 4)")]
    FrameTooShort { len: usize },

    /// A logical packet exceeds the configured maximum packet length.
    #[error("packet too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The header carries a packet kind tag this side does not know.
    #[error("unknown packet kind tag {0:#x}")]
    UnknownKind(u8),

    /// A continuation frame does not belong to the packet being reassembled.
    #[error("continuation frame {seq} does not match packet in flight")]
    UnexpectedContinuation { seq: u8 },

    /// The frame body disagrees with its header.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// The frame sink failed.
    #[error("sink error: {0}")]
    Sink(TransportError),
}

impl FrameError {
    /// Returns true for errors that ordinary frame loss produces.
    ///
    /// Callers normally drop such frames silently; the reassembler resyncs on
    /// the next leading frame.
    pub fn is_gap(&self) -> bool {
        matches!(
            self,
            FrameError::SequenceGap { .. } | FrameError::UnexpectedContinuation { .. }
        )
    }
}

impl From<TransportError> for FrameError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::FrameTooLarge { len, max } => FrameError::FrameTooLarge { len, max },
            other => FrameError::Sink(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
