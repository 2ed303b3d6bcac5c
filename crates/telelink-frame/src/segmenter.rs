use bytes::{BufMut, BytesMut};
use telelink_transport::FrameSink;
use tracing::{debug, trace};

use crate::codec::{encode_header, FrameConfig, FrameHeader, FRAGMENT_PAYLOAD, MAX_FRAME_LEN};
use crate::error::{FrameError, Result};
use crate::kind::PacketKind;

/// Splits logical packets into sequence-numbered frames and pushes them
/// into a sink.
///
/// The sequence number advances once per frame, not per packet, and wraps
/// mod 256.
pub struct FrameSegmenter<S> {
    inner: S,
    buf: BytesMut,
    next_seq: u8,
    config: FrameConfig,
}

impl<S: FrameSink> FrameSegmenter<S> {
    /// Create a new segmenter with default configuration.
    pub fn new(inner: S) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new segmenter with explicit configuration.
    pub fn with_config(inner: S, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(MAX_FRAME_LEN),
            next_seq: 0,
            config,
        }
    }

    /// Segment a payload and transmit every frame (blocking).
    ///
    /// Returns the number of frames handed to the sink. A packet shorter
    /// than one fragment goes out as a single frame; longer packets go out
    /// as full 255-byte frames followed by one short frame for any
    /// remainder. If the sink fails mid-packet the frames already sent stay
    /// sent; nothing is retried.
    pub fn send(&mut self, kind: PacketKind, payload: &[u8]) -> Result<usize> {
        let limit = self.config.packet_limit();
        if payload.len() > limit {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max: limit,
            });
        }
        // Bounded by MAX_PACKET_LEN, which fits in u16.
        let length = payload.len() as u16;

        let lead_seq = self.next_seq;
        let mut frames = 0usize;
        let mut chunks = payload.chunks(FRAGMENT_PAYLOAD);

        let first = chunks.next().unwrap_or_default();
        self.transmit(FrameHeader::leading(lead_seq, kind, length), first)?;
        frames += 1;

        for chunk in chunks {
            let seq = self.next_seq;
            self.transmit(FrameHeader::continuation(seq, kind, lead_seq), chunk)?;
            frames += 1;
        }

        debug!(%kind, len = payload.len(), frames, lead_seq, "packet segmented");
        Ok(frames)
    }

    fn transmit(&mut self, header: FrameHeader, body: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_header(&header, &mut self.buf);
        self.buf.put_slice(body);

        let max = self.inner.max_frame_len();
        if self.buf.len() > max {
            return Err(FrameError::FrameTooLarge {
                len: self.buf.len(),
                max,
            });
        }

        self.next_seq = self.next_seq.wrapping_add(1);
        trace!(seq = header.seq, len = self.buf.len(), "transmitting frame");
        self.inner.transmit(&self.buf)?;
        Ok(())
    }

    /// Sequence number the next frame will carry.
    pub fn next_seq(&self) -> u8 {
        self.next_seq
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Mutably borrow the underlying sink.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consume the segmenter and return the inner sink.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Update maximum packet length for subsequent sends.
    pub fn set_max_packet_len(&mut self, max_packet_len: usize) {
        self.config.max_packet_len = max_packet_len;
    }

    /// Current segmenter configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl<S> std::fmt::Debug for FrameSegmenter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSegmenter")
            .field("next_seq", &self.next_seq)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
