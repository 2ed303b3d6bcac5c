use std::io::{ErrorKind, Write};

use tracing::trace;

use crate::error::{Result, TransportError};
use crate::traits::{FrameSink, MAX_FRAME_LEN};

/// Writes each frame whole to a blocking `Write` stream.
///
/// Frame boundaries are not marked on the stream; the receiving side must
/// know them from its own link layer (one radio packet per frame).
pub struct WriteSink<W> {
    inner: W,
    max_frame_len: usize,
}

impl<W: Write> WriteSink<W> {
    /// Wrap a stream with the default 255-byte frame limit.
    pub fn new(inner: W) -> Self {
        Self::with_max_frame_len(inner, MAX_FRAME_LEN)
    }

    /// Wrap a stream with an explicit frame limit.
    pub fn with_max_frame_len(inner: W, max_frame_len: usize) -> Self {
        Self {
            inner,
            max_frame_len,
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Consume the sink and return the inner stream.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }
}

impl<W: Write> FrameSink for WriteSink<W> {
    fn transmit(&mut self, frame: &[u8]) -> Result<()> {
        if frame.len() > self.max_frame_len {
            return Err(TransportError::FrameTooLarge {
                len: frame.len(),
                max: self.max_frame_len,
            });
        }

        let mut offset = 0usize;
        while offset < frame.len() {
            match self.inner.write(&frame[offset..]) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }

        trace!(len = frame.len(), "frame written to stream");
        self.flush()
    }

    fn max_frame_len(&self) -> usize {
        self.max_frame_len
    }
}

impl<W> std::fmt::Debug for WriteSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteSink")
            .field("max_frame_len", &self.max_frame_len)
            .finish_non_exhaustive()
    }
}
