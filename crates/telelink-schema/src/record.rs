use std::ops::Range;

use bytes::BytesMut;

/// Zero-initialised record storage with a fixed capacity.
///
/// The buffer is allocated once at full capacity; field writes are
/// bounds-checked against it and never grow it.
pub struct RecordBuffer {
    buf: BytesMut,
}

impl RecordBuffer {
    /// Allocate a zeroed buffer of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: BytesMut::zeroed(capacity),
        }
    }

    /// Size of the buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Mutable view of `range`, or `None` if it falls outside the buffer.
    pub fn slot_mut(&mut self, range: Range<usize>) -> Option<&mut [u8]> {
        self.buf.get_mut(range)
    }

    /// The first `len` bytes, clamped to the capacity.
    pub fn prefix(&self, len: usize) -> &[u8] {
        &self.buf[..len.min(self.buf.len())]
    }

    /// Zero-fill the whole buffer.
    pub fn clear(&mut self) {
        self.buf.fill(0);
    }
}

impl std::fmt::Debug for RecordBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordBuffer")
            .field("capacity", &self.capacity())
            .finish()
    }
}
