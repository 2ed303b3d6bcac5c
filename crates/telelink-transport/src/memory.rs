use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use tracing::trace;

use crate::error::{Result, TransportError};
use crate::traits::{FrameSink, MAX_FRAME_LEN};

type Queue = Arc<Mutex<VecDeque<Bytes>>>;

/// Create a connected in-memory sink and the tap that observes it.
///
/// Frames transmitted through the sink queue up in order until the tap
/// drains them, typically to feed them into the receiving side of a
/// loopback link.
pub fn memory_sink() -> (MemorySink, FrameTap) {
    let queue = Queue::default();
    (
        MemorySink {
            queue: Arc::clone(&queue),
            max_frame_len: MAX_FRAME_LEN,
            closed: false,
        },
        FrameTap { queue },
    )
}

/// Sink that records every frame in memory.
#[derive(Debug)]
pub struct MemorySink {
    queue: Queue,
    max_frame_len: usize,
    closed: bool,
}

impl MemorySink {
    /// Override the frame size limit enforced by this sink.
    pub fn set_max_frame_len(&mut self, max_frame_len: usize) {
        self.max_frame_len = max_frame_len;
    }

    /// Refuse all further frames with `TransportError::Closed`.
    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl FrameSink for MemorySink {
    fn transmit(&mut self, frame: &[u8]) -> Result<()> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        if frame.len() > self.max_frame_len {
            return Err(TransportError::FrameTooLarge {
                len: frame.len(),
                max: self.max_frame_len,
            });
        }

        trace!(len = frame.len(), "memory sink recorded frame");
        lock(&self.queue).push_back(Bytes::copy_from_slice(frame));
        Ok(())
    }

    fn max_frame_len(&self) -> usize {
        self.max_frame_len
    }
}

/// Read side of a [`MemorySink`].
#[derive(Debug, Clone)]
pub struct FrameTap {
    queue: Queue,
}

impl FrameTap {
    /// Remove and return every queued frame, oldest first.
    pub fn drain(&self) -> Vec<Bytes> {
        lock(&self.queue).drain(..).collect()
    }

    /// Remove and return the oldest queued frame.
    pub fn pop(&self) -> Option<Bytes> {
        lock(&self.queue).pop_front()
    }

    /// Number of frames waiting in the queue.
    pub fn len(&self) -> usize {
        lock(&self.queue).len()
    }

    /// Returns true if no frames are queued.
    pub fn is_empty(&self) -> bool {
        lock(&self.queue).is_empty()
    }
}

// A poisoned queue still holds valid frames; keep using it.
fn lock(queue: &Queue) -> MutexGuard<'_, VecDeque<Bytes>> {
    queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
