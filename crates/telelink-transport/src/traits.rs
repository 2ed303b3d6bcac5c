use crate::error::Result;

/// Largest frame the radio transport accepts, header included.
pub const MAX_FRAME_LEN: usize = 255;

/// Destination for outbound transport frames.
///
/// A sink must not reorder or duplicate frames. It may lose them: the
/// protocol detects loss through sequence numbers and never retransmits.
///
/// A radio driver callback can be wrapped in [`FnSink`]:
///
/// ```
/// use telelink_transport::{FnSink, FrameSink};
///
/// let mut sent = Vec::new();
/// let mut sink = FnSink(|frame: &[u8]| -> telelink_transport::Result<()> {
///     sent.push(frame.to_vec());
///     Ok(())
/// });
/// sink.transmit(&[0, 0, 1, 0, 42]).unwrap();
/// drop(sink);
/// assert_eq!(sent.len(), 1);
/// ```
pub trait FrameSink {
    /// Push one complete frame onto the transport (blocking).
    fn transmit(&mut self, frame: &[u8]) -> Result<()>;

    /// Largest frame this sink accepts.
    fn max_frame_len(&self) -> usize {
        MAX_FRAME_LEN
    }
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn transmit(&mut self, frame: &[u8]) -> Result<()> {
        (**self).transmit(frame)
    }

    fn max_frame_len(&self) -> usize {
        (**self).max_frame_len()
    }
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn transmit(&mut self, frame: &[u8]) -> Result<()> {
        (**self).transmit(frame)
    }

    fn max_frame_len(&self) -> usize {
        (**self).max_frame_len()
    }
}

/// Adapts a `FnMut(&[u8]) -> Result<()>` callback into a [`FrameSink`].
pub struct FnSink<F>(pub F);

impl<F> FrameSink for FnSink<F>
where
    F: FnMut(&[u8]) -> Result<()>,
{
    fn transmit(&mut self, frame: &[u8]) -> Result<()> {
        (self.0)(frame)
    }
}

impl<F> std::fmt::Debug for FnSink<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSink").finish_non_exhaustive()
    }
}
