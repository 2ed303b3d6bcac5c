use telelink_frame::{FrameReassembler, FrameSegmenter, PacketKind};
use telelink_schema::{
    encode_announcement, DecodeField, EncodeField, FieldDescriptor, FieldType, RecordCodec, Schema,
};
use telelink_transport::FrameSink;
use tracing::{debug, info};

use crate::config::LinkConfig;
use crate::dispatch::Dispatcher;
use crate::error::Result;

/// What happened to an inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Accepted; the packet needs more frames.
    Buffered,
    /// Completed and applied a packet of this kind.
    Dispatched(PacketKind),
    /// Discarded as out of sequence. The link resyncs on the next packet.
    Dropped,
}

/// One end of a telemetry link.
///
/// The same type serves both roles: a sender declares fields, fills the
/// outbound record and calls [`Link::send_record`]; a receiver feeds every
/// radio frame to [`Link::on_frame_received`] and reads fields back from
/// the latest record once [`Link::is_synced`] reports a learned schema.
///
/// # Example
///
/// ```
/// use telelink_peer::Link;
/// use telelink_transport::memory_sink;
///
/// let (sink, tap) = memory_sink();
/// let mut sender = Link::new(sink);
/// sender.declare_field::<i32>("alt").unwrap();
/// sender.set_field("alt", &1234i32).unwrap();
/// sender.announce_schema().unwrap();
/// sender.send_record().unwrap();
///
/// let (unused, _) = memory_sink();
/// let mut receiver = Link::new(unused);
/// for frame in tap.drain() {
///     receiver.on_frame_received(&frame).unwrap();
/// }
/// assert!(receiver.is_synced());
/// assert!(receiver.is_updated());
/// assert_eq!(receiver.get_field::<i32>("alt").unwrap(), 1234);
/// ```
pub struct Link<S> {
    codec: RecordCodec,
    segmenter: FrameSegmenter<S>,
    reassembler: FrameReassembler,
    dispatcher: Dispatcher,
}

impl<S: FrameSink> Link<S> {
    /// Create a link with default configuration.
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, LinkConfig::default())
    }

    /// Create a link with explicit configuration.
    ///
    /// The schema's announcement bound is clamped to the frame packet limit
    /// so that any schema this link accepts can also be announced.
    pub fn with_config(sink: S, config: LinkConfig) -> Self {
        let mut schema = config.schema;
        schema.max_announcement_len = schema
            .max_announcement_len
            .min(config.frame.packet_limit());
        Self {
            codec: RecordCodec::with_config(schema),
            segmenter: FrameSegmenter::with_config(sink, config.frame.clone()),
            reassembler: FrameReassembler::with_config(config.frame),
            dispatcher: Dispatcher::new(),
        }
    }

    /// Declare a fixed-width field sized for `T`.
    pub fn declare_field<T: FieldType + ?Sized>(&mut self, name: &str) -> Result<&FieldDescriptor> {
        Ok(self.codec.declare_field::<T>(name)?)
    }

    /// Declare a text field holding at most `max_len` bytes.
    pub fn declare_text(&mut self, name: &str, max_len: usize) -> Result<&FieldDescriptor> {
        Ok(self.codec.declare_text(name, max_len)?)
    }

    /// Write a value into the outbound record.
    pub fn set_field<T: EncodeField + ?Sized>(&mut self, name: &str, value: &T) -> Result<()> {
        Ok(self.codec.set_field(name, value)?)
    }

    /// Read a field from the latest inbound record.
    pub fn get_field<T: DecodeField>(&self, name: &str) -> Result<T> {
        Ok(self
            .codec
            .get_field::<T>(self.dispatcher.latest_record(), name)?)
    }

    /// Zero-fill the outbound record.
    pub fn clear_record(&mut self) {
        self.codec.clear_record();
    }

    /// Current field table, declared locally or learned from the peer.
    pub fn schema(&self) -> &Schema {
        self.codec.schema()
    }

    /// Borrow the record codec.
    pub fn codec(&self) -> &RecordCodec {
        &self.codec
    }

    /// Payload of the most recent inbound report.
    pub fn latest_record(&self) -> &[u8] {
        self.dispatcher.latest_record()
    }

    /// Transmit the outbound record as a report. Returns the frame count.
    pub fn send_record(&mut self) -> Result<usize> {
        let record = self.codec.outbound_record();
        let frames = self.segmenter.send(PacketKind::Report, record)?;
        debug!(len = record.len(), frames, "record sent");
        Ok(frames)
    }

    /// Transmit the current schema as an announcement. Returns the frame
    /// count.
    pub fn announce_schema(&mut self) -> Result<usize> {
        let payload = encode_announcement(self.codec.schema());
        let frames = self.segmenter.send(PacketKind::SchemaAnnounce, &payload)?;
        info!(
            fields = self.codec.schema().len(),
            len = payload.len(),
            frames,
            "schema announced"
        );
        Ok(frames)
    }

    /// Feed one inbound radio frame.
    ///
    /// Out-of-sequence frames are expected on a lossy link; they are logged
    /// and reported as [`FrameOutcome::Dropped`] rather than as errors.
    pub fn on_frame_received(&mut self, frame: &[u8]) -> Result<FrameOutcome> {
        let packet = match self.reassembler.push_frame(frame) {
            Ok(Some(packet)) => packet,
            Ok(None) => return Ok(FrameOutcome::Buffered),
            Err(e) if e.is_gap() => {
                debug!(error = %e, "frame dropped");
                return Ok(FrameOutcome::Dropped);
            }
            Err(e) => return Err(e.into()),
        };

        self.dispatcher.dispatch(&packet, &mut self.codec)?;
        Ok(FrameOutcome::Dispatched(packet.kind))
    }

    /// Returns true once per received report.
    pub fn is_updated(&mut self) -> bool {
        self.dispatcher.take_updated()
    }

    /// Returns true once a schema announcement has been applied.
    pub fn is_synced(&self) -> bool {
        self.dispatcher.is_synced()
    }

    /// Get a reference to the underlying sink.
    pub fn get_ref(&self) -> &S {
        self.segmenter.get_ref()
    }

    /// Get a mutable reference to the underlying sink.
    pub fn get_mut(&mut self) -> &mut S {
        self.segmenter.get_mut()
    }

    /// Consume the link and return the sink.
    pub fn into_inner(self) -> S {
        self.segmenter.into_inner()
    }
}

impl<S> std::fmt::Debug for Link<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Link")
            .field("fields", &self.codec.schema().len())
            .field("synced", &self.dispatcher.is_synced())
            .field("reassembler", &self.reassembler)
            .finish_non_exhaustive()
    }
}
