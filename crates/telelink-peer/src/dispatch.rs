use bytes::BytesMut;
use telelink_frame::{Packet, PacketKind};
use telelink_schema::{decode_announcement, RecordCodec};
use tracing::{debug, warn};

use crate::error::{PeerError, Result};

/// Routes reassembled packets by kind.
///
/// Reports replace the latest inbound record; schema announcements replace
/// the codec's schema. The `updated` flag is cleared when read, `synced`
/// stays set once the first announcement is applied.
#[derive(Debug, Default)]
pub struct Dispatcher {
    latest: BytesMut,
    updated: bool,
    synced: bool,
}

impl Dispatcher {
    /// Create a dispatcher with an empty latest record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one packet.
    ///
    /// A report larger than the record capacity, or a malformed
    /// announcement, is returned as an error and leaves the latest record,
    /// the schema and both flags untouched.
    pub fn dispatch(&mut self, packet: &Packet, codec: &mut RecordCodec) -> Result<()> {
        match packet.kind {
            PacketKind::Report => {
                let capacity = codec.config().record_capacity;
                if packet.payload.len() > capacity {
                    warn!(len = packet.payload.len(), capacity, "rejected oversized report");
                    return Err(PeerError::ReportTooLarge {
                        len: packet.payload.len(),
                        capacity,
                    });
                }
                self.latest.clear();
                self.latest.extend_from_slice(&packet.payload);
                self.updated = true;
                debug!(len = packet.payload.len(), "report received");
            }
            PacketKind::SchemaAnnounce => {
                let capacity = codec.config().record_capacity;
                let schema = decode_announcement(&packet.payload, capacity).inspect_err(|e| {
                    warn!(error = %e, "rejected schema announcement");
                })?;
                codec.replace_schema(schema)?;
                self.synced = true;
            }
        }
        Ok(())
    }

    /// Returns true once per received report.
    pub fn take_updated(&mut self) -> bool {
        std::mem::take(&mut self.updated)
    }

    /// Returns true if any schema announcement was applied.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// Payload of the most recent report, empty before the first one.
    pub fn latest_record(&self) -> &[u8] {
        &self.latest
    }
}
