use telelink_frame::FrameConfig;
use telelink_schema::SchemaConfig;

/// Configuration for a [`crate::Link`].
#[derive(Debug, Clone, Default)]
pub struct LinkConfig {
    /// Packet size bound for segmentation and reassembly.
    pub frame: FrameConfig,
    /// Record capacity for declared and learned schemas.
    pub schema: SchemaConfig,
}
