/// Errors that can occur in link operations.
#[derive(Debug, thiserror::Error)]
pub enum PeerError {
    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] telelink_frame::FrameError),

    /// Schema or field access error.
    #[error("schema error: {0}")]
    Schema(#[from] telelink_schema::SchemaError),

    /// A report does not fit the receiver's record capacity.
    #[error("report too large ({len} bytes, record capacity {capacity})")]
    ReportTooLarge { len: usize, capacity: usize },
}

pub type Result<T> = std::result::Result<T, PeerError>;
