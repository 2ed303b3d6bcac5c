/// Default record buffer capacity in bytes.
pub const DEFAULT_RECORD_CAPACITY: usize = 512;

/// Default bound on the encoded schema announcement, matching the default
/// frame-layer packet limit.
pub const DEFAULT_MAX_ANNOUNCEMENT_LEN: usize = 16 * 1024;

/// Controls record sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaConfig {
    /// Maximum total width of all declared fields.
    pub record_capacity: usize,
    /// Maximum size of the announcement payload the schema encodes to.
    /// Declarations that would exceed it are refused.
    pub max_announcement_len: usize,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            record_capacity: DEFAULT_RECORD_CAPACITY,
            max_announcement_len: DEFAULT_MAX_ANNOUNCEMENT_LEN,
        }
    }
}
