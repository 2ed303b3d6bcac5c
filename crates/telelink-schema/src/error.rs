/// Errors that can occur while declaring, writing or reading fields.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A field with this name is already declared.
    #[error("field '{0}' already declared")]
    DuplicateField(String),

    /// No field with this name is declared.
    #[error("field '{0}' not declared")]
    UnknownField(String),

    /// The requested type's width differs from the declared slot width.
    #[error("type mismatch on field '{field}' (slot is {expected} bytes, type is {actual})")]
    TypeMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// A text value does not fit its slot.
    #[error("value for field '{field}' too long ({len} bytes, max {max})")]
    ValueTooLong {
        field: String,
        len: usize,
        max: usize,
    },

    /// The schema would no longer fit the record buffer.
    #[error("schema overflow at field '{field}' ({needed} bytes, capacity {capacity})")]
    SchemaOverflow {
        field: String,
        needed: usize,
        capacity: usize,
    },

    /// A field was declared with zero width (text fields need a max length).
    #[error("field '{0}' has zero width")]
    ZeroWidth(String),

    /// A variable-length type was declared without a slot width.
    #[error("field '{0}' has no fixed width; declare it with declare_text")]
    VariableWidth(String),

    /// The schema's announcement payload would exceed its size bound.
    #[error("announcement too large at field '{field}' ({needed} bytes, max {max})")]
    AnnouncementTooLarge {
        field: String,
        needed: usize,
        max: usize,
    },

    /// The field name is empty or contains a NUL byte.
    #[error("invalid field name {0:?}")]
    InvalidName(String),

    /// The received record is shorter than the field's slot.
    #[error("record too short for field '{field}' ({available} bytes, need {needed})")]
    RecordTooShort {
        field: String,
        needed: usize,
        available: usize,
    },

    /// A schema announcement payload could not be parsed.
    #[error("malformed schema announcement: {0}")]
    MalformedAnnouncement(String),

    /// Descriptors are not packed back to back from offset 0.
    #[error("invalid field layout: {0}")]
    InvalidLayout(String),

    /// An exported schema is not valid JSON.
    #[error("schema is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
