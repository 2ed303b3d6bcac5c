//! Named, fixed-offset record schemas with typed field access.
//!
//! A schema is an ordered list of named byte ranges inside a fixed-size
//! record. The sender declares fields, writes typed values into its
//! outbound record and ships the raw record; the receiver decodes values
//! against the schema it learned from the sender's announcement.
//!
//! Typed access is an explicit little-endian encode/decode per type with a
//! width check, never a reinterpretation of raw memory.

pub mod announce;
pub mod codec;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod record;
pub mod value;

pub use announce::{announcement_len, decode_announcement, encode_announcement};
pub use codec::RecordCodec;
pub use config::{SchemaConfig, DEFAULT_MAX_ANNOUNCEMENT_LEN, DEFAULT_RECORD_CAPACITY};
pub use descriptor::{FieldDescriptor, Schema};
pub use error::{Result, SchemaError};
pub use record::RecordBuffer;
pub use value::{DecodeField, EncodeField, FieldType};
