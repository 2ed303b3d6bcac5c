use tracing::{debug, info};

use crate::announce::{announcement_len, field_announcement_len};
use crate::config::SchemaConfig;
use crate::descriptor::{FieldDescriptor, Schema};
use crate::error::{Result, SchemaError};
use crate::record::RecordBuffer;
use crate::value::{DecodeField, EncodeField, FieldType};

/// Field table plus the outbound record it describes.
///
/// The sender declares fields and writes values here; the receiver keeps
/// the schema it learned from an announcement and decodes received records
/// against it with [`RecordCodec::get_field`].
///
/// # Example
///
/// ```
/// use telelink_schema::RecordCodec;
///
/// let mut codec = RecordCodec::new();
/// codec.declare_field::<i32>("alt").unwrap();
/// codec.set_field("alt", &1234i32).unwrap();
///
/// let alt: i32 = codec.get_field(codec.outbound_record(), "alt").unwrap();
/// assert_eq!(alt, 1234);
/// ```
#[derive(Debug)]
pub struct RecordCodec {
    schema: Schema,
    outbound: RecordBuffer,
    config: SchemaConfig,
}

impl RecordCodec {
    /// Create a codec with the default 512-byte record capacity.
    pub fn new() -> Self {
        Self::with_config(SchemaConfig::default())
    }

    /// Create a codec with explicit configuration.
    pub fn with_config(config: SchemaConfig) -> Self {
        Self {
            schema: Schema::new(),
            outbound: RecordBuffer::new(config.record_capacity),
            config,
        }
    }

    /// Current field table.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Current schema configuration.
    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Declare a fixed-width field sized for `T`.
    ///
    /// Text types have no fixed width and are refused with
    /// [`SchemaError::VariableWidth`]; use [`RecordCodec::declare_text`].
    pub fn declare_field<T: FieldType + ?Sized>(&mut self, name: &str) -> Result<&FieldDescriptor> {
        match T::WIDTH {
            Some(width) => self.declare_with_width(name, width),
            None => Err(SchemaError::VariableWidth(name.to_string())),
        }
    }

    /// Declare a text field holding at most `max_len` bytes.
    pub fn declare_text(&mut self, name: &str, max_len: usize) -> Result<&FieldDescriptor> {
        self.declare_with_width(name, max_len)
    }

    /// Append a field of `width` bytes after the last declared field.
    ///
    /// Also refuses a field that would push the encoded announcement past
    /// `max_announcement_len`, so every accepted schema can be announced.
    pub fn declare_with_width(&mut self, name: &str, width: usize) -> Result<&FieldDescriptor> {
        let capacity = self.config.record_capacity;
        self.schema.check_push(name, width, capacity)?;

        let needed = announcement_len(&self.schema)
            .saturating_add(field_announcement_len(name, width));
        let max = self.config.max_announcement_len;
        if needed > max {
            return Err(SchemaError::AnnouncementTooLarge {
                field: name.to_string(),
                needed,
                max,
            });
        }

        let field = self.schema.push(name, width, capacity)?;
        debug!(
            field = %field.name,
            offset = field.offset,
            width = field.width,
            "declared field"
        );
        Ok(field)
    }

    /// Write `value` into its slot of the outbound record.
    ///
    /// Text is copied left-justified; bytes past its end keep whatever they
    /// held before. Use [`RecordCodec::clear_record`] to zero them.
    pub fn set_field<T: EncodeField + ?Sized>(&mut self, name: &str, value: &T) -> Result<()> {
        let field = lookup(&self.schema, name)?;
        let len = value.encoded_len();
        match T::WIDTH {
            Some(width) if width != field.width => {
                return Err(SchemaError::TypeMismatch {
                    field: name.to_string(),
                    expected: field.width,
                    actual: width,
                });
            }
            None if len > field.width => {
                return Err(SchemaError::ValueTooLong {
                    field: name.to_string(),
                    len,
                    max: field.width,
                });
            }
            _ => {}
        }

        let end = field.offset + len;
        let capacity = self.outbound.capacity();
        let slot = self
            .outbound
            .slot_mut(field.offset..end)
            .ok_or_else(|| SchemaError::SchemaOverflow {
                field: name.to_string(),
                needed: end,
                capacity,
            })?;
        value.encode(slot);
        Ok(())
    }

    /// Decode the value of `name` from `record`.
    pub fn get_field<T: DecodeField>(&self, record: &[u8], name: &str) -> Result<T> {
        let field = lookup(&self.schema, name)?;
        if let Some(width) = T::WIDTH {
            if width != field.width {
                return Err(SchemaError::TypeMismatch {
                    field: name.to_string(),
                    expected: field.width,
                    actual: width,
                });
            }
        }

        let slot = record
            .get(field.range())
            .ok_or_else(|| SchemaError::RecordTooShort {
                field: name.to_string(),
                needed: field.end(),
                available: record.len(),
            })?;
        T::decode(slot).ok_or_else(|| SchemaError::TypeMismatch {
            field: name.to_string(),
            expected: field.width,
            actual: slot.len(),
        })
    }

    /// The outbound record up to the end of the last declared field.
    pub fn outbound_record(&self) -> &[u8] {
        self.outbound.prefix(self.schema.total_width())
    }

    /// Zero-fill the outbound record.
    pub fn clear_record(&mut self) {
        self.outbound.clear();
    }

    /// Swap in a whole new schema.
    ///
    /// Fails, keeping the current schema, if the new one does not fit the
    /// record capacity. On success the outbound record is zeroed since its
    /// old contents no longer match any layout.
    pub fn replace_schema(&mut self, schema: Schema) -> Result<()> {
        let needed = schema.total_width();
        let capacity = self.config.record_capacity;
        if needed > capacity {
            let field = schema
                .iter()
                .find(|f| f.end() > capacity)
                .map(|f| f.name.clone())
                .unwrap_or_default();
            return Err(SchemaError::SchemaOverflow {
                field,
                needed,
                capacity,
            });
        }

        info!(
            fields = schema.len(),
            width = needed,
            "schema replaced"
        );
        self.schema = schema;
        self.outbound.clear();
        Ok(())
    }
}

impl Default for RecordCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn lookup<'a>(schema: &'a Schema, name: &str) -> Result<&'a FieldDescriptor> {
    schema
        .get(name)
        .ok_or_else(|| SchemaError::UnknownField(name.to_string()))
}
