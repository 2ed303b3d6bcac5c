use std::collections::HashMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// One named byte range inside a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name, unique within its schema.
    pub name: String,
    /// Byte offset within the record.
    pub offset: usize,
    /// Slot width in bytes.
    pub width: usize,
}

impl FieldDescriptor {
    /// Byte range occupied by this field.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// First byte past this field.
    pub fn end(&self) -> usize {
        self.offset + self.width
    }
}

/// Ordered field table describing a record layout.
///
/// Fields are packed in declaration order: each offset is the sum of the
/// widths before it, so ranges never overlap. The table is only ever
/// extended by [`Schema::push`] or replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<FieldDescriptor>", try_from = "Vec<FieldDescriptor>")]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schema from `(name, width)` pairs in record order.
    pub fn from_widths<I, N>(fields: I, capacity: usize) -> Result<Self>
    where
        I: IntoIterator<Item = (N, usize)>,
        N: Into<String>,
    {
        let mut schema = Self::new();
        for (name, width) in fields {
            schema.push(name, width, capacity)?;
        }
        Ok(schema)
    }

    /// Append a field after the last one.
    ///
    /// Fails without modifying the schema if the name is invalid or taken,
    /// the width is zero, or the record would exceed `capacity`.
    pub fn push(
        &mut self,
        name: impl Into<String>,
        width: usize,
        capacity: usize,
    ) -> Result<&FieldDescriptor> {
        let name = name.into();
        self.check_push(&name, width, capacity)?;

        let offset = self.total_width();
        self.index.insert(name.clone(), self.fields.len());
        self.fields.push(FieldDescriptor {
            name,
            offset,
            width,
        });
        Ok(&self.fields[self.fields.len() - 1])
    }

    /// Run the checks [`Schema::push`] applies, without appending.
    pub fn check_push(&self, name: &str, width: usize, capacity: usize) -> Result<()> {
        validate_name(name)?;
        if self.index.contains_key(name) {
            return Err(SchemaError::DuplicateField(name.to_string()));
        }
        if width == 0 {
            return Err(SchemaError::ZeroWidth(name.to_string()));
        }

        let needed = self.total_width().saturating_add(width);
        if needed > capacity {
            return Err(SchemaError::SchemaOverflow {
                field: name.to_string(),
                needed,
                capacity,
            });
        }
        Ok(())
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Check if a field exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Fields in record order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    /// Field names in record order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field is declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Bytes occupied by all fields.
    pub fn total_width(&self) -> usize {
        self.fields.last().map_or(0, FieldDescriptor::end)
    }

    /// Serialize the schema as a JSON array of descriptors.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a schema exported with [`Schema::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Schema> for Vec<FieldDescriptor> {
    fn from(schema: Schema) -> Self {
        schema.fields
    }
}

impl TryFrom<Vec<FieldDescriptor>> for Schema {
    type Error = SchemaError;

    /// Rebuild a schema, requiring the packed layout `push` produces.
    fn try_from(fields: Vec<FieldDescriptor>) -> Result<Self> {
        let mut schema = Schema::new();
        for field in fields {
            let expected = schema.total_width();
            if field.offset != expected {
                return Err(SchemaError::InvalidLayout(format!(
                    "field '{}' at offset {}, expected {expected}",
                    field.name, field.offset
                )));
            }
            schema.push(field.name, field.width, usize::MAX)?;
        }
        Ok(schema)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.as_bytes().contains(&0) {
        return Err(SchemaError::InvalidName(name.to_string()));
    }
    Ok(())
}
