//! Schema announcement payload.
//!
//! The payload is a run of NUL-terminated field names in record order, each
//! name repeated once per byte its field occupies. There is no count
//! prefix: widths come from run lengths and offsets from order. Parsing
//! stops at the end of the payload or at an empty name.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::descriptor::Schema;
use crate::error::{Result, SchemaError};

/// Bytes one field contributes to an announcement.
pub(crate) fn field_announcement_len(name: &str, width: usize) -> usize {
    (name.len() + 1).saturating_mul(width)
}

/// Size of the payload [`encode_announcement`] produces for `schema`.
pub fn announcement_len(schema: &Schema) -> usize {
    schema
        .iter()
        .map(|f| field_announcement_len(&f.name, f.width))
        .fold(0, usize::saturating_add)
}

/// Encode `schema` as an announcement payload.
pub fn encode_announcement(schema: &Schema) -> Bytes {
    let mut out = BytesMut::with_capacity(announcement_len(schema));
    for field in schema {
        for _ in 0..field.width {
            out.put_slice(field.name.as_bytes());
            out.put_u8(0);
        }
    }
    out.freeze()
}

/// Parse an announcement payload into a schema no wider than `capacity`.
pub fn decode_announcement(payload: &[u8], capacity: usize) -> Result<Schema> {
    let mut runs: Vec<(&str, usize)> = Vec::new();
    let mut rest = payload;

    while !rest.is_empty() {
        let Some(nul) = rest.iter().position(|&b| b == 0) else {
            return Err(SchemaError::MalformedAnnouncement(format!(
                "unterminated name at byte {}",
                payload.len() - rest.len()
            )));
        };
        if nul == 0 {
            break;
        }
        let name = std::str::from_utf8(&rest[..nul]).map_err(|e| {
            SchemaError::MalformedAnnouncement(format!("field name is not UTF-8: {e}"))
        })?;
        rest = &rest[nul + 1..];

        match runs.last_mut() {
            Some((last, width)) if *last == name => *width += 1,
            _ => runs.push((name, 1)),
        }
    }

    let schema = Schema::from_widths(runs, capacity)?;
    trace!(
        fields = schema.len(),
        width = schema.total_width(),
        "decoded schema announcement"
    );
    Ok(schema)
}
