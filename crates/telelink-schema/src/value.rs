//! Typed encode/decode for field slots.
//!
//! Multi-byte primitives are stored little-endian. Text is stored
//! left-justified in a fixed slot with no length prefix; trailing NUL bytes
//! are treated as fill when reading.

/// A type that can occupy a field slot.
pub trait FieldType {
    /// Fixed slot width in bytes, or `None` for variable-length text whose
    /// slot width is chosen at declaration.
    const WIDTH: Option<usize>;
}

/// A value that can be written into a field slot.
pub trait EncodeField: FieldType {
    /// Bytes this value occupies.
    fn encoded_len(&self) -> usize;

    /// Write the value into `slot`, which is exactly `encoded_len()` bytes.
    fn encode(&self, slot: &mut [u8]);
}

/// A value that can be read back from a field slot.
pub trait DecodeField: FieldType + Sized {
    /// Decode from a full slot. Returns `None` if the slot width is wrong
    /// for this type.
    fn decode(slot: &[u8]) -> Option<Self>;
}

macro_rules! impl_le_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldType for $ty {
                const WIDTH: Option<usize> = Some(std::mem::size_of::<$ty>());
            }

            impl EncodeField for $ty {
                fn encoded_len(&self) -> usize {
                    std::mem::size_of::<$ty>()
                }

                fn encode(&self, slot: &mut [u8]) {
                    slot.copy_from_slice(&self.to_le_bytes());
                }
            }

            impl DecodeField for $ty {
                fn decode(slot: &[u8]) -> Option<Self> {
                    slot.try_into().ok().map(<$ty>::from_le_bytes)
                }
            }
        )*
    };
}

impl_le_field!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

impl FieldType for bool {
    const WIDTH: Option<usize> = Some(1);
}

impl EncodeField for bool {
    fn encoded_len(&self) -> usize {
        1
    }

    fn encode(&self, slot: &mut [u8]) {
        slot[0] = u8::from(*self);
    }
}

impl DecodeField for bool {
    fn decode(slot: &[u8]) -> Option<Self> {
        match slot {
            [byte] => Some(*byte != 0),
            _ => None,
        }
    }
}

impl FieldType for str {
    const WIDTH: Option<usize> = None;
}

impl EncodeField for str {
    fn encoded_len(&self) -> usize {
        self.len()
    }

    fn encode(&self, slot: &mut [u8]) {
        slot.copy_from_slice(self.as_bytes());
    }
}

impl FieldType for String {
    const WIDTH: Option<usize> = None;
}

impl EncodeField for String {
    fn encoded_len(&self) -> usize {
        self.len()
    }

    fn encode(&self, slot: &mut [u8]) {
        self.as_str().encode(slot)
    }
}

impl DecodeField for String {
    fn decode(slot: &[u8]) -> Option<Self> {
        let end = slot.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        Some(String::from_utf8_lossy(&slot[..end]).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded<T: EncodeField + ?Sized>(value: &T) -> Vec<u8> {
        let mut slot = vec![0u8; value.encoded_len()];
        value.encode(&mut slot);
        slot
    }

    #[test]
    fn primitives_are_little_endian() {
        assert_eq!(encoded(&1234i32), vec![0xD2, 0x04, 0x00, 0x00]);
        assert_eq!(encoded(&0xBEEFu16), vec![0xEF, 0xBE]);
        assert_eq!(encoded(&-1i8), vec![0xFF]);
        assert_eq!(encoded(&1.0f32), vec![0x00, 0x00, 0x80, 0x3F]);
    }

    #[test]
    fn widths_match_type_sizes() {
        assert_eq!(<u8 as FieldType>::WIDTH, Some(1));
        assert_eq!(<i32 as FieldType>::WIDTH, Some(4));
        assert_eq!(<f64 as FieldType>::WIDTH, Some(8));
        assert_eq!(<u64 as FieldType>::WIDTH, Some(8));
        assert_eq!(<bool as FieldType>::WIDTH, Some(1));
        assert_eq!(<String as FieldType>::WIDTH, None);
        assert_eq!(<str as FieldType>::WIDTH, None);
    }

    #[test]
    fn decode_rejects_wrong_slot_width() {
        assert_eq!(i32::decode(&[1, 2, 3]), None);
        assert_eq!(f64::decode(&[0; 4]), None);
        assert_eq!(bool::decode(&[1, 0]), None);
        assert_eq!(i32::decode(&[0xD2, 0x04, 0, 0]), Some(1234));
    }

    #[test]
    fn float_values_survive() {
        let slot = encoded(&420.69f64);
        assert_eq!(f64::decode(&slot), Some(420.69));
    }

    #[test]
    fn bool_decodes_any_nonzero_as_true() {
        assert_eq!(bool::decode(&[0]), Some(false));
        assert_eq!(bool::decode(&[7]), Some(true));
        assert_eq!(encoded(&true), vec![1]);
    }

    #[test]
    fn text_trims_trailing_fill() {
        assert_eq!(String::decode(b"GPS\0\0\0"), Some("GPS".to_string()));
        assert_eq!(String::decode(b"full"), Some("full".to_string()));
        assert_eq!(String::decode(&[0, 0]), Some(String::new()));
        assert_eq!(String::decode(b"a\0b\0"), Some("a\0b".to_string()));
    }

    #[test]
    fn str_and_string_encode_identically() {
        assert_eq!(encoded("abc"), encoded(&"abc".to_string()));
    }
}
