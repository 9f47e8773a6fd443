//! Per-type field codecs.
//!
//! Each [`FieldType`] has exactly one codec that turns a [`Value`] into its
//! on-wire byte sequence. The set is closed, so dispatch is a plain `match`
//! rather than trait objects. Codecs append into a caller-supplied buffer
//! (the writer reuses its row buffer across fields) and report how many
//! bytes they produced.
//!
//! # Wire shapes
//!
//! | Field type | Output |
//! |------------|--------|
//! | `Hash`     | 32 bytes |
//! | `Int64`    | 8 bytes, little-endian |
//! | `Bool`     | 1 byte, `0x01`/`0x00` |
//! | `Text`     | the UTF-8 bytes verbatim |
//! | `Bytes`    | the bytes verbatim |
//! | `Any`      | empty (reserved) |
//!
//! `Zero` and `Null` encode as the zero of the column's type. `Null` is
//! rejected up front for non-nullable columns; `Any` columns are exempt
//! because their encoding is empty either way.

use crate::error::CoreError;
use crate::types::{ColumnDef, FieldType, Value, HASH_SIZE_BYTES};

/// Encode one column value, appending the wire bytes to `buf`.
///
/// Returns the number of bytes appended.
///
/// # Errors
///
/// Returns an error when the value variant does not fit the column type,
/// when text is not valid UTF-8, or when a length-bounded value exceeds
/// the column's `length`.
pub fn encode_field(col: &ColumnDef, value: &Value, buf: &mut Vec<u8>) -> Result<usize, CoreError> {
    if value.is_null() && !col.nullable && col.field_type != FieldType::Any {
        return Err(CoreError::NotNullable { column: col.name.clone() });
    }
    let start = buf.len();
    match col.field_type {
        FieldType::Hash => encode_hash(col, value, buf)?,
        FieldType::Int64 => encode_int64(col, value, buf)?,
        FieldType::Bool => encode_bool(col, value, buf)?,
        FieldType::Text => encode_text(col, value, buf)?,
        FieldType::Bytes => encode_bytes(col, value, buf)?,
        FieldType::Any => {}
    }
    Ok(buf.len() - start)
}

fn unsupported(col: &ColumnDef, value: &Value) -> CoreError {
    CoreError::UnsupportedValue {
        column: col.name.clone(),
        field_type: col.field_type.name(),
        value_type: value.type_name(),
    }
}

fn encode_hash(col: &ColumnDef, value: &Value, buf: &mut Vec<u8>) -> Result<(), CoreError> {
    match value {
        Value::Hash(h) => buf.extend_from_slice(h),
        Value::Zero | Value::Null => buf.extend_from_slice(&[0u8; HASH_SIZE_BYTES]),
        other => return Err(unsupported(col, other)),
    }
    Ok(())
}

fn encode_int64(col: &ColumnDef, value: &Value, buf: &mut Vec<u8>) -> Result<(), CoreError> {
    match value {
        Value::Int(i) => buf.extend_from_slice(&i.to_le_bytes()),
        Value::Zero | Value::Null => buf.extend_from_slice(&0i64.to_le_bytes()),
        other => return Err(unsupported(col, other)),
    }
    Ok(())
}

fn encode_bool(col: &ColumnDef, value: &Value, buf: &mut Vec<u8>) -> Result<(), CoreError> {
    match value {
        Value::Bool(b) => buf.push(u8::from(*b)),
        Value::Zero | Value::Null => buf.push(0),
        other => return Err(unsupported(col, other)),
    }
    Ok(())
}

fn encode_text(col: &ColumnDef, value: &Value, buf: &mut Vec<u8>) -> Result<(), CoreError> {
    let text = match value {
        Value::Text(s) => s.as_str(),
        Value::Bytes(b) => std::str::from_utf8(b).map_err(|e| CoreError::InvalidUtf8 {
            column: col.name.clone(),
            byte_index: e.valid_up_to(),
        })?,
        Value::Zero | Value::Null => return Ok(()),
        other => return Err(unsupported(col, other)),
    };
    if col.length > 0 {
        let count = text.chars().count() as i64;
        if count > col.length {
            return Err(CoreError::TooManyChars {
                column: col.name.clone(),
                count,
                max: col.length,
            });
        }
    }
    buf.extend_from_slice(text.as_bytes());
    Ok(())
}

fn encode_bytes(col: &ColumnDef, value: &Value, buf: &mut Vec<u8>) -> Result<(), CoreError> {
    let bytes = match value {
        Value::Bytes(b) => b.as_slice(),
        Value::Text(s) => s.as_bytes(),
        Value::Zero | Value::Null => return Ok(()),
        other => return Err(unsupported(col, other)),
    };
    if col.length > 0 && bytes.len() as i64 > col.length {
        return Err(CoreError::TooManyBytes {
            column: col.name.clone(),
            count: bytes.len() as i64,
            max: col.length,
        });
    }
    buf.extend_from_slice(bytes);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str, field_type: FieldType) -> ColumnDef {
        ColumnDef::new(name, field_type)
    }

    fn encode(col: &ColumnDef, value: &Value) -> Result<Vec<u8>, CoreError> {
        let mut buf = Vec::new();
        encode_field(col, value, &mut buf)?;
        Ok(buf)
    }

    #[test]
    fn hash_full_width() {
        let c = col("version", FieldType::Hash);
        let out = encode(&c, &Value::Hash([7u8; 32])).unwrap();
        assert_eq!(out, vec![7u8; 32]);
    }

    #[test]
    fn hash_zero_extended_prefix() {
        let c = col("version", FieldType::Hash);
        let out = encode(&c, &Value::from([0xABu8; 8])).unwrap();
        assert_eq!(out.len(), 32);
        assert_eq!(&out[..8], &[0xAB; 8]);
        assert_eq!(&out[8..], &[0u8; 24]);
    }

    #[test]
    fn hash_rejects_int() {
        let c = col("version", FieldType::Hash);
        let err = encode(&c, &Value::Int(1)).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedValue { .. }));
    }

    #[test]
    fn int64_little_endian() {
        let c = col("id", FieldType::Int64);
        assert_eq!(
            encode(&c, &Value::Int(42)).unwrap(),
            vec![0x2A, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(encode(&c, &Value::Int(-1)).unwrap(), vec![0xFF; 8]);
    }

    #[test]
    fn int64_native_and_fixed_agree() {
        let c = col("id", FieldType::Int64);
        let fixed = encode(&c, &Value::from(1234i64)).unwrap();
        let native = encode(&c, &Value::from(1234isize)).unwrap();
        assert_eq!(fixed, native);
    }

    #[test]
    fn bool_single_byte() {
        let c = col("flag", FieldType::Bool);
        assert_eq!(encode(&c, &Value::Bool(true)).unwrap(), vec![1]);
        assert_eq!(encode(&c, &Value::Bool(false)).unwrap(), vec![0]);
    }

    #[test]
    fn text_verbatim_utf8() {
        let c = col("name", FieldType::Text);
        assert_eq!(encode(&c, &Value::from("hello")).unwrap(), b"hello");
        assert_eq!(encode(&c, &Value::from("héllo")).unwrap(), "héllo".as_bytes());
    }

    #[test]
    fn text_from_bytes_validates_utf8() {
        let c = col("name", FieldType::Text);
        let out = encode(&c, &Value::Bytes(b"hello".to_vec())).unwrap();
        assert_eq!(out, b"hello");

        let err = encode(&c, &Value::Bytes(vec![b'h', b'i', 0xFF, 0xFE])).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidUtf8 { column: "name".to_owned(), byte_index: 2 }
        );
    }

    #[test]
    fn text_char_count_boundary() {
        let c = col("name", FieldType::Text).length(5);
        // Exactly at the limit: five scalars, even though "héllo" is six bytes.
        assert!(encode(&c, &Value::from("héllo")).is_ok());
        let err = encode(&c, &Value::from("hello!")).unwrap_err();
        assert_eq!(
            err,
            CoreError::TooManyChars { column: "name".to_owned(), count: 6, max: 5 }
        );
    }

    #[test]
    fn text_unbounded_when_length_zero() {
        let c = col("name", FieldType::Text);
        let long = "x".repeat(10_000);
        assert_eq!(encode(&c, &Value::from(long.clone())).unwrap().len(), long.len());
    }

    #[test]
    fn bytes_verbatim_and_bounded() {
        let c = col("blob", FieldType::Bytes).length(4);
        assert_eq!(encode(&c, &Value::from(vec![1u8, 2, 3, 4])).unwrap(), vec![1, 2, 3, 4]);
        let err = encode(&c, &Value::from(vec![0u8; 5])).unwrap_err();
        assert_eq!(
            err,
            CoreError::TooManyBytes { column: "blob".to_owned(), count: 5, max: 4 }
        );
    }

    #[test]
    fn bytes_accepts_text() {
        let c = col("blob", FieldType::Bytes);
        assert_eq!(encode(&c, &Value::from("raw")).unwrap(), b"raw");
    }

    #[test]
    fn any_encodes_empty() {
        let c = col("default", FieldType::Any);
        assert!(encode(&c, &Value::Int(9)).unwrap().is_empty());
        assert!(encode(&c, &Value::Null).unwrap().is_empty());
        assert!(encode(&c, &Value::Zero).unwrap().is_empty());
    }

    #[test]
    fn zero_encodes_type_zero() {
        assert_eq!(encode(&col("h", FieldType::Hash), &Value::Zero).unwrap(), vec![0u8; 32]);
        assert_eq!(encode(&col("i", FieldType::Int64), &Value::Zero).unwrap(), vec![0u8; 8]);
        assert_eq!(encode(&col("b", FieldType::Bool), &Value::Zero).unwrap(), vec![0u8]);
        assert!(encode(&col("s", FieldType::Text), &Value::Zero).unwrap().is_empty());
        assert!(encode(&col("y", FieldType::Bytes), &Value::Zero).unwrap().is_empty());
    }

    #[test]
    fn null_requires_nullable() {
        let strict = col("id", FieldType::Int64);
        let err = encode(&strict, &Value::Null).unwrap_err();
        assert_eq!(err, CoreError::NotNullable { column: "id".to_owned() });

        let lax = col("link", FieldType::Int64).nullable();
        assert_eq!(encode(&lax, &Value::Null).unwrap(), vec![0u8; 8]);
    }

    #[test]
    fn reported_length_matches_output() {
        let c = col("name", FieldType::Text);
        let mut buf = vec![0xEE];
        let n = encode_field(&c, &Value::from("abc"), &mut buf).unwrap();
        assert_eq!(n, 3);
        assert_eq!(buf, vec![0xEE, b'a', b'b', b'c']);
    }
}
