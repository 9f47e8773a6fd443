//! Property-based tests for the field codecs.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use crate::encoding::encode_field;
use crate::types::{ColumnDef, FieldType, Value};

proptest! {
    #[test]
    fn int64_preserves_bits(i in any::<i64>()) {
        let col = ColumnDef::new("n", FieldType::Int64);
        let mut buf = Vec::new();
        let n = encode_field(&col, &Value::Int(i), &mut buf).expect("int64 encoding");
        prop_assert_eq!(n, 8);
        prop_assert_eq!(i64::from_le_bytes(buf[..8].try_into().expect("8 bytes")), i);
    }

    #[test]
    fn text_output_is_verbatim(s in ".*") {
        let col = ColumnDef::new("t", FieldType::Text);
        let mut buf = Vec::new();
        let n = encode_field(&col, &Value::Text(s.clone()), &mut buf).expect("text encoding");
        prop_assert_eq!(n, s.len());
        prop_assert_eq!(buf, s.into_bytes());
    }

    #[test]
    fn text_within_char_limit_always_encodes(s in "\\PC{0,20}") {
        let col = ColumnDef::new("t", FieldType::Text).length(20);
        let mut buf = Vec::new();
        prop_assert!(encode_field(&col, &Value::Text(s), &mut buf).is_ok());
    }

    #[test]
    fn arbitrary_bytes_into_text_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let col = ColumnDef::new("t", FieldType::Text);
        let mut buf = Vec::new();
        // Invalid UTF-8 must come back as an error, never a panic.
        let _ = encode_field(&col, &Value::Bytes(bytes), &mut buf);
    }

    #[test]
    fn bytes_bound_is_exact(bytes in prop::collection::vec(any::<u8>(), 0..64), max in 1i64..64) {
        let col = ColumnDef::new("b", FieldType::Bytes).length(max);
        let mut buf = Vec::new();
        let result = encode_field(&col, &Value::Bytes(bytes.clone()), &mut buf);
        if bytes.len() as i64 <= max {
            prop_assert_eq!(result.expect("within bound"), bytes.len());
        } else {
            prop_assert!(result.is_err());
        }
    }

    #[test]
    fn reported_count_matches_appended_bytes(
        i in any::<i64>(),
        b in any::<bool>(),
        s in ".{0,40}",
    ) {
        let cases = [
            (ColumnDef::new("i", FieldType::Int64), Value::Int(i)),
            (ColumnDef::new("b", FieldType::Bool), Value::Bool(b)),
            (ColumnDef::new("s", FieldType::Text), Value::Text(s)),
            (ColumnDef::new("h", FieldType::Hash), Value::Zero),
            (ColumnDef::new("a", FieldType::Any), Value::Int(i)),
        ];
        for (col, value) in cases {
            let mut buf = Vec::new();
            let n = encode_field(&col, &value, &mut buf).expect("encoding");
            prop_assert_eq!(n, buf.len());
        }
    }
}
