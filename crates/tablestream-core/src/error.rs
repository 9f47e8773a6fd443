//! Error types for the core crate.

use thiserror::Error;

/// Errors that can occur while encoding a single column value.
///
/// These are "codec failures": the value handed to a field codec does not
/// fit the column it is being encoded for. The stream writer latches the
/// first such error and short-circuits all later operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The value variant is not accepted by the column's field type.
    #[error("column {column:?} of type {field_type} cannot encode a {value_type} value")]
    UnsupportedValue {
        /// Name of the column being encoded.
        column: String,
        /// On-wire name of the column's field type.
        field_type: &'static str,
        /// Variant name of the rejected value.
        value_type: &'static str,
    },

    /// A null value was supplied for a column that is not nullable.
    #[error("column {column:?} is not nullable")]
    NotNullable {
        /// Name of the column being encoded.
        column: String,
    },

    /// A byte slice supplied for a string column is not valid UTF-8.
    #[error("invalid utf-8 in value for column {column:?}: bad byte at index {byte_index}")]
    InvalidUtf8 {
        /// Name of the column being encoded.
        column: String,
        /// Byte index of the first invalid byte.
        byte_index: usize,
    },

    /// A string value exceeds the column's maximum character count.
    #[error("value for column {column:?} contains {count} characters, max allowed is {max}")]
    TooManyChars {
        /// Name of the column being encoded.
        column: String,
        /// Unicode scalar count of the rejected value.
        count: i64,
        /// Maximum scalar count the column allows.
        max: i64,
    },

    /// A byte value exceeds the column's maximum byte count.
    #[error("value for column {column:?} contains {count} bytes, max allowed is {max}")]
    TooManyBytes {
        /// Name of the column being encoded.
        column: String,
        /// Byte count of the rejected value.
        count: i64,
        /// Maximum byte count the column allows.
        max: i64,
    },
}
