//! Column values.
//!
//! [`Value`] is the tagged union passed to `insert`: one variant per field
//! type, plus [`Value::Zero`] ("the zero of the column's type") and
//! [`Value::Null`] for nullable columns. Constructing values through the
//! `From` conversions keeps call sites close to literal row tuples:
//!
//! ```
//! use tablestream_core::Value;
//!
//! let id: Value = 42i64.into();
//! let name: Value = "hello".into();
//! assert_eq!(id.as_int(), Some(42));
//! assert_eq!(name.as_str(), Some("hello"));
//! ```

use serde::{Deserialize, Serialize};

/// Size of a [`Value::Hash`] payload in bytes.
pub const HASH_SIZE_BYTES: usize = 32;

/// A single column value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// 256-bit hash.
    Hash([u8; HASH_SIZE_BYTES]),
    /// 64-bit signed integer.
    Int(i64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// The zero value of whatever type the target column has.
    Zero,
    /// No value. Accepted only by nullable columns.
    Null,
}

impl Value {
    /// Variant name for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Hash(_) => "hash",
            Self::Int(_) => "int64",
            Self::Bool(_) => "bool",
            Self::Text(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Zero => "zero",
            Self::Null => "null",
        }
    }

    /// The integer payload, if this is an `Int`.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The boolean payload, if this is a `Bool`.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The text payload, if this is a `Text`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The byte payload, if this is a `Bytes`.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Whether this is the `Null` sentinel.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Self::Int(v as i64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<[u8; HASH_SIZE_BYTES]> for Value {
    fn from(v: [u8; HASH_SIZE_BYTES]) -> Self {
        Self::Hash(v)
    }
}

impl From<[u8; 8]> for Value {
    /// An 8-byte hash prefix, zero-extended into the full 32-byte slot.
    fn from(v: [u8; 8]) -> Self {
        let mut hash = [0u8; HASH_SIZE_BYTES];
        hash[..8].copy_from_slice(&v);
        Self::Hash(hash)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}
