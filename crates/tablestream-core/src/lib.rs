//! TableStream core
//!
//! This crate provides the fundamental types of the TableStream binary
//! table format: field types, column values, table and column
//! descriptors, the opaque handles returned by stream operations, and
//! the per-type field codecs.
//!
//! The stream engine itself (writer, reader, control catalog, framing)
//! lives in the `tablestream` crate; this crate is its dependency-free
//! leaf.
//!
//! # Example
//!
//! ```
//! use tablestream_core::{encode_field, ColumnDef, FieldType, Value};
//!
//! let col = ColumnDef::new("name", FieldType::Text).length(8);
//! let mut buf = Vec::new();
//! let n = encode_field(&col, &Value::from("hello"), &mut buf).unwrap();
//! assert_eq!(n, 5);
//! assert_eq!(buf, b"hello");
//! ```
//!
//! # Modules
//!
//! - [`types`] - Core data types ([`Value`], [`FieldType`], descriptors, handles)
//! - [`encoding`] - Per-type field codecs
//! - [`error`] - Error types ([`CoreError`])

pub mod encoding;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use encoding::encode_field;
pub use error::CoreError;
pub use types::{
    ColumnDef, FieldType, RowRef, TableDef, TableRef, Tag, Tags, Value, HASH_SIZE_BYTES,
};
