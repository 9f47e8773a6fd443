//! Core value and descriptor types for the table stream format.
//!
//! This module defines the fundamental types shared by the writer and
//! reader: field types, metadata tags, column values, table and column
//! descriptors, and the opaque handles returned by stream operations.

mod field;
mod handle;
mod table;
mod value;

pub use field::{FieldType, Tag, Tags};
pub use handle::{RowRef, TableRef};
pub use table::{ColumnDef, TableDef};
pub use value::{Value, HASH_SIZE_BYTES};
