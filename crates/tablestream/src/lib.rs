//! TableStream
//!
//! A binary table-serialization codec: writes and reads a self-describing
//! collection of relational tables over an append-only byte stream
//! (stream name `SCD01`). The schema travels in-band as a control catalog
//! of seven meta-tables, so a consumer can decode without any out-of-band
//! agreement, and can in principle memory-map the stream and locate rows
//! by byte offset through each chunk's row-offset index.
//!
//! # Writing
//!
//! ```
//! use tablestream::Writer;
//! use tablestream_core::{ColumnDef, FieldType, TableDef};
//!
//! let mut w = Writer::new(Vec::new());
//! let events = w.define(
//!     TableDef::new("app/event"),
//!     vec![
//!         ColumnDef::new("id", FieldType::Int64).key(),
//!         ColumnDef::new("kind", FieldType::Text).length(32),
//!     ],
//! );
//! w.insert(&events, &[1i64.into(), "started".into()]);
//! w.flush().unwrap();
//! w.close().unwrap();
//! ```
//!
//! # Reading
//!
//! ```
//! use std::io::Cursor;
//! use tablestream::{Reader, Writer};
//!
//! let mut w = Writer::new(Vec::new());
//! w.close().unwrap();
//! let bytes = w.into_inner();
//!
//! let mut r = Reader::open(Cursor::new(bytes)).unwrap();
//! r.index().unwrap();
//! assert!(!r.table_ids().is_empty()); // the control catalog
//! ```
//!
//! # Modules
//!
//! - [`writer`] - The stream writer: define, insert, flush, cancel, close
//! - [`reader`] - The stream reader: header validation and chunk indexing
//! - [`catalog`] - The built-in control catalog describing all tables
//! - [`frame`] - Byte-level framing constants and chunk assembly
//! - [`config`] - Stream directory configuration
//! - [`error`] - Error types ([`StreamError`])

pub mod catalog;
pub mod config;
pub mod error;
pub mod frame;
pub mod reader;
pub mod writer;

// Re-export core types so most users depend on one crate.
pub use tablestream_core::{
    ColumnDef, CoreError, FieldType, RowRef, TableDef, TableRef, Tag, Tags, Value,
};

pub use config::{Config, ConfigError};
pub use error::{StreamError, StreamResult};
pub use reader::{ChunkIndex, Reader, RowData, RowIndexEntry};
pub use writer::Writer;
