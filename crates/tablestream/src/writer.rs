//! Stream writer.
//!
//! [`Writer`] is the producing half of the codec. It owns the byte sink,
//! buffers inserted rows per table, and drains them as framed chunks on
//! flush. It is single-threaded by design: no internal tasks, no locks,
//! callers serialize access externally.
//!
//! # Error latch
//!
//! The writer carries one latched terminal error. The first failure wins;
//! every later `define`/`insert` returns a sentinel handle, and
//! `flush`/`close`/`cancel` return the latched error. Callers check
//! [`Writer::error`] at natural checkpoints instead of after every call:
//!
//! ```
//! use tablestream::Writer;
//! use tablestream_core::{ColumnDef, FieldType, TableDef, Value};
//!
//! let mut w = Writer::new(Vec::new());
//! let users = w.define(
//!     TableDef::new("app/user"),
//!     vec![
//!         ColumnDef::new("id", FieldType::Int64).key(),
//!         ColumnDef::new("name", FieldType::Text).length(100),
//!     ],
//! );
//! w.insert(&users, &[1i64.into(), "alice".into()]);
//! w.insert(&users, &[2i64.into(), "bob".into()]);
//! w.flush().unwrap();
//! w.close().unwrap();
//! ```

use std::collections::BTreeMap;
use std::io::Write;
use std::mem;

use tracing::debug;

use tablestream_core::{encode_field, ColumnDef, RowRef, TableDef, TableRef, Value};

use crate::catalog::{
    CONTROL_COLUMN_ID, CONTROL_COLUMN_TAG_ID, CONTROL_TABLE_ID, CONTROL_TABLE_TAG_ID,
};
use crate::error::{StreamError, StreamResult};
use crate::frame::{self, MARKER_ROW, STREAM_CANCEL, STREAM_EOF, STREAM_HEADER};

/// Writes a self-describing collection of tables to an append-only byte
/// stream.
///
/// Construction bootstraps the control catalog into the row buffer;
/// nothing reaches the sink until the first flush, which emits the stream
/// header followed by the catalog chunks. The stream must end with
/// exactly one [`Writer::close`] or [`Writer::cancel`].
pub struct Writer<W: Write> {
    sink: W,
    err: Option<StreamError>,
    header_written: bool,
    chunks_written: i64,

    /// Scratch buffer a whole chunk is assembled into before one sink write.
    chunk_buf: Vec<u8>,

    /// Column layout per defined table.
    tables: BTreeMap<i64, Vec<ColumnDef>>,
    /// Per-table row-id counters. The counter of `control/table` doubles
    /// as the table-id allocator.
    row_ids: BTreeMap<i64, i64>,
    /// Handles to the control tables, populated during bootstrap.
    pub(crate) control: BTreeMap<i64, TableRef>,

    /// Rows inserted since the last flush, keyed by table id.
    row_buffer: BTreeMap<i64, Vec<Vec<u8>>>,
}

impl<W: Write> Writer<W> {
    /// Create a writer over the given sink and bootstrap the control
    /// catalog. Does not write to the sink.
    pub fn new(sink: W) -> Self {
        let mut writer = Self {
            sink,
            err: None,
            header_written: false,
            chunks_written: 0,
            chunk_buf: Vec::new(),
            tables: BTreeMap::new(),
            row_ids: BTreeMap::new(),
            control: BTreeMap::new(),
            row_buffer: BTreeMap::new(),
        };
        writer.bootstrap();
        writer
    }

    /// Define a table on the stream.
    ///
    /// Allocates the next table id, records the column layout, and buffers
    /// the catalog rows describing the table, its columns, and their tags.
    /// Column `sort_order` defaults to the 1-based positional index.
    ///
    /// Returns the sentinel handle when the writer is in terminal-error
    /// state.
    pub fn define(&mut self, table: TableDef, columns: Vec<ColumnDef>) -> TableRef {
        if self.err.is_some() {
            return TableRef::sentinel();
        }
        let table_ref = self.register_table(&columns);
        self.describe_table(table_ref.table_id(), &table, &columns);
        table_ref
    }

    /// Insert one row into a defined table.
    ///
    /// `values` are positional against the handle's selected columns and
    /// must match their count. On success the row is encoded into the
    /// buffer and the returned handle carries the row id assigned from
    /// the table's counter. On any violation the terminal error latches
    /// and the sentinel handle is returned.
    pub fn insert(&mut self, table: &TableRef, values: &[Value]) -> RowRef {
        if self.err.is_some() {
            return RowRef::sentinel();
        }
        match self.buffer_row(table, None, values) {
            Ok(row_ref) => row_ref,
            Err(e) => {
                self.err = Some(e);
                RowRef::sentinel()
            }
        }
    }

    /// Write all buffered rows to the sink.
    ///
    /// No-op when nothing is buffered. The first flush ever is preceded by
    /// the stream header. Each table with buffered rows becomes one chunk,
    /// emitted in ascending table-id order; within a table, rows keep
    /// insertion order. Write errors latch.
    pub fn flush(&mut self) -> StreamResult<()> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        if self.row_buffer.is_empty() {
            return Ok(());
        }
        if let Err(err) = self.flush_buffered() {
            self.err = Some(err.clone());
            return Err(err);
        }
        Ok(())
    }

    /// Terminate the stream with the cancel trailer.
    ///
    /// Marks the content as discarded: buffered rows are dropped, the
    /// header is emitted first if nothing was written yet (a non-empty
    /// stream always starts with it), and `FS CAN` goes out last. The
    /// terminal error becomes [`StreamError::StreamEnd`]; a pre-existing
    /// latched error is returned. Calling again returns `StreamEnd`.
    pub fn cancel(&mut self) -> StreamResult<()> {
        if matches!(self.err, Some(StreamError::StreamEnd)) {
            return Err(StreamError::StreamEnd);
        }
        let prior = self.err.take();
        self.row_buffer.clear();
        let write_result = self.write_trailer(&STREAM_CANCEL);
        self.err = Some(StreamError::StreamEnd);
        match prior {
            Some(e) => Err(e),
            None => write_result,
        }
    }

    /// Terminate the stream with the EOF trailer.
    ///
    /// Flushes buffered rows when the writer is healthy, then emits
    /// `FS EOT` even when an earlier error latched, so the stream stays
    /// structurally well-formed. Returns the first error among the
    /// pre-existing latch, the flush, and the trailer write. The terminal
    /// error becomes [`StreamError::StreamEnd`]; calling again returns
    /// `StreamEnd`.
    pub fn close(&mut self) -> StreamResult<()> {
        if matches!(self.err, Some(StreamError::StreamEnd)) {
            return Err(StreamError::StreamEnd);
        }
        let prior = self.err.take();
        let flush_result = if prior.is_none() { self.flush() } else { Ok(()) };
        self.err = None;
        let write_result = self.write_trailer(&STREAM_EOF);
        self.err = Some(StreamError::StreamEnd);
        match prior {
            Some(e) => Err(e),
            None => flush_result.and(write_result),
        }
    }

    /// The latched terminal error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&StreamError> {
        self.err.as_ref()
    }

    /// Number of chunks written to the sink so far.
    #[must_use]
    pub const fn chunks_written(&self) -> i64 {
        self.chunks_written
    }

    /// Consume the writer and return the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Record a new table's column layout and allocate its id from the
    /// `control/table` row counter. Writes no catalog rows.
    pub(crate) fn register_table(&mut self, columns: &[ColumnDef]) -> TableRef {
        let table_id = self.next_row_id(CONTROL_TABLE_ID);
        let names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();
        self.tables.insert(table_id, columns.to_vec());
        TableRef::new(table_id, names)
    }

    /// Buffer the catalog rows describing a registered table: one
    /// `control/table` row, one `control/column` row per column (with the
    /// encoder-derived `fixed_bit_size` and defaulted `sort_order`), and
    /// tag rows for table and column tags.
    pub(crate) fn describe_table(&mut self, table_id: i64, table: &TableDef, columns: &[ColumnDef]) {
        let table_ref = self.control_ref(CONTROL_TABLE_ID);
        let table_tag_ref = self.control_ref(CONTROL_TABLE_TAG_ID);
        let column_ref = self.control_ref(CONTROL_COLUMN_ID);
        let column_tag_ref = self.control_ref(CONTROL_COLUMN_TAG_ID);

        self.insert_with_id(
            &table_ref,
            table_id,
            &[
                Value::from(table_id),
                Value::Zero,
                Value::from(table.name.as_str()),
                Value::from(table.comment.as_str()),
            ],
        );
        for tag in &table.tags {
            let id = self.next_row_id(CONTROL_TABLE_TAG_ID);
            self.insert_with_id(
                &table_tag_ref,
                id,
                &[Value::from(id), Value::from(table_id), Value::from(tag.as_i64())],
            );
        }

        for (index, col) in columns.iter().enumerate() {
            let column_id = self.next_row_id(CONTROL_COLUMN_ID);
            let sort_order =
                if col.sort_order != 0 { col.sort_order } else { index as i64 + 1 };
            self.insert_with_id(
                &column_ref,
                column_id,
                &[
                    Value::from(column_id),
                    Value::Zero,
                    Value::from(table_id),
                    Value::from(col.field_type.wire_id()),
                    Value::from(col.link),
                    Value::from(col.key),
                    Value::from(col.nullable),
                    Value::from(col.length),
                    Value::from(col.field_type.bit_size()),
                    Value::from(sort_order),
                    Value::from(col.name.as_str()),
                    col.default.clone().unwrap_or(Value::Null),
                    Value::from(col.comment.as_str()),
                ],
            );
            for tag in &col.tags {
                let id = self.next_row_id(CONTROL_COLUMN_TAG_ID);
                self.insert_with_id(
                    &column_tag_ref,
                    id,
                    &[Value::from(id), Value::from(column_id), Value::from(tag.as_i64())],
                );
            }
        }
    }

    /// A clone of a control table's handle.
    ///
    /// # Panics
    ///
    /// Panics when called with an id outside the bootstrapped catalog.
    pub(crate) fn control_ref(&self, control_id: i64) -> TableRef {
        self.control[&control_id].clone()
    }

    /// Insert with a pre-allocated row id. Used for catalog rows whose id
    /// column was drawn from the counter before the row could be built.
    fn insert_with_id(&mut self, table: &TableRef, row_id: i64, values: &[Value]) -> RowRef {
        if self.err.is_some() {
            return RowRef::sentinel();
        }
        match self.buffer_row(table, Some(row_id), values) {
            Ok(row_ref) => row_ref,
            Err(e) => {
                self.err = Some(e);
                RowRef::sentinel()
            }
        }
    }

    fn buffer_row(
        &mut self,
        table: &TableRef,
        row_id: Option<i64>,
        values: &[Value],
    ) -> StreamResult<RowRef> {
        if !table.invalid_columns().is_empty() {
            return Err(StreamError::InvalidColumns {
                names: table.invalid_columns().to_vec(),
            });
        }
        if values.len() != table.selected().len() {
            return Err(StreamError::ValueCountMismatch {
                table_id: table.table_id(),
                expected: table.selected().len(),
                actual: values.len(),
            });
        }

        let row = {
            let columns = self
                .tables
                .get(&table.table_id())
                .ok_or(StreamError::UnknownTable { table_id: table.table_id() })?;
            let mut row = Vec::with_capacity(MARKER_ROW.len() + values.len() * 8);
            row.extend_from_slice(&MARKER_ROW);
            for (name, value) in table.selected().iter().zip(values) {
                let col = columns.iter().find(|c| &c.name == name).ok_or_else(|| {
                    StreamError::UnknownColumn { table_id: table.table_id(), name: name.clone() }
                })?;
                encode_field(col, value, &mut row)?;
            }
            row
        };

        let row_id = match row_id {
            Some(id) => id,
            None => self.next_row_id(table.table_id()),
        };
        self.row_buffer.entry(table.table_id()).or_default().push(row);
        Ok(RowRef::new(table.table_id(), row_id))
    }

    fn flush_buffered(&mut self) -> StreamResult<()> {
        if !self.header_written {
            self.sink.write_all(&STREAM_HEADER)?;
            self.header_written = true;
        }
        let buffered = mem::take(&mut self.row_buffer);
        for (table_id, rows) in &buffered {
            self.chunk_buf.clear();
            frame::encode_chunk(&mut self.chunk_buf, *table_id, rows)?;
            self.sink.write_all(&self.chunk_buf)?;
            self.chunks_written += 1;
            debug!(
                table_id,
                rows = rows.len(),
                bytes = self.chunk_buf.len(),
                "wrote chunk"
            );
        }
        self.chunk_buf.clear();
        Ok(())
    }

    fn write_trailer(&mut self, trailer: &[u8; 2]) -> StreamResult<()> {
        if !self.header_written {
            self.sink.write_all(&STREAM_HEADER)?;
            self.header_written = true;
        }
        self.sink.write_all(trailer)?;
        Ok(())
    }

    fn next_row_id(&mut self, table_id: i64) -> i64 {
        let counter = self.row_ids.entry(table_id).or_insert(0);
        *counter += 1;
        *counter
    }
}
