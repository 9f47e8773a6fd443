//! Stream reader.
//!
//! [`Reader`] is the consuming half of the codec. It validates the stream
//! header, then walks forward marker by marker, indexing every chunk by
//! table id using the row-offset list embedded in the chunk header. Once
//! indexed, individual rows can be fetched by position without scanning.
//!
//! Rows are surfaced as raw payload bytes. Decoding individual field
//! values requires the control-catalog schema and, for rows with more
//! than one variable-length column, the out-of-line value stanzas the
//! format reserves but does not emit yet.
//!
//! A stream that terminates with the cancel trailer surfaces
//! [`StreamError::StreamCancel`]: its content must be discarded.

use std::collections::BTreeMap;
use std::io::{self, Read, Seek, SeekFrom};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StreamError, StreamResult};
use crate::frame::{
    chunk_header_size, CAN, EOT, FS, MAX_CHUNK_SIZE, RS, STREAM_HEADER,
};

/// Location of one chunk within the stream, with its embedded row index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkIndex {
    /// Stream offset of the chunk body (the first byte of `table_id`).
    pub body_offset: u64,
    /// Size of the chunk body in bytes, as recorded in the chunk header.
    pub chunk_size: i64,
    /// The table this chunk's rows belong to.
    pub table_id: i64,
    /// Number of rows in the chunk.
    pub row_count: i64,
    /// The row-offset list: one entry per row, in row order.
    pub rows: Vec<RowIndexEntry>,
}

/// One entry of a chunk's row-offset list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowIndexEntry {
    /// The row's type byte (`'R'` for data rows).
    pub row_type: u8,
    /// Offset of the row's `RS` marker, measured from the chunk body start.
    pub offset: i64,
}

/// One row fetched from a chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowData {
    /// The row's type byte.
    pub row_type: u8,
    /// The row payload, marker stripped.
    pub data: Vec<u8>,
}

/// Reads a table stream, indexing chunks for random access by table id.
#[derive(Debug)]
pub struct Reader<R: Read + Seek> {
    src: R,
    position: u64,
    chunks: BTreeMap<i64, Vec<ChunkIndex>>,
}

impl<R: Read + Seek> Reader<R> {
    /// Open a stream and validate its header.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidFormat`] when the source is shorter
    /// than the header or does not begin with it.
    pub fn open(mut src: R) -> StreamResult<Self> {
        src.seek(SeekFrom::Start(0))?;
        let mut header = [0u8; STREAM_HEADER.len()];
        src.read_exact(&mut header)
            .map_err(|_| StreamError::InvalidFormat("stream too small for header".into()))?;
        if header != STREAM_HEADER {
            return Err(StreamError::InvalidFormat(format!(
                "invalid stream header: {header:02X?}"
            )));
        }
        Ok(Self { src, position: STREAM_HEADER.len() as u64, chunks: BTreeMap::new() })
    }

    /// Walk the stream from the header to the trailer, indexing every
    /// chunk.
    ///
    /// # Errors
    ///
    /// Surfaces [`StreamError::StreamCancel`] on the cancel trailer,
    /// [`StreamError::Truncated`] when the stream ends before a trailer,
    /// and [`StreamError::UnexpectedMarker`] on unknown marker bytes.
    pub fn index(&mut self) -> StreamResult<()> {
        loop {
            let marker_offset = self.position;
            let mut marker = [0u8; 2];
            self.read_at(marker_offset, &mut marker)?;
            self.position += 2;
            if marker[0] != FS {
                return Err(StreamError::UnexpectedMarker { offset: marker_offset, marker });
            }
            match marker[1] {
                b'C' => self.index_chunk()?,
                EOT => {
                    debug!(
                        tables = self.chunks.len(),
                        bytes = self.position,
                        "stream indexed"
                    );
                    return Ok(());
                }
                CAN => return Err(StreamError::StreamCancel),
                _ => {
                    return Err(StreamError::UnexpectedMarker { offset: marker_offset, marker })
                }
            }
        }
    }

    /// Table ids with at least one indexed chunk, ascending.
    #[must_use]
    pub fn table_ids(&self) -> Vec<i64> {
        self.chunks.keys().copied().collect()
    }

    /// The indexed chunks of a table, in stream order.
    #[must_use]
    pub fn chunks(&self, table_id: i64) -> &[ChunkIndex] {
        self.chunks.get(&table_id).map_or(&[], Vec::as_slice)
    }

    /// Total row count of a table across all its chunks.
    #[must_use]
    pub fn row_count(&self, table_id: i64) -> i64 {
        self.chunks(table_id).iter().map(|c| c.row_count).sum()
    }

    /// Fetch one row of a chunk by its position in the row-offset list.
    ///
    /// # Errors
    ///
    /// Returns an error when the index is out of range, the recorded
    /// offset does not land on an `RS` marker with the recorded row type,
    /// or the stream is truncated.
    pub fn read_row(&mut self, chunk: &ChunkIndex, row: usize) -> StreamResult<RowData> {
        let entry = *chunk.rows.get(row).ok_or_else(|| {
            StreamError::InvalidFormat(format!(
                "row {row} out of range for chunk with {} rows",
                chunk.row_count
            ))
        })?;
        let end = chunk.rows.get(row + 1).map_or(chunk.chunk_size, |next| next.offset);
        if end < entry.offset + 2 {
            return Err(StreamError::InvalidFormat(format!(
                "row {row} extends from {} to {end}",
                entry.offset
            )));
        }

        let marker_offset = chunk.body_offset + entry.offset as u64;
        let mut marker = [0u8; 2];
        self.read_at(marker_offset, &mut marker)?;
        if marker[0] != RS || marker[1] != entry.row_type {
            return Err(StreamError::UnexpectedMarker { offset: marker_offset, marker });
        }

        let mut data = vec![0u8; (end - entry.offset - 2) as usize];
        self.read_at(marker_offset + 2, &mut data)?;
        Ok(RowData { row_type: entry.row_type, data })
    }

    /// Fetch every row of a table, across all its chunks, in stream order.
    pub fn rows(&mut self, table_id: i64) -> StreamResult<Vec<RowData>> {
        let chunks = self.chunks.get(&table_id).cloned().unwrap_or_default();
        let mut rows = Vec::new();
        for chunk in &chunks {
            for index in 0..chunk.rows.len() {
                rows.push(self.read_row(chunk, index)?);
            }
        }
        Ok(rows)
    }

    fn index_chunk(&mut self) -> StreamResult<()> {
        let chunk_size = self.read_i64()?;
        let body_offset = self.position;
        if chunk_size < chunk_header_size(0) as i64 || chunk_size > MAX_CHUNK_SIZE {
            return Err(StreamError::InvalidFormat(format!(
                "invalid chunk size {chunk_size} at offset {body_offset}"
            )));
        }

        let table_id = self.read_i64()?;
        let row_count = self.read_i64()?;
        if row_count < 0 || chunk_header_size(row_count as usize) as i64 > chunk_size {
            return Err(StreamError::InvalidFormat(format!(
                "chunk for table {table_id} declares {row_count} rows in {chunk_size} bytes"
            )));
        }

        let header_size = chunk_header_size(row_count as usize) as i64;
        // Capacity is capped so a corrupt row count cannot force a huge
        // allocation before the reads below hit end of stream.
        let mut rows = Vec::with_capacity(row_count.min(1024) as usize);
        for _ in 0..row_count {
            let row_type = self.read_u8()?;
            let offset = self.read_i64()?;
            if offset < header_size || offset >= chunk_size {
                return Err(StreamError::InvalidFormat(format!(
                    "row offset {offset} outside chunk body of {chunk_size} bytes"
                )));
            }
            rows.push(RowIndexEntry { row_type, offset });
        }

        self.chunks
            .entry(table_id)
            .or_default()
            .push(ChunkIndex { body_offset, chunk_size, table_id, row_count, rows });
        self.position = body_offset + chunk_size as u64;
        Ok(())
    }

    fn read_u8(&mut self) -> StreamResult<u8> {
        let mut buf = [0u8; 1];
        self.read_at(self.position, &mut buf)?;
        self.position += 1;
        Ok(buf[0])
    }

    fn read_i64(&mut self) -> StreamResult<i64> {
        let mut buf = [0u8; 8];
        self.read_at(self.position, &mut buf)?;
        self.position += 8;
        Ok(i64::from_le_bytes(buf))
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> StreamResult<()> {
        self.src.seek(SeekFrom::Start(offset))?;
        self.src.read_exact(buf).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                StreamError::Truncated { offset }
            } else {
                StreamError::from(e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::frame::{STREAM_CANCEL, STREAM_EOF};

    fn empty_stream() -> Vec<u8> {
        let mut bytes = STREAM_HEADER.to_vec();
        bytes.extend_from_slice(&STREAM_EOF);
        bytes
    }

    #[test]
    fn test_open_validates_header() {
        let mut reader = Reader::open(Cursor::new(empty_stream())).unwrap();
        reader.index().unwrap();
        assert!(reader.table_ids().is_empty());
    }

    #[test]
    fn test_open_rejects_bad_magic() {
        let mut bytes = empty_stream();
        bytes[1] = b'X';
        let err = Reader::open(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, StreamError::InvalidFormat(_)));
        assert!(err.is_corruption());
    }

    #[test]
    fn test_open_rejects_short_stream() {
        let err = Reader::open(Cursor::new(vec![0x01, b'S'])).unwrap_err();
        assert!(matches!(err, StreamError::InvalidFormat(_)));
    }

    #[test]
    fn test_cancel_trailer_surfaces() {
        let mut bytes = STREAM_HEADER.to_vec();
        bytes.extend_from_slice(&STREAM_CANCEL);
        let mut reader = Reader::open(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.index().unwrap_err(), StreamError::StreamCancel);
    }

    #[test]
    fn test_missing_trailer_is_truncation() {
        let bytes = STREAM_HEADER.to_vec();
        let mut reader = Reader::open(Cursor::new(bytes)).unwrap();
        let err = reader.index().unwrap_err();
        assert_eq!(err, StreamError::Truncated { offset: 8 });
    }

    #[test]
    fn test_unknown_marker() {
        let mut bytes = STREAM_HEADER.to_vec();
        bytes.extend_from_slice(&[0x7F, 0x7F]);
        let mut reader = Reader::open(Cursor::new(bytes)).unwrap();
        let err = reader.index().unwrap_err();
        assert_eq!(err, StreamError::UnexpectedMarker { offset: 8, marker: [0x7F, 0x7F] });
    }

    #[test]
    fn test_chunk_size_sanity() {
        let mut bytes = STREAM_HEADER.to_vec();
        bytes.extend_from_slice(&[FS, b'C']);
        bytes.extend_from_slice(&4i64.to_le_bytes()); // smaller than any body
        let mut reader = Reader::open(Cursor::new(bytes)).unwrap();
        assert!(matches!(reader.index().unwrap_err(), StreamError::InvalidFormat(_)));
    }

    #[test]
    fn test_truncated_chunk_header() {
        let mut bytes = STREAM_HEADER.to_vec();
        bytes.extend_from_slice(&[FS, b'C']);
        bytes.extend_from_slice(&100i64.to_le_bytes());
        bytes.extend_from_slice(&1i64.to_le_bytes()); // table id, then nothing
        let mut reader = Reader::open(Cursor::new(bytes)).unwrap();
        assert!(matches!(reader.index().unwrap_err(), StreamError::Truncated { .. }));
    }
}
