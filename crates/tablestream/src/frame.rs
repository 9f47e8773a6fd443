//! Byte-level framing.
//!
//! A stream is a header, a sequence of chunks, and exactly one trailer:
//!
//! ```text
//! HEADER := SOH "SCD01" NUL STX
//! CHUNK  := FS 'C' chunk_size table_id row_count
//!           row_count x { row_type: u8, offset: i64 }
//!           row payloads (each beginning RS 'R')
//! CANCEL := FS CAN
//! EOF    := FS EOT
//! ```
//!
//! All integers are 64-bit little-endian. `chunk_size` counts from the
//! first byte of `table_id` through the last payload byte; row offsets
//! are measured from that same origin and point at each row's `RS` byte.
//! Markers are built from ASCII control characters so a misaligned reader
//! fails fast instead of misparsing row data.

use crate::error::{StreamError, StreamResult};

/// ASCII `SOH` (start of header). First byte of the stream.
pub const SOH: u8 = 0x01;
/// ASCII `STX` (start of text). Last byte of the stream header.
pub const STX: u8 = 0x02;
/// ASCII `EOT` (end of transmission). Second byte of the EOF trailer.
pub const EOT: u8 = 0x04;
/// ASCII `CAN` (cancel). Second byte of the cancel trailer.
pub const CAN: u8 = 0x18;
/// ASCII `FS` (file separator). Introduces chunks and trailers.
pub const FS: u8 = 0x1C;
/// ASCII `RS` (record separator). Introduces rows.
pub const RS: u8 = 0x1E;

/// Stream header: `SOH "SCD01" NUL STX`.
pub const STREAM_HEADER: [u8; 8] = [SOH, b'S', b'C', b'D', b'0', b'1', 0x00, STX];
/// Cancel trailer. A reader must discard the stream's content.
pub const STREAM_CANCEL: [u8; 2] = [FS, CAN];
/// Normal end-of-stream trailer.
pub const STREAM_EOF: [u8; 2] = [FS, EOT];
/// Chunk marker.
pub const MARKER_CHUNK: [u8; 2] = [FS, b'C'];
/// Row marker.
pub const MARKER_ROW: [u8; 2] = [RS, b'R'];

/// Row type byte of an ordinary data row.
pub const ROW_TYPE_DATA: u8 = b'R';
/// Row type byte of an out-of-line field value. Reserved; never emitted.
pub const ROW_TYPE_FIELD_VALUE: u8 = b'F';

/// Upper bound on `chunk_size` accepted by the reader. A corrupt size
/// field must not drive seeks or allocations past this.
pub(crate) const MAX_CHUNK_SIZE: i64 = 1 << 30;

const SIZE_OF_TABLE_ID: usize = 8;
const SIZE_OF_ROW_COUNT: usize = 8;
const SIZE_OF_PER_ROW_HEADER: usize = 1 + 8; // row_type + offset

/// Size of the chunk body header: table id, row count, and the row
/// offset list. The first row offset always equals this.
#[must_use]
pub const fn chunk_header_size(row_count: usize) -> usize {
    SIZE_OF_TABLE_ID + SIZE_OF_ROW_COUNT + row_count * SIZE_OF_PER_ROW_HEADER
}

/// Assemble one chunk for `table_id` from the buffered rows, appending it
/// to `buf`. Each row must already carry its `RS` marker.
pub(crate) fn encode_chunk(
    buf: &mut Vec<u8>,
    table_id: i64,
    rows: &[Vec<u8>],
) -> StreamResult<()> {
    let mut chunk_size = chunk_header_size(rows.len()) as i64;
    let mut offsets = Vec::with_capacity(rows.len());
    for row in rows {
        if row.len() < 2 || row[0] != RS {
            return Err(StreamError::InvalidRow { table_id, length: row.len() });
        }
        offsets.push((row[1], chunk_size));
        chunk_size += row.len() as i64;
    }

    buf.extend_from_slice(&MARKER_CHUNK);
    buf.extend_from_slice(&chunk_size.to_le_bytes());
    buf.extend_from_slice(&table_id.to_le_bytes());
    buf.extend_from_slice(&(rows.len() as i64).to_le_bytes());
    for (row_type, offset) in offsets {
        buf.push(row_type);
        buf.extend_from_slice(&offset.to_le_bytes());
    }
    for row in rows {
        buf.extend_from_slice(row);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(payload: &[u8]) -> Vec<u8> {
        let mut r = MARKER_ROW.to_vec();
        r.extend_from_slice(payload);
        r
    }

    #[test]
    fn test_header_bytes() {
        assert_eq!(STREAM_HEADER, [0x01, b'S', b'C', b'D', b'0', b'1', 0x00, 0x02]);
        assert_eq!(STREAM_CANCEL, [0x1C, 0x18]);
        assert_eq!(STREAM_EOF, [0x1C, 0x04]);
    }

    #[test]
    fn test_chunk_layout() {
        let rows = vec![row(b"abc"), row(b"defgh")];
        let mut buf = Vec::new();
        encode_chunk(&mut buf, 9, &rows).unwrap();

        assert_eq!(&buf[..2], &MARKER_CHUNK);
        let header_size = chunk_header_size(2) as i64;
        let chunk_size = i64::from_le_bytes(buf[2..10].try_into().unwrap());
        assert_eq!(chunk_size, header_size + 5 + 7);
        // chunk_size counts from table_id to the last payload byte
        assert_eq!(buf.len(), 2 + 8 + chunk_size as usize);

        let table_id = i64::from_le_bytes(buf[10..18].try_into().unwrap());
        assert_eq!(table_id, 9);
        let row_count = i64::from_le_bytes(buf[18..26].try_into().unwrap());
        assert_eq!(row_count, 2);

        // offset list: row type then offset from start of chunk body
        assert_eq!(buf[26], ROW_TYPE_DATA);
        let first = i64::from_le_bytes(buf[27..35].try_into().unwrap());
        assert_eq!(first, header_size);
        assert_eq!(buf[35], ROW_TYPE_DATA);
        let second = i64::from_le_bytes(buf[36..44].try_into().unwrap());
        assert_eq!(second, header_size + 5);

        // each offset lands on the row's RS marker
        let body = &buf[10..];
        assert_eq!(body[first as usize], RS);
        assert_eq!(body[second as usize], RS);
    }

    #[test]
    fn test_empty_chunk() {
        let mut buf = Vec::new();
        encode_chunk(&mut buf, 3, &[]).unwrap();
        let chunk_size = i64::from_le_bytes(buf[2..10].try_into().unwrap());
        assert_eq!(chunk_size, chunk_header_size(0) as i64);
    }

    #[test]
    fn test_rejects_short_row() {
        let mut buf = Vec::new();
        let err = encode_chunk(&mut buf, 3, &[vec![RS]]).unwrap_err();
        assert_eq!(err, StreamError::InvalidRow { table_id: 3, length: 1 });
    }

    #[test]
    fn test_rejects_unmarked_row() {
        let mut buf = Vec::new();
        let err = encode_chunk(&mut buf, 3, &[b"xx".to_vec()]).unwrap_err();
        assert!(matches!(err, StreamError::InvalidRow { .. }));
    }
}
