//! Stream error types and result alias.

use std::io;

use tablestream_core::CoreError;

/// Result type alias for stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Errors that can occur while writing or reading a table stream.
///
/// The writer latches the first error it hits and returns clones of it
/// from every later call, so the enum is `Clone`; I/O failures are
/// captured as their display string rather than the raw `io::Error`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// I/O error on the underlying byte sink or source.
    #[error("i/o error: {0}")]
    Io(String),

    /// A field codec rejected a value.
    #[error(transparent)]
    Encode(#[from] CoreError),

    /// A table handle carries column names that do not exist on the table.
    #[error("invalid column names: {names:?}")]
    InvalidColumns {
        /// The unknown names, in selection order.
        names: Vec<String>,
    },

    /// An insert supplied the wrong number of values.
    #[error("table {table_id} insert expects {expected} values, got {actual}")]
    ValueCountMismatch {
        /// The target table.
        table_id: i64,
        /// Selected column count of the handle.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// An insert targeted a table this writer never defined.
    #[error("table {table_id} is not defined on this stream")]
    UnknownTable {
        /// The unrecognized table id.
        table_id: i64,
    },

    /// A selected column has no layout entry on the table.
    #[error("table {table_id} has no column {name:?}")]
    UnknownColumn {
        /// The target table.
        table_id: i64,
        /// The missing column name.
        name: String,
    },

    /// A buffered row is too short to carry its marker.
    #[error("invalid row payload for table {table_id}: {length} bytes")]
    InvalidRow {
        /// The target table.
        table_id: i64,
        /// Byte length of the malformed row.
        length: usize,
    },

    /// The stream does not conform to the expected layout.
    #[error("invalid stream format: {0}")]
    InvalidFormat(String),

    /// A marker byte pair was not one of the known sentinels.
    #[error("unexpected marker {marker:02X?} at offset {offset}")]
    UnexpectedMarker {
        /// Stream offset of the marker.
        offset: u64,
        /// The two marker bytes found.
        marker: [u8; 2],
    },

    /// The stream ended in the middle of a structure.
    #[error("stream truncated at offset {offset}")]
    Truncated {
        /// Byte offset where truncation was detected.
        offset: u64,
    },

    /// The stream was terminated with a cancel trailer; its content must
    /// be discarded.
    #[error("stream cancel")]
    StreamCancel,

    /// The stream has been closed or cancelled; the writer is unusable.
    #[error("stream end")]
    StreamEnd,
}

impl From<io::Error> for StreamError {
    fn from(e: io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl StreamError {
    /// Returns true if this error indicates a malformed stream.
    #[must_use]
    pub const fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::InvalidFormat(_) | Self::UnexpectedMarker { .. } | Self::Truncated { .. }
        )
    }
}
