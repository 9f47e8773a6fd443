//! Handles identifying tables and rows on a stream.

/// An opaque handle to a defined table, optionally narrowed to a subset of
/// its columns.
///
/// Produced by the writer's `define`; narrowed by [`TableRef::use_columns`].
/// A narrowed ref may carry unknown column names; it is still valid to
/// pass to `insert`, which surfaces the error then.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    table_id: i64,
    all: Vec<String>,
    selected: Vec<String>,
    invalid: Vec<String>,
}

impl TableRef {
    /// Create a handle with all columns selected.
    #[must_use]
    pub fn new(table_id: i64, columns: Vec<String>) -> Self {
        Self { table_id, selected: columns.clone(), all: columns, invalid: Vec::new() }
    }

    /// The sentinel handle returned by a writer in terminal-error state.
    #[must_use]
    pub fn sentinel() -> Self {
        Self { table_id: -1, all: Vec::new(), selected: Vec::new(), invalid: Vec::new() }
    }

    /// Whether this handle refers to a real table.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.table_id >= 0
    }

    /// The table's catalog id.
    #[must_use]
    pub const fn table_id(&self) -> i64 {
        self.table_id
    }

    /// All column names of the table, in definition order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.all
    }

    /// The currently selected column names, in selection order.
    #[must_use]
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Selected names that do not exist on the table.
    #[must_use]
    pub fn invalid_columns(&self) -> &[String] {
        &self.invalid
    }

    /// Narrow the handle to the given columns.
    ///
    /// Unknown names are collected into [`TableRef::invalid_columns`] for
    /// deferred reporting rather than failing here.
    #[must_use]
    pub fn use_columns<I, S>(&self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selected: Vec<String> = columns.into_iter().map(Into::into).collect();
        let invalid =
            selected.iter().filter(|name| !self.all.contains(*name)).cloned().collect();
        Self { table_id: self.table_id, all: self.all.clone(), selected, invalid }
    }
}

/// An opaque handle to an inserted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRef {
    table_id: i64,
    row_id: i64,
}

impl RowRef {
    /// Create a row handle.
    #[must_use]
    pub const fn new(table_id: i64, row_id: i64) -> Self {
        Self { table_id, row_id }
    }

    /// The sentinel handle returned by a failed insert. Its row id is `-1`.
    #[must_use]
    pub const fn sentinel() -> Self {
        Self { table_id: -1, row_id: -1 }
    }

    /// Whether this handle refers to a real row.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.row_id >= 0
    }

    /// The owning table's catalog id.
    #[must_use]
    pub const fn table_id(&self) -> i64 {
        self.table_id
    }

    /// The row id within the table, assigned at insert time.
    #[must_use]
    pub const fn row_id(&self) -> i64 {
        self.row_id
    }
}
