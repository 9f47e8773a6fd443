//! Table and column descriptors.

use serde::{Deserialize, Serialize};

use super::field::{FieldType, Tag, Tags};
use super::value::Value;

/// Describes a table to be defined on a stream.
///
/// The `/` character in names is conventional namespacing, e.g.
/// `control/column`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    /// Table name. Must be non-empty.
    pub name: String,
    /// Free-form comment stored in the catalog.
    pub comment: String,
    /// Tags attached to the table.
    pub tags: Tags,
}

impl TableDef {
    /// Create a table descriptor with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), comment: String::new(), tags: Tags::new() }
    }

    /// Set the table comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Attach a tag to the table.
    #[must_use]
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }
}

/// Describes one column of a table.
///
/// `length` means "maximum Unicode scalar count" for [`FieldType::Text`]
/// and "maximum byte count" for [`FieldType::Bytes`]; zero is unbounded.
/// The encoder-derived `fixed_bit_size` catalog field is not part of this
/// descriptor; it is computed from the field type when the catalog row is
/// written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name, unique within its table.
    pub name: String,
    /// The column's field type.
    pub field_type: FieldType,
    /// Catalog id of a linked column (foreign key). Zero means none.
    pub link: i64,
    /// Whether the column is part of the table key.
    pub key: bool,
    /// Whether the column accepts [`Value::Null`].
    pub nullable: bool,
    /// Maximum scalar count (`Text`) or byte count (`Bytes`). Zero is unbounded.
    pub length: i64,
    /// Preferred display order relative to sibling columns.
    /// Zero means "use the positional index".
    pub sort_order: i64,
    /// Default value. `None` is recorded as null in the catalog.
    pub default: Option<Value>,
    /// Free-form comment stored in the catalog.
    pub comment: String,
    /// Tags attached to the column.
    pub tags: Tags,
}

impl ColumnDef {
    /// Create a column descriptor with the given name and field type.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            link: 0,
            key: false,
            nullable: false,
            length: 0,
            sort_order: 0,
            default: None,
            comment: String::new(),
            tags: Tags::new(),
        }
    }

    /// Mark the column as part of the table key.
    #[must_use]
    pub const fn key(mut self) -> Self {
        self.key = true;
        self
    }

    /// Mark the column as nullable.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Set the maximum scalar count (`Text`) or byte count (`Bytes`).
    #[must_use]
    pub const fn length(mut self, length: i64) -> Self {
        self.length = length;
        self
    }

    /// Link this column to another column's catalog id.
    #[must_use]
    pub const fn link(mut self, column_id: i64) -> Self {
        self.link = column_id;
        self
    }

    /// Set the preferred display order.
    #[must_use]
    pub const fn sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Set the default value.
    #[must_use]
    pub fn default_value(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Set the column comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Attach a tag to the column.
    #[must_use]
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }
}
