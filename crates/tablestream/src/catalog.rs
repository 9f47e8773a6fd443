//! The control catalog.
//!
//! Every stream begins with seven built-in meta-tables that describe all
//! user tables and columns, so a consumer can decode the stream without
//! any out-of-band schema agreement. The catalog describes itself too:
//! the first rows of `control/table` and `control/column` are the control
//! tables' own definitions.
//!
//! Bootstrap runs in two phases. First all seven table shapes are
//! registered so their catalog ids are stable; then the metadata rows for
//! those same tables are inserted. Registration order is fixed and each
//! table's id is asserted at construction time; a mismatch is a
//! programmer error, not a user error, and panics.

use std::io::Write;

use tablestream_core::{ColumnDef, FieldType, TableDef, Tag, Value};

use crate::writer::Writer;

/// Catalog id of `control/version`.
pub const CONTROL_VERSION_ID: i64 = 1;
/// Catalog id of `control/tag`.
pub const CONTROL_TAG_ID: i64 = 2;
/// Catalog id of `control/table`. Its row counter allocates table ids.
pub const CONTROL_TABLE_ID: i64 = 3;
/// Catalog id of `control/table/tag`.
pub const CONTROL_TABLE_TAG_ID: i64 = 4;
/// Catalog id of `control/fieldtype`.
pub const CONTROL_FIELD_TYPE_ID: i64 = 5;
/// Catalog id of `control/column`. Its row counter allocates column ids.
pub const CONTROL_COLUMN_ID: i64 = 6;
/// Catalog id of `control/column/tag`.
pub const CONTROL_COLUMN_TAG_ID: i64 = 7;

/// The seven control table schemas, in catalog-id order.
fn control_schemas() -> [(i64, TableDef, Vec<ColumnDef>); 7] {
    [
        (
            CONTROL_VERSION_ID,
            TableDef::new("control/version"),
            vec![ColumnDef::new("version", FieldType::Hash)],
        ),
        (
            CONTROL_TAG_ID,
            TableDef::new("control/tag"),
            vec![
                ColumnDef::new("id", FieldType::Int64).key(),
                ColumnDef::new("name", FieldType::Text),
            ],
        ),
        (
            CONTROL_TABLE_ID,
            TableDef::new("control/table"),
            vec![
                ColumnDef::new("id", FieldType::Int64).key(),
                ColumnDef::new("version", FieldType::Hash).default_value(Value::Zero),
                ColumnDef::new("name", FieldType::Text),
                ColumnDef::new("comment", FieldType::Text).default_value(Value::Zero),
            ],
        ),
        (
            CONTROL_TABLE_TAG_ID,
            TableDef::new("control/table/tag"),
            vec![
                ColumnDef::new("id", FieldType::Int64).key(),
                ColumnDef::new("table", FieldType::Int64),
                ColumnDef::new("tag", FieldType::Int64),
            ],
        ),
        (
            CONTROL_FIELD_TYPE_ID,
            TableDef::new("control/fieldtype"),
            vec![
                ColumnDef::new("id", FieldType::Int64).key(),
                ColumnDef::new("bit_size", FieldType::Int64),
                ColumnDef::new("name", FieldType::Text),
            ],
        ),
        (
            CONTROL_COLUMN_ID,
            TableDef::new("control/column"),
            vec![
                ColumnDef::new("id", FieldType::Int64).key(),
                ColumnDef::new("version", FieldType::Hash)
                    .default_value(Value::Zero)
                    .tag(Tag::HIDDEN),
                ColumnDef::new("table", FieldType::Int64),
                ColumnDef::new("fieldtype", FieldType::Int64),
                ColumnDef::new("link", FieldType::Int64).nullable(),
                ColumnDef::new("key", FieldType::Bool).default_value(Value::Zero),
                ColumnDef::new("nullable", FieldType::Bool).default_value(Value::Zero),
                ColumnDef::new("length", FieldType::Int64).default_value(Value::Zero).comment(
                    "For strings this is the number of allowed characters. \
                     For bytes it is the byte count.",
                ),
                ColumnDef::new("fixed_bit_size", FieldType::Int64)
                    .default_value(Value::Zero)
                    .tag(Tag::HIDDEN),
                ColumnDef::new("sort_order", FieldType::Int64).default_value(Value::Zero),
                ColumnDef::new("name", FieldType::Text),
                ColumnDef::new("default", FieldType::Any).nullable(),
                ColumnDef::new("comment", FieldType::Text).default_value(Value::Zero),
            ],
        ),
        (
            CONTROL_COLUMN_TAG_ID,
            TableDef::new("control/column/tag"),
            vec![
                ColumnDef::new("id", FieldType::Int64).key(),
                ColumnDef::new("column", FieldType::Int64),
                ColumnDef::new("tag", FieldType::Int64),
            ],
        ),
    ]
}

impl<W: Write> Writer<W> {
    /// Register and describe the control catalog, then seed its data rows.
    ///
    /// Runs once at writer construction. Nothing is written to the sink;
    /// the first flush drains the buffered catalog rows.
    ///
    /// # Panics
    ///
    /// Panics when a control table registers with an unexpected catalog
    /// id. That means the bootstrap order itself is wrong, which no
    /// caller input can cause or fix.
    pub(crate) fn bootstrap(&mut self) {
        let schemas = control_schemas();

        // Phase 1: register all shapes so the catalog ids exist before
        // any catalog row references them.
        for (want, def, cols) in &schemas {
            let table_ref = self.register_table(cols);
            assert_eq!(
                table_ref.table_id(),
                *want,
                "{} registered with table id {}, want {}",
                def.name,
                table_ref.table_id(),
                want,
            );
            self.control.insert(*want, table_ref);
        }

        // Phase 2: the catalog describes itself.
        for (tid, def, cols) in &schemas {
            self.describe_table(*tid, def, cols);
        }

        let tag_ref = self.control_ref(CONTROL_TAG_ID);
        self.insert(&tag_ref, &[Value::from(Tag::HIDDEN.as_i64()), Value::from("hidden")]);

        let field_type_ref = self.control_ref(CONTROL_FIELD_TYPE_ID);
        for ft in FieldType::ALL {
            self.insert(
                &field_type_ref,
                &[Value::from(ft.wire_id()), Value::from(ft.bit_size()), Value::from(ft.name())],
            );
        }

        // The schema hash over the control rows is not computed yet; an
        // all-zero hash keeps the slot reserved.
        let version_ref = self.control_ref(CONTROL_VERSION_ID);
        self.insert(&version_ref, &[Value::Zero]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_are_in_catalog_order() {
        let schemas = control_schemas();
        for (index, (id, _, _)) in schemas.iter().enumerate() {
            assert_eq!(*id, index as i64 + 1);
        }
    }

    #[test]
    fn test_control_column_layout() {
        let schemas = control_schemas();
        let (_, def, cols) = &schemas[CONTROL_COLUMN_ID as usize - 1];
        assert_eq!(def.name, "control/column");
        let names: Vec<&str> = cols.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "id",
                "version",
                "table",
                "fieldtype",
                "link",
                "key",
                "nullable",
                "length",
                "fixed_bit_size",
                "sort_order",
                "name",
                "default",
                "comment",
            ],
        );
    }

    #[test]
    fn test_hidden_columns_are_tagged() {
        let schemas = control_schemas();
        let (_, _, cols) = &schemas[CONTROL_COLUMN_ID as usize - 1];
        let hidden: Vec<&str> = cols
            .iter()
            .filter(|c| c.tags.contains(&Tag::HIDDEN))
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(hidden, ["version", "fixed_bit_size"]);
    }
}
