//! Field types and metadata tags.

use serde::{Deserialize, Serialize};

/// The closed set of field types a column can have.
///
/// The numeric identifier of each variant is part of the on-wire format:
/// it is stored in the `control/fieldtype` catalog table and referenced by
/// every `control/column` row. New types cannot be added without revving
/// the stream format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// 256-bit fixed-width hash.
    Hash,
    /// 64-bit signed integer, little-endian.
    Int64,
    /// Boolean. Declared as one bit; the current codec writes a full byte.
    Bool,
    /// UTF-8 text, bounded by a maximum Unicode scalar count.
    Text,
    /// Raw bytes, bounded by a maximum byte count.
    Bytes,
    /// Opaque value, reserved for future type-tagged encoding.
    Any,
}

impl FieldType {
    /// All field types in wire-id order.
    pub const ALL: [FieldType; 6] = [
        FieldType::Hash,
        FieldType::Int64,
        FieldType::Bool,
        FieldType::Text,
        FieldType::Bytes,
        FieldType::Any,
    ];

    /// The on-wire identifier, `1..=6`.
    #[must_use]
    pub const fn wire_id(self) -> i64 {
        match self {
            Self::Hash => 1,
            Self::Int64 => 2,
            Self::Bool => 3,
            Self::Text => 4,
            Self::Bytes => 5,
            Self::Any => 6,
        }
    }

    /// Look a field type up by its on-wire identifier.
    #[must_use]
    pub const fn from_wire_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::Hash),
            2 => Some(Self::Int64),
            3 => Some(Self::Bool),
            4 => Some(Self::Text),
            5 => Some(Self::Bytes),
            6 => Some(Self::Any),
            _ => None,
        }
    }

    /// Declared size in bits. Zero for variable-length types.
    #[must_use]
    pub const fn bit_size(self) -> i64 {
        match self {
            Self::Hash => 256,
            Self::Int64 => 64,
            Self::Bool => 1,
            Self::Text | Self::Bytes | Self::Any => 0,
        }
    }

    /// Whether values of this type occupy a fixed number of bits.
    #[must_use]
    pub const fn is_fixed_size(self) -> bool {
        self.bit_size() != 0
    }

    /// The on-wire name, as seeded into `control/fieldtype`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hash => "hash",
            Self::Int64 => "int64",
            Self::Bool => "bool",
            Self::Text => "string",
            Self::Bytes => "bytes",
            Self::Any => "any",
        }
    }
}

/// A metadata flag attached to a table or column.
///
/// Tags are open-ended: beyond the built-in [`Tag::HIDDEN`], producers may
/// register new tags by inserting rows into the `control/tag` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag(i64);

impl Tag {
    /// Marks a table or column as internal; consumers should not display it.
    pub const HIDDEN: Tag = Tag(1);

    /// Create a tag with the given catalog identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The tag's catalog identifier.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

/// An ordered set of tags.
pub type Tags = Vec<Tag>;
