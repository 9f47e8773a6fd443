//! Field value encoding.
//!
//! The writer turns each row into bytes by running every selected column's
//! value through its field codec. Fixed-width types (`Hash`, `Int64`,
//! `Bool`) produce exact byte counts derived from their declared bit
//! sizes; variable-width types (`Text`, `Bytes`) produce their payload
//! verbatim, bounded by the column's `length`.

mod field;

#[cfg(test)]
mod proptest_tests;

pub use field::encode_field;
