//! Core data structures shared across the Weft workspace.
//!
//! Two concerns live here:
//! - `name_table` - case-insensitive string interning with dense 1-based ids
//! - `symbols` - the id space split between plain names and literal symbols,
//!   and the packed-key encoding that scopes a literal to its lexeme type

mod name_table;
mod symbols;

#[cfg(test)]
mod name_table_tests;

pub use name_table::{NameId, NameTable};
pub use symbols::{MAX_PATTERN_TERM_NAME_ID, is_symbol_id, symbol_id, symbol_key, symbol_type_id};
