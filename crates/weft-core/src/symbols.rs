//! Id-space split between plain names and literal symbols.
//!
//! Lexeme-type and pattern names occupy the dense id range below
//! `MAX_PATTERN_TERM_NAME_ID`. Literal symbols (a string value scoped to a
//! lexeme type) are interned in their own table and shifted above the
//! boundary, so a symbol id can never collide with a name id.
//!
//! A symbol's table key packs the owning type id in front of the literal
//! text. The prefix is length-delimited, which makes keys for different
//! types prefix-free: the same literal under two types yields two distinct
//! keys, and the type id can be decoded back out of the key.

use crate::name_table::NameId;

/// Upper bound (exclusive) for lexeme-type and pattern name ids.
/// Symbol ids start here.
pub const MAX_PATTERN_TERM_NAME_ID: u32 = 1 << 24;

/// Shift a dense symbol-table id into the symbol id range.
#[inline]
pub fn symbol_id(dense: NameId) -> u32 {
    dense.as_u32() + MAX_PATTERN_TERM_NAME_ID
}

/// Whether an id refers to a literal symbol rather than a plain name.
#[inline]
pub fn is_symbol_id(id: u32) -> bool {
    id > MAX_PATTERN_TERM_NAME_ID
}

/// Build the packed table key for a literal scoped to `type_id`.
///
/// Layout: one byte holding the digit count of `type_id + 1`, the decimal
/// digits of `type_id + 1`, then the literal text. Type 16 with literal
/// `"go"` packs to `"217go"`.
pub fn symbol_key(type_id: NameId, literal: &str) -> String {
    let tag = (type_id.as_u32() + 1).to_string();
    let mut key = String::with_capacity(1 + tag.len() + literal.len());
    key.push((b'0' + tag.len() as u8) as char);
    key.push_str(&tag);
    key.push_str(literal);
    key
}

/// Decode the originating type id from a packed symbol key.
pub fn symbol_type_id(key: &str) -> Option<NameId> {
    let first = *key.as_bytes().first()?;
    if !first.is_ascii_digit() || first == b'0' {
        return None;
    }
    let digits = (first - b'0') as usize;
    let tag = key.get(1..1 + digits)?;
    let value: u32 = tag.parse().ok()?;
    if value == 0 {
        return None;
    }
    Some(NameId::from_raw(value - 1))
}
