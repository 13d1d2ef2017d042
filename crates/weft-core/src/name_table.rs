//! Case-insensitive name interning.
//!
//! Converts lexeme-type and pattern names into dense integer handles
//! (`NameId`). Lookup is case-insensitive; the first-seen spelling is kept
//! and can be recovered from the id.

use std::collections::HashMap;

/// A dense handle to an interned name.
///
/// Ids start at 1 and are assigned in insertion order; 0 is reserved for
/// "not found" (`NameId::NONE`). Ids are stable for the lifetime of the
/// owning table and are never reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize)]
#[serde(transparent)]
pub struct NameId(u32);

impl NameId {
    /// The "not found" sentinel.
    pub const NONE: NameId = NameId(0);

    /// Raw id value.
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Create a NameId from a raw value. Use only for decoding.
    #[inline]
    pub fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Whether this is the "not found" sentinel.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl PartialOrd for NameId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NameId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

/// Case-insensitive interning table with original-case reverse lookup.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    /// Map from lowercase-folded key to id.
    map: HashMap<String, NameId>,
    /// Original-case spellings, indexed by `id - 1`.
    names: Vec<String>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `key`, returning its id and whether this call created the
    /// entry. Keys differing only in case share one id; the spelling of the
    /// first occurrence is the one `key()` returns.
    pub fn get_or_create(&mut self, key: &str) -> (NameId, bool) {
        let folded = key.to_lowercase();
        if let Some(&id) = self.map.get(&folded) {
            return (id, false);
        }

        let id = NameId(self.names.len() as u32 + 1);
        self.names.push(key.to_owned());
        self.map.insert(folded, id);
        (id, true)
    }

    /// Look up `key` without creating it. Returns `NameId::NONE` if absent.
    pub fn get(&self, key: &str) -> NameId {
        self.map
            .get(&key.to_lowercase())
            .copied()
            .unwrap_or(NameId::NONE)
    }

    /// The original-case spelling for a valid id, or None.
    pub fn key(&self, id: NameId) -> Option<&str> {
        if id.is_none() {
            return None;
        }
        self.names.get(id.0 as usize - 1).map(|s| s.as_str())
    }

    /// Number of interned names.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over all names in id order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (NameId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, s)| (NameId(i as u32 + 1), s.as_str()))
    }
}
