//! Member tag generation.
//!
//! A member's wire tag depends on the [`TagMode`]:
//!
//! | Mode | Source | Example |
//! |------|--------|---------|
//! | `Names` | declared member name | `"Value"` |
//! | `Aliases` | position in the type's flattened member list | `"a"`, `"b"` |
//! | `Ids` | registry-wide id source | `"AAAB"`, `"AAAC"` |
//!
//! Aliases count in bijective base 52 over `a..z A..Z`, so the first 52 aliases
//! are single letters and the 53rd is `aa`. Ids are fixed-width (at least four
//! characters) positional base 52 over `A..Z a..z`, which keeps consecutive ids
//! in ascending ordinal order.
//!
//! Both generators are pure functions of their counter.
//!
//! ```rust
//! use serde_graph::tags::{alias, id};
//!
//! assert_eq!(alias(0), "a");
//! assert_eq!(alias(26), "A");
//! assert_eq!(alias(52), "aa");
//! assert_eq!(id(1), "AAAB");
//! assert_eq!(id(103), "AABz");
//! ```

use crate::TagMode;

const ALIAS_ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ID_ALPHABET: &[u8; 52] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const ID_WIDTH: usize = 4;

/// Returns the alias for the member at `index` in declaration order.
#[must_use]
pub fn alias(index: usize) -> String {
    let mut n = index + 1;
    let mut digits = Vec::new();
    while n > 0 {
        n -= 1;
        digits.push(ALIAS_ALPHABET[n % 52]);
        n /= 52;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Returns the id for counter value `n`.
#[must_use]
pub fn id(n: u64) -> String {
    let mut n = n;
    let mut digits = Vec::with_capacity(ID_WIDTH);
    while n > 0 || digits.len() < ID_WIDTH {
        digits.push(ID_ALPHABET[(n % 52) as usize]);
        n /= 52;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// The three tag forms of one member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tags {
    pub name: String,
    pub alias: String,
    pub id: String,
}

impl Tags {
    /// Returns the tag for `mode`.
    #[must_use]
    pub fn get(&self, mode: TagMode) -> &str {
        match mode {
            TagMode::Names => &self.name,
            TagMode::Aliases => &self.alias,
            TagMode::Ids => &self.id,
        }
    }
}
