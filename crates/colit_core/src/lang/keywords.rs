//! Define the reserved keyword vocabulary for the colit language.
//!
//! This module is the single source of truth for reserved words: a stable identifier
//! ([`KeywordId`]) plus a const metadata table ([`KEYWORDS`]) that records canonical spellings,
//! categories, provenance, and examples.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - `Companion` is *not* a keyword: it is the conventional name of a companion object and lives in
//!   [`crate::lang::conventions`].
//!
//! ## Examples
//! ```rust
//! use colit_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("fun"), Some(KeywordId::Fun));
//! assert_eq!(keywords::as_str(KeywordId::Companion), "companion");
//! ```

use super::registry::{Example, Since, Stability};

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Declarations
    Class,
    Fun,
    Val,
    Companion,
    Object,

    // Variance modifiers
    Out,
    In,

    // Literals
    True,
    False,
}

/// High-level grouping for documentation and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Declaration,
    Modifier,
    Literal,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    pub since: Since,
    pub stability: Stability,
    pub examples: &'static [Example],
}

/// Registry of all keywords.
pub const KEYWORDS: &[KeywordInfo] = &[
    info(KeywordId::Class, "class", KeywordCategory::Declaration),
    info(KeywordId::Fun, "fun", KeywordCategory::Declaration),
    info(KeywordId::Val, "val", KeywordCategory::Declaration),
    info(KeywordId::Companion, "companion", KeywordCategory::Declaration),
    info(KeywordId::Object, "object", KeywordCategory::Declaration),
    info(KeywordId::Out, "out", KeywordCategory::Modifier),
    info(KeywordId::In, "in", KeywordCategory::Modifier),
    info(KeywordId::True, "true", KeywordCategory::Literal),
    info(KeywordId::False, "false", KeywordCategory::Literal),
];

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        since: Since(0, 1),
        stability: Stability::Stable,
        examples: &[],
    }
}

/// Return the canonical spelling for a keyword.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Return the category for a keyword.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Return the full metadata entry for a keyword.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (a bug in this module).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Look up a keyword by its spelling.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_keyword_round_trips_through_its_spelling() {
        for k in KEYWORDS {
            assert_eq!(from_str(k.canonical), Some(k.id), "{}", k.canonical);
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(from_str("Val"), None);
        assert_eq!(from_str("Companion"), None);
    }

    #[test]
    fn variance_modifiers_are_modifiers() {
        assert_eq!(category(KeywordId::Out), KeywordCategory::Modifier);
        assert_eq!(category(KeywordId::In), KeywordCategory::Modifier);
    }
}
