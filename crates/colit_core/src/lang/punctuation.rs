//! Punctuation vocabulary.
//!
//! This module defines the canonical set of punctuation tokens used by the lexer/parser:
//! delimiters, separators, access markers and the type-level `->` and `&`.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - This module is vocabulary only (spellings + metadata). It does not tokenize source text.
//!
//! ## Examples
//! ```rust
//! use colit_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::from_str("->"), Some(PunctuationId::Arrow));
//! assert_eq!(punctuation::as_str(PunctuationId::LBracket), "[");
//! ```

use super::registry::{Since, Stability};

/// Broad syntactic grouping for punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationCategory {
    /// Brackets, braces, parentheses and angle brackets.
    Delimiter,
    /// Separators like `,`, `:` and `;`.
    Separator,
    /// The member access marker `.`.
    Access,
    /// Type-level markers like `->` and `&`.
    TypeMarker,
    /// The binding marker `=`.
    Binding,
}

/// Stable identifier for punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    // Separators
    Comma,
    Colon,
    Semicolon,

    // Access
    Dot,

    // Type markers
    Arrow,
    Amp,

    // Binding
    Eq,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Lt,
    Gt,
}

/// Metadata for a punctuation token.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationInfo {
    pub id: PunctuationId,
    pub canonical: &'static str,
    pub category: PunctuationCategory,
    pub since: Since,
    pub stability: Stability,
}

/// Registry of all punctuation tokens.
///
/// ## Notes
/// - Multi-character spellings come before their single-character prefixes so a greedy scan over this
///   table picks the longest match.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    info(PunctuationId::Arrow, "->", PunctuationCategory::TypeMarker),
    info(PunctuationId::Comma, ",", PunctuationCategory::Separator),
    info(PunctuationId::Colon, ":", PunctuationCategory::Separator),
    info(PunctuationId::Semicolon, ";", PunctuationCategory::Separator),
    info(PunctuationId::Dot, ".", PunctuationCategory::Access),
    info(PunctuationId::Amp, "&", PunctuationCategory::TypeMarker),
    info(PunctuationId::Eq, "=", PunctuationCategory::Binding),
    info(PunctuationId::LParen, "(", PunctuationCategory::Delimiter),
    info(PunctuationId::RParen, ")", PunctuationCategory::Delimiter),
    info(PunctuationId::LBracket, "[", PunctuationCategory::Delimiter),
    info(PunctuationId::RBracket, "]", PunctuationCategory::Delimiter),
    info(PunctuationId::LBrace, "{", PunctuationCategory::Delimiter),
    info(PunctuationId::RBrace, "}", PunctuationCategory::Delimiter),
    info(PunctuationId::Lt, "<", PunctuationCategory::Delimiter),
    info(PunctuationId::Gt, ">", PunctuationCategory::Delimiter),
];

const fn info(id: PunctuationId, canonical: &'static str, category: PunctuationCategory) -> PunctuationInfo {
    PunctuationInfo {
        id,
        canonical,
        category,
        since: Since(0, 1),
        stability: Stability::Stable,
    }
}

/// Return the canonical spelling for a punctuation token.
pub fn as_str(id: PunctuationId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a punctuation token.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (a bug in this module).
pub fn info_for(id: PunctuationId) -> &'static PunctuationInfo {
    PUNCTUATION
        .iter()
        .find(|p| p.id == id)
        .expect("punctuation info missing")
}

/// Look up a punctuation token by its exact spelling.
pub fn from_str(s: &str) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.canonical == s).map(|p| p.id)
}

/// Find the longest punctuation token at the start of `s`.
///
/// ## Returns
/// - `Some((id, len))` where `len` is the byte length of the matched spelling.
pub fn longest_prefix(s: &str) -> Option<(PunctuationId, usize)> {
    PUNCTUATION
        .iter()
        .filter(|p| s.starts_with(p.canonical))
        .max_by_key(|p| p.canonical.len())
        .map(|p| (p.id, p.canonical.len()))
}
