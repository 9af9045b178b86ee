//! Shared frontend conventions (well-known identifiers) for collection literals.
//!
//! A collection literal `[a, b]` or `[k: v]` is resolved by looking for *builder* functions that follow the
//! conventions below, then desugared into `Owner.buildFrom(n) { add(a); add(b) }`.
//!
//! ## Examples
//! ```rust
//! use colit_core::lang::conventions::{self, LiteralKind};
//!
//! let seq = conventions::literal_info(LiteralKind::Sequence);
//! assert_eq!(seq.builder_interface, "SequenceBuilder");
//! assert_eq!(seq.default_container, "List");
//! ```

/// Name of a builder function.
pub const BUILDER_FUNCTION_NAME: &str = "buildFrom";

/// Name of the member called once per literal entry inside a builder block.
pub const ADD_METHOD_NAME: &str = "add";

/// Name of a class's companion object, as written in `X.Companion`.
pub const COMPANION_NAME: &str = "Companion";

/// Type name alias for Unit.
pub const UNIT_TYPE_NAME: &str = "Unit";

/// Surface form of a collection literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LiteralKind {
    /// `[v, v, ...]`
    Sequence,
    /// `[k: v, ...]`
    Dictionary,
}

/// Per-kind conventions.
#[derive(Debug, Clone, Copy)]
pub struct LiteralKindInfo {
    pub kind: LiteralKind,
    /// Class that receives the builder block (`SequenceBuilder<C, E>`, `DictionaryBuilder<C, K, V>`).
    pub builder_interface: &'static str,
    /// Names of the element families, in `add` argument order.
    pub element_families: &'static [&'static str],
    /// Container used when nothing in the context asks for a specific one.
    pub default_container: &'static str,
    /// Supertype of every container of this kind whose type arguments are the element families.
    pub element_view: &'static str,
    /// Spelling of the empty literal.
    pub empty_spelling: &'static str,
}

/// Registry of literal kinds.
pub const LITERAL_KINDS: &[LiteralKindInfo] = &[
    LiteralKindInfo {
        kind: LiteralKind::Sequence,
        builder_interface: "SequenceBuilder",
        element_families: &["element"],
        default_container: "List",
        element_view: "Collection",
        empty_spelling: "[]",
    },
    LiteralKindInfo {
        kind: LiteralKind::Dictionary,
        builder_interface: "DictionaryBuilder",
        element_families: &["key", "value"],
        default_container: "Map",
        element_view: "Map",
        empty_spelling: "[:]",
    },
];

/// Return the conventions for a literal kind.
///
/// ## Panics
/// - If the registry is missing an entry for `kind` (a bug in this module).
pub fn literal_info(kind: LiteralKind) -> &'static LiteralKindInfo {
    LITERAL_KINDS
        .iter()
        .find(|k| k.kind == kind)
        .expect("literal kind info missing")
}

impl LiteralKind {
    /// Number of element families (`1` for sequences, `2` for dictionaries).
    pub fn family_count(self) -> usize {
        literal_info(self).element_families.len()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LiteralKind::Sequence => "sequence",
            LiteralKind::Dictionary => "dictionary",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dictionary_has_key_then_value() {
        assert_eq!(literal_info(LiteralKind::Dictionary).element_families, &["key", "value"]);
        assert_eq!(LiteralKind::Dictionary.family_count(), 2);
        assert_eq!(LiteralKind::Sequence.family_count(), 1);
    }
}
