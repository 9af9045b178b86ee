//! Builtin type vocabulary: the classes every compilation unit can see without a prelude.
//!
//! Each class entry carries its declaration in colit surface syntax. The frontend parses these
//! declarations into its symbol table before any user code, so the builtin hierarchy (variance, supertypes,
//! builder interfaces) is described once, in the language itself.
//!
//! ## Notes
//! - `Nothing` is the bottom type and has no declaration: the frontend maps it to a dedicated type variant.
//! - Lookup via [`from_str`] is **case-sensitive**.
//!
//! ## Examples
//! ```rust
//! use colit_core::lang::types::builtins::{self, BuiltinTypeId};
//!
//! assert_eq!(builtins::from_str("List"), Some(BuiltinTypeId::List));
//! assert!(builtins::info_for(BuiltinTypeId::Nothing).declaration.is_none());
//! ```

use crate::lang::registry::{Since, Stability};

/// Stable identifier for builtin types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinTypeId {
    Any,
    Nothing,
    Unit,
    Boolean,
    Number,
    Int,
    Double,
    String,
    Collection,
    List,
    Set,
    MutableList,
    Map,
    SequenceBuilder,
    DictionaryBuilder,
}

/// Metadata for a builtin type.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinTypeInfo {
    pub id: BuiltinTypeId,
    pub canonical: &'static str,
    /// Class declaration in surface syntax, `None` for types that are not classes.
    pub declaration: Option<&'static str>,
    pub description: &'static str,
    pub since: Since,
    pub stability: Stability,
}

/// Registry of builtin types.
pub const BUILTIN_TYPES: &[BuiltinTypeInfo] = &[
    info(BuiltinTypeId::Any, "Any", Some("class Any"), "Root of the class hierarchy."),
    info(BuiltinTypeId::Nothing, "Nothing", None, "Bottom type: a subtype of every type."),
    info(BuiltinTypeId::Unit, "Unit", Some("class Unit"), "Result type of calls evaluated for effect."),
    info(BuiltinTypeId::Boolean, "Boolean", Some("class Boolean"), "`true` or `false`."),
    info(BuiltinTypeId::Number, "Number", Some("class Number"), "Common supertype of numeric classes."),
    info(BuiltinTypeId::Int, "Int", Some("class Int : Number"), "Integer literal type."),
    info(BuiltinTypeId::Double, "Double", Some("class Double : Number"), "Floating point literal type."),
    info(BuiltinTypeId::String, "String", Some("class String"), "String literal type."),
    info(
        BuiltinTypeId::Collection,
        "Collection",
        Some("class Collection<out E>"),
        "Read-only collection of elements.",
    ),
    info(
        BuiltinTypeId::List,
        "List",
        Some("class List<out E> : Collection<E>"),
        "Ordered read-only sequence; the default sequence container.",
    ),
    info(
        BuiltinTypeId::Set,
        "Set",
        Some("class Set<out E> : Collection<E>"),
        "Read-only set of unique elements.",
    ),
    info(
        BuiltinTypeId::MutableList,
        "MutableList",
        Some("class MutableList<E> : List<E>"),
        "Growable list; invariant in its element type.",
    ),
    info(
        BuiltinTypeId::Map,
        "Map",
        Some("class Map<K, out V>"),
        "Read-only key/value mapping; the default dictionary container.",
    ),
    info(
        BuiltinTypeId::SequenceBuilder,
        "SequenceBuilder",
        Some("class SequenceBuilder<C, E> { fun add(element: E): Unit }"),
        "Receiver of a sequence literal's configuration block.",
    ),
    info(
        BuiltinTypeId::DictionaryBuilder,
        "DictionaryBuilder",
        Some("class DictionaryBuilder<C, K, V> { fun add(key: K, value: V): Unit }"),
        "Receiver of a dictionary literal's configuration block.",
    ),
];

const fn info(
    id: BuiltinTypeId,
    canonical: &'static str,
    declaration: Option<&'static str>,
    description: &'static str,
) -> BuiltinTypeInfo {
    BuiltinTypeInfo {
        id,
        canonical,
        declaration,
        description,
        since: Since(0, 1),
        stability: Stability::Stable,
    }
}

/// Return the canonical spelling for a builtin type.
pub fn as_str(id: BuiltinTypeId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a builtin type.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (a bug in this module).
pub fn info_for(id: BuiltinTypeId) -> &'static BuiltinTypeInfo {
    BUILTIN_TYPES
        .iter()
        .find(|t| t.id == id)
        .expect("builtin type info missing")
}

/// Look up a builtin type by its spelling.
pub fn from_str(s: &str) -> Option<BuiltinTypeId> {
    BUILTIN_TYPES.iter().find(|t| t.canonical == s).map(|t| t.id)
}

/// Concatenate every builtin class declaration into one source unit.
pub fn declarations_source() -> String {
    BUILTIN_TYPES
        .iter()
        .filter_map(|t| t.declaration)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declarations_name_their_own_class() {
        for t in BUILTIN_TYPES {
            if let Some(decl) = t.declaration {
                let head = decl.trim_start_matches("class ");
                assert!(head.starts_with(t.canonical), "{decl}");
            }
        }
    }

    #[test]
    fn nothing_is_the_only_declarationless_type() {
        let missing: Vec<_> = BUILTIN_TYPES.iter().filter(|t| t.declaration.is_none()).collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].id, BuiltinTypeId::Nothing);
    }

    #[test]
    fn declarations_source_has_one_line_per_class() {
        let src = declarations_source();
        assert_eq!(src.lines().count(), BUILTIN_TYPES.len() - 1);
    }
}
