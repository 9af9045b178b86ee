//! Shareable metadata for `colit_core::lang` registries.
//!
//! The registries in `colit_core::lang` are **registry-first** vocabularies. This submodule provides the small,
//! dependency-free metadata types reused across all of them.
//!
//! ## Notes
//! - These types are `Copy`-friendly so registries can live in `const` tables.
//! - Metadata is meant for tooling/docs/diagnostics; enforcement of syntax rules lives in the lexer/parser.

/// Identify the language version a vocabulary item is available since, as `(major, minor)`.
///
/// ## Examples
/// ```rust
/// use colit_core::lang::registry::Since;
///
/// let since = Since(0, 1);
/// assert_eq!(since.to_string(), "0.1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Since(pub u16, pub u16);

impl std::fmt::Display for Since {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.0, self.1)
    }
}

/// Describe the lifecycle status of a language vocabulary item.
///
/// ## Notes
/// - This is intended for docs/tooling, not for feature-gating by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    Draft,
    Deprecated,
}

/// Represent a small example snippet for documentation.
#[derive(Debug, Clone, Copy)]
pub struct Example {
    pub code: &'static str,
    pub note: Option<&'static str>,
}
