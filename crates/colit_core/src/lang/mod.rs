//! colit language vocabulary registries.
//!
//! This module is the “front door” for language-level vocabulary: reserved keywords, punctuation,
//! builtin classes, literal conventions and the standard prelude.
//!
//! The design goal is to avoid stringly-typed checks scattered across the frontend. Callers work with
//! **stable IDs** (e.g. `KeywordId`, `BuiltinTypeId`) and look up spellings/metadata via registry tables.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no AST types, no IO, no side effects.
//! - The lexer/parser enforce syntax; registries provide spellings and metadata for shared use.
//!
//! ## Examples
//! ```rust
//! use colit_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("val"), Some(KeywordId::Val));
//! assert_eq!(keywords::as_str(KeywordId::Val), "val");
//! ```

pub mod conventions;
pub mod keywords;
pub mod prelude;
pub mod punctuation;
pub mod registry;
pub mod types;
