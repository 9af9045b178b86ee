//! Provide the canonical language vocabulary shared by the colit syntax crate and frontend.
//!
//! This crate is intentionally small and dependency-free. It holds registries (keywords, punctuation,
//! builtin classes), the collection-literal conventions the resolver relies on, and the embedded prelude source.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global state, and no AST or type-checker types.
//! - Spellings live here once; the lexer, parser and type checker look them up by stable id.

pub mod lang;
