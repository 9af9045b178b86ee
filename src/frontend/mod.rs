//! colit compiler frontend
//!
//! This module contains all frontend components:
//! - `lexer`, `parser`, `ast`, `diagnostics`: provided by the shared `colit_syntax` crate
//! - `config`: checker configuration (prelude units, default containers)
//! - `types`: the type model, subtyping, least upper bound and intersection
//! - `inference`: constraint systems, substitutors and call candidates
//! - `symbols`: symbol table and type-expression resolution
//! - `literals`: collection literal resolution
//! - `typechecker`: declaration collection and expression checking

// Syntax components are provided by the shared colit_syntax crate.
pub use colit_syntax::{ast, diagnostics, lexer, parser};

pub mod config;
pub mod inference;
pub mod literals;
pub mod symbols;
pub mod typechecker;
pub mod types;
