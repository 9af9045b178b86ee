#![forbid(unsafe_code)]
//! colit: collection literal resolution
//!
//! A small statically typed language whose bracketed collection literals (`[1, 2]`, `["k": v]`, `[]`, `[:]`) have
//! no fixed type. The checker picks a container class for every literal from the builder functions in scope and
//! rewrites the literal into a call of that builder. This crate provides the frontend (parser re-exports, type
//! checker, literal engine), a source printer and the `colit` CLI.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a checker bug (logic error), use `.expect("INVARIANT: reason")` with a
//!   clear explanation. Broken invariants of literal resolution are reported as internal errors instead and abort
//!   only the current unit.

pub mod cli;
pub mod format;
pub mod frontend;

pub use frontend::ast;
pub use frontend::diagnostics;
pub use frontend::lexer;
pub use frontend::parser;
pub use frontend::symbols;
pub use frontend::typechecker;

pub use format::{FormatConfig, expand_source, format_program, reformat_source};
