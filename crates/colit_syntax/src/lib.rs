//! Shared syntax frontend for the colit language: lexer, parser, AST, diagnostics.
//!
//! ## Notes
//! - This crate is intentionally “syntax-only”: it does not do name resolution or type checking.
//! - Vocabulary identity (keywords/punctuation) comes from `colit_core::lang` registries.
//! - Every collection literal receives a [`ast::LiteralId`] at parse time; the frontend keys its literal
//!   side table on it.
//!
//! ## Examples
//! ```rust
//! use colit_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("val xs = [1, 2, 3]").unwrap();
//! let program = parser::parse(&tokens).unwrap();
//! assert_eq!(program.declarations.len(), 1);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token_helpers;
