//! Parser for the colit language
//!
//! Converts a token stream into an AST: class/function signatures, `val` declarations, calls with trailing
//! blocks, and collection literals.
//!
//! ## Examples
//!
//! ```rust
//! use colit_syntax::{lexer, parser};
//!
//! let source = "val s: Set<Int> = [1, 2, 3]";
//! let tokens = lexer::lex(source).unwrap();
//! let ast = parser::parse(&tokens).unwrap();
//! assert_eq!(ast.declarations.len(), 1);
//! ```

use crate::ast::*;
use crate::diagnostics::CompileError;
use crate::lexer::{Token, TokenKind};
use colit_core::lang::conventions::COMPANION_NAME;
use colit_core::lang::keywords::KeywordId;
use colit_core::lang::punctuation::PunctuationId;

// One `Parser` impl spread over several files; `include!` keeps its private helpers in this module.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/types.rs");
include!("parser/expr.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
