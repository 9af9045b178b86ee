//! Token types for the colit lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for reserved words
//! - `Punctuation(PunctuationId)` for punctuation tokens
//!
//! ## Notes
//! - ID-bearing tokens avoid stringly-typed checks in the parser.
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use crate::ast::Span;
use colit_core::lang::keywords::{self, KeywordId};
use colit_core::lang::punctuation::PunctuationId;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keyword / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Punctuation(PunctuationId),

    // ========== Identifiers and Literals ==========
    Ident(String),
    Int(i64),
    Double(f64),
    String(String),

    // ========== Special ==========
    Eof,
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
