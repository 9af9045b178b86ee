//! Lexer for the colit language
//!
//! Handles tokenization including:
//! - Keywords (class, fun, val, companion, object, out, in, true, false)
//! - Identifiers and literals (int, double, string)
//! - Punctuation, resolved through the `colit_core` punctuation registry
//! - `//` line comments
//!
//! Layout is not significant: newlines are plain whitespace.
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)

pub mod tokens;

pub use tokens::{Token, TokenKind, keyword_id};

use crate::ast::Span;
use crate::diagnostics::CompileError;
use colit_core::lang::punctuation::{self, PunctuationId};

// ============================================================================
// LEXER STATE
// ============================================================================

/// Lexer for colit source code.
///
/// Converts source text into a stream of tokens, handling:
/// - Keywords and identifiers
/// - Numeric and string literals
/// - Punctuation, with bracket matching for `()`, `[]` and `{}`
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    /// Open delimiters awaiting their closing partner.
    open_brackets: Vec<(PunctuationId, Span)>,
    tokens: Vec<Token>,
    errors: Vec<CompileError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            open_brackets: Vec::new(),
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source code.
    ///
    /// Returns a vector of tokens on success, or a vector of errors on failure.
    /// The token stream always ends with an `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<CompileError>> {
        while !self.is_at_end() {
            self.scan_token();
        }

        for (id, span) in std::mem::take(&mut self.open_brackets) {
            self.errors.push(CompileError::syntax(
                format!("Unclosed '{}'", punctuation::as_str(id)),
                span,
            ));
        }

        self.tokens.push(Token::new(
            TokenKind::Eof,
            Span::new(self.current_pos, self.current_pos),
        ));

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        let start = self.current_pos;
        let Some(c) = self.peek() else {
            return;
        };

        match c {
            ' ' | '\t' | '\r' | '\n' => {
                self.advance();
            }
            '/' if self.peek_next() == Some('/') => self.skip_line_comment(),
            '"' => {
                self.advance();
                self.scan_string(start);
            }
            c if c.is_ascii_digit() => self.scan_number(start),
            c if is_ident_start(c) => {
                self.advance();
                self.scan_identifier(start);
            }
            _ => self.scan_punctuation(start, c),
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn add_token(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token::new(kind, Span::new(start, self.current_pos)));
    }

    // ========================================================================
    // Punctuation
    // ========================================================================

    fn scan_punctuation(&mut self, start: usize, c: char) {
        let Some((id, len)) = punctuation::longest_prefix(&self.source[start..]) else {
            self.advance();
            self.errors.push(CompileError::syntax(
                format!("Unexpected character '{c}'"),
                Span::new(start, self.current_pos),
            ));
            return;
        };

        while self.current_pos < start + len {
            self.advance();
        }
        let span = Span::new(start, self.current_pos);

        match id {
            PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace => {
                self.open_brackets.push((id, span));
            }
            PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace => self.close_bracket(id, span),
            _ => {}
        }
        self.add_token(TokenKind::Punctuation(id), start);
    }

    /// Pop the matching opener, reporting unmatched or mismatched closers.
    fn close_bracket(&mut self, id: PunctuationId, span: Span) {
        let expected_open = match id {
            PunctuationId::RParen => PunctuationId::LParen,
            PunctuationId::RBracket => PunctuationId::LBracket,
            _ => PunctuationId::LBrace,
        };
        match self.open_brackets.pop() {
            None => self.errors.push(CompileError::syntax(
                "Unmatched closing bracket".to_string(),
                span,
            )),
            Some((open, open_span)) if open != expected_open => {
                self.errors.push(
                    CompileError::syntax(
                        format!(
                            "Mismatched closing '{}' for '{}'",
                            punctuation::as_str(id),
                            punctuation::as_str(open)
                        ),
                        span,
                    )
                    .with_note(format!("opening delimiter at offset {}", open_span.start)),
                );
            }
            Some(_) => {}
        }
    }

    // ========================================================================
    // Literals
    // ========================================================================

    fn scan_number(&mut self, start: usize) {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '_') {
            self.advance();
        }

        let is_double = self.peek() == Some('.') && matches!(self.peek_next(), Some(c) if c.is_ascii_digit());
        if is_double {
            self.advance();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '_') {
                self.advance();
            }
        }

        let text: String = self.source[start..self.current_pos]
            .chars()
            .filter(|c| *c != '_')
            .collect();
        let span = Span::new(start, self.current_pos);

        if is_double {
            match text.parse::<f64>() {
                Ok(value) => self.add_token(TokenKind::Double(value), start),
                Err(_) => self
                    .errors
                    .push(CompileError::syntax(format!("Invalid number '{text}'"), span)),
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => self.add_token(TokenKind::Int(value), start),
                Err(_) => self.errors.push(CompileError::syntax(
                    format!("Integer literal '{text}' is out of range"),
                    span,
                )),
            }
        }
    }

    fn scan_string(&mut self, start: usize) {
        let mut value = String::new();
        loop {
            match self.advance() {
                None | Some('\n') => {
                    self.errors.push(CompileError::syntax(
                        "Unterminated string literal".to_string(),
                        Span::new(start, self.current_pos),
                    ));
                    return;
                }
                Some('"') => break,
                Some('\\') => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('"') => value.push('"'),
                    Some('\\') => value.push('\\'),
                    other => {
                        let shown = other.map(String::from).unwrap_or_default();
                        self.errors.push(CompileError::syntax(
                            format!("Unknown escape sequence '\\{shown}'"),
                            Span::new(self.current_pos.saturating_sub(2), self.current_pos),
                        ));
                    }
                },
                Some(c) => value.push(c),
            }
        }
        self.add_token(TokenKind::String(value), start);
    }

    // ========================================================================
    // Identifier scanning
    // ========================================================================

    fn scan_identifier(&mut self, start: usize) {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let spelling = &self.source[start..self.current_pos];

        // Look up identifier spelling in the reserved-word registry (no allocation for keywords).
        if let Some(id) = keyword_id(spelling) {
            self.add_token(TokenKind::Keyword(id), start);
        } else {
            self.add_token(TokenKind::Ident(spelling.to_string()), start);
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if a character can start an identifier (ASCII-only).
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier (ASCII-only).
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<CompileError>> {
    Lexer::new(source).tokenize()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use colit_core::lang::keywords::KeywordId;

    #[test]
    fn test_punctuation_registry_parity() {
        for p in punctuation::PUNCTUATION {
            let source = match p.id {
                PunctuationId::LParen | PunctuationId::RParen => "()",
                PunctuationId::LBracket | PunctuationId::RBracket => "[]",
                PunctuationId::LBrace | PunctuationId::RBrace => "{}",
                _ => p.canonical,
            };
            let tokens = lex(source).unwrap_or_else(|errs| panic!("lex({source:?}) failed: {errs:?}"));
            assert!(
                tokens.iter().any(|t| t.kind.is_punctuation(p.id)),
                "lex({source:?}) did not produce {:?}",
                p.id
            );
        }
    }

    #[test]
    fn test_keyword_registry_parity() {
        for k in colit_core::lang::keywords::KEYWORDS {
            let tokens = lex(k.canonical).unwrap();
            assert!(tokens[0].kind.is_keyword(k.id), "{}", k.canonical);
        }
    }

    #[test]
    fn test_declaration_tokens() {
        let tokens = lex("val xs: List<Int> = [1, 2]").unwrap();
        assert!(tokens[0].kind.is_keyword(KeywordId::Val));
        assert!(matches!(&tokens[1].kind, TokenKind::Ident(s) if s == "xs"));
        assert!(tokens[2].kind.is_punctuation(PunctuationId::Colon));
        assert!(tokens[4].kind.is_punctuation(PunctuationId::Lt));
        assert!(tokens[6].kind.is_punctuation(PunctuationId::Gt));
        assert!(matches!(tokens[9].kind, TokenKind::Int(1)));
        assert!(matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)));
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn test_numbers() {
        let tokens = lex("42 3.14 1_000").unwrap();
        assert!(matches!(tokens[0].kind, TokenKind::Int(42)));
        assert!(matches!(tokens[1].kind, TokenKind::Double(f) if (f - 3.14).abs() < 0.001));
        assert!(matches!(tokens[2].kind, TokenKind::Int(1000)));
    }

    #[test]
    fn test_int_followed_by_member_call_is_not_double() {
        let tokens = lex("1.foo()").unwrap();
        assert!(matches!(tokens[0].kind, TokenKind::Int(1)));
        assert!(tokens[1].kind.is_punctuation(PunctuationId::Dot));
    }

    #[test]
    fn test_strings_and_escapes() {
        let tokens = lex(r#""a\"b\n""#).unwrap();
        assert!(matches!(&tokens[0].kind, TokenKind::String(s) if s == "a\"b\n"));
    }

    #[test]
    fn test_unterminated_string() {
        let errs = lex("\"abc").unwrap_err();
        assert!(errs[0].message.contains("Unterminated"));
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = lex("// nothing here\nval a = 1 // trailing").unwrap();
        assert!(tokens[0].kind.is_keyword(KeywordId::Val));
        assert_eq!(tokens.len(), 5);
    }

    #[test]
    fn test_arrow_and_intersection() {
        let tokens = lex("(A) -> B & C").unwrap();
        assert!(tokens[3].kind.is_punctuation(PunctuationId::Arrow));
        assert!(tokens[5].kind.is_punctuation(PunctuationId::Amp));
    }

    #[test]
    fn test_unmatched_closing_bracket() {
        let errs = lex("val a = 1]").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("Unmatched"));
    }

    #[test]
    fn test_mismatched_closing_bracket() {
        let errs = lex("[1, 2)").unwrap_err();
        assert!(errs[0].message.contains("Mismatched"));
    }

    #[test]
    fn test_unclosed_bracket_reported_at_eof() {
        let errs = lex("f(1, [2").unwrap_err();
        assert_eq!(errs.len(), 2);
    }

    #[test]
    fn test_unexpected_character() {
        let errs = lex("val a = 1 + 2").unwrap_err();
        assert!(errs[0].message.contains("Unexpected character '+'"));
    }
}
