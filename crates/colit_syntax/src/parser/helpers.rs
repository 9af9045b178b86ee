/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`)
/// - Matching / expecting keywords and punctuation
/// - Error recovery (`synchronize`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Return the token after the current token without consuming it.
    fn peek_next(&self) -> &Token {
        if self.pos + 1 < self.tokens.len() {
            &self.tokens[self.pos + 1]
        } else {
            &self.tokens[self.tokens.len() - 1]
        }
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        &self.tokens[self.pos.saturating_sub(1)]
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Span of the most recently consumed token.
    fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    /// Return `true` if the current token is the given keyword.
    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    /// Return `true` if the current token is the given punctuation.
    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, id: KeywordId, msg: &str) -> Result<Span, CompileError> {
        if self.check_keyword(id) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(msg))
        }
    }

    fn expect_punct(&mut self, id: PunctuationId, msg: &str) -> Result<Span, CompileError> {
        if self.check_punct(id) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(msg))
        }
    }

    /// Run `parse` one nesting level deeper.
    ///
    /// ## Errors
    /// A syntax error at the current token once [`MAX_NESTING_DEPTH`] levels are open.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T, CompileError>) -> Result<T, CompileError> {
        if self.nesting >= MAX_NESTING_DEPTH {
            return Err(CompileError::syntax(
                format!("Nesting is too deep (more than {MAX_NESTING_DEPTH} levels)"),
                self.current_span(),
            ));
        }
        self.nesting += 1;
        let result = parse(self);
        self.nesting -= 1;
        result
    }

    fn unexpected(&self, msg: &str) -> CompileError {
        CompileError::syntax(format!("{}, found {:?}", msg, self.peek().kind), self.current_span())
    }

    // ========================================================================
    // Error recovery
    // ========================================================================

    /// Skip tokens until the start of the next top-level declaration.
    ///
    /// Brace depth is tracked so a `fun` inside a half-parsed class body does not count as a boundary.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        // Always make progress, even when the failing token is itself a declaration keyword.
        if !self.is_at_end() {
            self.track_depth(&mut depth);
            self.advance();
        }
        while !self.is_at_end() {
            if depth == 0
                && (self.check_keyword(KeywordId::Class)
                    || self.check_keyword(KeywordId::Fun)
                    || self.check_keyword(KeywordId::Val))
            {
                return;
            }
            self.track_depth(&mut depth);
            self.advance();
        }
    }

    fn track_depth(&self, depth: &mut usize) {
        if self.check_punct(PunctuationId::LBrace) {
            *depth += 1;
        } else if self.check_punct(PunctuationId::RBrace) {
            *depth = depth.saturating_sub(1);
        }
    }
}
