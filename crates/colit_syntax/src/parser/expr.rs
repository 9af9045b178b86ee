/// Expression parsing.
///
/// Grammar (informal):
///
/// ```text
/// expr     := primary ('.' Ident typeArgs? callTail)*
/// primary  := Int | Double | String | 'true' | 'false'
///           | Ident (typeArgs? callTail)?
///           | '(' expr ')'
///           | literal
/// callTail := '(' (expr (',' expr)*)? ')' block? | block
/// block    := '{' (expr ';'?)* '}'
/// literal  := '[' ']' | '[' ':' ']' | '[' expr (',' expr)* ','? ']' | '[' expr ':' expr (',' ...)* ','? ']'
/// ```
impl<'a> Parser<'a> {
    // ========================================================================
    // Expressions
    // ========================================================================

    fn expression(&mut self) -> Result<Spanned<Expr>, CompileError> {
        self.nested(Self::postfix)
    }

    fn postfix(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let mut expr = self.primary()?;

        while self.match_punct(PunctuationId::Dot) {
            let name = self.identifier_spanned()?;
            let type_args = if self.check_punct(PunctuationId::Lt) {
                self.type_args()?
            } else {
                Vec::new()
            };
            if !self.check_punct(PunctuationId::LParen) && !self.check_punct(PunctuationId::LBrace) {
                return Err(self.unexpected(&format!("Expected '(' or '{{' after '.{}'", name.node)));
            }
            let (args, block) = self.call_tail()?;
            let span = Span::new(expr.span.start, self.previous_span().end);
            expr = Spanned::new(
                Expr::Call(CallExpr {
                    receiver: Some(Box::new(expr)),
                    name,
                    type_args,
                    args,
                    block,
                }),
                span,
            );
        }

        Ok(expr)
    }

    fn primary(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let span = self.current_span();
        let expr = match &self.peek().kind {
            TokenKind::Int(value) => Expr::Int(*value),
            TokenKind::Double(value) => Expr::Double(*value),
            TokenKind::String(value) => Expr::String(value.clone()),
            TokenKind::Keyword(KeywordId::True) => Expr::Bool(true),
            TokenKind::Keyword(KeywordId::False) => Expr::Bool(false),
            TokenKind::Ident(_) => return self.identifier_or_call(),
            TokenKind::Punctuation(PunctuationId::LParen) => {
                self.advance();
                let inner = self.expression()?;
                self.expect_punct(PunctuationId::RParen, "Expected ')' after expression")?;
                return Ok(Spanned::new(
                    Expr::Paren(Box::new(inner)),
                    Span::new(span.start, self.previous_span().end),
                ));
            }
            TokenKind::Punctuation(PunctuationId::LBracket) => return self.collection_literal(),
            _ => return Err(self.unexpected("Expected expression")),
        };
        self.advance();
        Ok(Spanned::new(expr, span))
    }

    /// `name`, `name(args)`, `name<T>(args)` or `name { block }`.
    fn identifier_or_call(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let name = self.identifier_spanned()?;
        let type_args = if self.check_punct(PunctuationId::Lt) {
            self.type_args()?
        } else {
            Vec::new()
        };

        if !self.check_punct(PunctuationId::LParen) && !self.check_punct(PunctuationId::LBrace) {
            if !type_args.is_empty() {
                return Err(self.unexpected("Expected '(' after explicit type arguments"));
            }
            let span = name.span;
            return Ok(Spanned::new(Expr::Ident(name.node), span));
        }

        let start = name.span.start;
        let (args, block) = self.call_tail()?;
        Ok(Spanned::new(
            Expr::Call(CallExpr {
                receiver: None,
                name,
                type_args,
                args,
                block,
            }),
            Span::new(start, self.previous_span().end),
        ))
    }

    /// Parenthesized arguments and/or a trailing block.
    #[allow(clippy::type_complexity)]
    fn call_tail(&mut self) -> Result<(Vec<Spanned<Expr>>, Option<Box<Spanned<Block>>>), CompileError> {
        let mut args = Vec::new();
        if self.match_punct(PunctuationId::LParen) {
            while !self.check_punct(PunctuationId::RParen) {
                args.push(self.expression()?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
            self.expect_punct(PunctuationId::RParen, "Expected ')' after arguments")?;
        }
        let block = if self.check_punct(PunctuationId::LBrace) {
            Some(Box::new(self.block()?))
        } else {
            None
        };
        Ok((args, block))
    }

    fn block(&mut self) -> Result<Spanned<Block>, CompileError> {
        let start = self.expect_punct(PunctuationId::LBrace, "Expected '{'")?.start;
        let mut statements = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) && !self.is_at_end() {
            statements.push(self.expression()?);
            self.match_punct(PunctuationId::Semicolon);
        }
        self.expect_punct(PunctuationId::RBrace, "Expected '}' to close block")?;
        Ok(Spanned::new(
            Block { statements },
            Span::new(start, self.previous_span().end),
        ))
    }

    // ========================================================================
    // Collection literals
    // ========================================================================

    fn collection_literal(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.expect_punct(PunctuationId::LBracket, "Expected '['")?.start;
        let id = self.fresh_literal_id();

        let (kind, entries) = if self.check_punct(PunctuationId::RBracket) {
            (LiteralKind::Sequence, Vec::new())
        } else if self.check_punct(PunctuationId::Colon) && self.peek_next().kind.is_punctuation(PunctuationId::RBracket)
        {
            self.advance();
            (LiteralKind::Dictionary, Vec::new())
        } else {
            let first = self.expression()?;
            if self.match_punct(PunctuationId::Colon) {
                let value = self.expression()?;
                (LiteralKind::Dictionary, self.dictionary_entries(first, value)?)
            } else {
                (LiteralKind::Sequence, self.sequence_entries(first)?)
            }
        };

        self.expect_punct(PunctuationId::RBracket, "Expected ']' to close collection literal")?;
        Ok(Spanned::new(
            Expr::CollectionLiteral(CollectionLiteral { id, kind, entries }),
            Span::new(start, self.previous_span().end),
        ))
    }

    fn sequence_entries(&mut self, first: Spanned<Expr>) -> Result<Vec<LiteralEntry>, CompileError> {
        let mut entries = vec![LiteralEntry::Single(first)];
        loop {
            if self.check_punct(PunctuationId::Colon) {
                return Err(CompileError::syntax(
                    "Sequence literal entries cannot contain 'key: value' pairs".to_string(),
                    self.current_span(),
                ));
            }
            if !self.match_punct(PunctuationId::Comma) || self.check_punct(PunctuationId::RBracket) {
                break;
            }
            entries.push(LiteralEntry::Single(self.expression()?));
        }
        Ok(entries)
    }

    fn dictionary_entries(
        &mut self,
        first_key: Spanned<Expr>,
        first_value: Spanned<Expr>,
    ) -> Result<Vec<LiteralEntry>, CompileError> {
        let mut entries = vec![LiteralEntry::Pair(first_key, first_value)];
        while self.match_punct(PunctuationId::Comma) {
            if self.check_punct(PunctuationId::RBracket) {
                break;
            }
            let key = self.expression()?;
            if !self.match_punct(PunctuationId::Colon) {
                return Err(CompileError::syntax(
                    "Dictionary literal entries must all be 'key: value' pairs".to_string(),
                    key.span,
                ));
            }
            let value = self.expression()?;
            entries.push(LiteralEntry::Pair(key, value));
        }
        Ok(entries)
    }
}
