/// Type expression parsing.
///
/// Grammar (informal):
///
/// ```text
/// type      := primary ('&' primary)*
/// primary   := '(' types ')' '->' type
///            | '(' type ')'
///            | Ident typeArgs? ('.' 'Companion')? ('.' '(' types ')' '->' type)?
/// typeArgs  := '<' type (',' type)* '>'
/// ```
impl<'a> Parser<'a> {
    // ========================================================================
    // Types
    // ========================================================================

    fn type_expr(&mut self) -> Result<Spanned<TypeExpr>, CompileError> {
        self.nested(Self::intersection_type)
    }

    fn intersection_type(&mut self) -> Result<Spanned<TypeExpr>, CompileError> {
        let first = self.type_primary()?;
        if !self.check_punct(PunctuationId::Amp) {
            return Ok(first);
        }
        let start = first.span.start;
        let mut members = vec![first];
        while self.match_punct(PunctuationId::Amp) {
            members.push(self.type_primary()?);
        }
        Ok(Spanned::new(
            TypeExpr::Intersection(members),
            Span::new(start, self.previous_span().end),
        ))
    }

    fn type_primary(&mut self) -> Result<Spanned<TypeExpr>, CompileError> {
        let start = self.current_span().start;

        if self.check_punct(PunctuationId::LParen) {
            let params = self.parenthesized_types()?;
            if self.match_punct(PunctuationId::Arrow) {
                let ret = self.type_expr()?;
                return Ok(Spanned::new(
                    TypeExpr::Function(FunctionTypeExpr {
                        receiver: None,
                        params,
                        ret: Box::new(ret),
                    }),
                    Span::new(start, self.previous_span().end),
                ));
            }
            let mut params = params;
            if params.len() == 1 {
                if let Some(inner) = params.pop() {
                    return Ok(inner);
                }
            }
            return Err(self.unexpected("Expected '->' after function type parameters"));
        }

        let name = self.identifier()?;
        let args = if self.check_punct(PunctuationId::Lt) {
            self.type_args()?
        } else {
            Vec::new()
        };
        let mut ty = if self.check_punct(PunctuationId::Dot) && self.peek_next().kind.is_ident(COMPANION_NAME) {
            if !args.is_empty() {
                return Err(CompileError::syntax(
                    "A companion type cannot take type arguments".to_string(),
                    Span::new(start, self.previous_span().end),
                ));
            }
            self.advance();
            self.advance();
            Spanned::new(TypeExpr::Companion(name), Span::new(start, self.previous_span().end))
        } else {
            Spanned::new(
                TypeExpr::Named { name, args },
                Span::new(start, self.previous_span().end),
            )
        };

        if self.check_punct(PunctuationId::Dot) && self.peek_next().kind.is_punctuation(PunctuationId::LParen) {
            self.advance();
            let params = self.parenthesized_types()?;
            self.expect_punct(PunctuationId::Arrow, "Expected '->' in receiver function type")?;
            let ret = self.type_expr()?;
            ty = Spanned::new(
                TypeExpr::Function(FunctionTypeExpr {
                    receiver: Some(Box::new(ty)),
                    params,
                    ret: Box::new(ret),
                }),
                Span::new(start, self.previous_span().end),
            );
        }

        Ok(ty)
    }

    /// `'(' (type (',' type)*)? ')'`
    fn parenthesized_types(&mut self) -> Result<Vec<Spanned<TypeExpr>>, CompileError> {
        self.expect_punct(PunctuationId::LParen, "Expected '('")?;
        let mut types = Vec::new();
        while !self.check_punct(PunctuationId::RParen) {
            types.push(self.type_expr()?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RParen, "Expected ')' in type")?;
        Ok(types)
    }

    /// `'<' type (',' type)* '>'`
    fn type_args(&mut self) -> Result<Vec<Spanned<TypeExpr>>, CompileError> {
        self.expect_punct(PunctuationId::Lt, "Expected '<'")?;
        let mut args = Vec::new();
        loop {
            args.push(self.type_expr()?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::Gt, "Expected '>' to close type arguments")?;
        Ok(args)
    }
}
