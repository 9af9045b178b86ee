/// Declaration parsing.
///
/// This chunk parses top-level declarations:
/// - `class` with type parameters, supertypes, member functions and a companion object
/// - `fun` signatures, optionally with an extension receiver (`List.Companion.buildFrom`)
/// - `val` bindings
impl<'a> Parser<'a> {
    // ========================================================================
    // Declarations
    // ========================================================================

    fn declaration(&mut self) -> Result<Spanned<Declaration>, CompileError> {
        let start = self.current_span().start;
        let decl = if self.check_keyword(KeywordId::Class) {
            Declaration::Class(self.class_decl()?)
        } else if self.check_keyword(KeywordId::Fun) {
            Declaration::Function(self.function_decl()?)
        } else if self.check_keyword(KeywordId::Val) {
            Declaration::Val(self.val_decl()?)
        } else {
            return Err(self.unexpected("Expected declaration ('class', 'fun' or 'val')"));
        };
        Ok(Spanned::new(decl, Span::new(start, self.previous_span().end)))
    }

    /// `class Name<out T> : Super<T> { ... }`
    fn class_decl(&mut self) -> Result<ClassDecl, CompileError> {
        self.expect_keyword(KeywordId::Class, "Expected 'class'")?;
        let name = self.identifier()?;
        let type_params = self.type_params(true)?;

        let mut supertypes = Vec::new();
        if self.match_punct(PunctuationId::Colon) {
            loop {
                supertypes.push(self.type_expr()?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
        }

        let mut members = Vec::new();
        let mut companion = Vec::new();
        if self.match_punct(PunctuationId::LBrace) {
            while !self.check_punct(PunctuationId::RBrace) && !self.is_at_end() {
                if self.check_keyword(KeywordId::Companion) {
                    if !companion.is_empty() {
                        return Err(CompileError::syntax(
                            format!("Class '{name}' declares more than one companion object"),
                            self.current_span(),
                        ));
                    }
                    companion = self.companion_object()?;
                } else if self.check_keyword(KeywordId::Fun) {
                    let start = self.current_span().start;
                    let func = self.function_decl()?;
                    members.push(Spanned::new(func, Span::new(start, self.previous_span().end)));
                } else {
                    return Err(self.unexpected("Expected 'fun' or 'companion object' in class body"));
                }
            }
            self.expect_punct(PunctuationId::RBrace, "Expected '}' to close class body")?;
        }

        Ok(ClassDecl {
            name,
            type_params,
            supertypes,
            members,
            companion,
        })
    }

    /// `companion object { fun ... }`
    fn companion_object(&mut self) -> Result<Vec<Spanned<FunctionDecl>>, CompileError> {
        self.expect_keyword(KeywordId::Companion, "Expected 'companion'")?;
        self.expect_keyword(KeywordId::Object, "Expected 'object' after 'companion'")?;
        self.expect_punct(PunctuationId::LBrace, "Expected '{' after 'companion object'")?;
        let mut functions = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) && !self.is_at_end() {
            let start = self.current_span().start;
            let func = self.function_decl()?;
            functions.push(Spanned::new(func, Span::new(start, self.previous_span().end)));
        }
        self.expect_punct(PunctuationId::RBrace, "Expected '}' to close companion object")?;
        Ok(functions)
    }

    /// `fun <T> [Receiver.]name(params): Return`
    fn function_decl(&mut self) -> Result<FunctionDecl, CompileError> {
        self.expect_keyword(KeywordId::Fun, "Expected 'fun'")?;
        let type_params = self.type_params(false)?;
        let (receiver, name) = self.function_name()?;

        self.expect_punct(PunctuationId::LParen, "Expected '(' after function name")?;
        let mut params = Vec::new();
        while !self.check_punct(PunctuationId::RParen) {
            let start = self.current_span().start;
            let pname = self.identifier()?;
            self.expect_punct(PunctuationId::Colon, "Expected ':' after parameter name")?;
            let ty = self.type_expr()?;
            params.push(Spanned::new(
                Param { name: pname, ty },
                Span::new(start, self.previous_span().end),
            ));
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RParen, "Expected ')' after parameters")?;
        self.expect_punct(PunctuationId::Colon, "Expected ':' and a return type")?;
        let return_type = self.type_expr()?;

        Ok(FunctionDecl {
            name,
            type_params,
            receiver,
            params,
            return_type,
        })
    }

    /// Parse the `[Receiver.]name` part of a function signature.
    ///
    /// ## Notes
    /// - `List.Companion.buildFrom` yields receiver `List.Companion` and name `buildFrom`.
    /// - `Box<T>.get` yields receiver `Box<T>` and name `get`.
    fn function_name(&mut self) -> Result<(Option<Spanned<TypeExpr>>, Ident), CompileError> {
        let first = self.identifier_spanned()?;
        if self.check_punct(PunctuationId::LParen) {
            return Ok((None, first.node));
        }

        let args = if self.check_punct(PunctuationId::Lt) {
            self.type_args()?
        } else {
            Vec::new()
        };
        let receiver_end = self.previous_span().end;
        self.expect_punct(PunctuationId::Dot, "Expected '(' or '.' after function name")?;
        let second = self.identifier()?;

        if second == COMPANION_NAME && self.check_punct(PunctuationId::Dot) {
            if !args.is_empty() {
                return Err(CompileError::syntax(
                    "A companion receiver cannot take type arguments".to_string(),
                    first.span,
                ));
            }
            let receiver_span = Span::new(first.span.start, self.previous_span().end);
            self.advance();
            let name = self.identifier()?;
            return Ok((Some(Spanned::new(TypeExpr::Companion(first.node), receiver_span)), name));
        }

        let receiver = Spanned::new(
            TypeExpr::Named { name: first.node, args },
            Span::new(first.span.start, receiver_end),
        );
        Ok((Some(receiver), second))
    }

    /// `val name[: Type] = expr`
    fn val_decl(&mut self) -> Result<ValDecl, CompileError> {
        self.expect_keyword(KeywordId::Val, "Expected 'val'")?;
        let name = self.identifier()?;
        let ty = if self.match_punct(PunctuationId::Colon) {
            Some(self.type_expr()?)
        } else {
            None
        };
        self.expect_punct(PunctuationId::Eq, "Expected '=' in val declaration")?;
        let value = self.expression()?;
        Ok(ValDecl { name, ty, value })
    }

    /// Optional `<...>` type parameter list.
    ///
    /// ## Parameters
    /// - `allow_variance`: `out`/`in` modifiers are only meaningful on class type parameters.
    fn type_params(&mut self, allow_variance: bool) -> Result<Vec<TypeParam>, CompileError> {
        let mut params = Vec::new();
        if !self.match_punct(PunctuationId::Lt) {
            return Ok(params);
        }
        loop {
            let start = self.current_span().start;
            let variance = if self.check_keyword(KeywordId::Out) || self.check_keyword(KeywordId::In) {
                let span = self.current_span();
                let variance = if self.check_keyword(KeywordId::Out) {
                    Variance::Out
                } else {
                    Variance::In
                };
                self.advance();
                if !allow_variance {
                    return Err(CompileError::syntax(
                        "Variance modifiers are only allowed on class type parameters".to_string(),
                        span,
                    ));
                }
                variance
            } else {
                Variance::Invariant
            };
            let name = self.identifier()?;
            let bound = if self.match_punct(PunctuationId::Colon) {
                Some(self.type_expr()?)
            } else {
                None
            };
            params.push(TypeParam {
                name,
                variance,
                bound,
                span: Span::new(start, self.previous_span().end),
            });
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::Gt, "Expected '>' to close type parameters")?;
        Ok(params)
    }
}
