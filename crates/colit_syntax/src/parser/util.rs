/// Miscellaneous parser utilities.
impl<'a> Parser<'a> {
    // ========================================================================
    // Utilities
    // ========================================================================

    fn identifier(&mut self) -> Result<Ident, CompileError> {
        self.identifier_spanned().map(|ident| ident.node)
    }

    fn identifier_spanned(&mut self) -> Result<Spanned<Ident>, CompileError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let span = self.current_span();
                let name = name.clone();
                self.advance();
                Ok(Spanned::new(name, span))
            }
            _ => Err(self.unexpected("Expected identifier")),
        }
    }
}
