/// Parse a token stream into an AST [`Program`].
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `tokens`: Token stream produced by `colit_syntax::lexer`.
///
/// ## Errors
/// Returns `Err(Vec<CompileError>)` if parsing fails.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<Program, Vec<CompileError>> {
    if tokens.is_empty() {
        return Ok(Program {
            declarations: Vec::new(),
        });
    }
    Parser::new(tokens).parse()
}

/// Lex and parse a source string in one step.
///
/// ## Errors
/// Returns the lexer's errors if lexing fails, otherwise the parser's.
pub fn parse_source(source: &str) -> Result<Program, Vec<CompileError>> {
    let tokens = crate::lexer::lex(source)?;
    parse(&tokens)
}
