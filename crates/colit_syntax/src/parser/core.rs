// Parser state and the declaration loop.

/// Deepest expression or type nesting the parser accepts.
///
/// The checker recurses once per nested literal or call, so unbounded nesting would exhaust the stack.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Parser state.
///
/// ## Notes
/// - The parser is single-pass and recovers from errors by synchronizing at declaration boundaries.
/// - Collection literals are numbered in source order through `next_literal_id`.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    next_literal_id: u32,
    /// Expressions and types currently being parsed, innermost included.
    nesting: usize,
    errors: Vec<CompileError>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `colit_syntax::lexer`.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            next_literal_id: 0,
            nesting: 0,
            errors: Vec::new(),
        }
    }

    /// Parse every declaration, skipping to the next declaration keyword after an error.
    ///
    /// ## Errors
    /// All syntax errors found in one pass.
    pub fn parse(mut self) -> Result<Program, Vec<CompileError>> {
        let mut declarations = Vec::new();

        while !self.is_at_end() {
            match self.declaration() {
                Ok(decl) => declarations.push(decl),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }

        if self.errors.is_empty() {
            Ok(Program { declarations })
        } else {
            Err(self.errors)
        }
    }

    fn fresh_literal_id(&mut self) -> LiteralId {
        let id = LiteralId(self.next_literal_id);
        self.next_literal_id += 1;
        id
    }
}
