//! Check expressions and resolve their types.
//!
//! This module owns the expression-checking entrypoint (`check_expr`) and delegates to themed
//! submodules. Expression checking is error-accumulating: on invalid input it returns the error type so
//! later checks can continue. The only hard failure is an [`InternalError`] from the literal engine.
//!
//! ## See also
//! - [`super::TypeChecker`]: the main type checker entrypoint.

use crate::frontend::ast::*;
use crate::frontend::inference::ExprTy;
use crate::frontend::literals::InternalError;

use super::{Mode, TypeChecker};

mod basics;
mod calls;
mod collections;

pub use collections::Resolution;

impl TypeChecker {
    // ========================================================================
    // Expressions
    // ========================================================================

    /// Validate an expression and return its type.
    ///
    /// Collection literals resolved to a builder are replaced in place by the builder call, which is then
    /// checked like user-written code; literals that fail become [`Expr::Error`].
    pub(crate) fn check_expr(&mut self, expr: &mut Spanned<Expr>, mode: &Mode) -> Result<ExprTy, InternalError> {
        let span = expr.span;
        let outcome = match &mut expr.node {
            Expr::Int(_) => return Ok(ExprTy::new(self.int_type())),
            Expr::Double(_) => return Ok(ExprTy::new(self.double_type())),
            Expr::String(_) => return Ok(ExprTy::new(self.string_type())),
            Expr::Bool(_) => return Ok(ExprTy::new(self.boolean_type())),
            Expr::Ident(name) => return Ok(ExprTy::new(self.check_ident(name, span))),
            Expr::Paren(inner) => return self.check_expr(inner, mode),
            Expr::Call(call) => return self.check_call(call, span, mode),
            Expr::Error => return Ok(ExprTy::error()),
            Expr::CollectionLiteral(literal) => self.check_collection_literal(literal, span, mode)?,
        };
        match outcome {
            LiteralOutcome::Provisional(ty) => Ok(ExprTy::new(ty)),
            LiteralOutcome::Rewritten(call) => {
                *expr = call;
                self.check_expr(expr, mode)
            }
            LiteralOutcome::Failed => {
                expr.node = Expr::Error;
                Ok(ExprTy::error())
            }
        }
    }
}

/// What became of a collection literal in expression position.
pub(super) enum LiteralOutcome {
    /// Dependent mode: the literal stays in place with its provisional type.
    Provisional(crate::frontend::types::Ty),
    /// The builder call that replaces the literal.
    Rewritten(Spanned<Expr>),
    Failed,
}
