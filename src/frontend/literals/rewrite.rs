//! AST rewriting: a collection literal becomes an explicit builder call.
//!
//! `[a, b]` chosen for `X.Companion.buildFrom` becomes `X.buildFrom<T>(2) { add(a); add(b) }`, and
//! `[k: v]` becomes `X.buildFrom<K, V>(1) { add(k, v) }`. Synthesized nodes carry the literal's span; element
//! expressions keep their own.

use colit_core::lang::conventions::ADD_METHOD_NAME;

use super::errors::InternalError;
use super::side_table::LiteralCandidate;
use crate::frontend::ast::{
    Block, CallExpr, CollectionLiteral, Expr, FunctionTypeExpr, Span, Spanned, TypeExpr,
};
use crate::frontend::symbols::SymbolTable;
use crate::frontend::types::Ty;

/// Build the call that replaces `literal` once `chosen` has been selected and fixed.
///
/// ## Errors
/// - [`InternalError::UnfixedTypeArgument`] if a type argument still mentions a variable or type parameter
/// - [`InternalError::MissingClassIdentity`] if the builder's receiver is not a companion type
pub fn rewrite_literal(
    symbols: &SymbolTable,
    literal: &CollectionLiteral,
    span: Span,
    chosen: &LiteralCandidate,
) -> Result<Spanned<Expr>, InternalError> {
    let info = symbols.function(chosen.candidate.symbol);
    let receiver = match &info.receiver {
        Some(Ty::Companion(class)) => symbols.class(*class).name.clone(),
        Some(other) => return Err(InternalError::MissingClassIdentity(symbols.display(other).to_string())),
        None => return Err(InternalError::MissingClassIdentity(info.name.clone())),
    };

    let type_args = chosen
        .candidate
        .type_arguments(symbols)
        .iter()
        .map(|ty| type_to_expr(symbols, ty, span))
        .collect::<Result<Vec<_>, _>>()?;

    let adds = literal
        .entries
        .iter()
        .map(|entry| {
            let call = CallExpr {
                receiver: None,
                name: Spanned::new(ADD_METHOD_NAME.to_string(), span),
                type_args: Vec::new(),
                args: entry.exprs().into_iter().cloned().collect(),
                block: None,
            };
            Spanned::new(Expr::Call(call), span)
        })
        .collect();

    let call = CallExpr {
        receiver: Some(Box::new(Spanned::new(Expr::Ident(receiver), span))),
        name: Spanned::new(info.name.clone(), span),
        type_args,
        args: vec![Spanned::new(Expr::Int(literal.entries.len() as i64), span)],
        block: Some(Box::new(Spanned::new(Block { statements: adds }, span))),
    };
    Ok(Spanned::new(Expr::Call(call), span))
}

/// Convert a fully inferred type back into surface syntax.
pub fn type_to_expr(symbols: &SymbolTable, ty: &Ty, span: Span) -> Result<Spanned<TypeExpr>, InternalError> {
    let node = match ty {
        Ty::Class(class) => TypeExpr::Named {
            name: symbols.class(class.id).name.clone(),
            args: class
                .args
                .iter()
                .map(|arg| type_to_expr(symbols, arg, span))
                .collect::<Result<_, _>>()?,
        },
        Ty::Companion(id) => TypeExpr::Companion(symbols.class(*id).name.clone()),
        Ty::Function(function) => TypeExpr::Function(FunctionTypeExpr {
            receiver: function
                .receiver
                .as_deref()
                .map(|receiver| type_to_expr(symbols, receiver, span).map(Box::new))
                .transpose()?,
            params: function
                .params
                .iter()
                .map(|param| type_to_expr(symbols, param, span))
                .collect::<Result<_, _>>()?,
            ret: Box::new(type_to_expr(symbols, &function.ret, span)?),
        }),
        Ty::Intersection(members) => TypeExpr::Intersection(
            members
                .iter()
                .map(|member| type_to_expr(symbols, member, span))
                .collect::<Result<_, _>>()?,
        ),
        Ty::Nothing => TypeExpr::named("Nothing"),
        Ty::Error => TypeExpr::Error,
        Ty::Var(_) | Ty::Param(_) => {
            return Err(InternalError::UnfixedTypeArgument(symbols.display(ty).to_string()));
        }
    };
    Ok(Spanned::new(node, span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::inference::TypeVarSupply;
    use crate::frontend::typechecker::TypeChecker;

    #[test]
    fn class_types_round_trip_into_surface_syntax() {
        let checker = TypeChecker::new();
        let symbols = &checker.symbols;
        let int = symbols.lookup_class("Int").expect("builtin");
        let map = symbols.lookup_class("Map").expect("builtin");
        let ty = Ty::class(map, vec![Ty::class(int, vec![]), Ty::Nothing]);
        let expr = type_to_expr(symbols, &ty, Span::default()).expect("fully inferred");
        let TypeExpr::Named { name, args } = expr.node else {
            panic!("expected a named type");
        };
        assert_eq!(name, "Map");
        assert_eq!(args[0].node, TypeExpr::named("Int"));
        assert_eq!(args[1].node, TypeExpr::named("Nothing"));
    }

    #[test]
    fn variables_are_rejected() {
        let checker = TypeChecker::new();
        let var = Ty::Var(TypeVarSupply::new().fresh());
        assert!(matches!(
            type_to_expr(&checker.symbols, &var, Span::default()),
            Err(InternalError::UnfixedTypeArgument(_))
        ));
    }

    #[test]
    fn error_types_become_error_placeholders() {
        let checker = TypeChecker::new();
        let expr = type_to_expr(&checker.symbols, &Ty::Error, Span::new(3, 4)).expect("error is allowed");
        assert_eq!(expr.node, TypeExpr::Error);
        assert_eq!(expr.span, Span::new(3, 4));
    }
}
