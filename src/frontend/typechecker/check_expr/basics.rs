//! Check basic expressions: identifiers and constants.

use colit_core::lang::types::builtins::BuiltinTypeId;

use crate::frontend::ast::*;
use crate::frontend::diagnostics::CompileError;
use crate::frontend::types::Ty;

use super::TypeChecker;

impl TypeChecker {
    /// Resolve an identifier: a `val`, or a class name standing for its companion object.
    pub(in crate::frontend::typechecker::check_expr) fn check_ident(&mut self, name: &str, span: Span) -> Ty {
        if let Some(info) = self.symbols.lookup_val(name) {
            return info.ty.clone();
        }
        if let Some(class) = self.symbols.lookup_class(name) {
            return Ty::Companion(class);
        }
        self.errors
            .push(CompileError::type_error(format!("Unresolved reference '{name}'"), span));
        Ty::Error
    }

    pub(crate) fn int_type(&self) -> Ty {
        self.symbols.builtin_type(BuiltinTypeId::Int)
    }

    pub(in crate::frontend::typechecker::check_expr) fn double_type(&self) -> Ty {
        self.symbols.builtin_type(BuiltinTypeId::Double)
    }

    pub(in crate::frontend::typechecker::check_expr) fn string_type(&self) -> Ty {
        self.symbols.builtin_type(BuiltinTypeId::String)
    }

    pub(in crate::frontend::typechecker::check_expr) fn boolean_type(&self) -> Ty {
        self.symbols.builtin_type(BuiltinTypeId::Boolean)
    }
}
