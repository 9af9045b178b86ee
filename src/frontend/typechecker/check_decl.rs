//! Second-pass declaration checking: `val` initializers.

use crate::frontend::ast::*;
use crate::frontend::diagnostics::CompileError;
use crate::frontend::literals::InternalError;
use crate::frontend::symbols::{TypeScope, ValInfo};
use crate::frontend::types::{Ty, is_subtype};

use super::{Mode, TypeChecker};

impl TypeChecker {
    /// Check a `val` and define it.
    ///
    /// With a declared type the initializer is checked against it; otherwise the initializer is resolved
    /// independently and its type becomes the `val`'s type.
    #[tracing::instrument(skip_all, fields(name = %val.name))]
    pub(crate) fn check_val(&mut self, val: &mut ValDecl, span: Span) -> Result<(), InternalError> {
        let declared = val
            .ty
            .as_ref()
            .map(|ty| self.symbols.resolve_type_expr(ty, &TypeScope::new(), &mut self.errors));

        let ty = match declared {
            Some(declared) => {
                let actual = self.check_expr(&mut val.value, &Mode::Expected(declared.clone()))?;
                if !is_subtype(&self.symbols, &actual.ty, &declared) {
                    self.errors.push(self.type_mismatch(&actual.ty, &declared, val.value.span));
                }
                declared
            }
            None => self.check_expr(&mut val.value, &Mode::Independent)?.ty,
        };

        let info = ValInfo { ty: ty.clone(), span };
        if let Some(previous) = self.symbols.define_val(val.name.clone(), info) {
            self.errors.push(
                CompileError::type_error(format!("Conflicting declarations: val '{}'", val.name), span)
                    .with_note(format!("previously declared at {}..{}", previous.start, previous.end)),
            );
        }
        self.type_info.val_types.push((val.name.clone(), ty));
        Ok(())
    }

    pub(crate) fn type_mismatch(&self, actual: &Ty, expected: &Ty, span: Span) -> CompileError {
        CompileError::type_error(
            format!(
                "Type mismatch: inferred type is {} but {} was expected",
                self.symbols.display(actual),
                self.symbols.display(expected)
            ),
            span,
        )
    }
}
