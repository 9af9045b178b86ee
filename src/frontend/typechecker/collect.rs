//! First-pass collection: register classes and function signatures into the symbol table.
//!
//! Classes are registered before anything is resolved so declarations may refer to classes declared later in the
//! same unit.

use colit_core::lang::types::builtins;

use crate::frontend::ast::*;
use crate::frontend::diagnostics::CompileError;
use crate::frontend::symbols::*;
use crate::frontend::types::{ClassId, ClassTy, FunctionId, Ty};

use super::TypeChecker;

impl TypeChecker {
    // ========================================================================
    // First pass: collect declarations
    // ========================================================================

    /// Register every class and function of `program`.
    ///
    /// ## Notes
    /// - Order: class names, then supertypes, then member and companion functions, then top-level functions.
    pub(crate) fn collect_declarations(&mut self, program: &Program) {
        let classes: Vec<(ClassId, &ClassDecl)> = program
            .declarations
            .iter()
            .filter_map(|decl| match &decl.node {
                Declaration::Class(class) => self.collect_class(class, decl.span).map(|id| (id, class)),
                _ => None,
            })
            .collect();

        for (id, class) in &classes {
            self.collect_supertypes(*id, class);
        }
        for (id, class) in &classes {
            for member in &class.members {
                self.collect_function(&member.node, member.span, FunctionOwner::Member(*id));
            }
            for function in &class.companion {
                self.collect_function(&function.node, function.span, FunctionOwner::Companion(*id));
            }
        }
        for decl in &program.declarations {
            if let Declaration::Function(function) = &decl.node {
                self.collect_function(function, decl.span, FunctionOwner::TopLevel);
            }
        }
    }

    fn collect_class(&mut self, class: &ClassDecl, span: Span) -> Option<ClassId> {
        if let Some(existing) = self.symbols.lookup_class(&class.name) {
            let previous = self.symbols.class(existing).span;
            self.errors.push(
                CompileError::type_error(format!("Redeclaration: class '{}'", class.name), span)
                    .with_note(format!("previously declared at {}..{}", previous.start, previous.end)),
            );
            return None;
        }
        let type_params = class
            .type_params
            .iter()
            .map(|p| {
                if let Some(bound) = &p.bound {
                    self.errors.push(CompileError::type_error(
                        "Class type parameters cannot declare bounds".to_string(),
                        bound.span,
                    ));
                }
                ClassTypeParam {
                    name: p.name.clone(),
                    variance: p.variance,
                }
            })
            .collect();
        Some(self.symbols.define_class(ClassInfo {
            name: class.name.clone(),
            type_params,
            supertypes: Vec::new(),
            members: Vec::new(),
            companion: Vec::new(),
            span,
            builtin: builtins::from_str(&class.name),
        }))
    }

    fn class_scope(&self, id: ClassId) -> TypeScope {
        let mut scope = TypeScope::new();
        for (index, param) in self.symbols.class(id).type_params.iter().enumerate() {
            scope.push(param.name.clone(), Ty::class_param(id, index));
        }
        scope
    }

    fn collect_supertypes(&mut self, id: ClassId, class: &ClassDecl) {
        let scope = self.class_scope(id);
        for supertype in &class.supertypes {
            let resolved = self.symbols.resolve_type_expr(supertype, &scope, &mut self.errors);
            let Ty::Class(ClassTy { id: sup, args }) = resolved else {
                if !resolved.is_error() {
                    self.errors.push(CompileError::type_error(
                        format!("Supertype of '{}' must be a class", class.name),
                        supertype.span,
                    ));
                }
                continue;
            };
            if self.symbols.ancestors(sup).contains(&id) {
                self.errors.push(CompileError::type_error(
                    format!("Cyclic inheritance involving '{}'", class.name),
                    supertype.span,
                ));
                continue;
            }
            self.symbols.class_mut(id).supertypes.push(ClassTy { id: sup, args });
        }
    }

    /// Register a function signature.
    ///
    /// ## Notes
    /// - The function is defined first so its own type parameters can be referred to by id while resolving the
    ///   signature (bounds may mention any of them).
    /// - Companion functions receive `X.Companion`; members see their class's type parameters.
    fn collect_function(&mut self, decl: &FunctionDecl, span: Span, owner: FunctionOwner) -> FunctionId {
        let id = self.symbols.define_function(FunctionInfo {
            name: decl.name.clone(),
            owner,
            type_params: Vec::new(),
            receiver: None,
            params: Vec::new(),
            return_type: Ty::Error,
            span,
        });

        let mut scope = match owner {
            FunctionOwner::Member(class) => self.class_scope(class),
            FunctionOwner::Companion(_) | FunctionOwner::TopLevel => TypeScope::new(),
        };
        for (index, param) in decl.type_params.iter().enumerate() {
            if param.variance != Variance::Invariant {
                self.errors.push(CompileError::type_error(
                    format!("Variance annotations are not allowed on function type parameter '{}'", param.name),
                    param.span,
                ));
            }
            scope.push(param.name.clone(), Ty::function_param(id, index));
        }

        let type_params = decl
            .type_params
            .iter()
            .map(|p| FunctionTypeParam {
                name: p.name.clone(),
                bound: p
                    .bound
                    .as_ref()
                    .map(|b| self.symbols.resolve_type_expr(b, &scope, &mut self.errors)),
            })
            .collect();
        let receiver = match (owner, &decl.receiver) {
            (FunctionOwner::Companion(class), None) => Some(Ty::Companion(class)),
            (FunctionOwner::TopLevel, Some(receiver)) => {
                Some(self.symbols.resolve_type_expr(receiver, &scope, &mut self.errors))
            }
            (_, Some(receiver)) => {
                self.errors.push(CompileError::type_error(
                    format!("Member function '{}' cannot declare an extension receiver", decl.name),
                    receiver.span,
                ));
                None
            }
            (_, None) => None,
        };
        let params = decl
            .params
            .iter()
            .map(|p| {
                (
                    p.node.name.clone(),
                    self.symbols.resolve_type_expr(&p.node.ty, &scope, &mut self.errors),
                )
            })
            .collect();
        let return_type = self.symbols.resolve_type_expr(&decl.return_type, &scope, &mut self.errors);

        let info = self.symbols.function_mut(id);
        info.type_params = type_params;
        info.receiver = receiver;
        info.params = params;
        info.return_type = return_type;
        id
    }
}
