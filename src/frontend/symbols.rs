//! Symbol table for colit
//!
//! Classes and functions live in arenas addressed by [`ClassId`] and [`FunctionId`]; `val`s are module-level names.
//! The table outlives individual compilation units: builtins, the prelude and user code are declared into the same
//! table one unit after another.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use colit_core::lang::types::builtins::{self, BuiltinTypeId};

use crate::frontend::ast::{Ident, Span, Spanned, TypeExpr};
use crate::frontend::diagnostics::CompileError;
use crate::frontend::types::{
    ClassId, ClassTy, FunctionId, FunctionTy, ParamOwner, Ty, TyDisplay, Variance, intersect,
};

/// A declared class type parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassTypeParam {
    pub name: Ident,
    pub variance: Variance,
}

/// A declared function type parameter and its upper bound.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTypeParam {
    pub name: Ident,
    pub bound: Option<Ty>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionOwner {
    /// Top-level function, possibly an extension (see [`FunctionInfo::receiver`]).
    TopLevel,
    /// Member function declared in a class body.
    Member(ClassId),
    /// Function declared in a class's `companion object`.
    Companion(ClassId),
}

/// Information about a class
#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub name: Ident,
    pub type_params: Vec<ClassTypeParam>,
    /// Declared supertypes, expressed over this class's own type parameters.
    pub supertypes: Vec<ClassTy>,
    pub members: Vec<FunctionId>,
    pub companion: Vec<FunctionId>,
    pub span: Span,
    pub builtin: Option<BuiltinTypeId>,
}

/// Information about a function signature
#[derive(Debug, Clone)]
pub struct FunctionInfo {
    pub name: Ident,
    pub owner: FunctionOwner,
    pub type_params: Vec<FunctionTypeParam>,
    /// Receiver type for extensions and companion members (`List.Companion`); `None` otherwise.
    pub receiver: Option<Ty>,
    pub params: Vec<(Ident, Ty)>,
    pub return_type: Ty,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ValInfo {
    pub ty: Ty,
    pub span: Span,
}

/// Names of type parameters visible while resolving a type expression.
#[derive(Debug, Clone, Default)]
pub struct TypeScope {
    names: Vec<(Ident, Ty)>,
}

impl TypeScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<Ident>, ty: Ty) {
        self.names.push((name.into(), ty));
    }

    /// Innermost binding wins.
    pub fn lookup(&self, name: &str) -> Option<&Ty> {
        self.names.iter().rev().find(|(n, _)| n == name).map(|(_, ty)| ty)
    }
}

/// Symbol table managing classes, functions and `val`s
#[derive(Debug, Default)]
pub struct SymbolTable {
    classes: Vec<ClassInfo>,
    class_names: HashMap<Ident, ClassId>,
    functions: Vec<FunctionInfo>,
    vals: HashMap<Ident, ValInfo>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Classes
    // ========================================================================

    /// Register a class; the caller has checked that the name is free.
    pub fn define_class(&mut self, info: ClassInfo) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.class_names.insert(info.name.clone(), id);
        self.classes.push(info);
        id
    }

    pub fn class(&self, id: ClassId) -> &ClassInfo {
        &self.classes[id.0 as usize]
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut ClassInfo {
        &mut self.classes[id.0 as usize]
    }

    pub fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.class_names.get(name).copied()
    }

    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        (0..self.classes.len()).map(|i| ClassId(i as u32))
    }

    pub fn builtin_class(&self, id: BuiltinTypeId) -> Option<ClassId> {
        self.lookup_class(builtins::as_str(id))
            .filter(|class| self.class(*class).builtin == Some(id))
    }

    /// A builtin class without type arguments, or the error type if builtins are not loaded.
    pub fn builtin_type(&self, id: BuiltinTypeId) -> Ty {
        self.builtin_class(id)
            .map(|class| Ty::class(class, Vec::new()))
            .unwrap_or(Ty::Error)
    }

    pub fn any_type(&self) -> Ty {
        self.builtin_type(BuiltinTypeId::Any)
    }

    pub fn is_any(&self, id: ClassId) -> bool {
        self.class(id).builtin == Some(BuiltinTypeId::Any)
    }

    pub fn variance(&self, id: ClassId, index: usize) -> Variance {
        self.class(id)
            .type_params
            .get(index)
            .map(|p| p.variance)
            .unwrap_or_default()
    }

    /// View `ty` as an instance of `target` by walking declared supertypes.
    ///
    /// ## Returns
    /// - `Some(ClassTy)` with `target`'s arguments expressed in terms of `ty`'s arguments
    /// - `None` if `target` is not a supertype of `ty`'s class
    ///
    /// ## Notes
    /// - `Any` is a supertype of every class, declared or not.
    /// - With several inheritance paths to `target`, the first one found (breadth-first) wins.
    pub fn supertype_as(&self, ty: &ClassTy, target: ClassId) -> Option<ClassTy> {
        if ty.id == target {
            return Some(ty.clone());
        }
        if self.is_any(target) {
            return Some(ClassTy {
                id: target,
                args: Vec::new(),
            });
        }
        let mut seen = HashSet::from([ty.id]);
        let mut queue = VecDeque::from([ty.clone()]);
        while let Some(current) = queue.pop_front() {
            for declared in &self.class(current.id).supertypes {
                let instantiated = substitute_class_params(declared, current.id, &current.args);
                if instantiated.id == target {
                    return Some(instantiated);
                }
                if seen.insert(instantiated.id) {
                    queue.push_back(instantiated);
                }
            }
        }
        None
    }

    /// Every class `id` inherits from, including itself and `Any`.
    pub fn ancestors(&self, id: ClassId) -> BTreeSet<ClassId> {
        let mut out = BTreeSet::from([id]);
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            for sup in &self.class(current).supertypes {
                if out.insert(sup.id) {
                    queue.push_back(sup.id);
                }
            }
        }
        if let Some(any) = self.builtin_class(BuiltinTypeId::Any) {
            out.insert(any);
        }
        out
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// Register a function and attach it to its owning class, if any.
    pub fn define_function(&mut self, info: FunctionInfo) -> FunctionId {
        let id = FunctionId(self.functions.len() as u32);
        match info.owner {
            FunctionOwner::Member(class) => self.class_mut(class).members.push(id),
            FunctionOwner::Companion(class) => self.class_mut(class).companion.push(id),
            FunctionOwner::TopLevel => {}
        }
        self.functions.push(info);
        id
    }

    pub fn function(&self, id: FunctionId) -> &FunctionInfo {
        &self.functions[id.0 as usize]
    }

    pub fn function_mut(&mut self, id: FunctionId) -> &mut FunctionInfo {
        &mut self.functions[id.0 as usize]
    }

    /// All functions with the given name, in declaration order.
    pub fn functions_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = FunctionId> + 'a {
        self.functions
            .iter()
            .enumerate()
            .filter(move |(_, f)| f.name == name)
            .map(|(i, _)| FunctionId(i as u32))
    }

    /// Top-level functions without a receiver.
    pub fn top_level_functions(&self, name: &str) -> Vec<FunctionId> {
        self.functions_named(name)
            .filter(|id| {
                let f = self.function(*id);
                f.owner == FunctionOwner::TopLevel && f.receiver.is_none()
            })
            .collect()
    }

    /// Top-level extension functions (any receiver).
    pub fn extension_functions(&self, name: &str) -> Vec<FunctionId> {
        self.functions_named(name)
            .filter(|id| {
                let f = self.function(*id);
                f.owner == FunctionOwner::TopLevel && f.receiver.is_some()
            })
            .collect()
    }

    /// Member functions named `name` declared in `class` or any of its ancestors.
    pub fn member_functions(&self, class: ClassId, name: &str) -> Vec<FunctionId> {
        self.ancestors(class)
            .into_iter()
            .flat_map(|c| self.class(c).members.iter().copied())
            .filter(|id| self.function(*id).name == name)
            .collect()
    }

    pub fn companion_functions(&self, class: ClassId, name: &str) -> Vec<FunctionId> {
        self.class(class)
            .companion
            .iter()
            .copied()
            .filter(|id| self.function(*id).name == name)
            .collect()
    }

    // ========================================================================
    // Values
    // ========================================================================

    /// Define a `val`; returns the previous definition's span if the name was taken.
    pub fn define_val(&mut self, name: Ident, info: ValInfo) -> Option<Span> {
        if let Some(existing) = self.vals.get(&name) {
            return Some(existing.span);
        }
        self.vals.insert(name, info);
        None
    }

    pub fn lookup_val(&self, name: &str) -> Option<&ValInfo> {
        self.vals.get(name)
    }

    // ========================================================================
    // Types
    // ========================================================================

    pub fn display<'a>(&'a self, ty: &'a Ty) -> TyDisplay<'a> {
        TyDisplay::new(ty, self)
    }

    /// Convert an AST type expression into a [`Ty`].
    ///
    /// ## Parameters
    /// - `scope`: type parameters visible at this position
    /// - `errors`: sink for unresolved names and arity mismatches
    ///
    /// ## Returns
    /// - The resolved type; `Ty::Error` in place of anything that failed to resolve.
    pub fn resolve_type_expr(
        &self,
        expr: &Spanned<TypeExpr>,
        scope: &TypeScope,
        errors: &mut Vec<CompileError>,
    ) -> Ty {
        match &expr.node {
            TypeExpr::Named { name, args } => {
                if args.is_empty() {
                    if let Some(ty) = scope.lookup(name) {
                        return ty.clone();
                    }
                }
                if builtins::from_str(name) == Some(BuiltinTypeId::Nothing) && args.is_empty() {
                    return Ty::Nothing;
                }
                let Some(id) = self.lookup_class(name) else {
                    errors.push(CompileError::type_error(format!("Unresolved type '{name}'"), expr.span));
                    return Ty::Error;
                };
                let arity = self.class(id).type_params.len();
                if args.len() != arity {
                    errors.push(CompileError::type_error(
                        format!(
                            "Type '{name}' expects {arity} type argument(s), but {} were given",
                            args.len()
                        ),
                        expr.span,
                    ));
                    return Ty::Error;
                }
                let args = args.iter().map(|a| self.resolve_type_expr(a, scope, errors)).collect();
                Ty::class(id, args)
            }
            TypeExpr::Companion(name) => match self.lookup_class(name) {
                Some(id) => Ty::Companion(id),
                None => {
                    errors.push(CompileError::type_error(format!("Unresolved type '{name}'"), expr.span));
                    Ty::Error
                }
            },
            TypeExpr::Function(func) => Ty::Function(FunctionTy {
                receiver: func
                    .receiver
                    .as_ref()
                    .map(|r| Box::new(self.resolve_type_expr(r, scope, errors))),
                params: func
                    .params
                    .iter()
                    .map(|p| self.resolve_type_expr(p, scope, errors))
                    .collect(),
                ret: Box::new(self.resolve_type_expr(&func.ret, scope, errors)),
            }),
            TypeExpr::Intersection(members) => {
                let members: Vec<Ty> = members
                    .iter()
                    .map(|m| self.resolve_type_expr(m, scope, errors))
                    .collect();
                intersect(self, &members)
            }
            TypeExpr::Error => Ty::Error,
        }
    }
}

/// Replace `owner`'s class parameters in a declared supertype by concrete arguments.
fn substitute_class_params(declared: &ClassTy, owner: ClassId, args: &[Ty]) -> ClassTy {
    let substitute = |leaf: &Ty| match leaf {
        Ty::Param(p) if p.owner == ParamOwner::Class(owner) => args.get(p.index).cloned(),
        _ => None,
    };
    ClassTy {
        id: declared.id,
        args: declared.args.iter().map(|a| a.map_leaves(&substitute)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::typechecker::TypeChecker;

    fn class(symbols: &SymbolTable, name: &str, args: Vec<Ty>) -> ClassTy {
        ClassTy {
            id: symbols.lookup_class(name).expect("class exists"),
            args,
        }
    }

    #[test]
    fn builtins_are_registered_with_their_ids() {
        let symbols = TypeChecker::new().symbols;
        let any = symbols.builtin_class(BuiltinTypeId::Any).expect("Any");
        assert!(symbols.is_any(any));
        assert!(symbols.builtin_class(BuiltinTypeId::SequenceBuilder).is_some());
        // `Nothing` is a type, not a class
        assert!(symbols.lookup_class("Nothing").is_none());
    }

    #[test]
    fn supertype_as_substitutes_arguments() {
        let symbols = TypeChecker::new().symbols;
        let int = Ty::class(symbols.lookup_class("Int").expect("Int"), vec![]);
        let mutable = class(&symbols, "MutableList", vec![int.clone()]);
        let collection = symbols.lookup_class("Collection").expect("Collection");
        let view = symbols.supertype_as(&mutable, collection).expect("is a collection");
        assert_eq!(view.args, vec![int]);
        let map = symbols.lookup_class("Map").expect("Map");
        assert!(symbols.supertype_as(&mutable, map).is_none());
    }

    #[test]
    fn ancestors_include_self_and_any() {
        let symbols = TypeChecker::new().symbols;
        let list = symbols.lookup_class("List").expect("List");
        let names: Vec<&str> = symbols
            .ancestors(list)
            .into_iter()
            .map(|id| symbols.class(id).name.as_str())
            .collect();
        assert!(names.contains(&"List"));
        assert!(names.contains(&"Collection"));
        assert!(names.contains(&"Any"));
        assert!(!names.contains(&"Set"));
    }

    #[test]
    fn resolve_type_expr_reports_arity_and_unknown_names() {
        let symbols = TypeChecker::new().symbols;
        let mut errors = Vec::new();
        let bare_list = Spanned::new(TypeExpr::named("List"), Span::new(0, 4));
        assert_eq!(symbols.resolve_type_expr(&bare_list, &TypeScope::new(), &mut errors), Ty::Error);
        let unknown = Spanned::new(TypeExpr::named("Nope"), Span::new(5, 9));
        assert_eq!(symbols.resolve_type_expr(&unknown, &TypeScope::new(), &mut errors), Ty::Error);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("expects 1 type argument"));
        assert_eq!(errors[1].message, "Unresolved type 'Nope'");
    }

    #[test]
    fn scope_parameters_shadow_classes() {
        let symbols = TypeChecker::new().symbols;
        let mut scope = TypeScope::new();
        scope.push("Int", Ty::Nothing);
        let mut errors = Vec::new();
        let expr = Spanned::new(TypeExpr::named("Int"), Span::default());
        assert_eq!(symbols.resolve_type_expr(&expr, &scope, &mut errors), Ty::Nothing);
        assert!(errors.is_empty());
    }

    #[test]
    fn define_val_rejects_duplicates() {
        let mut symbols = SymbolTable::new();
        let first = ValInfo {
            ty: Ty::Nothing,
            span: Span::new(0, 1),
        };
        assert_eq!(symbols.define_val("a".into(), first.clone()), None);
        assert_eq!(symbols.define_val("a".into(), first), Some(Span::new(0, 1)));
    }
}
