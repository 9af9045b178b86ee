//! Frontend type model.
//!
//! [`Ty`] is a closed tagged union: every narrowing site (class vs. variable vs. intersection) is an exhaustive
//! `match`. Classes and functions are referenced by arena handles ([`ClassId`], [`FunctionId`]) into the
//! [`SymbolTable`](crate::frontend::symbols::SymbolTable); inference variables are [`TypeVarId`] handles into a
//! [`ConstraintSystem`](crate::frontend::inference::ConstraintSystem).
//!
//! ## Module Structure
//!
//! - `subtype` - subtyping with declaration-site variance
//! - `supertype` - common supertype (least upper bound) and the intersector
//! - `render` - user-facing type rendering

mod render;
mod subtype;
mod supertype;

pub use render::TyDisplay;
pub use subtype::{is_equivalent, is_subtype};
pub use supertype::{common_supertype, intersect};

use std::collections::BTreeSet;

pub use colit_syntax::ast::Variance;

/// Handle of a class in the symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

/// Handle of a function in the symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub u32);

/// Handle of an inference variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVarId(pub u32);

/// Declaration that owns a type parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamOwner {
    Class(ClassId),
    Function(FunctionId),
}

/// A declared (not inferred) type parameter: `T` of `class Box<T>` or `fun <T> f()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeParamRef {
    pub owner: ParamOwner,
    pub index: usize,
}

/// A class applied to type arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassTy {
    pub id: ClassId,
    pub args: Vec<Ty>,
}

/// `(A, B) -> R`, or `Recv.() -> R` when `receiver` is set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionTy {
    pub receiver: Option<Box<Ty>>,
    pub params: Vec<Ty>,
    pub ret: Box<Ty>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    Class(ClassTy),
    /// The companion object of a class, as in `List.Companion`.
    Companion(ClassId),
    Param(TypeParamRef),
    Var(TypeVarId),
    Function(FunctionTy),
    /// Simultaneously a subtype of every member. Members are never intersections themselves.
    Intersection(Vec<Ty>),
    Nothing,
    /// Result of failed resolution; compatible with everything so errors do not cascade.
    Error,
}

impl Ty {
    pub fn class(id: ClassId, args: Vec<Ty>) -> Self {
        Ty::Class(ClassTy { id, args })
    }

    /// The `index`-th type parameter of class `id`.
    pub fn class_param(id: ClassId, index: usize) -> Self {
        Ty::Param(TypeParamRef {
            owner: ParamOwner::Class(id),
            index,
        })
    }

    /// The `index`-th type parameter of function `id`.
    pub fn function_param(id: FunctionId, index: usize) -> Self {
        Ty::Param(TypeParamRef {
            owner: ParamOwner::Function(id),
            index,
        })
    }

    pub fn as_class(&self) -> Option<&ClassTy> {
        match self {
            Ty::Class(c) => Some(c),
            _ => None,
        }
    }

    /// Class identity of this type, if it names exactly one class.
    pub fn class_identity(&self) -> Option<ClassId> {
        self.as_class().map(|c| c.id)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Ty::Error)
    }

    /// Return `true` if any inference variable occurs in this type.
    pub fn contains_var(&self) -> bool {
        self.any(&|t| matches!(t, Ty::Var(_)))
    }

    /// Return `true` if any declared type parameter occurs in this type.
    pub fn contains_param(&self) -> bool {
        self.any(&|t| matches!(t, Ty::Param(_)))
    }

    pub fn contains_error(&self) -> bool {
        self.any(&|t| matches!(t, Ty::Error))
    }

    /// Collect the inference variables occurring in this type.
    pub fn free_vars(&self, out: &mut BTreeSet<TypeVarId>) {
        self.walk(&mut |t| {
            if let Ty::Var(v) = t {
                out.insert(*v);
            }
        });
    }

    fn any(&self, pred: &impl Fn(&Ty) -> bool) -> bool {
        if pred(self) {
            return true;
        }
        match self {
            Ty::Class(c) => c.args.iter().any(|a| a.any(pred)),
            Ty::Function(f) => {
                f.receiver.as_deref().is_some_and(|r| r.any(pred))
                    || f.params.iter().any(|p| p.any(pred))
                    || f.ret.any(pred)
            }
            Ty::Intersection(members) => members.iter().any(|m| m.any(pred)),
            Ty::Companion(_) | Ty::Param(_) | Ty::Var(_) | Ty::Nothing | Ty::Error => false,
        }
    }

    fn walk(&self, visit: &mut impl FnMut(&Ty)) {
        visit(self);
        match self {
            Ty::Class(c) => c.args.iter().for_each(|a| a.walk(visit)),
            Ty::Function(f) => {
                if let Some(r) = &f.receiver {
                    r.walk(visit);
                }
                f.params.iter().for_each(|p| p.walk(visit));
                f.ret.walk(visit);
            }
            Ty::Intersection(members) => members.iter().for_each(|m| m.walk(visit)),
            Ty::Companion(_) | Ty::Param(_) | Ty::Var(_) | Ty::Nothing | Ty::Error => {}
        }
    }

    /// Rebuild this type bottom-up, replacing every leaf for which `f` returns `Some`.
    ///
    /// ## Notes
    /// - `f` is consulted on leaves only (`Param`, `Var`); compound types are rebuilt structurally.
    pub fn map_leaves(&self, f: &impl Fn(&Ty) -> Option<Ty>) -> Ty {
        match self {
            Ty::Param(_) | Ty::Var(_) => f(self).unwrap_or_else(|| self.clone()),
            Ty::Class(c) => Ty::Class(ClassTy {
                id: c.id,
                args: c.args.iter().map(|a| a.map_leaves(f)).collect(),
            }),
            Ty::Function(func) => Ty::Function(FunctionTy {
                receiver: func.receiver.as_ref().map(|r| Box::new(r.map_leaves(f))),
                params: func.params.iter().map(|p| p.map_leaves(f)).collect(),
                ret: Box::new(func.ret.map_leaves(f)),
            }),
            Ty::Intersection(members) => {
                let mut flat = Vec::with_capacity(members.len());
                for member in members {
                    match member.map_leaves(f) {
                        Ty::Intersection(inner) => flat.extend(inner),
                        other => flat.push(other),
                    }
                }
                Ty::Intersection(flat)
            }
            Ty::Companion(_) | Ty::Nothing | Ty::Error => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(n: u32) -> Ty {
        Ty::Var(TypeVarId(n))
    }

    #[test]
    fn free_vars_are_collected_through_nesting() {
        let ty = Ty::Function(FunctionTy {
            receiver: Some(Box::new(Ty::class(ClassId(1), vec![var(3)]))),
            params: vec![var(1)],
            ret: Box::new(Ty::Intersection(vec![var(2), Ty::Nothing])),
        });
        let mut vars = BTreeSet::new();
        ty.free_vars(&mut vars);
        assert_eq!(vars.into_iter().collect::<Vec<_>>(), vec![TypeVarId(1), TypeVarId(2), TypeVarId(3)]);
        assert!(ty.contains_var());
        assert!(!ty.contains_param());
    }

    #[test]
    fn map_leaves_flattens_nested_intersections() {
        let ty = Ty::Intersection(vec![var(0), Ty::class(ClassId(2), vec![])]);
        let replaced = ty.map_leaves(&|t| match t {
            Ty::Var(_) => Some(Ty::Intersection(vec![Ty::class(ClassId(4), vec![]), Ty::class(ClassId(5), vec![])])),
            _ => None,
        });
        assert_eq!(
            replaced,
            Ty::Intersection(vec![
                Ty::class(ClassId(4), vec![]),
                Ty::class(ClassId(5), vec![]),
                Ty::class(ClassId(2), vec![]),
            ])
        );
    }

    #[test]
    fn class_identity_only_for_classes() {
        assert_eq!(Ty::class(ClassId(7), vec![]).class_identity(), Some(ClassId(7)));
        assert_eq!(Ty::Companion(ClassId(7)).class_identity(), None);
        assert_eq!(Ty::Intersection(vec![]).class_identity(), None);
    }
}
