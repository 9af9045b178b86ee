//! Substitution of declared type parameters and inference variables.

use std::collections::{BTreeMap, HashMap};

use crate::frontend::types::{Ty, TypeParamRef, TypeVarId};

/// A finite map from type parameters and inference variables to types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Substitutor {
    params: HashMap<TypeParamRef, Ty>,
    vars: BTreeMap<TypeVarId, Ty>,
}

impl Substitutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_param(&mut self, param: TypeParamRef, ty: Ty) {
        self.params.insert(param, ty);
    }

    pub fn insert_var(&mut self, var: TypeVarId, ty: Ty) {
        self.vars.insert(var, ty);
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.vars.is_empty()
    }

    /// Replace every mapped parameter and variable in `ty` (single pass).
    pub fn apply(&self, ty: &Ty) -> Ty {
        if self.is_empty() {
            return ty.clone();
        }
        ty.map_leaves(&|leaf| match leaf {
            Ty::Param(p) => self.params.get(p).cloned(),
            Ty::Var(v) => self.vars.get(v).cloned(),
            _ => None,
        })
    }

    /// Composition: the result applies `self` first, then `next`.
    ///
    /// `a.then(&b).apply(t) == b.apply(&a.apply(t))` for every `t`.
    pub fn then(&self, next: &Substitutor) -> Substitutor {
        let mut params: HashMap<TypeParamRef, Ty> = self
            .params
            .iter()
            .map(|(k, ty)| (*k, next.apply(ty)))
            .collect();
        for (k, ty) in &next.params {
            params.entry(*k).or_insert_with(|| ty.clone());
        }
        let mut vars: BTreeMap<TypeVarId, Ty> = self.vars.iter().map(|(k, ty)| (*k, next.apply(ty))).collect();
        for (k, ty) in &next.vars {
            vars.entry(*k).or_insert_with(|| ty.clone());
        }
        Substitutor { params, vars }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::types::{ClassId, FunctionId};

    fn list(arg: Ty) -> Ty {
        Ty::class(ClassId(1), vec![arg])
    }

    #[test]
    fn apply_replaces_params_and_vars() {
        let param = TypeParamRef {
            owner: crate::frontend::types::ParamOwner::Function(FunctionId(0)),
            index: 0,
        };
        let mut s = Substitutor::new();
        s.insert_param(param, Ty::Var(TypeVarId(4)));
        assert_eq!(s.apply(&list(Ty::Param(param))), list(Ty::Var(TypeVarId(4))));
        assert_eq!(s.apply(&Ty::Var(TypeVarId(9))), Ty::Var(TypeVarId(9)));
    }

    #[test]
    fn then_applies_self_first() {
        let param = TypeParamRef {
            owner: crate::frontend::types::ParamOwner::Function(FunctionId(3)),
            index: 1,
        };
        let mut first = Substitutor::new();
        first.insert_param(param, Ty::Var(TypeVarId(0)));
        let mut second = Substitutor::new();
        second.insert_var(TypeVarId(0), Ty::class(ClassId(2), vec![]));
        let composed = first.then(&second);
        let ty = list(Ty::Param(param));
        assert_eq!(composed.apply(&ty), second.apply(&first.apply(&ty)));
        assert_eq!(composed.apply(&ty), list(Ty::class(ClassId(2), vec![])));
    }
}
