//! Constraint system: inference variables with lower and upper bounds.
//!
//! Constraints are decomposed structurally as they are added and incorporated transitively through variable
//! bounds, so the bounds of every variable are always consistent with each other (or a contradiction has been
//! recorded). Contradictions are data, not control flow: callers inspect [`ConstraintSystem::has_contradiction`]
//! after adding the constraints of one argument or candidate.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use thiserror::Error;

use super::Substitutor;
use crate::frontend::ast::Ident;
use crate::frontend::symbols::SymbolTable;
use crate::frontend::types::{Ty, TypeVarId, Variance, common_supertype, intersect, is_subtype};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixationMode {
    /// Fix only variables with at least one proper (variable-free) bound.
    Proper,
    /// After proper fixation stalls, fix remaining variables to `Any` one at a time.
    Forced,
}

/// One inference variable and everything known about it.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableWithConstraints {
    /// Name of the type parameter this variable stands for, for diagnostics.
    pub name: Ident,
    pub lower: Vec<Ty>,
    pub upper: Vec<Ty>,
    pub fixed: Option<Ty>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstraintError {
    #[error("type mismatch between constrained types")]
    Contradiction { sub: Ty, sup: Ty },
    #[error("type variable ?{} is not registered in this constraint system", .0.0)]
    UnknownVariable(TypeVarId),
}

#[derive(Debug, Clone, Default)]
pub struct ConstraintSystem {
    variables: BTreeMap<TypeVarId, VariableWithConstraints>,
    errors: Vec<ConstraintError>,
}

impl ConstraintSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, var: TypeVarId, name: impl Into<Ident>) {
        self.variables.entry(var).or_insert_with(|| VariableWithConstraints {
            name: name.into(),
            lower: Vec::new(),
            upper: Vec::new(),
            fixed: None,
        });
    }

    pub fn is_registered(&self, var: TypeVarId) -> bool {
        self.variables.contains_key(&var)
    }

    pub fn variable(&self, var: TypeVarId) -> Option<&VariableWithConstraints> {
        self.variables.get(&var)
    }

    pub fn errors(&self) -> &[ConstraintError] {
        &self.errors
    }

    pub fn has_contradiction(&self) -> bool {
        !self.errors.is_empty()
    }

    /// First constraint that referenced a variable this system never registered.
    pub fn unknown_variable(&self) -> Option<TypeVarId> {
        self.errors.iter().find_map(|e| match e {
            ConstraintError::UnknownVariable(var) => Some(*var),
            ConstraintError::Contradiction { .. } => None,
        })
    }

    /// Variables without a fixed type, in allocation order.
    pub fn unfixed_variables(&self) -> Vec<TypeVarId> {
        self.variables
            .iter()
            .filter(|(_, v)| v.fixed.is_none())
            .map(|(id, _)| *id)
            .collect()
    }

    // ========================================================================
    // Constraints
    // ========================================================================

    /// Add `sub <: sup`, decomposing structurally and incorporating through variable bounds.
    pub fn add_subtype_constraint(&mut self, symbols: &SymbolTable, sub: &Ty, sup: &Ty) {
        let mut visited = HashSet::new();
        self.incorporate(symbols, sub.clone(), sup.clone(), &mut visited);
    }

    /// Add `sub <: sup` only if doing so introduces no contradiction.
    ///
    /// ## Returns
    /// - `true` if the constraint was added, `false` if the system was left untouched.
    pub fn add_subtype_constraint_if_compatible(&mut self, symbols: &SymbolTable, sub: &Ty, sup: &Ty) -> bool {
        let snapshot = self.clone();
        let before = self.errors.len();
        self.add_subtype_constraint(symbols, sub, sup);
        if self.errors.len() > before {
            *self = snapshot;
            return false;
        }
        true
    }

    pub fn add_equality_constraint(&mut self, symbols: &SymbolTable, a: &Ty, b: &Ty) {
        self.add_subtype_constraint(symbols, a, b);
        self.add_subtype_constraint(symbols, b, a);
    }

    fn contradiction(&mut self, sub: Ty, sup: Ty) {
        self.errors.push(ConstraintError::Contradiction { sub, sup });
    }

    fn incorporate(&mut self, symbols: &SymbolTable, sub: Ty, sup: Ty, visited: &mut HashSet<(Ty, Ty)>) {
        let sub = self.substitute_fixed(&sub);
        let sup = self.substitute_fixed(&sup);
        if sub == sup || !visited.insert((sub.clone(), sup.clone())) {
            return;
        }
        match (&sub, &sup) {
            (Ty::Error, _) | (_, Ty::Error) => {}
            (Ty::Var(a), _) if !self.is_registered(*a) => self.errors.push(ConstraintError::UnknownVariable(*a)),
            (_, Ty::Var(b)) if !self.is_registered(*b) => self.errors.push(ConstraintError::UnknownVariable(*b)),
            (Ty::Var(a), _) => {
                let var = *a;
                if self.push_bound(var, &sup, Bound::Upper) {
                    for lower in self.bounds(var, Bound::Lower) {
                        self.incorporate(symbols, lower, sup.clone(), visited);
                    }
                }
                if let Ty::Var(b) = &sup {
                    let target = *b;
                    if self.push_bound(target, &sub, Bound::Lower) {
                        for upper in self.bounds(target, Bound::Upper) {
                            self.incorporate(symbols, sub.clone(), upper, visited);
                        }
                    }
                }
            }
            (_, Ty::Var(b)) => {
                let var = *b;
                if self.push_bound(var, &sub, Bound::Lower) {
                    for upper in self.bounds(var, Bound::Upper) {
                        self.incorporate(symbols, sub.clone(), upper, visited);
                    }
                }
            }
            (Ty::Nothing, _) => {}
            (_, Ty::Class(c)) if symbols.is_any(c.id) => {}
            (_, Ty::Intersection(members)) => {
                for member in members.clone() {
                    self.incorporate(symbols, sub.clone(), member, visited);
                }
            }
            (Ty::Intersection(members), _) => {
                if !sup.contains_var() {
                    if !is_subtype(symbols, &sub, &sup) {
                        self.contradiction(sub.clone(), sup.clone());
                    }
                    return;
                }
                // Constrain through the member that can reach the supertype's shape.
                let reaching = members.iter().find(|member| match (member, &sup) {
                    (Ty::Class(m), Ty::Class(c)) => symbols.supertype_as(m, c.id).is_some(),
                    (Ty::Function(_), Ty::Function(_)) => true,
                    _ => false,
                });
                match reaching {
                    Some(member) => self.incorporate(symbols, member.clone(), sup.clone(), visited),
                    None => self.contradiction(sub.clone(), sup.clone()),
                }
            }
            (Ty::Class(a), Ty::Class(b)) => match symbols.supertype_as(a, b.id) {
                Some(view) if view.args.len() == b.args.len() => {
                    for (index, (x, y)) in view.args.into_iter().zip(b.args.clone()).enumerate() {
                        match symbols.variance(b.id, index) {
                            Variance::Out => self.incorporate(symbols, x, y, visited),
                            Variance::In => self.incorporate(symbols, y, x, visited),
                            Variance::Invariant => {
                                self.incorporate(symbols, x.clone(), y.clone(), visited);
                                self.incorporate(symbols, y, x, visited);
                            }
                        }
                    }
                }
                _ => self.contradiction(sub.clone(), sup.clone()),
            },
            (Ty::Function(a), Ty::Function(b)) => {
                if a.params.len() != b.params.len() || a.receiver.is_some() != b.receiver.is_some() {
                    self.contradiction(sub.clone(), sup.clone());
                    return;
                }
                if let (Some(ra), Some(rb)) = (&a.receiver, &b.receiver) {
                    self.incorporate(symbols, (**rb).clone(), (**ra).clone(), visited);
                }
                for (pa, pb) in a.params.iter().zip(&b.params) {
                    self.incorporate(symbols, pb.clone(), pa.clone(), visited);
                }
                self.incorporate(symbols, (*a.ret).clone(), (*b.ret).clone(), visited);
            }
            _ => {
                if !is_subtype(symbols, &sub, &sup) {
                    self.contradiction(sub.clone(), sup.clone());
                }
            }
        }
    }

    /// Record a bound; returns `false` if it was already present.
    fn push_bound(&mut self, var: TypeVarId, ty: &Ty, which: Bound) -> bool {
        let Some(v) = self.variables.get_mut(&var) else {
            return false;
        };
        let list = match which {
            Bound::Lower => &mut v.lower,
            Bound::Upper => &mut v.upper,
        };
        if list.contains(ty) {
            return false;
        }
        list.push(ty.clone());
        true
    }

    fn bounds(&self, var: TypeVarId, which: Bound) -> Vec<Ty> {
        self.variables
            .get(&var)
            .map(|v| match which {
                Bound::Lower => v.lower.clone(),
                Bound::Upper => v.upper.clone(),
            })
            .unwrap_or_default()
    }

    // ========================================================================
    // Fixation
    // ========================================================================

    /// Replace every fixed variable in `ty` by its fixed type.
    pub fn substitute_fixed(&self, ty: &Ty) -> Ty {
        if !ty.contains_var() {
            return ty.clone();
        }
        ty.map_leaves(&|leaf| match leaf {
            Ty::Var(v) => self
                .variables
                .get(v)
                .and_then(|info| info.fixed.as_ref())
                .map(|fixed| self.substitute_fixed(fixed)),
            _ => None,
        })
    }

    /// The type `var` would be fixed to: the common supertype of its proper lower bounds, or the intersection of
    /// its proper upper bounds when it has no proper lower bound.
    ///
    /// ## Returns
    /// - `Ok(None)` if the variable has no proper bound yet
    /// - `Err(UnknownVariable)` if `var` is not registered here
    pub fn result_type(&self, symbols: &SymbolTable, var: TypeVarId) -> Result<Option<Ty>, ConstraintError> {
        let info = self
            .variables
            .get(&var)
            .ok_or(ConstraintError::UnknownVariable(var))?;
        if let Some(fixed) = &info.fixed {
            return Ok(Some(self.substitute_fixed(fixed)));
        }
        let proper = |bounds: &[Ty]| -> Vec<Ty> {
            bounds
                .iter()
                .map(|b| self.substitute_fixed(b))
                .filter(|b| !b.contains_var())
                .collect()
        };
        let lower = proper(&info.lower);
        let upper = proper(&info.upper);
        if !lower.is_empty() {
            return Ok(Some(common_supertype(symbols, &lower)));
        }
        Ok((!upper.is_empty()).then(|| intersect(symbols, &upper)))
    }

    /// Fix `var` to `ty` and check `ty` against every recorded bound.
    ///
    /// ## Notes
    /// - Fixing an already fixed variable is a no-op.
    /// - A type mentioning `var` itself is recorded as a contradiction.
    pub fn fix_to(&mut self, symbols: &SymbolTable, var: TypeVarId, ty: Ty) -> Result<(), ConstraintError> {
        let info = self
            .variables
            .get(&var)
            .ok_or(ConstraintError::UnknownVariable(var))?;
        if info.fixed.is_some() {
            return Ok(());
        }
        let mut occurring = BTreeSet::new();
        ty.free_vars(&mut occurring);
        if occurring.contains(&var) {
            self.contradiction(Ty::Var(var), ty);
            return Ok(());
        }
        let (lower, upper) = (info.lower.clone(), info.upper.clone());
        if let Some(info) = self.variables.get_mut(&var) {
            info.fixed = Some(ty.clone());
        }
        let mut visited = HashSet::new();
        for bound in lower {
            self.incorporate(symbols, bound, ty.clone(), &mut visited);
        }
        for bound in upper {
            self.incorporate(symbols, ty.clone(), bound, &mut visited);
        }
        Ok(())
    }

    /// Fix `var` to its [`result_type`](Self::result_type).
    ///
    /// ## Returns
    /// - The fixed type, or `None` if the variable has no proper bound.
    pub fn fix_variable(&mut self, symbols: &SymbolTable, var: TypeVarId) -> Result<Option<Ty>, ConstraintError> {
        let Some(ty) = self.result_type(symbols, var)? else {
            return Ok(None);
        };
        self.fix_to(symbols, var, ty.clone())?;
        Ok(Some(ty))
    }

    /// Fix every variable that can be fixed; with [`FixationMode::Forced`], fix the rest to `Any`.
    pub fn fix_all(&mut self, symbols: &SymbolTable, mode: FixationMode) -> Result<(), ConstraintError> {
        loop {
            let mut progressed = false;
            for var in self.unfixed_variables() {
                if self.fix_variable(symbols, var)?.is_some() {
                    progressed = true;
                }
            }
            if progressed {
                continue;
            }
            match (mode, self.unfixed_variables().first()) {
                (FixationMode::Forced, Some(var)) => {
                    let var = *var;
                    self.fix_to(symbols, var, symbols.any_type())?;
                }
                _ => return Ok(()),
            }
        }
    }

    /// Fix every variable with a proper bound that does not depend on `held`.
    ///
    /// A variable depends on `held` if it is held, if it is a bare variable bound of a dependent variable, or if
    /// one of its bounds mentions a dependent variable. Held variables keep their bounds open for a later
    /// decision (a literal argument choosing its builder), while siblings such as the element variable of a
    /// generic call argument get fixed so their proper types reach the held variables' bounds.
    pub fn fix_independent(&mut self, symbols: &SymbolTable, held: &BTreeSet<TypeVarId>) -> Result<(), ConstraintError> {
        let mut dependent = held.clone();
        loop {
            let mut grew = false;
            for (var, info) in &self.variables {
                if dependent.contains(var) {
                    for bound in info.lower.iter().chain(&info.upper) {
                        if let Ty::Var(other) = bound {
                            grew |= dependent.insert(*other);
                        }
                    }
                    continue;
                }
                let mut mentioned = BTreeSet::new();
                for bound in info.lower.iter().chain(&info.upper) {
                    bound.free_vars(&mut mentioned);
                }
                if mentioned.iter().any(|other| dependent.contains(other)) {
                    grew |= dependent.insert(*var);
                }
            }
            if !grew {
                break;
            }
        }
        loop {
            let mut progressed = false;
            for var in self.unfixed_variables() {
                if !dependent.contains(&var) && self.fix_variable(symbols, var)?.is_some() {
                    progressed = true;
                }
            }
            if !progressed {
                return Ok(());
            }
        }
    }

    /// Substitutor mapping every fixed variable to its (fully substituted) type.
    pub fn current_substitutor(&self) -> Substitutor {
        let mut substitutor = Substitutor::new();
        for (var, info) in &self.variables {
            if let Some(fixed) = &info.fixed {
                substitutor.insert_var(*var, self.substitute_fixed(fixed));
            }
        }
        substitutor
    }

    /// Copy the variables of `other` into this system; `other` is not modified.
    ///
    /// Bounds of variables known to both systems are unioned; recorded errors are not copied.
    pub fn merge_snapshot(&mut self, other: &ConstraintSystem) {
        for (var, info) in &other.variables {
            match self.variables.get_mut(var) {
                None => {
                    self.variables.insert(*var, info.clone());
                }
                Some(existing) => {
                    for bound in &info.lower {
                        if !existing.lower.contains(bound) {
                            existing.lower.push(bound.clone());
                        }
                    }
                    for bound in &info.upper {
                        if !existing.upper.contains(bound) {
                            existing.upper.push(bound.clone());
                        }
                    }
                    if existing.fixed.is_none() {
                        existing.fixed = info.fixed.clone();
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Lower,
    Upper,
}
