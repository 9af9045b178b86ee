//! Common supertype (least upper bound) and the intersector.
//!
//! Both operations normalise their result: duplicates and subsumed members are dropped, and a single survivor is
//! returned as-is rather than wrapped in a one-element intersection.

use std::collections::BTreeSet;

use super::subtype::is_subtype;
use super::{ClassId, ClassTy, Ty, Variance};
use crate::frontend::symbols::SymbolTable;

/// Nesting limit for recursive argument unification (e.g. `class A : Comparable<A>` shapes).
const MAX_DEPTH: usize = 8;

/// Least upper bound of `types`.
///
/// ## Returns
/// - `Nothing` for an empty input (or an input of only `Nothing`)
/// - `Error` if any input is the error type
/// - the single most specific common supertype, or an intersection of several unrelated ones
///
/// ## Notes
/// - Covariant arguments are unified recursively, contravariant ones intersected. A class whose invariant argument
///   differs between inputs cannot be a common supertype with a well-formed argument; the walk then moves up to
///   that class's own supertypes.
pub fn common_supertype(symbols: &SymbolTable, types: &[Ty]) -> Ty {
    common_supertype_at(symbols, types, 0)
}

fn common_supertype_at(symbols: &SymbolTable, types: &[Ty], depth: usize) -> Ty {
    let mut candidates: Vec<Ty> = Vec::new();
    for ty in types {
        match ty {
            Ty::Nothing => {}
            Ty::Error => return Ty::Error,
            other if !candidates.contains(other) => candidates.push(other.clone()),
            _ => {}
        }
    }
    let maximal = keep_extremes(candidates, |sub, sup| is_subtype(symbols, sub, sup));
    match maximal.len() {
        0 => return Ty::Nothing,
        1 => return maximal.into_iter().next().unwrap_or(Ty::Nothing),
        _ => {}
    }
    if !maximal.iter().all(is_class_like) || depth >= MAX_DEPTH {
        return symbols.any_type();
    }
    common_class_supertype(symbols, &maximal, depth)
}

/// Intersection of `types`, simplified.
///
/// ## Returns
/// - `Any` for an empty input
/// - `Nothing` if any member is `Nothing`, `Error` if any member is the error type
/// - the single most specific member if one is a subtype of all others, otherwise a flat intersection
pub fn intersect(symbols: &SymbolTable, types: &[Ty]) -> Ty {
    let mut flat: Vec<Ty> = Vec::new();
    for ty in types {
        let members = match ty {
            Ty::Intersection(members) => members.clone(),
            other => vec![other.clone()],
        };
        for member in members {
            if !flat.contains(&member) {
                flat.push(member);
            }
        }
    }
    if flat.iter().any(Ty::is_error) {
        return Ty::Error;
    }
    if flat.contains(&Ty::Nothing) {
        return Ty::Nothing;
    }
    // Keep the most specific members: drop anything that is a supertype of another member.
    let minimal = keep_extremes(flat, |sub, sup| is_subtype(symbols, sup, sub));
    match minimal.len() {
        0 => symbols.any_type(),
        1 => minimal.into_iter().next().unwrap_or(Ty::Nothing),
        _ => Ty::Intersection(minimal),
    }
}

/// Keep the members not dominated by another one. `dominated(a, b)` means `a` is covered by `b`; of two members
/// that dominate each other, the first one survives.
fn keep_extremes(types: Vec<Ty>, dominated: impl Fn(&Ty, &Ty) -> bool) -> Vec<Ty> {
    let keep: Vec<bool> = (0..types.len())
        .map(|i| {
            !(0..types.len()).any(|j| {
                j != i && dominated(&types[i], &types[j]) && (!dominated(&types[j], &types[i]) || j < i)
            })
        })
        .collect();
    types
        .into_iter()
        .zip(keep)
        .filter_map(|(ty, keep)| keep.then_some(ty))
        .collect()
}

fn is_class_like(ty: &Ty) -> bool {
    match ty {
        Ty::Class(_) => true,
        Ty::Intersection(members) => members.iter().all(is_class_like),
        _ => false,
    }
}

/// Class ids of every supertype of `ty`, including its own class and `Any`.
fn supertype_ids(symbols: &SymbolTable, ty: &Ty) -> BTreeSet<ClassId> {
    match ty {
        Ty::Class(c) => symbols.ancestors(c.id),
        Ty::Intersection(members) => members.iter().flat_map(|m| supertype_ids(symbols, m)).collect(),
        _ => BTreeSet::new(),
    }
}

/// View `ty` as an instance of class `target`.
fn view_as(symbols: &SymbolTable, ty: &Ty, target: ClassId) -> Option<ClassTy> {
    match ty {
        Ty::Class(c) => symbols.supertype_as(c, target),
        Ty::Intersection(members) => members.iter().find_map(|m| view_as(symbols, m, target)),
        _ => None,
    }
}

fn common_class_supertype(symbols: &SymbolTable, types: &[Ty], depth: usize) -> Ty {
    let mut common: BTreeSet<ClassId> = match types.split_first() {
        Some((first, rest)) => rest.iter().fold(supertype_ids(symbols, first), |acc, ty| {
            let ids = supertype_ids(symbols, ty);
            acc.intersection(&ids).copied().collect()
        }),
        None => BTreeSet::new(),
    };

    loop {
        let minimal: Vec<ClassId> = common
            .iter()
            .copied()
            .filter(|id| !common.iter().any(|other| other != id && symbols.ancestors(*other).contains(id)))
            .collect();
        if minimal.is_empty() {
            return symbols.any_type();
        }

        let mut result = Vec::with_capacity(minimal.len());
        let mut rejected = None;
        for id in minimal {
            match project_common(symbols, types, id, depth) {
                Some(ct) => result.push(Ty::Class(ct)),
                None => {
                    rejected = Some(id);
                    break;
                }
            }
        }
        match rejected {
            Some(id) => {
                common.remove(&id);
            }
            None if result.len() == 1 => return result.into_iter().next().unwrap_or(Ty::Nothing),
            None => return Ty::Intersection(result),
        }
    }
}

/// Instantiate class `id` so that every input is a subtype of it, or `None` if an invariant argument disagrees.
fn project_common(symbols: &SymbolTable, types: &[Ty], id: ClassId, depth: usize) -> Option<ClassTy> {
    let views: Vec<ClassTy> = types
        .iter()
        .map(|ty| view_as(symbols, ty, id))
        .collect::<Option<_>>()?;
    let arity = symbols.class(id).type_params.len();
    let mut args = Vec::with_capacity(arity);
    for index in 0..arity {
        let column: Vec<Ty> = views.iter().filter_map(|v| v.args.get(index).cloned()).collect();
        let first = column.first().cloned().unwrap_or(Ty::Error);
        let arg = if column.iter().all(|t| *t == first) {
            first
        } else {
            match symbols.variance(id, index) {
                Variance::Out => common_supertype_at(symbols, &column, depth + 1),
                Variance::In => intersect(symbols, &column),
                Variance::Invariant => return None,
            }
        };
        args.push(arg);
    }
    Some(ClassTy { id, args })
}
