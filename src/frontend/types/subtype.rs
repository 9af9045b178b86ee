//! Subtyping with declaration-site variance.

use super::{ClassTy, FunctionTy, Ty, Variance};
use crate::frontend::symbols::SymbolTable;

/// Return `true` if `sub` is a subtype of `sup`.
///
/// ## Notes
/// - Inference variables and type parameters are only related to themselves (and to `Nothing`/`Any`);
///   relating them to anything else is the constraint system's job.
/// - The error type is compatible in both directions.
pub fn is_subtype(symbols: &SymbolTable, sub: &Ty, sup: &Ty) -> bool {
    if sub == sup {
        return true;
    }
    match (sub, sup) {
        (Ty::Error, _) | (_, Ty::Error) => true,
        (Ty::Nothing, _) => true,
        (_, Ty::Nothing) => false,
        (_, Ty::Intersection(members)) => members.iter().all(|m| is_subtype(symbols, sub, m)),
        (Ty::Intersection(members), _) => members.iter().any(|m| is_subtype(symbols, m, sup)),
        (_, Ty::Class(c)) if symbols.is_any(c.id) => true,
        (Ty::Class(a), Ty::Class(b)) => class_conforms(symbols, a, b),
        (Ty::Function(a), Ty::Function(b)) => function_conforms(symbols, a, b),
        _ => false,
    }
}

/// Mutual subtyping.
pub fn is_equivalent(symbols: &SymbolTable, a: &Ty, b: &Ty) -> bool {
    is_subtype(symbols, a, b) && is_subtype(symbols, b, a)
}

fn class_conforms(symbols: &SymbolTable, sub: &ClassTy, sup: &ClassTy) -> bool {
    let Some(view) = symbols.supertype_as(sub, sup.id) else {
        return false;
    };
    if view.args.len() != sup.args.len() {
        return false;
    }
    view.args
        .iter()
        .zip(&sup.args)
        .enumerate()
        .all(|(index, (a, b))| match symbols.variance(sup.id, index) {
            Variance::Out => is_subtype(symbols, a, b),
            Variance::In => is_subtype(symbols, b, a),
            Variance::Invariant => is_equivalent(symbols, a, b),
        })
}

fn function_conforms(symbols: &SymbolTable, sub: &FunctionTy, sup: &FunctionTy) -> bool {
    if sub.params.len() != sup.params.len() {
        return false;
    }
    let receivers_conform = match (&sub.receiver, &sup.receiver) {
        (None, None) => true,
        (Some(a), Some(b)) => is_subtype(symbols, b, a),
        _ => false,
    };
    receivers_conform
        && sub.params.iter().zip(&sup.params).all(|(a, b)| is_subtype(symbols, b, a))
        && is_subtype(symbols, &sub.ret, &sup.ret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::types::TypeVarId;

    fn table() -> SymbolTable {
        crate::frontend::typechecker::TypeChecker::new().symbols
    }

    fn named(symbols: &SymbolTable, name: &str, args: Vec<Ty>) -> Ty {
        let id = symbols.lookup_class(name).expect("class exists");
        Ty::class(id, args)
    }

    #[test]
    fn class_hierarchy_and_any() {
        let s = table();
        let int = named(&s, "Int", vec![]);
        let number = named(&s, "Number", vec![]);
        let any = named(&s, "Any", vec![]);
        assert!(is_subtype(&s, &int, &number));
        assert!(!is_subtype(&s, &number, &int));
        assert!(is_subtype(&s, &int, &any));
        assert!(is_subtype(&s, &Ty::Nothing, &int));
        assert!(!is_subtype(&s, &int, &Ty::Nothing));
    }

    #[test]
    fn covariant_arguments_follow_supertypes() {
        let s = table();
        let int = named(&s, "Int", vec![]);
        let number = named(&s, "Number", vec![]);
        let list_int = named(&s, "List", vec![int.clone()]);
        let coll_number = named(&s, "Collection", vec![number.clone()]);
        assert!(is_subtype(&s, &list_int, &coll_number));
        assert!(!is_subtype(&s, &coll_number, &list_int));
    }

    #[test]
    fn invariant_arguments_must_match() {
        let s = table();
        let int = named(&s, "Int", vec![]);
        let number = named(&s, "Number", vec![]);
        let ml_int = named(&s, "MutableList", vec![int.clone()]);
        let ml_number = named(&s, "MutableList", vec![number.clone()]);
        assert!(!is_subtype(&s, &ml_int, &ml_number));
        // MutableList<Int> <: List<Int> <: List<Number>
        assert!(is_subtype(&s, &ml_int, &named(&s, "List", vec![number])));
    }

    #[test]
    fn intersections_on_either_side() {
        let s = table();
        let int = named(&s, "Int", vec![]);
        let list = named(&s, "List", vec![int.clone()]);
        let set = named(&s, "Set", vec![int.clone()]);
        let both = Ty::Intersection(vec![list.clone(), set.clone()]);
        assert!(is_subtype(&s, &both, &list));
        assert!(is_subtype(&s, &both, &set));
        assert!(!is_subtype(&s, &list, &both));
        assert!(is_subtype(&s, &Ty::Nothing, &both));
    }

    #[test]
    fn variables_relate_only_to_themselves() {
        let s = table();
        let v = Ty::Var(TypeVarId(0));
        let int = named(&s, "Int", vec![]);
        assert!(is_subtype(&s, &v, &v));
        assert!(!is_subtype(&s, &v, &int));
        assert!(is_subtype(&s, &v, &named(&s, "Any", vec![])));
    }

    #[test]
    fn functions_are_contravariant_in_parameters() {
        let s = table();
        let int = named(&s, "Int", vec![]);
        let number = named(&s, "Number", vec![]);
        let takes_number = Ty::Function(FunctionTy {
            receiver: None,
            params: vec![number.clone()],
            ret: Box::new(int.clone()),
        });
        let takes_int = Ty::Function(FunctionTy {
            receiver: None,
            params: vec![int.clone()],
            ret: Box::new(number.clone()),
        });
        assert!(is_subtype(&s, &takes_number, &takes_int));
        assert!(!is_subtype(&s, &takes_int, &takes_number));
    }

    #[test]
    fn error_type_is_compatible_both_ways() {
        let s = table();
        let int = named(&s, "Int", vec![]);
        assert!(is_subtype(&s, &Ty::Error, &int));
        assert!(is_subtype(&s, &int, &Ty::Error));
    }
}
