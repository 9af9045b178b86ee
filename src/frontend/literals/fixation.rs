//! Per-candidate type fixation and the provisional intersection.

use super::errors::InternalError;
use super::side_table::FixedArgument;
use crate::frontend::inference::{Candidate, ConstraintSystem, FixationMode};
use crate::frontend::symbols::SymbolTable;
use crate::frontend::types::{Ty, intersect};

/// Outcome of fixing one validated candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum Fixation {
    /// Container type this candidate builds; the candidate's substitutor is now composed.
    Fixed(Ty),
    /// Empty literal: element variables stay open. Carries the container type computed as if the elements were
    /// `Nothing`, used only for the provisional intersection.
    Open(Ty),
    /// Fixing contradicted the candidate's own constraints.
    Dropped,
}

/// Substitute the unified element types into the candidate's slots and fix everything else by widening.
///
/// ## Parameters
/// - `slots`: instantiated element slots from validation
/// - `fixed`: one [`FixedArgument`] per slot, or empty for an empty literal
pub fn fix_candidate(
    symbols: &SymbolTable,
    candidate: &mut Candidate,
    slots: &[Ty],
    fixed: &[FixedArgument],
) -> Result<Fixation, InternalError> {
    if fixed.is_empty() {
        let mut preview = candidate.system.clone();
        bound_slots_below_by_nothing(symbols, &mut preview, slots);
        let container = finish(symbols, candidate, preview, Commit::Preview)?;
        return Ok(Fixation::Open(container));
    }

    for (slot, argument) in slots.iter().zip(fixed) {
        match slot {
            Ty::Var(var) => candidate.system.fix_to(symbols, *var, argument.fixed.clone())?,
            other => candidate.system.add_subtype_constraint(symbols, &argument.fixed, other),
        }
    }
    if candidate.system.has_contradiction() {
        return Ok(Fixation::Dropped);
    }
    let system = std::mem::take(&mut candidate.system);
    let container = finish(symbols, candidate, system, Commit::Store)?;
    Ok(Fixation::Fixed(container))
}

/// Fix an open candidate once the selector has chosen it.
///
/// ## Parameters
/// - `expected`: the selector's expected type; `container <: expected` is added when compatible
/// - `outer`: the enclosing call's system, merged read-only so variables it mentions are known
pub fn close_candidate(
    symbols: &SymbolTable,
    candidate: &mut Candidate,
    slots: &[Ty],
    expected: Option<&Ty>,
    outer: Option<&ConstraintSystem>,
) -> Result<Ty, InternalError> {
    let mut system = std::mem::take(&mut candidate.system);
    if let Some(outer) = outer {
        system.merge_snapshot(outer);
    }
    let template = candidate.instantiated(&symbols.function(candidate.symbol).return_type);
    let constrained = expected.is_some_and(|expected| system.add_subtype_constraint_if_compatible(symbols, &template, expected));
    if !constrained {
        bound_slots_below_by_nothing(symbols, &mut system, slots);
    }
    finish(symbols, candidate, system, Commit::Store)
}

/// The literal's provisional type: a subtype of every alternative.
pub fn provisional_type(symbols: &SymbolTable, alternatives: &[Ty]) -> Ty {
    intersect(symbols, alternatives)
}

fn bound_slots_below_by_nothing(symbols: &SymbolTable, system: &mut ConstraintSystem, slots: &[Ty]) {
    for slot in slots {
        system.add_subtype_constraint(symbols, &Ty::Nothing, slot);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Commit {
    /// Store the fixed system and the composed substitutor on the candidate.
    Store,
    /// Compute the container type only; the candidate is left untouched.
    Preview,
}

/// Fix every remaining variable, compose `previous ∘ new` and return the container type.
fn finish(
    symbols: &SymbolTable,
    candidate: &mut Candidate,
    mut system: ConstraintSystem,
    commit: Commit,
) -> Result<Ty, InternalError> {
    system.fix_all(symbols, FixationMode::Forced)?;
    if let Some(unknown) = system.unknown_variable() {
        return Err(crate::frontend::inference::ConstraintError::UnknownVariable(unknown).into());
    }
    let composed = candidate.substitutor.then(&system.current_substitutor());
    let container = composed.apply(&symbols.function(candidate.symbol).return_type);
    if container.class_identity().is_none() {
        return Err(InternalError::MissingClassIdentity(symbols.display(&container).to_string()));
    }
    if commit == Commit::Store {
        candidate.system = system;
        candidate.substitutor = composed;
    }
    Ok(container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ast::LiteralKind;
    use crate::frontend::inference::ExprTy;
    use crate::frontend::literals::collect::{collect_builders, instantiate_candidates};
    use crate::frontend::literals::stages::ElementArgumentsStage;
    use crate::frontend::literals::unify::unify_family;
    use crate::frontend::typechecker::TypeChecker;
    use crate::frontend::types::is_subtype;

    const BUILDERS: &str = r#"
        fun <E> List.Companion.buildFrom(size: Int, init: SequenceBuilder<List<E>, E>.() -> Unit): List<E>
        fun <E> Set.Companion.buildFrom(size: Int, init: SequenceBuilder<Set<E>, E>.() -> Unit): Set<E>
    "#;

    fn named(symbols: &SymbolTable, name: &str, args: Vec<Ty>) -> Ty {
        Ty::class(symbols.lookup_class(name).expect("class exists"), args)
    }

    /// Validated candidates and their slots for a literal with the given element types.
    fn validated(checker: &mut TypeChecker, elements: Vec<ExprTy>) -> (Vec<(Candidate, Vec<Ty>)>, Vec<FixedArgument>) {
        let builders = collect_builders(&checker.symbols, LiteralKind::Sequence);
        let candidates = instantiate_candidates(&checker.symbols, &mut checker.supply, &builders);
        let families = vec![elements];
        let fixed: Vec<FixedArgument> = unify_family(&checker.symbols, &mut checker.supply, "element", &families[0])
            .expect("no internal error")
            .into_iter()
            .collect();
        let validated = candidates
            .into_iter()
            .map(|mut c| {
                let slots = ElementArgumentsStage
                    .check(&checker.symbols, LiteralKind::Sequence, &mut c, &families)
                    .expect("valid");
                (c, slots)
            })
            .collect();
        (validated, fixed)
    }

    fn checker() -> TypeChecker {
        let mut checker = TypeChecker::new();
        checker.load_unit("<test>", BUILDERS).expect("declarations check");
        checker
    }

    #[test]
    fn fixed_candidates_build_concrete_containers() {
        let mut checker = checker();
        let int = named(&checker.symbols, "Int", vec![]);
        let (mut validated, fixed) = validated(&mut checker, vec![ExprTy::new(int.clone()), ExprTy::new(int.clone())]);
        let (candidate, slots) = &mut validated[0];
        let outcome = fix_candidate(&checker.symbols, candidate, slots, &fixed).expect("no internal error");
        assert_eq!(outcome, Fixation::Fixed(named(&checker.symbols, "List", vec![int.clone()])));
        // composed substitutor maps the builder's own parameter straight to the element type
        assert_eq!(candidate.type_arguments(&checker.symbols), vec![int]);
    }

    #[test]
    fn provisional_type_is_below_every_alternative() {
        let mut checker = checker();
        let int = named(&checker.symbols, "Int", vec![]);
        let (validated, fixed) = validated(&mut checker, vec![ExprTy::new(int)]);
        let alternatives: Vec<Ty> = validated
            .into_iter()
            .map(|(mut candidate, slots)| match fix_candidate(&checker.symbols, &mut candidate, &slots, &fixed) {
                Ok(Fixation::Fixed(ty)) => ty,
                other => panic!("unexpected fixation {other:?}"),
            })
            .collect();
        let provisional = provisional_type(&checker.symbols, &alternatives);
        assert!(matches!(provisional, Ty::Intersection(ref members) if members.len() == 2));
        for alternative in &alternatives {
            assert!(is_subtype(&checker.symbols, &provisional, alternative));
        }
    }

    #[test]
    fn empty_literals_stay_open_until_closed() {
        let mut checker = checker();
        let (mut validated, fixed) = validated(&mut checker, vec![]);
        assert!(fixed.is_empty());
        let (candidate, slots) = &mut validated[1];
        let before = candidate.substitutor.clone();
        let outcome = fix_candidate(&checker.symbols, candidate, slots, &fixed).expect("no internal error");
        assert_eq!(outcome, Fixation::Open(named(&checker.symbols, "Set", vec![Ty::Nothing])));
        assert_eq!(candidate.substitutor, before);

        let expected = named(&checker.symbols, "Set", vec![named(&checker.symbols, "String", vec![])]);
        let closed = close_candidate(&checker.symbols, candidate, slots, Some(&expected), None).expect("no internal error");
        assert_eq!(closed, expected);
    }

    #[test]
    fn closing_without_expected_type_uses_nothing() {
        let mut checker = checker();
        let (mut validated, _) = validated(&mut checker, vec![]);
        let (candidate, slots) = &mut validated[0];
        let closed = close_candidate(&checker.symbols, candidate, slots, None, None).expect("no internal error");
        assert_eq!(closed, named(&checker.symbols, "List", vec![Ty::Nothing]));
    }
}
