//! Deferred builder selection.
//!
//! Maps what the surrounding resolution knows about a literal's target (an expected type, the configured default
//! container, or a variable of an outer call) to one class recorded in the literal's side-table entry.

use super::errors::{ClassIdentity, InternalError, LiteralError};
use super::side_table::SideTableEntry;
use crate::frontend::inference::ConstraintSystem;
use crate::frontend::symbols::SymbolTable;
use crate::frontend::types::{ClassId, Ty, TypeVarId, is_subtype};

/// Outcome of selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Class(ClassId),
    Failed(LiteralError),
    /// The expected type is already erroneous; fail without a second diagnostic.
    Silent,
}

pub fn class_identity(symbols: &SymbolTable, id: ClassId) -> ClassIdentity {
    ClassIdentity {
        id,
        name: symbols.class(id).name.clone(),
    }
}

/// Choose the candidate for a literal whose target type is known (or partially known).
///
/// ## Parameters
/// - `expected`: the expected type, possibly mentioning variables of `outer`
/// - `outer`: the system of the call the literal is an argument of; a variable target is fixed in it
///
/// ## Notes
/// - A variable target must widen to exactly one of the literal's alternatives: the widest alternative that is
///   above the variable's widened type and below its upper bounds. The variable is fixed to that alternative
///   unless the chosen candidate is still open (empty literal); the caller then closes the candidate against the
///   variable's bounds.
#[tracing::instrument(skip_all, fields(expected = %symbols.display(expected)))]
pub fn target_for_expected(
    symbols: &SymbolTable,
    entry: &SideTableEntry,
    expected: &Ty,
    outer: Option<&mut ConstraintSystem>,
) -> Result<Target, InternalError> {
    let expected = match outer.as_deref() {
        Some(system) => system.substitute_fixed(expected),
        None => expected.clone(),
    };
    let target = match &expected {
        Ty::Error => Target::Silent,
        Ty::Class(class) => by_class(symbols, entry, class.id),
        Ty::Intersection(members) => {
            let mut present: Vec<ClassId> = members
                .iter()
                .filter_map(Ty::class_identity)
                .filter(|id| entry.candidates.contains_key(id))
                .collect();
            present.sort();
            present.dedup();
            match present.as_slice() {
                [only] => by_class(symbols, entry, *only),
                [] => Target::Failed(
                    LiteralError::no_builders(None)
                        .with_note(format!("no member of '{}' has a builder", symbols.display(&expected))),
                ),
                _ => Target::Failed(LiteralError::cant_choose(format!(
                    "several members of '{}' have builders",
                    symbols.display(&expected)
                ))),
            }
        }
        Ty::Param(_) => Target::Failed(LiteralError::cant_choose(format!(
            "the expected type '{}' is an unresolved type parameter",
            symbols.display(&expected)
        ))),
        Ty::Var(var) => match outer {
            Some(system) => from_outer_variable(symbols, entry, system, *var)?,
            None => Target::Failed(LiteralError::cant_choose("the expected type is not inferred yet")),
        },
        Ty::Companion(_) | Ty::Function(_) | Ty::Nothing => Target::Failed(
            LiteralError::no_builders(None)
                .with_note(format!("'{}' is not a collection class", symbols.display(&expected))),
        ),
    };
    tracing::debug!(outcome = ?target, "selection");
    Ok(target)
}

/// Choose the configured default container for a literal with no expected type.
pub fn default_target(symbols: &SymbolTable, entry: &SideTableEntry, default_container: &str) -> Target {
    match symbols.lookup_class(default_container) {
        Some(id) => by_class(symbols, entry, id),
        None => Target::Failed(
            LiteralError::no_builders(None)
                .with_note(format!("default container '{default_container}' is not a declared class")),
        ),
    }
}

fn by_class(symbols: &SymbolTable, entry: &SideTableEntry, id: ClassId) -> Target {
    if !entry.candidates.contains_key(&id) {
        return Target::Failed(LiteralError::no_builders(Some(class_identity(symbols, id))));
    }
    if entry.ambiguous.contains(&id) {
        return Target::Failed(LiteralError::cant_choose(format!(
            "more than one builder constructs '{}'",
            symbols.class(id).name
        )));
    }
    Target::Class(id)
}

fn from_outer_variable(
    symbols: &SymbolTable,
    entry: &SideTableEntry,
    system: &mut ConstraintSystem,
    var: TypeVarId,
) -> Result<Target, InternalError> {
    let Some(resolved) = system.result_type(symbols, var)? else {
        return Ok(Target::Failed(LiteralError::cant_choose(
            "nothing is known about the expected type yet",
        )));
    };
    let upper = proper_upper_bounds(system, var);
    let fitting: Vec<&Ty> = entry
        .alternatives
        .iter()
        .filter(|alternative| is_subtype(symbols, &resolved, alternative))
        .filter(|alternative| upper.iter().all(|bound| is_subtype(symbols, alternative, bound)))
        .collect();
    if fitting.is_empty() {
        return Ok(Target::Failed(LiteralError::cant_choose(format!(
            "the inferred type '{}' is not one of the literal's alternatives",
            symbols.display(&resolved)
        ))));
    }
    // Keep the widest fitting alternatives.
    let widest: Vec<&Ty> = fitting
        .iter()
        .copied()
        .filter(|a| !fitting.iter().any(|b| a != b && is_subtype(symbols, a, b)))
        .collect();
    let [alternative] = widest.as_slice() else {
        let names: Vec<String> = widest.iter().map(|ty| symbols.display(ty).to_string()).collect();
        return Ok(Target::Failed(LiteralError::cant_choose(format!(
            "the inferred type '{}' fits several alternatives: {}",
            symbols.display(&resolved),
            names.join(", ")
        ))));
    };
    let alternative = (*alternative).clone();
    let Some(class) = alternative.class_identity() else {
        return Err(InternalError::MissingClassIdentity(symbols.display(&alternative).to_string()));
    };
    let target = by_class(symbols, entry, class);
    if let Target::Class(class) = &target {
        let open = entry.candidates.get(class).is_some_and(|c| c.is_open());
        if !open {
            system.fix_to(symbols, var, alternative)?;
        }
    }
    Ok(target)
}

fn proper_upper_bounds(system: &ConstraintSystem, var: TypeVarId) -> Vec<Ty> {
    system
        .variable(var)
        .map(|info| {
            info.upper
                .iter()
                .map(|bound| system.substitute_fixed(bound))
                .filter(|bound| !bound.contains_var())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ast::{LiteralId, LiteralKind, Span};
    use crate::frontend::inference::{Candidate, Substitutor, TypeVarSupply};
    use crate::frontend::literals::side_table::{LiteralCandidate, SideTable};
    use crate::frontend::typechecker::TypeChecker;
    use crate::frontend::types::FunctionId;

    fn named(symbols: &SymbolTable, name: &str, args: Vec<Ty>) -> Ty {
        Ty::class(symbols.lookup_class(name).expect("class exists"), args)
    }

    fn recorded(containers: &[Ty]) -> SideTable {
        let mut table = SideTable::new();
        let id = LiteralId(0);
        table.insert(id, LiteralKind::Sequence, Span::default());
        for (index, container) in containers.iter().enumerate() {
            let candidate = LiteralCandidate {
                candidate: Candidate {
                    symbol: FunctionId(index as u32),
                    system: ConstraintSystem::new(),
                    substitutor: Substitutor::new(),
                },
                class: container.class_identity().expect("class type"),
                slots: Vec::new(),
                container: Some(container.clone()),
                alternative: container.clone(),
            };
            table.record(id, candidate).expect("entry exists");
        }
        table
    }

    #[test]
    fn concrete_expected_class_selects_its_candidate() {
        let checker = TypeChecker::new();
        let symbols = &checker.symbols;
        let int = named(symbols, "Int", vec![]);
        let list = named(symbols, "List", vec![int.clone()]);
        let set = named(symbols, "Set", vec![int.clone()]);
        let table = recorded(&[list.clone(), set.clone()]);
        let entry = table.entry(LiteralId(0)).expect("entry exists");

        let target = target_for_expected(symbols, entry, &set, None).expect("no internal error");
        assert_eq!(target, Target::Class(set.class_identity().expect("class")));
    }

    #[test]
    fn absent_expected_class_reports_that_class() {
        let checker = TypeChecker::new();
        let symbols = &checker.symbols;
        let int = named(symbols, "Int", vec![]);
        let table = recorded(&[named(symbols, "List", vec![int.clone()])]);
        let entry = table.entry(LiteralId(0)).expect("entry exists");
        let expected = named(symbols, "Set", vec![int]);

        let Target::Failed(error) = target_for_expected(symbols, entry, &expected, None).expect("no internal error")
        else {
            panic!("expected a failure");
        };
        assert_eq!(error.class(), expected.class_identity());
        assert_eq!(error.to_string(), "No builders for collection literal found for class 'Set'");
    }

    #[test]
    fn unresolved_parameters_and_free_variables_cannot_choose() {
        let checker = TypeChecker::new();
        let symbols = &checker.symbols;
        let int = named(symbols, "Int", vec![]);
        let table = recorded(&[named(symbols, "List", vec![int])]);
        let entry = table.entry(LiteralId(0)).expect("entry exists");

        let param = Ty::function_param(FunctionId(0), 0);
        let var = Ty::Var(TypeVarSupply::new().fresh());
        for expected in [param, var] {
            let target = target_for_expected(symbols, entry, &expected, None).expect("no internal error");
            assert!(matches!(target, Target::Failed(LiteralError::CantChooseBuilder { .. })), "{target:?}");
        }
    }

    #[test]
    fn error_expected_type_is_silent() {
        let checker = TypeChecker::new();
        let symbols = &checker.symbols;
        let table = recorded(&[]);
        let entry = table.entry(LiteralId(0)).expect("entry exists");
        let target = target_for_expected(symbols, entry, &Ty::Error, None).expect("no internal error");
        assert_eq!(target, Target::Silent);
    }

    #[test]
    fn default_container_falls_back_to_configured_class() {
        let checker = TypeChecker::new();
        let symbols = &checker.symbols;
        let int = named(symbols, "Int", vec![]);
        let list = named(symbols, "List", vec![int.clone()]);
        let table = recorded(&[list.clone(), named(symbols, "Set", vec![int])]);
        let entry = table.entry(LiteralId(0)).expect("entry exists");

        assert_eq!(
            default_target(symbols, entry, "List"),
            Target::Class(list.class_identity().expect("class"))
        );
        assert!(matches!(
            default_target(symbols, entry, "Deque"),
            Target::Failed(LiteralError::NoBuilders { class: None, .. })
        ));
    }

    #[test]
    fn outer_variable_picks_the_alternative_its_upper_bound_allows() {
        let checker = TypeChecker::new();
        let symbols = &checker.symbols;
        let int = named(symbols, "Int", vec![]);
        let list = named(symbols, "List", vec![int.clone()]);
        let set = named(symbols, "Set", vec![int]);
        let table = recorded(&[list.clone(), set.clone()]);
        let entry = table.entry(LiteralId(0)).expect("entry exists");

        let mut supply = TypeVarSupply::new();
        let var = supply.fresh();
        let mut outer = ConstraintSystem::new();
        outer.register(var, "T");
        let provisional = Ty::Intersection(vec![list.clone(), set]);
        outer.add_subtype_constraint(symbols, &provisional, &Ty::Var(var));
        outer.add_subtype_constraint(symbols, &Ty::Var(var), &list);

        let target = target_for_expected(symbols, entry, &Ty::Var(var), Some(&mut outer)).expect("no internal error");
        assert_eq!(target, Target::Class(list.class_identity().expect("class")));
        assert_eq!(outer.substitute_fixed(&Ty::Var(var)), list);
    }

    #[test]
    fn outer_variable_without_guidance_cannot_choose() {
        let checker = TypeChecker::new();
        let symbols = &checker.symbols;
        let int = named(symbols, "Int", vec![]);
        let list = named(symbols, "List", vec![int.clone()]);
        let set = named(symbols, "Set", vec![int]);
        let table = recorded(&[list.clone(), set.clone()]);
        let entry = table.entry(LiteralId(0)).expect("entry exists");

        let var = TypeVarSupply::new().fresh();
        let mut outer = ConstraintSystem::new();
        outer.register(var, "T");
        outer.add_subtype_constraint(symbols, &Ty::Intersection(vec![list, set]), &Ty::Var(var));

        let target = target_for_expected(symbols, entry, &Ty::Var(var), Some(&mut outer)).expect("no internal error");
        assert!(matches!(target, Target::Failed(LiteralError::CantChooseBuilder { .. })));
        assert!(outer.unfixed_variables().contains(&var));
    }
}
