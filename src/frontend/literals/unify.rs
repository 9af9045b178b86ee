//! Element type unification: one representative type per element family.

use super::errors::InternalError;
use super::side_table::FixedArgument;
use crate::frontend::inference::{ConstraintSystem, ExprTy, FixationMode, TypeVarSupply};
use crate::frontend::symbols::SymbolTable;
use crate::frontend::types::Ty;

/// Unify the already-checked element types of one family in an isolated constraint system.
///
/// ## Parameters
/// - `family`: name of the family (`element`, `key`, `value`), used for the fresh variable
/// - `elements`: element types in source order; pending systems of unfinished calls are merged read-only
///
/// ## Returns
/// - `None` for an empty family: there is nothing to unify.
/// - Otherwise the variable and its widened type. Variables left without any proper bound are approximated by
///   `Any`.
pub fn unify_family(
    symbols: &SymbolTable,
    supply: &mut TypeVarSupply,
    family: &str,
    elements: &[ExprTy],
) -> Result<Option<FixedArgument>, InternalError> {
    if elements.is_empty() {
        return Ok(None);
    }
    let variable = supply.fresh();
    let mut system = ConstraintSystem::new();
    system.register(variable, family);
    for element in elements {
        if let Some(pending) = &element.pending {
            system.merge_snapshot(pending);
        }
        system.add_subtype_constraint(symbols, &element.ty, &Ty::Var(variable));
    }
    system.fix_all(symbols, FixationMode::Forced)?;
    if let Some(unknown) = system.unknown_variable() {
        return Err(crate::frontend::inference::ConstraintError::UnknownVariable(unknown).into());
    }
    let fixed = system.current_substitutor().apply(&Ty::Var(variable));
    tracing::trace!(family, fixed = %symbols.display(&fixed), "unified element family");
    Ok(Some(FixedArgument { variable, fixed }))
}
