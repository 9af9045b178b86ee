//! Type inference primitives shared by call resolution and the collection-literal engine.
//!
//! ## Module Structure
//!
//! - `system` - [`ConstraintSystem`]: variables with lower/upper bounds, incorporation and fixation
//! - `substitutor` - [`Substitutor`]: parameter/variable to type maps and their composition
//! - `candidate` - [`Candidate`]: one function instantiated with fresh variables

mod candidate;
mod substitutor;
mod system;

pub use candidate::Candidate;
pub use substitutor::Substitutor;
pub use system::{ConstraintError, ConstraintSystem, FixationMode, VariableWithConstraints};

use crate::frontend::symbols::SymbolTable;
use crate::frontend::types::{Ty, TypeVarId};

/// Type of a checked expression.
///
/// In dependent mode a generic call may come back with its inference variables still open; `pending` then carries
/// the call's constraint system so a consumer can merge it and finish inference in a wider context.
#[derive(Debug, Clone)]
pub struct ExprTy {
    pub ty: Ty,
    pub pending: Option<ConstraintSystem>,
}

impl ExprTy {
    pub fn new(ty: Ty) -> Self {
        Self { ty, pending: None }
    }

    pub fn error() -> Self {
        Self::new(Ty::Error)
    }
}

/// Resolve one argument against one (instantiated) parameter type.
///
/// Merges the argument's pending system, then adds `argument <: parameter`.
///
/// ## Returns
/// - `false` if the argument does not fit; the constraint is then not recorded.
pub fn constrain_argument(symbols: &SymbolTable, system: &mut ConstraintSystem, argument: &ExprTy, parameter: &Ty) -> bool {
    if let Some(pending) = &argument.pending {
        system.merge_snapshot(pending);
    }
    system.add_subtype_constraint_if_compatible(symbols, &argument.ty, parameter)
}

/// Allocates type variables for one compilation unit.
///
/// Every constraint system of the unit draws from the same supply, so variable handles are unique across systems
/// and snapshots can be merged without renaming.
#[derive(Debug, Default)]
pub struct TypeVarSupply {
    next: u32,
}

impl TypeVarSupply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> TypeVarId {
        let id = TypeVarId(self.next);
        self.next += 1;
        id
    }
}
