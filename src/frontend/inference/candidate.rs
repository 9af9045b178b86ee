//! A function instantiated for one resolution attempt.

use super::{ConstraintSystem, Substitutor, TypeVarSupply};
use crate::frontend::symbols::SymbolTable;
use crate::frontend::types::{ClassTy, FunctionId, ParamOwner, Ty, TypeParamRef};

/// One callable under consideration, with a private constraint system.
///
/// Candidates never share a system: two candidates for the same call (or the same literal) only ever exchange
/// data through read-only snapshots.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub symbol: FunctionId,
    pub system: ConstraintSystem,
    /// Maps the function's type parameters (and, for members, its class's parameters) to fresh variables or
    /// concrete receiver arguments.
    pub substitutor: Substitutor,
}

impl Candidate {
    /// Instantiate `symbol` with one fresh variable per type parameter.
    ///
    /// ## Parameters
    /// - `member_receiver`: for member functions, the receiver viewed as the declaring class; its arguments replace
    ///   the class's type parameters.
    ///
    /// ## Notes
    /// - Declared bounds are added as upper bounds of the fresh variables.
    pub fn instantiate(
        symbols: &SymbolTable,
        supply: &mut TypeVarSupply,
        symbol: FunctionId,
        member_receiver: Option<&ClassTy>,
    ) -> Self {
        let info = symbols.function(symbol);
        let mut system = ConstraintSystem::new();
        let mut substitutor = Substitutor::new();

        if let Some(receiver) = member_receiver {
            for (index, arg) in receiver.args.iter().enumerate() {
                substitutor.insert_param(
                    TypeParamRef {
                        owner: ParamOwner::Class(receiver.id),
                        index,
                    },
                    arg.clone(),
                );
            }
        }

        for (index, param) in info.type_params.iter().enumerate() {
            let var = supply.fresh();
            system.register(var, param.name.clone());
            substitutor.insert_param(
                TypeParamRef {
                    owner: ParamOwner::Function(symbol),
                    index,
                },
                Ty::Var(var),
            );
        }

        let mut candidate = Candidate {
            symbol,
            system,
            substitutor,
        };
        for (index, param) in info.type_params.iter().enumerate() {
            if let Some(bound) = &param.bound {
                let var = candidate.instantiated(&Ty::function_param(symbol, index));
                let bound = candidate.instantiated(bound);
                candidate.system.add_subtype_constraint(symbols, &var, &bound);
            }
        }
        candidate
    }

    /// `ty` (a declared type of this candidate's function) with parameters replaced by this candidate's variables.
    pub fn instantiated(&self, ty: &Ty) -> Ty {
        self.substitutor.apply(ty)
    }

    /// The instantiated type arguments, in declaration order.
    pub fn type_arguments(&self, symbols: &SymbolTable) -> Vec<Ty> {
        (0..symbols.function(self.symbol).type_params.len())
            .map(|index| self.instantiated(&Ty::function_param(self.symbol, index)))
            .collect()
    }
}
