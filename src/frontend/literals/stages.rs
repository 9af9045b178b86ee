//! Candidate validation.
//!
//! Two stages run in order on every collected candidate. A candidate failing either stage is dropped without a
//! diagnostic; the reason is only logged.

use colit_core::lang::conventions::literal_info;

use crate::frontend::ast::LiteralKind;
use crate::frontend::inference::{Candidate, ExprTy, constrain_argument};
use crate::frontend::symbols::SymbolTable;
use crate::frontend::types::{ClassId, Ty};

/// Why a candidate was dropped.
pub type Rejection = String;

/// Receiver must be `X.Companion` and the declared return type must be `X<...>` for the same `X`.
pub struct BuilderShapeStage;

impl BuilderShapeStage {
    /// ## Returns
    /// - The container class `X` the candidate builds.
    pub fn check(&self, symbols: &SymbolTable, candidate: &Candidate) -> Result<ClassId, Rejection> {
        let info = symbols.function(candidate.symbol);
        let Some(Ty::Companion(receiver)) = &info.receiver else {
            return Err("receiver is not a companion object".to_string());
        };
        match info.return_type.class_identity() {
            Some(returned) if returned == *receiver => Ok(returned),
            _ => Err(format!(
                "returns '{}' but extends '{}.Companion'",
                symbols.display(&info.return_type),
                symbols.class(*receiver).name
            )),
        }
    }
}

/// Every element must be accepted by the candidate's element slot(s).
///
/// The slots play the part of a synthetic vararg parameter per family: the builder block receiver's element
/// argument for sequences, its key and value arguments for dictionaries. Elements go through the same per-argument
/// resolution as call arguments.
pub struct ElementArgumentsStage;

impl ElementArgumentsStage {
    /// ## Returns
    /// - The instantiated slots, in `add` argument order.
    pub fn check(
        &self,
        symbols: &SymbolTable,
        kind: LiteralKind,
        candidate: &mut Candidate,
        families: &[Vec<ExprTy>],
    ) -> Result<Vec<Ty>, Rejection> {
        let slots = element_slots(symbols, kind, candidate)?;
        for (family, (slot, elements)) in literal_info(kind).element_families.iter().zip(slots.iter().zip(families)) {
            for element in elements {
                if !constrain_argument(symbols, &mut candidate.system, element, slot) {
                    return Err(format!(
                        "{family} of type '{}' does not fit '{}'",
                        symbols.display(&element.ty),
                        symbols.display(&candidate.system.substitute_fixed(slot))
                    ));
                }
            }
        }
        if candidate.system.has_contradiction() {
            return Err("declared bounds are violated".to_string());
        }
        Ok(slots)
    }
}

/// The instantiated type arguments of the builder interface after the container argument.
fn element_slots(symbols: &SymbolTable, kind: LiteralKind, candidate: &Candidate) -> Result<Vec<Ty>, Rejection> {
    let info = symbols.function(candidate.symbol);
    let block = info.params.last().map(|(_, ty)| candidate.instantiated(ty));
    let receiver = match &block {
        Some(Ty::Function(f)) => f.receiver.as_deref().and_then(Ty::as_class),
        _ => None,
    };
    let families = kind.family_count();
    match receiver {
        Some(interface) if interface.args.len() == families + 1 => Ok(interface.args[1..].to_vec()),
        _ => Err("block receiver does not expose element slots".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::literals::collect::{collect_builders, instantiate_candidates};
    use crate::frontend::typechecker::TypeChecker;

    const BUILDERS: &str = r#"
        fun <E> List.Companion.buildFrom(size: Int, init: SequenceBuilder<List<E>, E>.() -> Unit): List<E>
        fun <E> Set.Companion.buildFrom(size: Int, init: SequenceBuilder<List<E>, E>.() -> Unit): List<E>
        fun <E : Number> MutableList.Companion.buildFrom(size: Int, init: SequenceBuilder<MutableList<E>, E>.() -> Unit): MutableList<E>
    "#;

    fn setup() -> (TypeChecker, Vec<Candidate>) {
        let mut checker = TypeChecker::new();
        checker.load_unit("<test>", BUILDERS).expect("declarations check");
        let builders = collect_builders(&checker.symbols, LiteralKind::Sequence);
        let candidates = instantiate_candidates(&checker.symbols, &mut checker.supply, &builders);
        (checker, candidates)
    }

    #[test]
    fn shape_stage_requires_matching_receiver_and_return() {
        let (checker, candidates) = setup();
        let list = checker.symbols.lookup_class("List").expect("List");
        assert_eq!(BuilderShapeStage.check(&checker.symbols, &candidates[0]), Ok(list));
        let rejected = BuilderShapeStage.check(&checker.symbols, &candidates[1]).expect_err("Set builder returns List");
        assert!(rejected.contains("Set.Companion"));
    }

    #[test]
    fn argument_stage_respects_bounds() {
        let (checker, mut candidates) = setup();
        let string = ExprTy::new(checker.symbols.builtin_type(colit_core::lang::types::builtins::BuiltinTypeId::String));
        let int = ExprTy::new(checker.symbols.builtin_type(colit_core::lang::types::builtins::BuiltinTypeId::Int));

        let slots = ElementArgumentsStage
            .check(&checker.symbols, LiteralKind::Sequence, &mut candidates[0], &[vec![string.clone()]])
            .expect("List accepts anything");
        assert_eq!(slots.len(), 1);

        let bounded = &mut candidates[2];
        assert!(ElementArgumentsStage
            .check(&checker.symbols, LiteralKind::Sequence, &mut bounded.clone(), &[vec![int]])
            .is_ok());
        assert!(ElementArgumentsStage
            .check(&checker.symbols, LiteralKind::Sequence, bounded, &[vec![string]])
            .is_err());
    }
}
