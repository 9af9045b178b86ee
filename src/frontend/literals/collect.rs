//! Builder candidate collection.

use colit_core::lang::conventions::{BUILDER_FUNCTION_NAME, literal_info};
use colit_core::lang::types::builtins::BuiltinTypeId;

use crate::frontend::ast::LiteralKind;
use crate::frontend::inference::{Candidate, TypeVarSupply};
use crate::frontend::symbols::SymbolTable;
use crate::frontend::types::{FunctionId, Ty};

/// Visible functions shaped like a builder for `kind`, in declaration order.
///
/// A builder is a function named `buildFrom` with a companion-object receiver and two parameters: an `Int` size
/// and a block whose receiver is the kind's builder interface (`SequenceBuilder` or `DictionaryBuilder`). Whether
/// receiver and return type agree is left to validation.
pub fn collect_builders(symbols: &SymbolTable, kind: LiteralKind) -> Vec<FunctionId> {
    let Some(interface) = symbols.lookup_class(literal_info(kind).builder_interface) else {
        return Vec::new();
    };
    let int = symbols.builtin_type(BuiltinTypeId::Int);
    symbols
        .functions_named(BUILDER_FUNCTION_NAME)
        .filter(|id| {
            let info = symbols.function(*id);
            let companion_receiver = matches!(info.receiver, Some(Ty::Companion(_)));
            let [(_, size), (_, block)] = info.params.as_slice() else {
                return false;
            };
            let block_receiver = match block {
                Ty::Function(f) if f.params.is_empty() => f.receiver.as_deref().and_then(Ty::class_identity),
                _ => None,
            };
            companion_receiver && *size == int && block_receiver == Some(interface)
        })
        .collect()
}

/// One working candidate per builder, each with its own constraint system.
pub fn instantiate_candidates(
    symbols: &SymbolTable,
    supply: &mut TypeVarSupply,
    builders: &[FunctionId],
) -> Vec<Candidate> {
    builders
        .iter()
        .map(|id| Candidate::instantiate(symbols, supply, *id, None))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::typechecker::TypeChecker;

    fn checker_with(source: &str) -> TypeChecker {
        let mut checker = TypeChecker::new();
        checker.load_unit("<test>", source).expect("declarations check");
        checker
    }

    #[test]
    fn finds_only_builder_shaped_functions() {
        let checker = checker_with(
            r#"
            fun <E> List.Companion.buildFrom(size: Int, init: SequenceBuilder<List<E>, E>.() -> Unit): List<E>
            fun <K, V> Map.Companion.buildFrom(size: Int, init: DictionaryBuilder<Map<K, V>, K, V>.() -> Unit): Map<K, V>
            fun <E> Set.Companion.buildFrom(size: String, init: SequenceBuilder<Set<E>, E>.() -> Unit): Set<E>
            fun <E> buildFrom(size: Int, init: SequenceBuilder<List<E>, E>.() -> Unit): List<E>
            "#,
        );
        let sequence = collect_builders(&checker.symbols, LiteralKind::Sequence);
        assert_eq!(sequence.len(), 1);
        assert_eq!(
            checker.symbols.function(sequence[0]).receiver,
            Some(Ty::Companion(checker.symbols.lookup_class("List").expect("List")))
        );
        assert_eq!(collect_builders(&checker.symbols, LiteralKind::Dictionary).len(), 1);
    }

    #[test]
    fn companion_members_count_as_builders() {
        let checker = checker_with(
            r#"
            class Bag<out E> : Collection<E> {
                companion object {
                    fun <E> buildFrom(size: Int, init: SequenceBuilder<Bag<E>, E>.() -> Unit): Bag<E>
                }
            }
            "#,
        );
        assert_eq!(collect_builders(&checker.symbols, LiteralKind::Sequence).len(), 1);
    }

    #[test]
    fn candidates_get_private_systems() {
        let mut checker = checker_with(
            r#"
            fun <E> List.Companion.buildFrom(size: Int, init: SequenceBuilder<List<E>, E>.() -> Unit): List<E>
            fun <E> Set.Companion.buildFrom(size: Int, init: SequenceBuilder<Set<E>, E>.() -> Unit): Set<E>
            "#,
        );
        let builders = collect_builders(&checker.symbols, LiteralKind::Sequence);
        let candidates = instantiate_candidates(&checker.symbols, &mut checker.supply, &builders);
        assert_eq!(candidates.len(), 2);
        let first = candidates[0].type_arguments(&checker.symbols);
        let second = candidates[1].type_arguments(&checker.symbols);
        assert_ne!(first, second);
        assert!(candidates[1].system.variable(match first[0] {
            Ty::Var(v) => v,
            _ => panic!("instantiated with a variable"),
        })
        .is_none());
    }
}
