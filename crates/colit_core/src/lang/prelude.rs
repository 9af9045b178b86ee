//! The standard prelude: builder functions for the builtin containers.
//!
//! The frontend loads this source after the builtin classes and before user code (unless the prelude is
//! disabled), which is what makes `[1, 2]` resolvable out of the box.
//!
//! ## Notes
//! - Builders are ordinary extension functions on `X.Companion`; user code can declare more.

/// Source of the standard prelude.
pub const PRELUDE_SOURCE: &str = r#"// standard collection literal builders
fun <E> List.Companion.buildFrom(size: Int, init: SequenceBuilder<List<E>, E>.() -> Unit): List<E>
fun <E> Set.Companion.buildFrom(size: Int, init: SequenceBuilder<Set<E>, E>.() -> Unit): Set<E>
fun <E> MutableList.Companion.buildFrom(size: Int, init: SequenceBuilder<MutableList<E>, E>.() -> Unit): MutableList<E>
fun <K, V> Map.Companion.buildFrom(size: Int, init: DictionaryBuilder<Map<K, V>, K, V>.() -> Unit): Map<K, V>

fun <T> listOf(a: T, b: T): List<T>
fun <T> emptyList(): List<T>
"#;

/// Display name used in diagnostics that point into the prelude.
pub const PRELUDE_NAME: &str = "<prelude>";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::conventions::BUILDER_FUNCTION_NAME;

    #[test]
    fn prelude_declares_four_builders() {
        let count = PRELUDE_SOURCE
            .lines()
            .filter(|l| l.contains(&format!(".{BUILDER_FUNCTION_NAME}(")))
            .count();
        assert_eq!(count, 4);
    }
}
